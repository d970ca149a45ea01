//! Combat: attack declaration, damage marking, and damage to the opponent.
//!
//! Combat state lives for one turn. The first `attack` of a turn starts a
//! new combat, which clears the attacker list and the set of attack
//! abilities already fired.

use tracing::{debug, instrument, Level};

use super::BoardState;
use crate::cards::{Keyword, TriggerEvent};
use crate::core::{EngineError, EngineResult, EntityId};
use crate::triggers::TriggerDispatcher;
use crate::zones::ZoneKind;

impl BoardState {
    /// Declare `creature` as an attacker.
    ///
    /// Attack triggers are then fired for every declared attacker, so a
    /// later attacker can open an earlier attacker's gate. Abilities that
    /// already fired this combat are skipped. Returns the number of
    /// abilities fired by this call.
    #[instrument(level = Level::DEBUG, skip(self))]
    pub fn attack(&mut self, creature: EntityId) -> EngineResult<usize> {
        if self.zone_of(creature) != Some(ZoneKind::Creatures) {
            return Err(EngineError::NotOnBattlefield(creature));
        }

        if self.combat.combat_turn != Some(self.turn) {
            self.combat.reset(self.turn);
        }
        if !self.combat.attackers.contains(&creature) {
            self.combat.attackers.push(creature);
            if let Some(card) = self.cards.get_mut(&creature) {
                if !card.has_keyword(Keyword::Vigilance) {
                    card.tapped = true;
                }
            }
        }
        self.refresh_equipment_keywords();

        let mut fired = 0;
        for attacker in self.combat.attackers.clone() {
            fired += TriggerDispatcher::execute(self, TriggerEvent::Attack, attacker);
        }
        debug!(%creature, attackers = self.combat.attackers.len(), fired, "attack declared");
        Ok(fired)
    }

    /// Mark damage on a creature.
    ///
    /// Damage triggers fire across the battlefield while the creature is
    /// recorded as the one being damaged. Afterwards a creature with
    /// lethal damage leaves the battlefield. Returns the damage marked.
    #[instrument(level = Level::DEBUG, skip(self))]
    pub fn deal_damage(&mut self, creature: EntityId, amount: i32) -> EngineResult<i32> {
        if self.zone_of(creature) != Some(ZoneKind::Creatures) {
            return Err(EngineError::NotOnBattlefield(creature));
        }
        let marked = match self.cards.get_mut(&creature) {
            Some(card) => card.mark_damage(amount),
            None => return Err(EngineError::NotOnBattlefield(creature)),
        };

        self.combat.last_damaged = Some(creature);
        TriggerDispatcher::fire_all(self, TriggerEvent::Damage);
        self.combat.last_damaged = None;

        let lethal = self
            .card(creature)
            .is_some_and(|c| c.zone == ZoneKind::Creatures && c.is_lethally_damaged());
        if lethal {
            let to = self.move_to_graveyard(creature, ZoneKind::Creatures)?;
            debug!(%creature, %to, "creature died");
        }
        Ok(marked)
    }

    /// A creature deals combat damage to the opponent.
    ///
    /// Makes us the monarch if that was set up for this turn.
    #[instrument(level = Level::DEBUG, skip(self))]
    pub fn combat_damage_to_player(&mut self, creature: EntityId, amount: i64) -> EngineResult<()> {
        let lifelink = match self.card(creature) {
            Some(card) if card.zone.is_battlefield() => card.has_keyword(Keyword::Lifelink),
            _ => return Err(EngineError::NotOnBattlefield(creature)),
        };

        self.damage_opponent(amount);
        if lifelink {
            self.life += amount;
        }
        if amount > 0 && self.monarch_on_damage_turn == Some(self.turn) {
            self.monarch = true;
            debug!(%creature, "became the monarch");
        }
        Ok(())
    }
}
