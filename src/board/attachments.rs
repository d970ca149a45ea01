//! Equipment attachment.
//!
//! The attachment map is a weak relation from equipment to creature: an
//! entry disappears as soon as either side leaves the battlefield. Buffs
//! are applied to the creature's buff fields when attaching and removed
//! when detaching; granted keywords are recomputed from scratch.

use tracing::{debug, instrument, Level};

use super::BoardState;
use crate::cards::{StaticAbility, TriggerEvent};
use crate::core::{EngineError, EngineResult, EntityId};
use crate::mana::solver;
use crate::triggers::TriggerDispatcher;
use crate::zones::ZoneKind;

impl BoardState {
    /// Pay an equipment's equip cost and attach it to `creature`.
    ///
    /// Moves the buff off the previous creature, recomputes granted
    /// keywords and fires the equipment's `equip` trigger.
    #[instrument(level = Level::DEBUG, skip(self))]
    pub fn equip(&mut self, equipment: EntityId, creature: EntityId) -> EngineResult<()> {
        let gear = self
            .card(equipment)
            .filter(|c| c.zone.is_battlefield())
            .ok_or(EngineError::NotOnBattlefield(equipment))?;
        let cost = gear
            .def
            .equip_cost
            .clone()
            .ok_or(EngineError::NoEquipCost(equipment))?;
        if self.zone_of(creature) != Some(ZoneKind::Creatures) {
            return Err(EngineError::NotOnBattlefield(creature));
        }

        let spent = solver::pay(&cost, &mut self.pool)?;
        self.mana_spent += spent;

        self.detach(equipment);
        let (power, toughness) = self.equipment_buff(equipment);
        if let Some(target) = self.cards.get_mut(&creature) {
            target.power_buff += power;
            target.toughness_buff += toughness;
        }
        self.attachments.insert(equipment, creature);
        self.refresh_equipment_keywords();

        debug!(%equipment, %creature, spent, "equipped");
        TriggerDispatcher::execute(self, TriggerEvent::Equip, equipment);
        Ok(())
    }

    /// Total +power/+toughness an equipment grants.
    fn equipment_buff(&self, equipment: EntityId) -> (i32, i32) {
        self.card(equipment).map_or((0, 0), |c| {
            c.def.statics.iter().fold((0, 0), |(p, t), s| match s {
                StaticAbility::EquippedBuff { power, toughness } => (p + power, t + toughness),
                _ => (p, t),
            })
        })
    }

    /// Remove an equipment's attachment and its buff.
    fn detach(&mut self, equipment: EntityId) {
        let Some(old) = self.attachments.remove(&equipment) else {
            return;
        };
        let (power, toughness) = self.equipment_buff(equipment);
        if let Some(card) = self.cards.get_mut(&old) {
            card.power_buff -= power;
            card.toughness_buff -= toughness;
        }
    }

    /// Drop every attachment involving `entity`.
    pub(crate) fn detach_all(&mut self, entity: EntityId) {
        self.detach(entity);
        self.attachments.retain(|_, &mut creature| creature != entity);
        self.refresh_equipment_keywords();
    }

    /// Recompute keywords granted by equipment.
    ///
    /// An equipped creature gets every keyword its equipment grants, plus
    /// its own "while equipped" keywords.
    pub fn refresh_equipment_keywords(&mut self) {
        let creatures: Vec<EntityId> = self.cards_in(ZoneKind::Creatures).to_vec();
        for creature in creatures {
            let equipment = self.equipment_on(creature);
            let mut granted = crate::cards::KeywordSet::new();
            for gear in &equipment {
                if let Some(card) = self.card(*gear) {
                    for s in &card.def.statics {
                        if let StaticAbility::EquippedGrants(k) = s {
                            granted.insert(*k);
                        }
                    }
                }
            }
            if let Some(card) = self.cards.get_mut(&creature) {
                if !equipment.is_empty() {
                    for s in &card.def.statics {
                        if let StaticAbility::KeywordWhileEquipped(k) = s {
                            granted.insert(*k);
                        }
                    }
                }
                card.granted = granted;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::cards::{CardDefinition, Category, Keyword, TriggeredAbility};
    use crate::core::{GameRng, SimConfig};
    use crate::effects::Effect;
    use crate::mana::{ManaSymbol, ManaUnit};

    fn sword() -> CardDefinition {
        CardDefinition::new("Short Sword", Category::Artifact)
            .with_cost("1")
            .with_equip_cost("1")
            .with_static(StaticAbility::EquippedBuff { power: 1, toughness: 1 })
            .with_static(StaticAbility::EquippedGrants(Keyword::Vigilance))
            .with_trigger(TriggeredAbility::new(TriggerEvent::Equip).with_effect(Effect::GainLife(2)))
    }

    fn setup() -> (BoardState, EntityId, EntityId, EntityId) {
        let mut board = BoardState::empty(SimConfig::new(), GameRng::new(1));
        let sword = board.add_card(Arc::new(sword()), ZoneKind::Artifacts);
        let bear = CardDefinition::new("Bear", Category::Creature).with_stats(2, 2);
        let knight = CardDefinition::new("Knight", Category::Creature)
            .with_stats(2, 2)
            .with_static(StaticAbility::KeywordWhileEquipped(Keyword::FirstStrike));
        let a = board.add_card(Arc::new(bear), ZoneKind::Creatures);
        let b = board.add_card(Arc::new(knight), ZoneKind::Creatures);
        for _ in 0..4 {
            board.pool.add(ManaUnit::single(ManaSymbol::Colorless));
        }
        (board, sword, a, b)
    }

    #[test]
    fn test_equip_moves_buff() {
        let (mut board, sword, bear, knight) = setup();

        board.equip(sword, bear).unwrap();
        assert_eq!(board.card(bear).unwrap().power(), Some(3));
        assert!(board.card(bear).unwrap().has_keyword(Keyword::Vigilance));
        assert_eq!(board.attached_to(sword), Some(bear));
        assert_eq!(board.life, 42);

        board.equip(sword, knight).unwrap();
        let bear_card = board.card(bear).unwrap();
        assert_eq!(bear_card.power(), Some(2));
        assert!(!bear_card.has_keyword(Keyword::Vigilance));

        let knight_card = board.card(knight).unwrap();
        assert_eq!(knight_card.toughness(), Some(3));
        assert!(knight_card.has_keyword(Keyword::FirstStrike));
        assert_eq!(board.equipment_on(knight), vec![sword]);
        assert_eq!(board.mana_spent, 2);
    }

    #[test]
    fn test_equip_requires_mana() {
        let (mut board, sword, bear, _) = setup();
        board.pool.clear();

        assert_eq!(board.equip(sword, bear).unwrap_err(), EngineError::InsufficientMana);
        assert_eq!(board.attached_to(sword), None);
        assert_eq!(board.life, 40);
    }

    #[test]
    fn test_equip_validation() {
        let (mut board, sword, bear, _) = setup();

        assert_eq!(
            board.equip(bear, sword).unwrap_err(),
            EngineError::NoEquipCost(bear)
        );
        assert_eq!(
            board.equip(sword, EntityId(999)).unwrap_err(),
            EngineError::NotOnBattlefield(EntityId(999))
        );
        assert_eq!(board.pool.len(), 4);
    }

    #[test]
    fn test_creature_leaving_clears_attachment() {
        let (mut board, sword, bear, _) = setup();
        board.equip(sword, bear).unwrap();

        board.move_to_graveyard(bear, ZoneKind::Creatures).unwrap();
        assert_eq!(board.attached_to(sword), None);
        assert_eq!(board.card(bear).unwrap().power(), Some(2));
    }

    #[test]
    fn test_equipment_leaving_removes_buff() {
        let (mut board, sword, bear, _) = setup();
        board.equip(sword, bear).unwrap();

        board.move_to_graveyard(sword, ZoneKind::Artifacts).unwrap();
        let bear_card = board.card(bear).unwrap();
        assert_eq!(bear_card.power(), Some(2));
        assert!(!bear_card.has_keyword(Keyword::Vigilance));
        assert!(board.equipment_on(bear).is_empty());
    }
}
