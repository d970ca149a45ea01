//! Turn structure for a single goldfish trial.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn, Level};

use crate::board::{BoardState, PlayRecord};
use crate::cards::{CardCatalog, DeckList, Keyword};
use crate::cast::CastRouter;
use crate::core::{EngineResult, EntityId, GameRng, SimConfig};
use crate::mana::solver;
use crate::zones::ZoneKind;

/// What happened in one trial.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrialReport {
    /// Trial index within the batch.
    pub index: u64,

    /// Seed the trial's RNG was created from.
    pub seed: u64,

    /// Cumulative damage dealt at the end of each turn.
    ///
    /// Always `max_turns` long; turns after a kill repeat the final total.
    pub damage_by_turn: Vec<i64>,

    /// Turn on which the opponent's life reached zero.
    pub kill_turn: Option<u32>,

    pub mana_spent: u32,
    pub cards_drawn: u32,
    pub total_plays: u32,

    /// Our life total when the trial ended.
    pub final_life: i64,

    pub play_log: Vec<PlayRecord>,
}

/// Plays trials of one deck with a fixed greedy policy.
///
/// Each turn: begin turn, draw, land drop, mana abilities, casts, equip,
/// attack, combat damage, end step.
pub struct GoldfishDriver<'a> {
    catalog: &'a CardCatalog,
    deck: &'a DeckList,
    config: &'a SimConfig,
}

impl<'a> GoldfishDriver<'a> {
    pub fn new(catalog: &'a CardCatalog, deck: &'a DeckList, config: &'a SimConfig) -> Self {
        Self { catalog, deck, config }
    }

    /// Play trial `index` to completion.
    #[instrument(level = Level::DEBUG, skip(self))]
    pub fn run_trial(&self, index: u64) -> EngineResult<TrialReport> {
        let rng = GameRng::for_trial(self.config.seed, index);
        let seed = rng.seed();
        let mut board = BoardState::new(self.catalog, self.deck, self.config.clone(), rng)?;
        board.draw_cards(self.config.opening_hand_size);

        let max_turns = self.config.max_turns as usize;
        let mut damage_by_turn = Vec::with_capacity(max_turns);
        let mut kill_turn = None;

        while board.turn < self.config.max_turns {
            self.play_turn(&mut board)?;
            damage_by_turn.push(board.damage_dealt);
            if board.opponent_life <= 0 {
                kill_turn = Some(board.turn);
                break;
            }
        }
        let last = damage_by_turn.last().copied().unwrap_or(0);
        damage_by_turn.resize(max_turns, last);

        debug!(index, ?kill_turn, damage = last, "trial finished");
        Ok(TrialReport {
            index,
            seed,
            damage_by_turn,
            kill_turn,
            mana_spent: board.mana_spent,
            cards_drawn: board.cards_drawn,
            total_plays: board.total_plays,
            final_life: board.life,
            play_log: board.play_log.iter().cloned().collect(),
        })
    }

    /// Play one full turn on `board`.
    pub fn play_turn(&self, board: &mut BoardState) -> EngineResult<()> {
        board.begin_turn();
        if board.turn > 1 || self.config.draw_on_first_turn {
            board.draw_cards(1);
        }

        while board.lands_played_this_turn < self.config.land_drops_per_turn {
            if !Self::land_drop(board) {
                break;
            }
        }
        Self::activate_mana_abilities(board);
        Self::cast_spells(board);
        Self::equip_idle(board);
        Self::attack_all(board)?;
        self.end_step(board)?;
        Ok(())
    }

    /// Play the best land in hand. Returns false when there is none or the
    /// play was refused.
    fn land_drop(board: &mut BoardState) -> bool {
        let lands: Vec<EntityId> = board
            .hand()
            .iter()
            .copied()
            .filter(|&id| board.card(id).is_some_and(|c| c.def.is_land()))
            .collect();

        // Untapped lands first, then fetches, then anything.
        let pick = lands
            .iter()
            .copied()
            .find(|&id| {
                board
                    .card(id)
                    .is_some_and(|c| c.def.fetch.is_none() && !board.enters_tapped(id, &c.def))
            })
            .or_else(|| {
                lands
                    .iter()
                    .copied()
                    .find(|&id| board.card(id).is_some_and(|c| c.def.fetch.is_some()))
            })
            .or_else(|| lands.first().copied());

        let Some(land) = pick else {
            return false;
        };
        if let Err(err) = CastRouter::cast(board, land) {
            warn!(%land, %err, "land drop skipped");
            return false;
        }

        let is_fetch = board.card(land).is_some_and(|c| c.def.fetch.is_some());
        if is_fetch && board.zone_of(land).is_some_and(|z| z.is_land_zone()) {
            match board.crack_fetch(land) {
                Ok(found) => debug!(%land, ?found, "cracked fetch"),
                Err(err) => warn!(%land, %err, "fetch not cracked"),
            }
        }
        true
    }

    fn activate_mana_abilities(board: &mut BoardState) {
        for id in board.battlefield() {
            let Some(card) = board.card(id) else {
                continue;
            };
            let ability = card
                .def
                .activated
                .iter()
                .position(|a| a.is_free_mana_ability() && !(a.tap && card.tapped));
            if let Some(index) = ability {
                if let Err(err) = board.activate(id, index) {
                    warn!(%id, %err, "mana ability skipped");
                }
            }
        }
    }

    /// Cast greedily: the leader when affordable, then the most expensive
    /// affordable card in hand until nothing else fits.
    fn cast_spells(board: &mut BoardState) {
        if let Some(leader) = board.leader() {
            if board.zone_of(leader) == Some(ZoneKind::Leader) && CastRouter::can_cast(board, leader, 0) {
                let _ = CastRouter::cast(board, leader);
            }
        }

        loop {
            let mut best: Option<(u32, EntityId, u32)> = None;
            for &id in board.hand() {
                let Some(card) = board.card(id) else {
                    continue;
                };
                if card.def.is_land() {
                    continue;
                }
                let Some(x) = solver::max_x(&card.def.cost, &board.pool) else {
                    continue;
                };
                if card.def.cost.has_x() && x == 0 {
                    continue;
                }
                let value = card.def.cost.mana_value() + x * card.def.cost.x_count;
                if best.map_or(true, |(v, _, _)| value > v) {
                    best = Some((value, id, x));
                }
            }

            let Some((_, id, x)) = best else {
                break;
            };
            if CastRouter::cast_with_x(board, id, x).is_err() {
                break;
            }
        }
    }

    /// Attach each unattached equipment to the first creature that can take it.
    fn equip_idle(board: &mut BoardState) {
        let Some(&creature) = board.cards_in(ZoneKind::Creatures).first() else {
            return;
        };
        let idle: Vec<EntityId> = board
            .cards_in(ZoneKind::Artifacts)
            .iter()
            .copied()
            .filter(|&id| board.card(id).is_some_and(|c| c.def.is_equipment()) && board.attached_to(id).is_none())
            .collect();

        for equipment in idle {
            let affordable = board
                .card(equipment)
                .and_then(|c| c.def.equip_cost.as_ref())
                .is_some_and(|cost| solver::can_pay(cost, &board.pool));
            if affordable {
                let _ = board.equip(equipment, creature);
            }
        }
    }

    fn attack_all(board: &mut BoardState) -> EngineResult<()> {
        let turn = board.turn;
        let ready: Vec<EntityId> = board
            .cards_in(ZoneKind::Creatures)
            .iter()
            .copied()
            .filter(|&id| {
                board.card(id).is_some_and(|c| {
                    !c.tapped
                        && !c.is_summoning_sick(turn)
                        && !c.has_keyword(Keyword::Defender)
                        && c.power().unwrap_or(0) > 0
                })
            })
            .collect();

        for &creature in &ready {
            board.attack(creature)?;
        }
        for creature in board.attackers().to_vec() {
            let power = match board.card(creature) {
                Some(card) if card.zone == ZoneKind::Creatures => card.power().unwrap_or(0),
                _ => continue,
            };
            if power > 0 {
                board.combat_damage_to_player(creature, i64::from(power))?;
            }
        }
        Ok(())
    }

    /// Monarch draw, then discard down to the maximum hand size.
    fn end_step(&self, board: &mut BoardState) -> EngineResult<()> {
        if board.monarch {
            board.draw_cards(1);
        }

        let excess = board.hand().len().saturating_sub(self.config.max_hand_size);
        if excess == 0 {
            return Ok(());
        }
        let mut hand: Vec<(u32, EntityId)> = board
            .hand()
            .iter()
            .filter_map(|&id| board.card(id).map(|c| (c.def.cost.mana_value(), id)))
            .collect();
        hand.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
        for (_, id) in hand.into_iter().take(excess) {
            board.move_to_graveyard(id, ZoneKind::Hand)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Category, CardDefinition, TriggerEvent, TriggeredAbility};
    use crate::effects::Effect;
    use crate::mana::{ManaSymbol, ManaUnit};

    fn catalog() -> CardCatalog {
        let mut catalog = CardCatalog::new();
        catalog.register(
            CardDefinition::new("Forest", Category::Land)
                .basic()
                .with_subtype("Forest")
                .producing(ManaUnit::single(ManaSymbol::Green)),
        );
        catalog.register(
            CardDefinition::new("Bear", Category::Creature)
                .with_cost("1G")
                .with_stats(2, 2),
        );
        catalog.register(
            CardDefinition::new("Shock Elf", Category::Creature)
                .with_cost("G")
                .with_stats(1, 1)
                .with_trigger(TriggeredAbility::new(TriggerEvent::Attack).with_effect(Effect::DamageOpponent(1))),
        );
        catalog
    }

    fn deck() -> DeckList {
        DeckList::new()
            .with_card("Forest", 20)
            .with_card("Bear", 10)
            .with_card("Shock Elf", 10)
    }

    #[test]
    fn test_trial_is_deterministic() {
        let catalog = catalog();
        let deck = deck();
        let config = SimConfig::new().with_seed(7).with_max_turns(6);
        let driver = GoldfishDriver::new(&catalog, &deck, &config);

        let a = driver.run_trial(3).unwrap();
        let b = driver.run_trial(3).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.damage_by_turn.len(), 6);
    }

    #[test]
    fn test_damage_is_cumulative() {
        let catalog = catalog();
        let deck = deck();
        let config = SimConfig::new().with_seed(1).with_max_turns(8);
        let driver = GoldfishDriver::new(&catalog, &deck, &config);

        for index in 0..5 {
            let report = driver.run_trial(index).unwrap();
            assert!(report.damage_by_turn.windows(2).all(|w| w[0] <= w[1]));
            assert_eq!(report.damage_by_turn[0], 0);
        }
    }

    #[test]
    fn test_kill_turn_recorded() {
        let catalog = catalog();
        let deck = deck();
        let config = SimConfig::new().with_seed(2).with_max_turns(10).with_opponent_life(1);
        let driver = GoldfishDriver::new(&catalog, &deck, &config);

        let report = driver.run_trial(0).unwrap();
        if let Some(turn) = report.kill_turn {
            let idx = turn as usize - 1;
            assert!(report.damage_by_turn[idx] >= 1);
            assert!(report.damage_by_turn[idx..].iter().all(|&d| d == report.damage_by_turn[idx]));
        }
    }

    #[test]
    fn test_hand_size_respected() {
        let catalog = catalog();
        let deck = DeckList::new().with_card("Bear", 40);
        let config = SimConfig::new().with_seed(3).with_max_turns(3);
        let driver = GoldfishDriver::new(&catalog, &deck, &config);

        let mut board = BoardState::new(&catalog, &deck, config.clone(), GameRng::new(3)).unwrap();
        board.draw_cards(7);
        driver.play_turn(&mut board).unwrap();
        driver.play_turn(&mut board).unwrap();
        assert_eq!(board.hand().len(), 7);
        assert_eq!(board.cards_in(ZoneKind::Graveyard).len(), 1);
    }
}
