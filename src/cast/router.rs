//! Cast/resolution router.
//!
//! One call, one outcome: a cast either completes (paid, moved, triggers
//! fired, recorded) or fails with the board untouched. Dispatch is a
//! `match` over the closed `Category` set.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn, Level};

use crate::board::BoardState;
use crate::cards::Category;
use crate::core::{EngineError, EngineResult, EntityId};
use crate::effects::{EffectContext, EffectResolver};
use crate::mana::{solver, ManaCost};
use crate::zones::ZoneKind;

/// What a successful cast did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CastOutcome {
    /// A land was played; nothing was paid.
    LandPlayed { tapped: bool },

    /// A permanent resolved onto the battlefield.
    Permanent { zone: ZoneKind, paid: u32 },

    /// An instant or sorcery resolved and went to the graveyard.
    Spell { paid: u32, x: u32 },
}

/// Routes "play this card" to the handler for its category.
pub struct CastRouter;

impl CastRouter {
    /// Cast a card with X = 0.
    pub fn cast(board: &mut BoardState, entity: EntityId) -> EngineResult<CastOutcome> {
        Self::cast_with_x(board, entity, 0)
    }

    /// Cast a card from hand, or the leader from its holding zone.
    #[instrument(level = Level::DEBUG, skip(board))]
    pub fn cast_with_x(board: &mut BoardState, entity: EntityId, x: u32) -> EngineResult<CastOutcome> {
        let from = Self::source_zone(board, entity)?;
        let category = board
            .card(entity)
            .map(|c| c.category())
            .ok_or(EngineError::CardNotInExpectedZone {
                card: entity,
                expected: ZoneKind::Hand,
            })?;

        let result = match category {
            Category::Land if from == ZoneKind::Hand => Self::resolve_land(board, entity),
            Category::Creature
            | Category::Artifact
            | Category::Enchantment
            | Category::Planeswalker
            | Category::Leader => Self::resolve_permanent(board, entity, from, x),
            Category::Instant | Category::Sorcery if from == ZoneKind::Hand => {
                Self::resolve_spell(board, entity, x)
            }
            other => Err(EngineError::UnsupportedCategory(other)),
        };

        if let Err(err) = &result {
            warn!(%entity, %err, "cast failed");
        }
        result
    }

    /// Cost to cast `entity` right now, leader tax included.
    pub fn cost_of(board: &BoardState, entity: EntityId) -> EngineResult<ManaCost> {
        let from = Self::source_zone(board, entity)?;
        let card = board.card(entity).ok_or(EngineError::CardNotInExpectedZone {
            card: entity,
            expected: ZoneKind::Hand,
        })?;
        if from == ZoneKind::Leader {
            let tax = board.leader_casts * board.config().leader_tax_step;
            Ok(card.def.cost.plus_generic(tax))
        } else {
            Ok(card.def.cost.clone())
        }
    }

    /// Whether casting `entity` with `x` would succeed on payment.
    #[must_use]
    pub fn can_cast(board: &BoardState, entity: EntityId, x: u32) -> bool {
        match (Self::cost_of(board, entity), board.card(entity)) {
            (Ok(_), Some(card)) if card.def.is_land() => board.zone_of(entity) == Some(ZoneKind::Hand),
            (Ok(cost), Some(_)) => solver::can_pay_with_x(&cost, x, &board.pool),
            _ => false,
        }
    }

    fn source_zone(board: &BoardState, entity: EntityId) -> EngineResult<ZoneKind> {
        match board.zone_of(entity) {
            Some(ZoneKind::Hand) => Ok(ZoneKind::Hand),
            Some(ZoneKind::Leader) if board.card(entity).is_some_and(|c| c.is_leader) => Ok(ZoneKind::Leader),
            _ => Err(EngineError::CardNotInExpectedZone {
                card: entity,
                expected: ZoneKind::Hand,
            }),
        }
    }

    fn resolve_land(board: &mut BoardState, entity: EntityId) -> EngineResult<CastOutcome> {
        board.play_land(entity)?;
        board.log_play(entity);
        let tapped = board.zone_of(entity) == Some(ZoneKind::TappedLands);
        Ok(CastOutcome::LandPlayed { tapped })
    }

    fn resolve_permanent(
        board: &mut BoardState,
        entity: EntityId,
        from: ZoneKind,
        x: u32,
    ) -> EngineResult<CastOutcome> {
        let def = board
            .card(entity)
            .map(|c| c.def.clone())
            .ok_or(EngineError::CardNotInExpectedZone { card: entity, expected: from })?;
        let zone = BoardState::permanent_zone(&def).ok_or(EngineError::UnsupportedCategory(def.category))?;
        let cost = Self::cost_of(board, entity)?;

        let paid = solver::pay_with_x(&cost, x, &mut board.pool)?;
        board.mana_spent += paid;
        if from == ZoneKind::Leader {
            board.leader_casts += 1;
        }
        board.record_cast(entity);

        debug!(%entity, name = %def.name, %cost, paid, %zone, "permanent cast");
        board.enter_permanent(entity, from, zone, false, x)?;
        Ok(CastOutcome::Permanent { zone, paid })
    }

    fn resolve_spell(board: &mut BoardState, entity: EntityId, x: u32) -> EngineResult<CastOutcome> {
        let def = board
            .card(entity)
            .map(|c| c.def.clone())
            .ok_or(EngineError::CardNotInExpectedZone {
                card: entity,
                expected: ZoneKind::Hand,
            })?;

        let paid = solver::pay_with_x(&def.cost, x, &mut board.pool)?;
        board.mana_spent += paid;
        board.move_card(entity, ZoneKind::Hand, ZoneKind::Graveyard)?;
        board.record_cast(entity);

        debug!(%entity, name = %def.name, paid, x, "spell cast");
        let ctx = EffectContext::from_source(entity, &def.oracle_text).with_x(x);
        EffectResolver::apply_all(board, &def.spell_effects, &ctx);
        Ok(CastOutcome::Spell { paid, x })
    }
}
