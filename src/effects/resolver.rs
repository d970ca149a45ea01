//! Effect resolution - executing effects on a board.
//!
//! The `EffectResolver` applies effects to a `BoardState` one at a time.
//! Effects that name "the source" do nothing when there is no source or
//! it has left the battlefield.

use tracing::{debug, warn};

use crate::board::BoardState;
use crate::core::{EngineResult, EntityId};

use super::Effect;

/// What an effect knows about how it was produced.
#[derive(Clone, Copy, Debug, Default)]
pub struct EffectContext<'a> {
    /// Card whose spell or ability produced the effect.
    pub source: Option<EntityId>,

    /// X paid for the spell, zero otherwise.
    pub x: u32,

    /// Rules text of the source, used for search destinations.
    pub oracle_text: &'a str,
}

impl<'a> EffectContext<'a> {
    #[must_use]
    pub fn from_source(source: EntityId, oracle_text: &'a str) -> Self {
        Self {
            source: Some(source),
            x: 0,
            oracle_text,
        }
    }

    #[must_use]
    pub fn with_x(mut self, x: u32) -> Self {
        self.x = x;
        self
    }
}

/// Resolves effects on a board.
pub struct EffectResolver;

impl EffectResolver {
    /// Resolve effects after their spell or ability has been committed.
    ///
    /// A failing effect is logged and skipped; the rest still resolve.
    /// Returns the number of effects that failed.
    pub fn apply_all(board: &mut BoardState, effects: &[Effect], ctx: &EffectContext) -> usize {
        let mut failed = 0;
        for effect in effects {
            if let Err(err) = Self::resolve(board, effect, ctx) {
                warn!(?effect, source = ?ctx.source, %err, "effect failed");
                failed += 1;
            }
        }
        failed
    }

    /// Resolve a single effect.
    pub fn resolve(board: &mut BoardState, effect: &Effect, ctx: &EffectContext) -> EngineResult<()> {
        debug!(?effect, source = ?ctx.source, x = ctx.x, "resolving effect");

        match effect {
            Effect::DrawCards(amount) => {
                board.draw_cards(amount.resolve(ctx.x) as usize);
            }

            Effect::GainLife(n) => board.life += n,

            Effect::LoseLife(n) => board.life -= n,

            Effect::DamageOpponent(n) => board.damage_opponent(*n),

            Effect::CreateTokens { token, count } => {
                for _ in 0..count.resolve(ctx.x) {
                    board.create_token(token)?;
                }
            }

            Effect::AddCounters { kind, count } => {
                if let Some(card) = ctx.source.and_then(|s| board.permanent_mut(s)) {
                    card.add_counters(kind.as_str(), *count);
                }
            }

            Effect::PumpSource { power, toughness } => {
                if let Some(card) = ctx.source.and_then(|s| board.permanent_mut(s)) {
                    card.power_buff += power;
                    card.toughness_buff += toughness;
                }
            }

            Effect::AddMana { unit, count } => board.pool.add_many(unit, *count),

            Effect::Search(spec) => {
                board.search(spec, ctx.oracle_text)?;
            }

            Effect::BecomeMonarch => board.monarch = true,

            Effect::MonarchOnCombatDamage => board.monarch_on_damage_turn = Some(board.turn),
        }
        Ok(())
    }
}
