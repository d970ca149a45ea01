//! Trigger dispatch.
//!
//! `execute` fires one source's abilities for an event; `fire_all` sweeps
//! every registered source. There is no stack: each ability's effects
//! resolve immediately, in declaration order, before the next ability is
//! looked at.
//!
//! Attack triggers are deduplicated per combat by `(source, ability)`, so
//! re-declaring attackers never fires the same ability twice. A gated
//! ability that was skipped is not recorded and may still fire later in
//! the same combat once its gate opens.

use tracing::{debug, instrument, trace, Level};

use crate::board::BoardState;
use crate::cards::{AbilityId, TriggerEvent, TriggerGate};
use crate::core::EntityId;
use crate::effects::{EffectContext, EffectResolver};

/// Fires triggered abilities against a board.
pub struct TriggerDispatcher;

impl TriggerDispatcher {
    /// Fire `source`'s abilities for `event`.
    ///
    /// Returns the number of abilities that fired. A source that is no
    /// longer on the battlefield fires nothing. Triggers run after the
    /// action that caused them is committed, so a failing effect is
    /// logged and does not undo anything.
    pub fn execute(board: &mut BoardState, event: TriggerEvent, source: EntityId) -> usize {
        Self::execute_with_x(board, event, source, 0)
    }

    /// `execute` with the X paid for the source bound into its effects.
    #[instrument(level = Level::DEBUG, skip(board))]
    pub fn execute_with_x(board: &mut BoardState, event: TriggerEvent, source: EntityId, x: u32) -> usize {
        let Some(card) = board.card(source) else {
            return 0;
        };
        if !card.zone.is_battlefield() {
            return 0;
        }

        let def = card.def.clone();
        let mut fired = 0;
        for (index, ability) in def.triggers_for(event) {
            let key = (source, AbilityId(index as u16));

            if event == TriggerEvent::Attack && board.combat.fired.contains(&key) {
                trace!(%source, index, "attack trigger already fired this combat");
                continue;
            }
            if !Self::gate_open(board, ability.gate, source) {
                trace!(%source, index, gate = ?ability.gate, "trigger gated");
                continue;
            }
            if event == TriggerEvent::Attack {
                board.combat.fired.insert(key);
            }

            debug!(%source, name = %def.name, %event, index, x, "trigger fired");
            let ctx = EffectContext::from_source(source, &def.oracle_text).with_x(x);
            EffectResolver::apply_all(board, &ability.effects, &ctx);
            fired += 1;
        }
        fired
    }

    /// Fire `event` for every permanent that listens for it.
    ///
    /// The set of sources is taken before anything resolves; permanents
    /// that enter during the sweep do not see this event.
    pub fn fire_all(board: &mut BoardState, event: TriggerEvent) -> usize {
        let sources = board.triggers.sources_for(event);
        sources
            .into_iter()
            .map(|source| Self::execute(board, event, source))
            .sum()
    }

    fn gate_open(board: &BoardState, gate: TriggerGate, source: EntityId) -> bool {
        match gate {
            TriggerGate::Always => true,
            TriggerGate::RequiresHaste => board
                .card(source)
                .is_some_and(|c| c.has_keyword(crate::cards::Keyword::Haste)),
            TriggerGate::AnotherAttackingLegendary => board.combat.attackers.iter().any(|&other| {
                other != source
                    && board
                        .card(other)
                        .is_some_and(|c| c.zone.is_battlefield() && c.is_legendary())
            }),
            TriggerGate::SelfDamaged => board.combat.last_damaged == Some(source),
        }
    }
}
