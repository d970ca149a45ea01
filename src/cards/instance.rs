//! Card instances - runtime card state.
//!
//! `CardInstance` is the per-board copy of one physical card or token. It
//! points at the shared immutable definition and carries everything that
//! changes during play: tapped state, marked damage, counters, buffs and
//! keywords granted by equipment.
//!
//! ## Counters
//!
//! Counters are keyed by kind. The engine reads `+1/+1` (added to power and
//! toughness) and `loyalty`; any other kind is tracked but not interpreted.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::abilities::StaticAbility;
use super::attributes::{Category, Keyword, KeywordSet};
use super::definition::CardDefinition;
use crate::core::EntityId;
use crate::zones::ZoneKind;

/// Counter kind read for power and toughness.
pub const PLUS_ONE: &str = "+1/+1";

/// Counter kind holding planeswalker loyalty.
pub const LOYALTY: &str = "loyalty";

/// A card instance on one board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardInstance {
    /// Unique entity ID for this instance.
    pub entity_id: EntityId,

    /// Shared definition.
    pub def: Arc<CardDefinition>,

    /// Zone currently holding this instance. Kept in sync by the board.
    pub zone: ZoneKind,

    pub tapped: bool,

    /// Damage marked this turn.
    pub damage: i32,

    #[serde(default)]
    pub counters: FxHashMap<String, i32>,

    /// Power granted by attached equipment and pump effects.
    pub power_buff: i32,

    pub toughness_buff: i32,

    /// Keywords granted while equipped; recomputed after every attachment change.
    pub granted: KeywordSet,

    /// Turn this instance last entered the battlefield.
    pub entered_turn: Option<u32>,

    pub is_token: bool,

    pub is_leader: bool,
}

impl CardInstance {
    /// Create an instance of `def` in `zone`.
    #[must_use]
    pub fn new(entity_id: EntityId, def: Arc<CardDefinition>, zone: ZoneKind) -> Self {
        Self {
            entity_id,
            def,
            zone,
            tapped: false,
            damage: 0,
            counters: FxHashMap::default(),
            power_buff: 0,
            toughness_buff: 0,
            granted: KeywordSet::new(),
            entered_turn: None,
            is_token: false,
            is_leader: false,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.def.name
    }

    #[must_use]
    pub fn category(&self) -> Category {
        self.def.category
    }

    /// Current power, or `None` for non-creatures.
    #[must_use]
    pub fn power(&self) -> Option<i32> {
        self.def
            .power
            .map(|p| p + self.power_buff + self.counter(PLUS_ONE))
    }

    /// Current toughness, or `None` for non-creatures.
    #[must_use]
    pub fn toughness(&self) -> Option<i32> {
        self.def
            .toughness
            .map(|t| t + self.toughness_buff + self.counter(PLUS_ONE))
    }

    /// Printed or granted keyword.
    #[must_use]
    pub fn has_keyword(&self, keyword: Keyword) -> bool {
        self.def.keywords.contains(keyword) || self.granted.contains(keyword)
    }

    #[must_use]
    pub fn is_legendary(&self) -> bool {
        self.def.legendary || self.is_leader
    }

    #[must_use]
    pub fn counter(&self, kind: &str) -> i32 {
        self.counters.get(kind).copied().unwrap_or(0)
    }

    pub fn add_counters(&mut self, kind: impl Into<String>, count: i32) {
        *self.counters.entry(kind.into()).or_insert(0) += count;
    }

    /// Mark damage after this creature's own prevention.
    ///
    /// Returns the damage actually marked.
    pub fn mark_damage(&mut self, amount: i32) -> i32 {
        let prevented: i32 = self
            .def
            .statics
            .iter()
            .map(|s| match s {
                StaticAbility::PreventDamage(n) => *n,
                _ => 0,
            })
            .sum();
        let marked = (amount - prevented).max(0);
        self.damage += marked;
        marked
    }

    /// Marked damage has reached toughness.
    #[must_use]
    pub fn is_lethally_damaged(&self) -> bool {
        self.toughness().is_some_and(|t| self.damage >= t)
    }

    /// Summoning sick on `turn`: entered this turn and lacks haste.
    #[must_use]
    pub fn is_summoning_sick(&self, turn: u32) -> bool {
        self.entered_turn == Some(turn) && !self.has_keyword(Keyword::Haste)
    }

    /// Forget battlefield state when leaving the battlefield.
    pub fn reset_battlefield_state(&mut self) {
        self.tapped = false;
        self.damage = 0;
        self.counters.clear();
        self.power_buff = 0;
        self.toughness_buff = 0;
        self.granted.clear();
        self.entered_turn = None;
    }
}
