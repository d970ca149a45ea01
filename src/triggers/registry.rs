//! Trigger registry.
//!
//! The registry indexes the triggered abilities of permanents on the
//! battlefield by event, so a board-wide sweep only visits cards that can
//! respond. Sources are registered when they enter the battlefield and
//! removed when they leave; the index keeps registration order.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::cards::{AbilityId, CardDefinition, TriggerEvent};
use crate::core::EntityId;

/// One triggered ability of one permanent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TriggerKey {
    pub source: EntityId,
    pub ability: AbilityId,
}

impl std::fmt::Display for TriggerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.source, self.ability.0)
    }
}

/// Event-keyed index of triggered abilities on the battlefield.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerRegistry {
    by_event: FxHashMap<TriggerEvent, Vec<TriggerKey>>,
}

impl TriggerRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every triggered ability of `def` under `source`.
    ///
    /// Returns the number of abilities registered.
    pub fn register_source(&mut self, source: EntityId, def: &CardDefinition) -> usize {
        for (index, ability) in def.triggered.iter().enumerate() {
            let key = TriggerKey {
                source,
                ability: AbilityId(index as u16),
            };
            let keys = self.by_event.entry(ability.event).or_default();
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        def.triggered.len()
    }

    /// Remove all triggers owned by a source entity.
    pub fn remove_for_source(&mut self, source: EntityId) {
        self.by_event.retain(|_, keys| {
            keys.retain(|k| k.source != source);
            !keys.is_empty()
        });
    }

    /// Registered abilities for `event`, in registration order.
    #[must_use]
    pub fn keys_for(&self, event: TriggerEvent) -> &[TriggerKey] {
        self.by_event.get(&event).map_or(&[], |v| v.as_slice())
    }

    /// Distinct sources listening for `event`, in registration order.
    #[must_use]
    pub fn sources_for(&self, event: TriggerEvent) -> Vec<EntityId> {
        let mut sources: Vec<EntityId> = Vec::new();
        for key in self.keys_for(event) {
            if !sources.contains(&key.source) {
                sources.push(key.source);
            }
        }
        sources
    }

    #[must_use]
    pub fn is_registered(&self, source: EntityId) -> bool {
        self.by_event
            .values()
            .any(|keys| keys.iter().any(|k| k.source == source))
    }

    /// Total registered abilities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_event.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_event.is_empty()
    }
}
