//! Zone manager for card locations and movement.
//!
//! The `ZoneManager` tracks which zone holds each card and keeps an ordered
//! sequence per zone. Every zone is ordered: the library front is the next
//! draw, and battlefield zones keep entry order so trigger sweeps are
//! deterministic.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::ZoneKind;
use crate::core::{EngineError, EngineResult, EntityId, GameRng};

/// Position for inserting a card into a zone.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZonePosition {
    /// Front of the zone (top of library).
    Front,
    /// Back of the zone; the usual append.
    #[default]
    Back,
    /// Insert at a specific index, clamped to the zone length.
    Index(usize),
}

/// Manages card locations across zones.
///
/// A card is in at most one zone: the location map and the per-zone
/// sequences are only changed together.
///
/// ```
/// use goldfish_engine::core::EntityId;
/// use goldfish_engine::zones::{ZoneKind, ZoneManager, ZonePosition};
///
/// let mut zones = ZoneManager::new();
/// zones.add(EntityId(10), ZoneKind::Library, ZonePosition::Back);
/// zones.add(EntityId(11), ZoneKind::Library, ZonePosition::Front);
///
/// assert_eq!(zones.cards(ZoneKind::Library), &[EntityId(11), EntityId(10)]);
/// zones.move_card(EntityId(11), ZoneKind::Library, ZoneKind::Hand, ZonePosition::Back).unwrap();
/// assert_eq!(zones.zone_of(EntityId(11)), Some(ZoneKind::Hand));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneManager {
    /// Card locations: entity_id -> zone
    locations: FxHashMap<EntityId, ZoneKind>,

    /// Ordered card lists, one per non-empty zone.
    zone_order: FxHashMap<ZoneKind, Vec<EntityId>>,
}

impl ZoneManager {
    /// Create a new empty zone manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a card that is not yet tracked.
    ///
    /// Panics if the entity is already in the manager.
    pub fn add(&mut self, entity: EntityId, zone: ZoneKind, position: ZonePosition) {
        if self.locations.contains_key(&entity) {
            panic!("Entity {:?} already exists in zone manager", entity);
        }
        self.locations.insert(entity, zone);
        self.insert_ordered(entity, zone, position);
    }

    /// Move a card between zones.
    ///
    /// Fails with `CardNotInExpectedZone` if the card is not in `from`;
    /// nothing changes in that case.
    pub fn move_card(
        &mut self,
        entity: EntityId,
        from: ZoneKind,
        to: ZoneKind,
        position: ZonePosition,
    ) -> EngineResult<()> {
        if self.locations.get(&entity) != Some(&from) {
            return Err(EngineError::CardNotInExpectedZone {
                card: entity,
                expected: from,
            });
        }
        self.remove_ordered(entity, from);
        self.locations.insert(entity, to);
        self.insert_ordered(entity, to, position);
        Ok(())
    }

    /// Remove a card from the manager entirely.
    ///
    /// Returns the zone it was in, or `None` if not found.
    pub fn remove(&mut self, entity: EntityId) -> Option<ZoneKind> {
        let zone = self.locations.remove(&entity)?;
        self.remove_ordered(entity, zone);
        Some(zone)
    }

    /// Get the zone a card is in.
    #[must_use]
    pub fn zone_of(&self, entity: EntityId) -> Option<ZoneKind> {
        self.locations.get(&entity).copied()
    }

    #[must_use]
    pub fn is_in(&self, entity: EntityId, zone: ZoneKind) -> bool {
        self.locations.get(&entity) == Some(&zone)
    }

    /// Cards in a zone, in order.
    #[must_use]
    pub fn cards(&self, zone: ZoneKind) -> &[EntityId] {
        self.zone_order.get(&zone).map_or(&[], |v| v.as_slice())
    }

    #[must_use]
    pub fn len(&self, zone: ZoneKind) -> usize {
        self.cards(zone).len()
    }

    #[must_use]
    pub fn is_empty(&self, zone: ZoneKind) -> bool {
        self.cards(zone).is_empty()
    }

    /// Front card of a zone without removing it.
    #[must_use]
    pub fn front(&self, zone: ZoneKind) -> Option<EntityId> {
        self.cards(zone).first().copied()
    }

    /// Shuffle a zone.
    pub fn shuffle_zone(&mut self, zone: ZoneKind, rng: &mut GameRng) {
        if let Some(order) = self.zone_order.get_mut(&zone) {
            rng.shuffle(order);
        }
    }

    /// Get total number of cards tracked.
    #[must_use]
    pub fn total_cards(&self) -> usize {
        self.locations.len()
    }

    #[must_use]
    pub fn contains(&self, entity: EntityId) -> bool {
        self.locations.contains_key(&entity)
    }

    /// Every card on the battlefield, zone by zone in `ZoneKind::BATTLEFIELD`
    /// order, entry order within each zone.
    #[must_use]
    pub fn battlefield(&self) -> Vec<EntityId> {
        ZoneKind::BATTLEFIELD
            .iter()
            .flat_map(|&zone| self.cards(zone).iter().copied())
            .collect()
    }

    /// Check that the location map and the zone sequences agree and that
    /// no card is listed twice.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let listed: usize = self.zone_order.values().map(Vec::len).sum();
        if listed != self.locations.len() {
            return false;
        }
        self.zone_order.iter().all(|(&zone, order)| {
            order.iter().all(|e| self.locations.get(e) == Some(&zone))
        })
    }

    fn insert_ordered(&mut self, entity: EntityId, zone: ZoneKind, position: ZonePosition) {
        let order = self.zone_order.entry(zone).or_default();
        match position {
            ZonePosition::Front => order.insert(0, entity),
            ZonePosition::Back => order.push(entity),
            ZonePosition::Index(i) => {
                let idx = i.min(order.len());
                order.insert(idx, entity);
            }
        }
    }

    fn remove_ordered(&mut self, entity: EntityId, zone: ZoneKind) {
        if let Some(order) = self.zone_order.get_mut(&zone) {
            order.retain(|&e| e != entity);
            if order.is_empty() {
                self.zone_order.remove(&zone);
            }
        }
    }
}
