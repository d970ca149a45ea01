//! Zone system for card locations.
//!
//! The zone set is fixed: a single player's library, hand, graveyard,
//! exile, leader holding zone, and the battlefield split by permanent kind
//! (lands are further split by tapped state).
//!
//! ## Key Types
//!
//! - `ZoneKind`: Zone identifier
//! - `ZoneManager`: Card location tracking and movement
//! - `ZonePosition`: Position specifier for insertion

pub mod manager;

use serde::{Deserialize, Serialize};

pub use manager::{ZoneManager, ZonePosition};

/// A named zone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneKind {
    Library,
    Hand,
    UntappedLands,
    TappedLands,
    Creatures,
    Artifacts,
    Enchantments,
    Planeswalkers,
    Graveyard,
    Exile,
    /// Holding zone the leader starts in and returns to.
    Leader,
}

impl ZoneKind {
    /// Battlefield zones in sweep order.
    pub const BATTLEFIELD: [ZoneKind; 6] = [
        ZoneKind::UntappedLands,
        ZoneKind::TappedLands,
        ZoneKind::Creatures,
        ZoneKind::Artifacts,
        ZoneKind::Enchantments,
        ZoneKind::Planeswalkers,
    ];

    pub const ALL: [ZoneKind; 11] = [
        ZoneKind::Library,
        ZoneKind::Hand,
        ZoneKind::UntappedLands,
        ZoneKind::TappedLands,
        ZoneKind::Creatures,
        ZoneKind::Artifacts,
        ZoneKind::Enchantments,
        ZoneKind::Planeswalkers,
        ZoneKind::Graveyard,
        ZoneKind::Exile,
        ZoneKind::Leader,
    ];

    #[must_use]
    pub fn is_battlefield(self) -> bool {
        Self::BATTLEFIELD.contains(&self)
    }

    #[must_use]
    pub fn is_land_zone(self) -> bool {
        matches!(self, ZoneKind::UntappedLands | ZoneKind::TappedLands)
    }
}

impl std::fmt::Display for ZoneKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ZoneKind::Library => "library",
            ZoneKind::Hand => "hand",
            ZoneKind::UntappedLands => "untapped lands",
            ZoneKind::TappedLands => "tapped lands",
            ZoneKind::Creatures => "creatures",
            ZoneKind::Artifacts => "artifacts",
            ZoneKind::Enchantments => "enchantments",
            ZoneKind::Planeswalkers => "planeswalkers",
            ZoneKind::Graveyard => "graveyard",
            ZoneKind::Exile => "exile",
            ZoneKind::Leader => "leader zone",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_battlefield_membership() {
        assert!(ZoneKind::TappedLands.is_battlefield());
        assert!(ZoneKind::Planeswalkers.is_battlefield());
        assert!(!ZoneKind::Leader.is_battlefield());
        assert!(!ZoneKind::Graveyard.is_battlefield());
        assert_eq!(ZoneKind::ALL.iter().filter(|z| z.is_battlefield()).count(), 6);
    }

    #[test]
    fn test_display() {
        assert_eq!(ZoneKind::UntappedLands.to_string(), "untapped lands");
        assert_eq!(ZoneKind::Hand.to_string(), "hand");
    }
}
