//! Zone-independent card attributes: category and keywords.
//!
//! The category set is closed. Every category has exactly one resolution
//! path in the cast router, checked by the compiler through `match`.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::zones::ZoneKind;

/// Card category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Land,
    Creature,
    Artifact,
    Enchantment,
    Planeswalker,
    Instant,
    Sorcery,
    /// The designated leader card; resolves onto the battlefield as a
    /// creature when it has power, otherwise as a planeswalker.
    Leader,
}

impl Category {
    /// Whether cards of this category stay on the battlefield.
    #[must_use]
    pub fn is_permanent(self) -> bool {
        !matches!(self, Category::Instant | Category::Sorcery)
    }

    /// Battlefield zone a non-land permanent of this category enters.
    #[must_use]
    pub fn battlefield_zone(self) -> Option<ZoneKind> {
        match self {
            Category::Creature => Some(ZoneKind::Creatures),
            Category::Artifact => Some(ZoneKind::Artifacts),
            Category::Enchantment => Some(ZoneKind::Enchantments),
            Category::Planeswalker => Some(ZoneKind::Planeswalkers),
            Category::Land => Some(ZoneKind::UntappedLands),
            Category::Leader | Category::Instant | Category::Sorcery => None,
        }
    }
}

/// Keyword abilities the engine looks at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Keyword {
    Haste,
    Flying,
    FirstStrike,
    DoubleStrike,
    Trample,
    Vigilance,
    Lifelink,
    Deathtouch,
    Menace,
    Reach,
    Defender,
}

/// A small set of keywords.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeywordSet(SmallVec<[Keyword; 4]>);

impl KeywordSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, keyword: Keyword) -> bool {
        self.0.contains(&keyword)
    }

    /// Insert a keyword. Returns false if it was already present.
    pub fn insert(&mut self, keyword: Keyword) -> bool {
        if self.contains(keyword) {
            false
        } else {
            self.0.push(keyword);
            true
        }
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Keyword> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Keyword> for KeywordSet {
    fn from_iter<I: IntoIterator<Item = Keyword>>(iter: I) -> Self {
        let mut set = KeywordSet::new();
        for keyword in iter {
            set.insert(keyword);
        }
        set
    }
}
