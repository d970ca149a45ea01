//! Effect definitions.
//!
//! Effects are the one-shot actions carried by spells, triggered abilities
//! and activated abilities. They are plain data: the card supplier builds
//! them once and the resolver interprets them against a board.

use serde::{Deserialize, Serialize};

use crate::cards::{CardDefinition, CardFilter, Category, Keyword, KeywordSet};
use crate::mana::ManaUnit;

/// A quantity that is either fixed or bound to the X paid for a spell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Amount {
    Fixed(u32),
    X,
}

impl Amount {
    /// Concrete value given the X that was paid.
    #[must_use]
    pub fn resolve(self, x: u32) -> u32 {
        match self {
            Amount::Fixed(n) => n,
            Amount::X => x,
        }
    }
}

impl From<u32> for Amount {
    fn from(n: u32) -> Self {
        Amount::Fixed(n)
    }
}

/// Where a searched card goes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    Hand,
    Battlefield,
    Graveyard,
    LibraryTop,
}

impl Destination {
    /// Infer a destination from rules text.
    ///
    /// Phrases are checked in a fixed order; text naming none of them puts
    /// the card into the hand.
    #[must_use]
    pub fn infer(oracle_text: &str) -> Self {
        let text = oracle_text.to_ascii_lowercase();
        if text.contains("onto the battlefield") {
            Destination::Battlefield
        } else if text.contains("into your hand") {
            Destination::Hand
        } else if text.contains("on top of your library") {
            Destination::LibraryTop
        } else if text.contains("into your graveyard") {
            Destination::Graveyard
        } else {
            Destination::Hand
        }
    }
}

/// Zone a search looks through.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchZone {
    #[default]
    Library,
    Graveyard,
}

/// A library or graveyard search.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSpec {
    #[serde(default)]
    pub zone: SearchZone,

    #[serde(default)]
    pub filter: CardFilter,

    /// `None` infers the destination from the source's rules text.
    #[serde(default)]
    pub destination: Option<Destination>,

    /// Permanents put onto the battlefield enter tapped.
    #[serde(default)]
    pub tapped: bool,

    #[serde(default = "one")]
    pub count: u32,
}

fn one() -> u32 {
    1
}

impl SearchSpec {
    #[must_use]
    pub fn new(filter: CardFilter) -> Self {
        Self {
            zone: SearchZone::Library,
            filter,
            destination: None,
            tapped: false,
            count: 1,
        }
    }

    #[must_use]
    pub fn in_graveyard(mut self) -> Self {
        self.zone = SearchZone::Graveyard;
        self
    }

    #[must_use]
    pub fn to(mut self, destination: Destination) -> Self {
        self.destination = Some(destination);
        self
    }

    #[must_use]
    pub fn tapped(mut self) -> Self {
        self.tapped = true;
        self
    }

    #[must_use]
    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    /// Explicit destination, or the one inferred from `oracle_text`.
    #[must_use]
    pub fn destination_for(&self, oracle_text: &str) -> Destination {
        self.destination
            .unwrap_or_else(|| Destination::infer(oracle_text))
    }
}

/// Template for a token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSpec {
    pub name: String,

    #[serde(default = "token_category")]
    pub category: Category,

    #[serde(default)]
    pub power: Option<i32>,

    #[serde(default)]
    pub toughness: Option<i32>,

    #[serde(default)]
    pub legendary: bool,

    #[serde(default)]
    pub subtypes: Vec<String>,

    #[serde(default)]
    pub keywords: KeywordSet,

    #[serde(default)]
    pub produces: Vec<ManaUnit>,
}

fn token_category() -> Category {
    Category::Creature
}

impl TokenSpec {
    /// A creature token.
    #[must_use]
    pub fn creature(name: impl Into<String>, power: i32, toughness: i32) -> Self {
        Self {
            name: name.into(),
            category: Category::Creature,
            power: Some(power),
            toughness: Some(toughness),
            legendary: false,
            subtypes: Vec::new(),
            keywords: KeywordSet::new(),
            produces: Vec::new(),
        }
    }

    /// A non-creature artifact token, e.g. a Treasure.
    #[must_use]
    pub fn artifact(name: impl Into<String>) -> Self {
        Self {
            category: Category::Artifact,
            power: None,
            toughness: None,
            ..Self::creature(name, 0, 0)
        }
    }

    #[must_use]
    pub fn with_keyword(mut self, keyword: Keyword) -> Self {
        self.keywords.insert(keyword);
        self
    }

    #[must_use]
    pub fn with_subtype(mut self, subtype: impl Into<String>) -> Self {
        self.subtypes.push(subtype.into());
        self
    }

    #[must_use]
    pub fn producing(mut self, unit: ManaUnit) -> Self {
        self.produces.push(unit);
        self
    }

    /// A fresh definition for one token.
    #[must_use]
    pub fn to_definition(&self) -> CardDefinition {
        let mut def = CardDefinition::new(self.name.clone(), self.category);
        def.power = self.power;
        def.toughness = self.toughness;
        def.legendary = self.legendary;
        def.subtypes = self.subtypes.clone();
        def.keywords = self.keywords.clone();
        def.produces = self.produces.clone();
        def
    }

    /// Whether a token of this kind has a battlefield zone to enter.
    ///
    /// Land, instant and sorcery tokens have none.
    #[must_use]
    pub fn is_placeable(&self) -> bool {
        crate::board::BoardState::permanent_zone(&self.to_definition()).is_some()
    }
}

/// A one-shot effect.
///
/// Effects resolve immediately, in order, against the board that owns
/// their source. "Source" below is the card whose ability or spell
/// produced the effect.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Effect {
    /// Draw cards from the library.
    DrawCards(Amount),

    GainLife(i64),

    LoseLife(i64),

    /// Deal damage to the (absent) opponent.
    DamageOpponent(i64),

    CreateTokens { token: TokenSpec, count: Amount },

    /// Put counters on the source.
    AddCounters { kind: String, count: i32 },

    /// The source gets +power/+toughness.
    PumpSource { power: i32, toughness: i32 },

    /// Add mana units to the pool.
    AddMana { unit: ManaUnit, count: u32 },

    Search(SearchSpec),

    BecomeMonarch,

    /// Become the monarch when a creature deals combat damage this turn.
    MonarchOnCombatDamage,
}

impl Effect {
    /// Draw a fixed number of cards.
    #[must_use]
    pub fn draw(count: u32) -> Self {
        Effect::DrawCards(Amount::Fixed(count))
    }

    /// Add one unit of mana.
    #[must_use]
    pub fn add_mana(unit: ManaUnit) -> Self {
        Effect::AddMana { unit, count: 1 }
    }

    /// Create a fixed number of tokens.
    #[must_use]
    pub fn tokens(token: TokenSpec, count: u32) -> Self {
        Effect::CreateTokens {
            token,
            count: Amount::Fixed(count),
        }
    }

    /// Put +1/+1 counters on the source.
    #[must_use]
    pub fn plus_one_counters(count: i32) -> Self {
        Effect::AddCounters {
            kind: crate::cards::PLUS_ONE.to_string(),
            count,
        }
    }
}
