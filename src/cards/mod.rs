//! Card system: definitions, abilities, instances, and the catalog.
//!
//! ## Key Types
//!
//! - `Category`: Closed set of card categories
//! - `CardDefinition`: Immutable card data, shared through `Arc`
//! - `TriggeredAbility` / `ActivatedAbility` / `StaticAbility`: Structured abilities
//! - `CardInstance`: Runtime card state (zone, tapped, damage, counters)
//! - `CardCatalog`: Read-only definition lookup, handed to each board
//! - `DeckList`: Card names plus an optional leader

pub mod abilities;
pub mod attributes;
pub mod catalog;
pub mod definition;
pub mod instance;

pub use abilities::{
    AbilityId, ActivatedAbility, StaticAbility, TriggerEvent, TriggerGate, TriggeredAbility,
};
pub use attributes::{Category, Keyword, KeywordSet};
pub use catalog::{CardCatalog, DeckList};
pub use definition::{CardDefinition, CardFilter, FetchSpec, UntapRules};
pub use instance::{CardInstance, LOYALTY, PLUS_ONE};
