//! # goldfish-engine
//!
//! Turn-state engine for "goldfish" simulation of a deckbuilding card game:
//! one player, no opponent interaction, many independent trials.
//!
//! ## Design Principles
//!
//! 1. **One Board Per Trial**: `BoardState` is the root aggregate. Trials
//!    never share mutable state; the card catalog is read-only and shared.
//!
//! 2. **Validate, Then Mutate**: Every public operation returns an
//!    `EngineResult`. A failed cast or payment leaves the board untouched.
//!
//! 3. **Closed Categories**: Card categories, zones, trigger events and
//!    effects are closed enums dispatched by `match`.
//!
//! ## Architecture
//!
//! - **Zone Exclusivity**: `ZoneManager` keeps one location per card; a
//!   card is always in exactly one zone.
//!
//! - **Mana Pool**: a multiset of units, each payable as one or more
//!   symbols. Costs are paid by a backtracking assignment over the pool.
//!
//! - **Triggers**: battlefield permanents register their triggered
//!   abilities by event; the dispatcher applies gates and per-combat
//!   deduplication of attack triggers.
//!
//! ## Modules
//!
//! - `core`: Entity IDs, RNG, configuration, errors
//! - `zones`: Zone kinds and the zone manager
//! - `mana`: Symbols, pools, costs and the payment solver
//! - `cards`: Card definitions, instances and the catalog
//! - `effects`: One-shot effects and their resolver
//! - `triggers`: Trigger registry and dispatcher
//! - `board`: The board state and its operations
//! - `cast`: Casting by card category
//! - `games`: The goldfish driver and parallel trials

pub mod core;
pub mod zones;
pub mod mana;
pub mod cards;
pub mod effects;
pub mod triggers;
pub mod board;
pub mod cast;
pub mod games;

// Re-export commonly used types
pub use crate::core::{EngineError, EngineResult, EntityId, GameRng, SimConfig};

pub use crate::zones::{ZoneKind, ZoneManager, ZonePosition};

pub use crate::mana::{parse_cost, ManaCost, ManaPool, ManaSymbol, ManaUnit};

pub use crate::cards::{
    CardCatalog, CardDefinition, CardFilter, CardInstance, Category, DeckList, FetchSpec, Keyword,
    UntapRules,
};

pub use crate::effects::{Effect, EffectResolver, SearchSpec, TokenSpec};

pub use crate::triggers::{TriggerDispatcher, TriggerRegistry};

pub use crate::board::{BoardState, PlayRecord};

pub use crate::cast::{CastOutcome, CastRouter};

pub use crate::games::goldfish::{GoldfishDriver, TrialReport, TrialRunner, TrialSummary};
