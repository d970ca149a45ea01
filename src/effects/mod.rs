//! Effects: structured one-shot actions and their resolution.
//!
//! ## Key Types
//!
//! - `Effect`: A single action (draw, tokens, search, mana, ...)
//! - `Amount`: Fixed quantity or one bound to X
//! - `SearchSpec` / `Destination`: Library and graveyard searches
//! - `TokenSpec`: Template for created tokens
//! - `EffectResolver`: Applies effects to a `BoardState`

mod effect;
mod resolver;

pub use effect::{Amount, Destination, Effect, SearchSpec, SearchZone, TokenSpec};
pub use resolver::{EffectContext, EffectResolver};
