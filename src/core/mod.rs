//! Core engine types: entity IDs, RNG, configuration, errors.
//!
//! These are the leaf building blocks every other module depends on.

pub mod config;
pub mod entity;
pub mod error;
pub mod rng;

pub use config::SimConfig;
pub use entity::EntityId;
pub use error::{EngineError, EngineResult};
pub use rng::GameRng;
