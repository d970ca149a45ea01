//! Trigger system for event-driven abilities.
//!
//! Triggered abilities are declared on card definitions with a
//! `TriggerEvent` and an optional `TriggerGate`. When a permanent enters
//! the battlefield its abilities are indexed in the board's
//! [`TriggerRegistry`]; the [`TriggerDispatcher`] fires them.
//!
//! ## Key Components
//!
//! - [`TriggerKey`]: One ability of one permanent
//! - [`TriggerRegistry`]: Event-keyed index of abilities on the battlefield
//! - [`TriggerDispatcher`]: `execute` for one source, `fire_all` for a sweep

mod dispatcher;
mod registry;

pub use dispatcher::TriggerDispatcher;
pub use registry::{TriggerKey, TriggerRegistry};
