//! Board state: the root aggregate of a trial.
//!
//! `BoardState` is built once per trial from a deck list and the shared
//! catalog, mutated by every other component, and dropped when the trial
//! ends. Boards never share mutable state, so trials can run on separate
//! threads without locking.
//!
//! ## Operations
//!
//! - Zones: `draw_cards`, `move_card`, `move_to_graveyard`, `move_to_battlefield`
//! - Lands: `play_land`, `fetch_land`, `crack_fetch`, `enters_tapped`
//! - Attachments: `equip`
//! - Combat: `attack`, `deal_damage`, `combat_damage_to_player`
//! - Placement: `put_onto_battlefield`, `create_token`, `activate`, `search`
//! - Turn: `begin_turn`, `rebuild_pool`
//!
//! Every operation returning `EngineResult` validates before it mutates;
//! on error the board is unchanged.

mod attachments;
mod combat;
mod lands;
mod placement;
mod state;

pub use state::{BoardState, CombatState, PlayRecord};
