//! Casting: validation, payment and resolution per card category.
//!
//! - Land: no payment, delegates to `BoardState::play_land`
//! - Creature, artifact, enchantment, planeswalker, leader: pay, then enter
//!   the matching battlefield zone and fire `etb`
//! - Instant, sorcery: pay (X supported), move to the graveyard, apply the
//!   spell's effects
//!
//! The cost-free path for permanents coming from the library or graveyard
//! is `BoardState::put_onto_battlefield`; it skips payment and bookkeeping.

mod router;

pub use router::{CastOutcome, CastRouter};
