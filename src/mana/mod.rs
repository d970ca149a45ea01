//! Mana: symbols, pools, cost expressions and the payment solver.
//!
//! ## Key Types
//!
//! - `ManaSymbol`: a colour, colorless, or the wildcard
//! - `ManaUnit`: one unit of mana and the symbols it can be spent as
//! - `ManaPool`: ordered multiset of units available this turn
//! - `ManaCost`: parsed cost expression (`parse_cost`)
//! - `solver`: `can_pay` / `pay` and their X-cost variants

mod cost;
mod pool;
pub mod solver;
mod symbol;

pub use cost::{parse_cost, ManaCost};
pub use pool::ManaPool;
pub use symbol::{ManaSymbol, ManaUnit};
