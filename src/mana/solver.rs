//! Cost payment solver.
//!
//! Coloured pips are matched to pool units with a backtracking search:
//! each pip tries every unused unit that can pay it, in pool order, and the
//! search accepts the first complete assignment that still leaves enough
//! units for the generic part. Inputs are a handful of pips against a pool
//! of at most a few dozen units, so the exponential worst case is fine.
//!
//! Payment is all-or-nothing. `pay` either removes exactly the chosen pip
//! units plus the first `generic` remaining units in pool order, or returns
//! `InsufficientMana` with the pool untouched.
//!
//! ```
//! use goldfish_engine::mana::{parse_cost, ManaPool, ManaSymbol, ManaUnit, solver};
//!
//! let mut pool = ManaPool::from_units([
//!     ManaUnit::single(ManaSymbol::White),
//!     ManaUnit::single(ManaSymbol::Green),
//!     ManaUnit::single(ManaSymbol::Colorless),
//!     ManaUnit::single(ManaSymbol::Colorless),
//! ]);
//! let cost = parse_cost("2WG").unwrap();
//! assert!(solver::can_pay(&cost, &pool));
//! solver::pay(&cost, &mut pool).unwrap();
//! assert!(pool.is_empty());
//! ```

use smallvec::SmallVec;
use tracing::trace;

use super::cost::ManaCost;
use super::pool::ManaPool;
use super::symbol::{ManaSymbol, ManaUnit};
use crate::core::{EngineError, EngineResult};

/// Pool indices chosen for each pip, in pip order.
type Assignment = SmallVec<[usize; 8]>;

/// Check whether `cost` (with X = 0) can be paid from `pool`.
#[must_use]
pub fn can_pay(cost: &ManaCost, pool: &ManaPool) -> bool {
    assign_pips(&cost.pips, cost.generic as usize, pool.units()).is_some()
}

/// Pay `cost` (with X = 0) from `pool`.
///
/// Returns the number of units spent. Callers are expected to check
/// `can_pay` first; on failure the pool is left unchanged.
pub fn pay(cost: &ManaCost, pool: &mut ManaPool) -> EngineResult<u32> {
    let assignment = assign_pips(&cost.pips, cost.generic as usize, pool.units())
        .ok_or(EngineError::InsufficientMana)?;

    let mut mask = vec![false; pool.len()];
    for &idx in &assignment {
        mask[idx] = true;
    }

    let mut generic_left = cost.generic;
    for slot in mask.iter_mut() {
        if generic_left == 0 {
            break;
        }
        if !*slot {
            *slot = true;
            generic_left -= 1;
        }
    }

    pool.remove_marked(&mask);
    let spent = assignment.len() as u32 + cost.generic;
    trace!(cost = %cost, spent, remaining = pool.len(), "paid cost");
    Ok(spent)
}

/// Check whether `cost` can be paid with X set to `x`.
#[must_use]
pub fn can_pay_with_x(cost: &ManaCost, x: u32, pool: &ManaPool) -> bool {
    let mut scratch = pool.clone();
    pay_with_x(cost, x, &mut scratch).is_ok()
}

/// Pay the fixed part of `cost`, then `x` units per X symbol one at a time
/// from the front of the pool.
///
/// Work happens on a scratch copy, so if the variable part cannot be
/// covered nothing is spent at all.
pub fn pay_with_x(cost: &ManaCost, x: u32, pool: &mut ManaPool) -> EngineResult<u32> {
    let mut scratch = pool.clone();
    let mut spent = pay(cost, &mut scratch)?;

    for _ in 0..x.saturating_mul(cost.x_count) {
        scratch.take_first().ok_or(EngineError::InsufficientMana)?;
        spent += 1;
    }

    *pool = scratch;
    Ok(spent)
}

/// Largest X payable for `cost` from `pool`, or `None` if even X = 0 fails.
#[must_use]
pub fn max_x(cost: &ManaCost, pool: &ManaPool) -> Option<u32> {
    if !can_pay(cost, pool) {
        return None;
    }
    if cost.x_count == 0 {
        return Some(0);
    }
    let left = pool.len() as u32 - cost.mana_value();
    Some(left / cost.x_count)
}

fn assign_pips(pips: &[ManaSymbol], generic: usize, units: &[ManaUnit]) -> Option<Assignment> {
    if units.len() < pips.len() + generic {
        return None;
    }

    let mut used = vec![false; units.len()];
    let mut chosen = Assignment::new();
    if search(pips, generic, units, &mut used, &mut chosen) {
        Some(chosen)
    } else {
        None
    }
}

fn search(
    pips: &[ManaSymbol],
    generic: usize,
    units: &[ManaUnit],
    used: &mut [bool],
    chosen: &mut Assignment,
) -> bool {
    let Some((&pip, rest)) = pips.split_first() else {
        return units.len() - chosen.len() >= generic;
    };

    for idx in 0..units.len() {
        if used[idx] || !units[idx].pays(pip) {
            continue;
        }

        used[idx] = true;
        chosen.push(idx);
        if search(rest, generic, units, used, chosen) {
            return true;
        }
        chosen.pop();
        used[idx] = false;
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mana::parse_cost;
    use ManaSymbol::*;

    fn unit(s: ManaSymbol) -> ManaUnit {
        ManaUnit::single(s)
    }

    #[test]
    fn test_pay_exact_pool() {
        let mut pool = ManaPool::from_units([unit(White), unit(Green), unit(Colorless), unit(Colorless)]);
        let cost = parse_cost("2WG").unwrap();

        assert!(can_pay(&cost, &pool));
        assert_eq!(pay(&cost, &mut pool), Ok(4));
        assert!(pool.is_empty());
    }

    #[test]
    fn test_generic_needs_enough_units() {
        let pool = ManaPool::from_units([unit(Red), unit(Blue)]);
        let cost = parse_cost("3").unwrap();
        assert!(!can_pay(&cost, &pool));
    }

    #[test]
    fn test_backtracks_over_dual_land() {
        // Naive greedy would spend the dual on W and strand the U pip.
        let mut pool = ManaPool::from_units([ManaUnit::of(&[White, Blue]), unit(White)]);
        let cost = parse_cost("WU").unwrap();

        assert!(can_pay(&cost, &pool));
        pay(&cost, &mut pool).unwrap();
        assert!(pool.is_empty());
    }

    #[test]
    fn test_wildcard_pays_any_pip() {
        let mut pool = ManaPool::from_units([ManaUnit::any(), unit(Green)]);
        let cost = parse_cost("BG").unwrap();
        assert!(can_pay(&cost, &pool));
        pay(&cost, &mut pool).unwrap();
        assert!(pool.is_empty());
    }

    #[test]
    fn test_generic_takes_leftmost_remaining() {
        let mut pool = ManaPool::from_units([unit(Red), unit(Green), unit(Blue), unit(Black)]);
        let cost = parse_cost("1G").unwrap();

        pay(&cost, &mut pool).unwrap();
        assert_eq!(pool.units(), &[unit(Blue), unit(Black)]);
    }

    #[test]
    fn test_failed_pay_leaves_pool() {
        let mut pool = ManaPool::from_units([unit(Red), unit(Red)]);
        let before = pool.clone();
        let cost = parse_cost("1G").unwrap();

        assert!(!can_pay(&cost, &pool));
        assert_eq!(pay(&cost, &mut pool), Err(EngineError::InsufficientMana));
        assert_eq!(pool, before);
    }

    #[test]
    fn test_pay_with_x() {
        let mut pool = ManaPool::from_units([unit(Red), unit(Colorless), unit(Colorless), unit(Colorless)]);
        let cost = parse_cost("XR").unwrap();

        assert_eq!(max_x(&cost, &pool), Some(3));
        assert!(can_pay_with_x(&cost, 2, &pool));
        assert_eq!(pay_with_x(&cost, 2, &mut pool), Ok(3));
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_pay_with_x_is_all_or_nothing() {
        let mut pool = ManaPool::from_units([unit(Red), unit(Colorless)]);
        let before = pool.clone();
        let cost = parse_cost("XR").unwrap();

        assert!(!can_pay_with_x(&cost, 2, &pool));
        assert_eq!(pay_with_x(&cost, 2, &mut pool), Err(EngineError::InsufficientMana));
        assert_eq!(pool, before);
    }

    #[test]
    fn test_double_x() {
        let pool = ManaPool::from_units(std::iter::repeat(unit(Green)).take(5));
        let cost = parse_cost("XXG").unwrap();
        assert_eq!(max_x(&cost, &pool), Some(2));
    }

    #[test]
    fn test_free_cost() {
        let mut pool = ManaPool::new();
        assert!(can_pay(&ManaCost::free(), &pool));
        assert_eq!(pay(&ManaCost::free(), &mut pool), Ok(0));
    }
}
