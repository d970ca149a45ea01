//! The mana pool.
//!
//! A multiset of `ManaUnit`s kept in insertion order. Order matters: the
//! solver's deterministic assignment and generic payment both walk the pool
//! front to back.

use serde::{Deserialize, Serialize};

use super::symbol::{ManaSymbol, ManaUnit};

/// Available mana for the current turn.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManaPool {
    units: Vec<ManaUnit>,
}

impl ManaPool {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a pool from units in order.
    #[must_use]
    pub fn from_units(units: impl IntoIterator<Item = ManaUnit>) -> Self {
        Self {
            units: units.into_iter().collect(),
        }
    }

    /// Add one unit to the back of the pool.
    pub fn add(&mut self, unit: ManaUnit) {
        self.units.push(unit);
    }

    /// Add `count` copies of `unit`.
    pub fn add_many(&mut self, unit: &ManaUnit, count: u32) {
        for _ in 0..count {
            self.units.push(unit.clone());
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    #[must_use]
    pub fn units(&self) -> &[ManaUnit] {
        &self.units
    }

    pub fn iter(&self) -> impl Iterator<Item = &ManaUnit> {
        self.units.iter()
    }

    /// Number of units able to pay a pip of `symbol`.
    #[must_use]
    pub fn count_paying(&self, symbol: ManaSymbol) -> usize {
        self.units.iter().filter(|u| u.pays(symbol)).count()
    }

    /// Remove and return the front unit.
    pub fn take_first(&mut self) -> Option<ManaUnit> {
        if self.units.is_empty() {
            None
        } else {
            Some(self.units.remove(0))
        }
    }

    /// Remove the first unit equal to `unit`. Returns whether one was found.
    pub fn remove_unit(&mut self, unit: &ManaUnit) -> bool {
        match self.units.iter().position(|u| u == unit) {
            Some(pos) => {
                self.units.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Remove every unit whose index is flagged in `mask`.
    pub(crate) fn remove_marked(&mut self, mask: &[bool]) {
        debug_assert_eq!(mask.len(), self.units.len());
        let mut idx = 0;
        self.units.retain(|_| {
            let keep = !mask[idx];
            idx += 1;
            keep
        });
    }

    /// Empty the pool.
    pub fn clear(&mut self) {
        self.units.clear();
    }
}

impl std::fmt::Display for ManaPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, unit) in self.units.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", unit)?;
        }
        write!(f, "]")
    }
}
