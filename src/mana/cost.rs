//! Cost expressions.
//!
//! A cost expression is a compact string such as `"2WG"`, `"XR"` or `"1"`.
//! Parsing scans left to right: consecutive digits accumulate into a number
//! that is added to the generic total when the run ends (including a
//! trailing run), each colour letter adds one pip, and each `X` adds one
//! variable symbol. Braces and whitespace are ignored, so `"{2}{W}{G}"`
//! parses the same as `"2WG"`.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::symbol::ManaSymbol;
use crate::core::{EngineError, EngineResult};

/// A parsed cost: coloured pips, a generic amount, and X symbols.
///
/// Serializes as its cost expression, so catalog files write `"2WG"` and
/// malformed expressions are rejected when the catalog is loaded.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ManaCost {
    /// Coloured (or colorless-specific) pips in expression order.
    pub pips: SmallVec<[ManaSymbol; 4]>,

    /// Generic mana payable by any unit.
    pub generic: u32,

    /// Number of `X` symbols; each is paid `x` times.
    pub x_count: u32,
}

impl ManaCost {
    /// A cost of nothing.
    #[must_use]
    pub fn free() -> Self {
        Self::default()
    }

    /// Total mana needed with X = 0.
    #[must_use]
    pub fn mana_value(&self) -> u32 {
        (self.pips.len() as u32).saturating_add(self.generic)
    }

    /// This cost with `extra` generic mana added (e.g. a tax).
    #[must_use]
    pub fn plus_generic(&self, extra: u32) -> Self {
        Self {
            pips: self.pips.clone(),
            generic: self.generic.saturating_add(extra),
            x_count: self.x_count,
        }
    }

    #[must_use]
    pub fn has_x(&self) -> bool {
        self.x_count > 0
    }

    #[must_use]
    pub fn is_free(&self) -> bool {
        self.pips.is_empty() && self.generic == 0 && self.x_count == 0
    }

    fn add_generic(&mut self, n: u32, expr: &str) -> EngineResult<()> {
        self.generic = self
            .generic
            .checked_add(n)
            .ok_or_else(|| EngineError::MalformedCost(expr.to_string()))?;
        Ok(())
    }
}

impl std::str::FromStr for ManaCost {
    type Err = EngineError;

    fn from_str(expr: &str) -> Result<Self, Self::Err> {
        parse_cost(expr)
    }
}

impl TryFrom<String> for ManaCost {
    type Error = EngineError;

    fn try_from(expr: String) -> Result<Self, Self::Error> {
        parse_cost(&expr)
    }
}

impl From<ManaCost> for String {
    fn from(cost: ManaCost) -> Self {
        cost.to_string()
    }
}

/// Parse a cost expression into pips, generic amount and X count.
pub fn parse_cost(expr: &str) -> EngineResult<ManaCost> {
    let mut cost = ManaCost::default();
    let mut number: Option<u32> = None;

    for c in expr.chars() {
        if let Some(digit) = c.to_digit(10) {
            let current = number.unwrap_or(0);
            number = Some(
                current
                    .checked_mul(10)
                    .and_then(|n| n.checked_add(digit))
                    .ok_or_else(|| EngineError::MalformedCost(expr.to_string()))?,
            );
            continue;
        }

        if let Some(n) = number.take() {
            cost.add_generic(n, expr)?;
        }

        match c {
            '{' | '}' | ' ' => {}
            'X' | 'x' => cost.x_count += 1,
            _ => match ManaSymbol::from_char(c) {
                Some(ManaSymbol::Any) | None => {
                    return Err(EngineError::MalformedCost(expr.to_string()));
                }
                Some(symbol) => cost.pips.push(symbol),
            },
        }
    }

    if let Some(n) = number {
        cost.add_generic(n, expr)?;
    }

    Ok(cost)
}

impl std::fmt::Display for ManaCost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for _ in 0..self.x_count {
            write!(f, "X")?;
        }
        if self.generic > 0 || self.is_free() {
            write!(f, "{}", self.generic)?;
        }
        for pip in &self.pips {
            write!(f, "{}", pip)?;
        }
        Ok(())
    }
}
