//! Mana symbols and units.
//!
//! A `ManaSymbol` is one colour a source can produce (or the wildcard).
//! A `ManaUnit` is one unit of available mana together with every symbol it
//! could be spent as: a Forest yields `[G]`, a dual land `[W, U]`, a
//! rainbow source `[*]`.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// One colour of mana, colorless, or the "any colour" wildcard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ManaSymbol {
    #[serde(rename = "W")]
    White,
    #[serde(rename = "U")]
    Blue,
    #[serde(rename = "B")]
    Black,
    #[serde(rename = "R")]
    Red,
    #[serde(rename = "G")]
    Green,
    #[serde(rename = "C")]
    Colorless,
    /// Wildcard: the unit can be spent as any colour.
    #[serde(rename = "*")]
    Any,
}

impl ManaSymbol {
    /// The five colours plus colorless, in cost-expression order.
    pub const COST_SYMBOLS: [ManaSymbol; 6] = [
        ManaSymbol::White,
        ManaSymbol::Blue,
        ManaSymbol::Black,
        ManaSymbol::Red,
        ManaSymbol::Green,
        ManaSymbol::Colorless,
    ];

    /// Parse a cost letter. `X` is not a symbol and returns `None`.
    #[must_use]
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'W' => Some(ManaSymbol::White),
            'U' => Some(ManaSymbol::Blue),
            'B' => Some(ManaSymbol::Black),
            'R' => Some(ManaSymbol::Red),
            'G' => Some(ManaSymbol::Green),
            'C' => Some(ManaSymbol::Colorless),
            '*' => Some(ManaSymbol::Any),
            _ => None,
        }
    }

    #[must_use]
    pub fn to_char(self) -> char {
        match self {
            ManaSymbol::White => 'W',
            ManaSymbol::Blue => 'U',
            ManaSymbol::Black => 'B',
            ManaSymbol::Red => 'R',
            ManaSymbol::Green => 'G',
            ManaSymbol::Colorless => 'C',
            ManaSymbol::Any => '*',
        }
    }
}

impl std::fmt::Display for ManaSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// One unit of mana and the symbols it can be spent as.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ManaUnit(pub SmallVec<[ManaSymbol; 2]>);

impl ManaUnit {
    /// A unit that can only be spent as `symbol`.
    #[must_use]
    pub fn single(symbol: ManaSymbol) -> Self {
        Self(SmallVec::from_slice(&[symbol]))
    }

    /// A unit spendable as any of `symbols`.
    #[must_use]
    pub fn of(symbols: &[ManaSymbol]) -> Self {
        Self(SmallVec::from_slice(symbols))
    }

    /// A wildcard unit.
    #[must_use]
    pub fn any() -> Self {
        Self::single(ManaSymbol::Any)
    }

    /// Whether this unit can pay a pip of `symbol`.
    #[must_use]
    pub fn pays(&self, symbol: ManaSymbol) -> bool {
        self.0.iter().any(|&s| s == symbol || s == ManaSymbol::Any)
    }

    /// Parse a unit from its letters, e.g. `"WU"` or `"*"`.
    #[must_use]
    pub fn parse(letters: &str) -> Option<Self> {
        let symbols: Option<SmallVec<[ManaSymbol; 2]>> =
            letters.chars().map(ManaSymbol::from_char).collect();
        symbols.filter(|s| !s.is_empty()).map(Self)
    }

    pub fn symbols(&self) -> &[ManaSymbol] {
        &self.0
    }
}

impl std::fmt::Display for ManaUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(")?;
        for symbol in &self.0 {
            write!(f, "{}", symbol)?;
        }
        write!(f, ")")
    }
}
