//! Engine error taxonomy.
//!
//! Every error here is recoverable: a failed action leaves the board exactly
//! as it was and the trial continues. Running out of library is not an
//! error at all; drawing simply yields fewer cards.

use thiserror::Error;

use super::entity::EntityId;
use crate::cards::Category;
use crate::zones::ZoneKind;

/// Errors reported by board operations.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A cast, equip or activation could not be paid.
    #[error("insufficient mana")]
    InsufficientMana,

    /// The card is not where the caller assumed it was.
    #[error("{card} is not in {expected}")]
    CardNotInExpectedZone { card: EntityId, expected: ZoneKind },

    /// No resolution handler covers the card's category from its zone.
    #[error("no handler for {0:?}")]
    UnsupportedCategory(Category),

    /// A permanent was required to be on the battlefield.
    #[error("{0} is not on the battlefield")]
    NotOnBattlefield(EntityId),

    /// The card has no equip cost.
    #[error("{0} cannot be equipped")]
    NoEquipCost(EntityId),

    /// The card has no activated ability at the requested index.
    #[error("{card} has no activated ability {index}")]
    NoSuchAbility { card: EntityId, index: usize },

    /// The source must untap before this ability can be activated again.
    #[error("{0} is tapped")]
    AlreadyTapped(EntityId),

    /// A cost expression could not be parsed.
    #[error("malformed cost expression {0:?}")]
    MalformedCost(String),

    /// A deck referenced a card the catalog does not know.
    #[error("unknown card {0:?}")]
    UnknownCard(String),

    /// Catalog or configuration data could not be decoded.
    #[error("failed to parse data: {0}")]
    Parse(String),
}

/// Result alias used by every public board operation.
pub type EngineResult<T> = Result<T, EngineError>;

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::Parse(err.to_string())
    }
}
