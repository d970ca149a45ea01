//! Card catalog for definition lookup.
//!
//! The `CardCatalog` is the read-only card database handed to each board at
//! construction. It is owned by the trial driver and shared by reference;
//! there is no process-wide card cache.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::definition::CardDefinition;
use crate::core::{EngineError, EngineResult};
use crate::effects::Effect;

/// Catalog of card definitions keyed by name.
///
/// ## Example
///
/// ```
/// use goldfish_engine::cards::{CardCatalog, CardDefinition, Category};
///
/// let mut catalog = CardCatalog::new();
/// catalog.register(CardDefinition::new("Lightning Bolt", Category::Instant).with_cost("R"));
///
/// let bolt = catalog.get("Lightning Bolt").unwrap();
/// assert_eq!(bolt.cost.mana_value(), 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardCatalog {
    cards: FxHashMap<String, Arc<CardDefinition>>,
}

impl CardCatalog {
    /// Create a new empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from a JSON array of definitions.
    ///
    /// Cost expressions and token templates are validated here, so a loaded
    /// catalog never holds a malformed cost or a token that cannot enter
    /// the battlefield.
    pub fn from_json(json: &str) -> EngineResult<Self> {
        let defs: Vec<CardDefinition> = serde_json::from_str(json)?;
        let mut catalog = Self::new();
        for def in defs {
            if catalog.contains(&def.name) {
                return Err(EngineError::Parse(format!("duplicate card {:?}", def.name)));
            }
            Self::check_tokens(&def)?;
            catalog.register(def);
        }
        Ok(catalog)
    }

    fn check_tokens(def: &CardDefinition) -> EngineResult<()> {
        for effect in def.effects() {
            if let Effect::CreateTokens { token, .. } = effect {
                if !token.is_placeable() {
                    return Err(EngineError::Parse(format!(
                        "{:?} creates a {:?} token {:?}",
                        def.name, token.category, token.name
                    )));
                }
            }
        }
        Ok(())
    }

    /// Register a card definition.
    ///
    /// Panics if a card with the same name already exists.
    pub fn register(&mut self, card: CardDefinition) {
        if self.cards.contains_key(&card.name) {
            panic!("Card {:?} already registered", card.name);
        }
        self.cards.insert(card.name.clone(), Arc::new(card));
    }

    /// Get a card definition by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<CardDefinition>> {
        self.cards.get(name)
    }

    /// Get a card definition by name, failing with `UnknownCard`.
    pub fn resolve(&self, name: &str) -> EngineResult<Arc<CardDefinition>> {
        self.cards
            .get(name)
            .cloned()
            .ok_or_else(|| EngineError::UnknownCard(name.to_string()))
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.cards.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over all card definitions.
    pub fn iter(&self) -> impl Iterator<Item = &CardDefinition> {
        self.cards.values().map(|c| c.as_ref())
    }
}

/// A deck: card names (duplicates allowed) plus an optional leader.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckList {
    #[serde(default)]
    pub leader: Option<String>,

    pub cards: Vec<String>,
}

impl DeckList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_leader(mut self, name: impl Into<String>) -> Self {
        self.leader = Some(name.into());
        self
    }

    /// Add `count` copies of a card.
    #[must_use]
    pub fn with_card(mut self, name: impl Into<String>, count: usize) -> Self {
        let name = name.into();
        self.cards.extend(std::iter::repeat(name).take(count));
        self
    }

    pub fn from_json(json: &str) -> EngineResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Category;

    #[test]
    fn test_register_and_get() {
        let mut catalog = CardCatalog::new();
        catalog.register(CardDefinition::new("Test Card", Category::Creature));

        assert_eq!(catalog.get("Test Card").unwrap().name, "Test Card");
        assert!(catalog.get("Missing").is_none());
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn test_duplicate_name_panics() {
        let mut catalog = CardCatalog::new();
        catalog.register(CardDefinition::new("A", Category::Land));
        catalog.register(CardDefinition::new("A", Category::Land));
    }

    #[test]
    fn test_resolve_unknown() {
        let catalog = CardCatalog::new();
        assert_eq!(
            catalog.resolve("Ghost").unwrap_err(),
            EngineError::UnknownCard("Ghost".to_string())
        );
    }

    #[test]
    fn test_from_json() {
        let json = r#"[
            { "name": "Forest", "category": "land", "basic": true, "produces": [["G"]] },
            { "name": "Llanowar Elves", "category": "creature", "cost": "G",
              "power": 1, "toughness": 1 }
        ]"#;
        let catalog = CardCatalog::from_json(json).unwrap();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.get("Forest").unwrap().basic);
    }

    #[test]
    fn test_from_json_rejects_bad_cost_and_duplicates() {
        let bad_cost = r#"[{ "name": "Oops", "category": "sorcery", "cost": "2?" }]"#;
        assert!(matches!(CardCatalog::from_json(bad_cost), Err(EngineError::Parse(_))));

        let dup = r#"[{ "name": "A", "category": "land" }, { "name": "A", "category": "land" }]"#;
        assert!(CardCatalog::from_json(dup).is_err());
    }

    #[test]
    fn test_from_json_rejects_unplaceable_token() {
        let land_token = r#"[{
            "name": "Land Maker",
            "category": "creature",
            "cost": "1G",
            "power": 1,
            "toughness": 1,
            "triggered": [{ "event": "etb", "effects": [
                { "create_tokens": { "token": { "name": "Wastes", "category": "land" }, "count": { "fixed": 1 } } }
            ] }]
        }]"#;
        let err = CardCatalog::from_json(land_token).unwrap_err();
        assert!(matches!(&err, EngineError::Parse(msg) if msg.contains("Wastes")));

        let spell_token = r#"[{
            "name": "Copy Spell",
            "category": "sorcery",
            "spell_effects": [
                { "create_tokens": { "token": { "name": "Copy", "category": "instant" }, "count": "x" } }
            ]
        }]"#;
        assert!(matches!(CardCatalog::from_json(spell_token), Err(EngineError::Parse(_))));

        let clues = r#"[{
            "name": "Clue Maker",
            "category": "sorcery",
            "spell_effects": [
                { "create_tokens": { "token": { "name": "Clue", "category": "artifact" }, "count": { "fixed": 2 } } }
            ]
        }]"#;
        assert_eq!(CardCatalog::from_json(clues).unwrap().len(), 1);
    }

    #[test]
    fn test_deck_list() {
        let deck = DeckList::new().with_leader("Boss").with_card("Forest", 3);
        assert_eq!(deck.len(), 3);
        assert_eq!(deck.leader.as_deref(), Some("Boss"));

        let parsed = DeckList::from_json(r#"{ "cards": ["Forest"] }"#).unwrap();
        assert!(parsed.leader.is_none());
    }
}
