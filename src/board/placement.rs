//! Cost-free placement: permanents entering, tokens, searches, and
//! activated abilities.

use std::sync::Arc;

use tracing::{debug, instrument, warn, Level};

use super::BoardState;
use crate::cards::TriggerEvent;
use crate::core::{EngineError, EngineResult, EntityId};
use crate::effects::{Destination, EffectContext, EffectResolver, SearchSpec, SearchZone, TokenSpec};
use crate::mana::solver;
use crate::triggers::TriggerDispatcher;
use crate::zones::{ZoneKind, ZonePosition};

impl BoardState {
    /// Put a permanent onto the battlefield without paying for it.
    ///
    /// Lands go through the land path (landfall fires); other permanents
    /// fire their own `etb`. Nothing is recorded as a cast. Returns the
    /// battlefield zone the card entered.
    #[instrument(level = Level::DEBUG, skip(self))]
    pub fn put_onto_battlefield(&mut self, entity: EntityId, from: ZoneKind, tapped: bool) -> EngineResult<ZoneKind> {
        let def = match self.card(entity) {
            Some(card) if card.zone == from => card.def.clone(),
            _ => {
                return Err(EngineError::CardNotInExpectedZone {
                    card: entity,
                    expected: from,
                })
            }
        };

        if def.is_land() {
            let tapped = self.enter_land(entity, from, tapped)?;
            return Ok(if tapped {
                ZoneKind::TappedLands
            } else {
                ZoneKind::UntappedLands
            });
        }

        let zone = Self::permanent_zone(&def).ok_or(EngineError::UnsupportedCategory(def.category))?;
        self.enter_permanent(entity, from, zone, tapped, 0)?;
        Ok(zone)
    }

    /// Move a non-land permanent onto the battlefield and fire its `etb`
    /// with `x` bound to the X paid for it.
    ///
    /// Untapped non-creature mana producers add their mana right away.
    pub(crate) fn enter_permanent(
        &mut self,
        entity: EntityId,
        from: ZoneKind,
        zone: ZoneKind,
        tapped: bool,
        x: u32,
    ) -> EngineResult<()> {
        self.move_card(entity, from, zone)?;

        let mut mana = Vec::new();
        if let Some(card) = self.cards.get_mut(&entity) {
            card.tapped = tapped;
            if !tapped && zone != ZoneKind::Creatures && Self::produces_free_mana(&card.def) {
                mana = card.def.produces.clone();
            }
        }
        for unit in mana {
            self.pool.add(unit);
        }

        TriggerDispatcher::execute_with_x(self, TriggerEvent::Etb, entity, x);
        Ok(())
    }

    /// Create a token from a template and fire its `etb`.
    pub fn create_token(&mut self, spec: &TokenSpec) -> EngineResult<EntityId> {
        let def = spec.to_definition();
        let zone = Self::permanent_zone(&def).ok_or(EngineError::UnsupportedCategory(def.category))?;

        let id = self.alloc_entity();
        let mut card = crate::cards::CardInstance::new(id, Arc::new(def), ZoneKind::Exile);
        card.is_token = true;
        self.cards.insert(id, card);
        // Tokens are created outside the game and move in.
        self.zones.add(id, ZoneKind::Exile, ZonePosition::Back);
        self.enter_permanent(id, ZoneKind::Exile, zone, false, 0)?;

        debug!(token = %id, name = %spec.name, %zone, "token created");
        Ok(id)
    }

    /// Activate the `index`th activated ability of a permanent.
    ///
    /// Pays the mana cost, taps the source if required, then resolves the
    /// effects. Nothing changes if the cost cannot be paid.
    #[instrument(level = Level::DEBUG, skip(self))]
    pub fn activate(&mut self, entity: EntityId, index: usize) -> EngineResult<()> {
        let card = self
            .card(entity)
            .filter(|c| c.zone.is_battlefield())
            .ok_or(EngineError::NotOnBattlefield(entity))?;
        let def = card.def.clone();
        let ability = def
            .activated
            .get(index)
            .ok_or(EngineError::NoSuchAbility { card: entity, index })?;
        if ability.tap && card.tapped {
            return Err(EngineError::AlreadyTapped(entity));
        }
        if !solver::can_pay(&ability.cost, &self.pool) {
            return Err(EngineError::InsufficientMana);
        }

        let spent = solver::pay(&ability.cost, &mut self.pool)?;
        self.mana_spent += spent;
        if ability.tap {
            self.tap(entity)?;
        }

        debug!(%entity, name = %def.name, index, spent, "ability activated");
        let ctx = EffectContext::from_source(entity, &def.oracle_text);
        EffectResolver::apply_all(self, &ability.effects, &ctx);
        Ok(())
    }

    /// Search the library or graveyard and move what is found.
    ///
    /// A library search always ends with a shuffle; cards headed for the
    /// top of the library are placed after it. Returns the cards found.
    #[instrument(level = Level::DEBUG, skip(self, oracle_text))]
    pub fn search(&mut self, spec: &SearchSpec, oracle_text: &str) -> EngineResult<Vec<EntityId>> {
        let from = match spec.zone {
            SearchZone::Library => ZoneKind::Library,
            SearchZone::Graveyard => ZoneKind::Graveyard,
        };
        let destination = spec.destination_for(oracle_text);

        let found: Vec<EntityId> = self
            .cards_in(from)
            .iter()
            .copied()
            .filter(|&id| self.card(id).is_some_and(|c| spec.filter.matches(&c.def)))
            .take(spec.count as usize)
            .collect();

        for &id in &found {
            match destination {
                Destination::Hand => self.move_card(id, from, ZoneKind::Hand)?,
                Destination::Graveyard if from == ZoneKind::Graveyard => {}
                Destination::Graveyard => self.move_card(id, from, ZoneKind::Graveyard)?,
                Destination::Battlefield => {
                    let placed = self.put_onto_battlefield(id, from, spec.tapped);
                    if let Err(EngineError::UnsupportedCategory(category)) = placed {
                        warn!(%id, ?category, "searched card cannot enter the battlefield");
                        self.move_card(id, from, ZoneKind::Hand)?;
                    } else {
                        placed?;
                    }
                }
                Destination::LibraryTop => {}
            }
        }

        if from == ZoneKind::Library {
            self.shuffle_library();
        }
        if destination == Destination::LibraryTop {
            for &id in found.iter().rev() {
                self.move_card_at(id, from, ZoneKind::Library, ZonePosition::Front)?;
            }
        }

        debug!(?found, ?destination, "search resolved");
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{ActivatedAbility, CardDefinition, CardFilter, Category, TriggeredAbility, LOYALTY};
    use crate::core::{GameRng, SimConfig};
    use crate::effects::Effect;
    use crate::mana::{ManaCost, ManaSymbol, ManaUnit};

    fn board() -> BoardState {
        BoardState::empty(SimConfig::new(), GameRng::new(11))
    }

    #[test]
    fn test_put_onto_battlefield_fires_etb() {
        let def = CardDefinition::new("Scout", Category::Creature)
            .with_stats(1, 1)
            .with_trigger(TriggeredAbility::new(TriggerEvent::Etb).with_effect(Effect::GainLife(3)));
        let mut board = board();
        let scout = board.add_card(Arc::new(def), ZoneKind::Graveyard);

        let zone = board.put_onto_battlefield(scout, ZoneKind::Graveyard, false).unwrap();
        assert_eq!(zone, ZoneKind::Creatures);
        assert_eq!(board.life, 43);
        assert_eq!(board.total_plays, 0);
        assert!(board.play_log.is_empty());
    }

    #[test]
    fn test_put_onto_battlefield_rejects_spells() {
        let mut board = board();
        let bolt = board.add_card(Arc::new(CardDefinition::new("Bolt", Category::Instant)), ZoneKind::Library);
        assert_eq!(
            board.put_onto_battlefield(bolt, ZoneKind::Library, false).unwrap_err(),
            EngineError::UnsupportedCategory(Category::Instant)
        );
        assert_eq!(board.zone_of(bolt), Some(ZoneKind::Library));
    }

    #[test]
    fn test_planeswalker_enters_with_loyalty() {
        let def = CardDefinition::new("Walker", Category::Planeswalker).with_loyalty(3);
        let mut board = board();
        let walker = board.add_card(Arc::new(def), ZoneKind::Hand);
        board.put_onto_battlefield(walker, ZoneKind::Hand, false).unwrap();
        assert_eq!(board.card(walker).unwrap().counter(LOYALTY), 3);
    }

    #[test]
    fn test_mana_rock_adds_mana_on_entry() {
        let def = CardDefinition::new("Mind Stone", Category::Artifact)
            .producing(ManaUnit::single(ManaSymbol::Colorless));
        let mut board = board();
        let rock = board.add_card(Arc::new(def), ZoneKind::Hand);
        board.put_onto_battlefield(rock, ZoneKind::Hand, false).unwrap();
        assert_eq!(board.pool.len(), 1);
    }

    #[test]
    fn test_tokens_vanish_when_leaving() {
        let mut board = board();
        let token = board.create_token(&TokenSpec::creature("Soldier", 1, 1)).unwrap();
        assert_eq!(board.zone_of(token), Some(ZoneKind::Creatures));
        assert!(board.card(token).unwrap().is_token);

        board.move_to_graveyard(token, ZoneKind::Creatures).unwrap();
        assert!(board.card(token).is_none());
        assert_eq!(board.zone_of(token), None);
        assert!(board.is_consistent());
    }

    #[test]
    fn test_activate_taps_and_resolves() {
        let def = CardDefinition::new("City of Brass", Category::Land).with_activated(
            ActivatedAbility::new(ManaCost::free(), true).with_effect(Effect::add_mana(ManaUnit::any())),
        );
        let mut board = board();
        let city = board.add_card(Arc::new(def), ZoneKind::UntappedLands);

        board.activate(city, 0).unwrap();
        assert_eq!(board.pool.units(), &[ManaUnit::any()]);
        assert_eq!(board.zone_of(city), Some(ZoneKind::TappedLands));

        assert_eq!(board.activate(city, 0).unwrap_err(), EngineError::AlreadyTapped(city));
        assert_eq!(
            board.activate(city, 3).unwrap_err(),
            EngineError::NoSuchAbility { card: city, index: 3 }
        );
    }

    #[test]
    fn test_activate_insufficient_mana_changes_nothing() {
        let def = CardDefinition::new("Tower", Category::Artifact).with_activated(
            ActivatedAbility::new(ManaCost::free().plus_generic(2), true).with_effect(Effect::draw(1)),
        );
        let mut board = board();
        let tower = board.add_card(Arc::new(def), ZoneKind::Artifacts);
        board.pool.add(ManaUnit::single(ManaSymbol::Red));

        assert_eq!(board.activate(tower, 0).unwrap_err(), EngineError::InsufficientMana);
        assert_eq!(board.pool.len(), 1);
        assert!(!board.card(tower).unwrap().tapped);
    }

    #[test]
    fn test_search_to_battlefield_tapped() {
        let forest = CardDefinition::new("Forest", Category::Land)
            .basic()
            .producing(ManaUnit::single(ManaSymbol::Green));
        let mut board = board();
        let land = board.add_card(Arc::new(forest), ZoneKind::Library);
        board.add_card(Arc::new(CardDefinition::new("Bear", Category::Creature)), ZoneKind::Library);

        let spec = SearchSpec::new(CardFilter::category(Category::Land)).tapped();
        let found = board
            .search(&spec, "Search your library for a basic land card, put it onto the battlefield tapped")
            .unwrap();
        assert_eq!(found, vec![land]);
        assert_eq!(board.zone_of(land), Some(ZoneKind::TappedLands));
        assert!(board.pool.is_empty());
    }

    #[test]
    fn test_search_to_library_top() {
        let mut board = board();
        for _ in 0..5 {
            board.add_card(Arc::new(CardDefinition::new("Filler", Category::Sorcery)), ZoneKind::Library);
        }
        let wanted = board.add_card(Arc::new(CardDefinition::new("Wanted", Category::Creature)), ZoneKind::Library);

        let spec = SearchSpec::new(CardFilter::default().with_name("Wanted"));
        board.search(&spec, "put that card on top of your library").unwrap();
        assert_eq!(board.library()[0], wanted);
        assert!(board.is_consistent());
    }

    #[test]
    fn test_search_graveyard_to_hand() {
        let mut board = board();
        let bear = board.add_card(Arc::new(CardDefinition::new("Bear", Category::Creature)), ZoneKind::Graveyard);

        let spec = SearchSpec::new(CardFilter::category(Category::Creature)).in_graveyard();
        assert_eq!(board.search(&spec, "").unwrap(), vec![bear]);
        assert_eq!(board.zone_of(bear), Some(ZoneKind::Hand));
    }
}
