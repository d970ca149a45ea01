//! Land drops, fetch lands, and the entering-tapped policy.

use tracing::{debug, instrument, Level};

use super::BoardState;
use crate::cards::{CardDefinition, Category, FetchSpec, TriggerEvent};
use crate::core::{EngineError, EngineResult, EntityId};
use crate::triggers::TriggerDispatcher;
use crate::zones::ZoneKind;

impl BoardState {
    /// Play a land from hand.
    ///
    /// Its mana is added to the pool when it enters untapped and is a plain
    /// mana land. Landfall then fires for every permanent, the new land
    /// included. The per-turn land limit is the driver's concern.
    #[instrument(level = Level::DEBUG, skip(self))]
    pub fn play_land(&mut self, entity: EntityId) -> EngineResult<()> {
        let card = self.card(entity).ok_or(EngineError::CardNotInExpectedZone {
            card: entity,
            expected: ZoneKind::Hand,
        })?;
        if card.zone != ZoneKind::Hand {
            return Err(EngineError::CardNotInExpectedZone {
                card: entity,
                expected: ZoneKind::Hand,
            });
        }
        if card.category() != Category::Land {
            return Err(EngineError::UnsupportedCategory(card.category()));
        }

        self.enter_land(entity, ZoneKind::Hand, false)?;
        self.lands_played_this_turn += 1;
        Ok(())
    }

    /// Put a land onto the battlefield from any zone.
    ///
    /// Returns whether it entered tapped. `force_tapped` overrides the
    /// entering-tapped policy; a forced-tapped land adds no mana.
    pub(crate) fn enter_land(&mut self, entity: EntityId, from: ZoneKind, force_tapped: bool) -> EngineResult<bool> {
        let def = match self.card(entity) {
            Some(card) => card.def.clone(),
            None => {
                return Err(EngineError::CardNotInExpectedZone {
                    card: entity,
                    expected: from,
                })
            }
        };

        let tapped = force_tapped || self.enters_tapped(entity, &def);
        let to = if tapped {
            ZoneKind::TappedLands
        } else {
            ZoneKind::UntappedLands
        };
        self.move_card(entity, from, to)?;

        if !tapped && def.is_plain_mana_land() {
            for unit in &def.produces {
                self.pool.add(unit.clone());
            }
        }
        debug!(%entity, name = %def.name, tapped, pool = %self.pool, "land entered");

        TriggerDispatcher::fire_all(self, TriggerEvent::Landfall);
        Ok(tapped)
    }

    /// Decide whether `def` enters tapped.
    ///
    /// Only the first rule category the land declares is consulted.
    #[must_use]
    pub fn enters_tapped(&self, entity: EntityId, def: &CardDefinition) -> bool {
        let rules = &def.untap;

        if rules.always_tapped {
            return true;
        }
        if !rules.controls_any.is_empty() {
            let controls = self.battlefield().into_iter().any(|id| {
                self.card(id)
                    .is_some_and(|c| rules.controls_any.iter().any(|n| n.eq_ignore_ascii_case(c.name())))
            });
            return !controls;
        }
        if let Some(needed) = rules.basic_lands {
            let basics = self
                .lands()
                .filter(|&id| self.card(id).is_some_and(|c| c.def.basic))
                .count();
            return (basics as u32) < needed;
        }
        if let Some(needed) = rules.lands {
            return (self.land_count() as u32) < needed;
        }
        if let Some(filter) = &rules.reveal {
            let revealed = self
                .hand()
                .iter()
                .filter(|&&id| id != entity)
                .any(|&id| self.card(id).is_some_and(|c| filter.matches(&c.def)));
            return !revealed;
        }
        def.enters_tapped
    }

    fn lands(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.cards_in(ZoneKind::UntappedLands)
            .iter()
            .chain(self.cards_in(ZoneKind::TappedLands))
            .copied()
    }

    /// Sacrifice a fetch land and search for a land.
    ///
    /// Always costs exactly 1 life and puts the fetch land into the
    /// graveyard, whether or not a matching land is found. The first
    /// matching land in library order enters through the normal land path
    /// (so landfall fires), then the library is shuffled.
    #[instrument(level = Level::DEBUG, skip(self, types))]
    pub fn fetch_land(
        &mut self,
        entity: EntityId,
        basic_only: bool,
        types: &[String],
        force_tapped: bool,
    ) -> EngineResult<Option<EntityId>> {
        let from = match self.zone_of(entity) {
            Some(zone) if zone.is_land_zone() || zone == ZoneKind::Hand => zone,
            _ => {
                return Err(EngineError::CardNotInExpectedZone {
                    card: entity,
                    expected: ZoneKind::UntappedLands,
                })
            }
        };

        self.life -= 1;
        self.move_to_graveyard(entity, from)?;

        let found = self.library().iter().copied().find(|&id| {
            self.card(id).is_some_and(|c| {
                c.def.is_land()
                    && (!basic_only || c.def.basic)
                    && (types.is_empty() || types.iter().any(|t| c.def.has_subtype(t)))
            })
        });

        if let Some(land) = found {
            self.enter_land(land, ZoneKind::Library, force_tapped)?;
        }
        self.shuffle_library();

        debug!(%entity, ?found, life = self.life, "fetched");
        Ok(found)
    }

    /// Crack a fetch land using its own fetch rules.
    pub fn crack_fetch(&mut self, entity: EntityId) -> EngineResult<Option<EntityId>> {
        let spec: FetchSpec = self
            .card(entity)
            .and_then(|c| c.def.fetch.clone())
            .ok_or(EngineError::UnsupportedCategory(Category::Land))?;
        self.fetch_land(entity, spec.basic_only, &spec.types, spec.force_tapped)
    }
}
