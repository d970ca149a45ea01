//! The board: one trial's complete game state.
//!
//! `BoardState` owns every card instance, the zones, the mana pool and all
//! counters. Other components (the cast router, the trigger dispatcher,
//! the effect resolver) operate on it through `&mut BoardState`.
//!
//! ## Zone moves
//!
//! Every move goes through [`BoardState::move_card`], which keeps the zone
//! index, each instance's `zone` field and the trigger registry in step.
//! Leaving the battlefield clears battlefield state, detaches equipment and
//! drops the card from combat; tokens that leave cease to exist.

use std::sync::Arc;

use im::Vector;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, Level};

use crate::cards::{AbilityId, CardCatalog, CardDefinition, CardInstance, Category, DeckList, LOYALTY};
use crate::core::{EngineError, EngineResult, EntityId, GameRng, SimConfig};
use crate::mana::ManaPool;
use crate::triggers::TriggerRegistry;
use crate::zones::{ZoneKind, ZoneManager, ZonePosition};

/// One entry of the play log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayRecord {
    pub turn: u32,
    pub entity: EntityId,
    pub name: String,
}

/// Combat bookkeeping for the current turn.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatState {
    /// Declared attackers, in declaration order.
    pub attackers: Vec<EntityId>,

    /// Turn the current combat began.
    pub combat_turn: Option<u32>,

    /// Attack abilities already fired this combat.
    pub fired: FxHashSet<(EntityId, AbilityId)>,

    /// Creature being dealt damage while damage triggers resolve.
    pub last_damaged: Option<EntityId>,
}

impl CombatState {
    /// Start a new combat on `turn`.
    pub(crate) fn reset(&mut self, turn: u32) {
        self.attackers.clear();
        self.fired.clear();
        self.combat_turn = Some(turn);
    }
}

/// Complete state of one goldfish trial.
#[derive(Clone, Debug)]
pub struct BoardState {
    pub(crate) cards: FxHashMap<EntityId, CardInstance>,
    pub(crate) zones: ZoneManager,
    pub(crate) triggers: TriggerRegistry,
    /// Equipment -> equipped creature.
    pub(crate) attachments: FxHashMap<EntityId, EntityId>,
    pub(crate) combat: CombatState,
    pub(crate) rng: GameRng,
    config: SimConfig,
    next_entity: EntityId,
    leader: Option<EntityId>,

    /// Mana available this turn.
    pub pool: ManaPool,

    pub life: i64,

    /// Life of the absent opponent.
    pub opponent_life: i64,

    /// Total damage dealt to the opponent.
    pub damage_dealt: i64,

    /// Current turn; 0 until the first `begin_turn`.
    pub turn: u32,

    /// Paid casts this turn.
    pub plays_this_turn: u32,

    /// Paid casts over the whole trial.
    pub total_plays: u32,

    pub lands_played_this_turn: u32,

    pub cards_drawn: u32,

    /// Mana units spent on casts, equips and activations.
    pub mana_spent: u32,

    pub play_log: Vector<PlayRecord>,

    /// Cards cast this turn, in order.
    pub casts_this_turn: Vec<EntityId>,

    pub monarch: bool,

    /// Turn on which combat damage makes us the monarch.
    pub monarch_on_damage_turn: Option<u32>,

    /// Times the leader has been cast from its holding zone.
    pub leader_casts: u32,
}

impl BoardState {
    /// Build a board for one trial.
    ///
    /// Every card of the deck goes into the library, which is then
    /// shuffled; the leader goes into its holding zone. Nothing is drawn.
    pub fn new(catalog: &CardCatalog, deck: &DeckList, config: SimConfig, rng: GameRng) -> EngineResult<Self> {
        let defs = deck
            .cards
            .iter()
            .map(|name| catalog.resolve(name))
            .collect::<EngineResult<Vec<_>>>()?;
        let leader_def = deck.leader.as_deref().map(|name| catalog.resolve(name)).transpose()?;

        let mut board = Self::empty(config, rng);
        for def in defs {
            board.add_card(def, ZoneKind::Library);
        }
        if let Some(def) = leader_def {
            let id = board.add_card(def, ZoneKind::Leader);
            if let Some(card) = board.cards.get_mut(&id) {
                card.is_leader = true;
            }
            board.leader = Some(id);
        }
        board.zones.shuffle_zone(ZoneKind::Library, &mut board.rng);

        debug!(
            library = board.zones.len(ZoneKind::Library),
            leader = ?board.leader,
            seed = board.rng.seed(),
            "board created"
        );
        Ok(board)
    }

    /// A board with no cards.
    #[must_use]
    pub fn empty(config: SimConfig, rng: GameRng) -> Self {
        Self {
            cards: FxHashMap::default(),
            zones: ZoneManager::new(),
            triggers: TriggerRegistry::new(),
            attachments: FxHashMap::default(),
            combat: CombatState::default(),
            rng,
            next_entity: EntityId::FIRST,
            leader: None,
            pool: ManaPool::new(),
            life: config.starting_life,
            opponent_life: config.opponent_life,
            damage_dealt: 0,
            turn: 0,
            plays_this_turn: 0,
            total_plays: 0,
            lands_played_this_turn: 0,
            cards_drawn: 0,
            mana_spent: 0,
            play_log: Vector::new(),
            casts_this_turn: Vec::new(),
            monarch: false,
            monarch_on_damage_turn: None,
            leader_casts: 0,
            config,
        }
    }

    /// Add a new card instance to the back of `zone`.
    ///
    /// Cards added straight onto the battlefield are treated as having
    /// entered (their triggers are registered) but nothing fires.
    pub fn add_card(&mut self, def: Arc<CardDefinition>, zone: ZoneKind) -> EntityId {
        let id = self.alloc_entity();
        self.cards.insert(id, CardInstance::new(id, def, zone));
        self.zones.add(id, zone, ZonePosition::Back);
        if zone.is_battlefield() {
            self.on_enter_battlefield(id, zone);
        }
        id
    }

    pub(crate) fn alloc_entity(&mut self) -> EntityId {
        let id = self.next_entity;
        self.next_entity = id.next();
        id
    }

    // === Queries ===

    #[must_use]
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    #[must_use]
    pub fn card(&self, entity: EntityId) -> Option<&CardInstance> {
        self.cards.get(&entity)
    }

    /// Mutable access to a card on the battlefield.
    pub(crate) fn permanent_mut(&mut self, entity: EntityId) -> Option<&mut CardInstance> {
        self.cards.get_mut(&entity).filter(|c| c.zone.is_battlefield())
    }

    #[must_use]
    pub fn zone_of(&self, entity: EntityId) -> Option<ZoneKind> {
        self.zones.zone_of(entity)
    }

    /// Cards in a zone, in order. The library front is the next draw.
    #[must_use]
    pub fn cards_in(&self, zone: ZoneKind) -> &[EntityId] {
        self.zones.cards(zone)
    }

    #[must_use]
    pub fn hand(&self) -> &[EntityId] {
        self.zones.cards(ZoneKind::Hand)
    }

    #[must_use]
    pub fn library(&self) -> &[EntityId] {
        self.zones.cards(ZoneKind::Library)
    }

    /// Every permanent, zone by zone.
    #[must_use]
    pub fn battlefield(&self) -> Vec<EntityId> {
        self.zones.battlefield()
    }

    #[must_use]
    pub fn leader(&self) -> Option<EntityId> {
        self.leader
    }

    /// First card named `name` in `zone`.
    #[must_use]
    pub fn find_in(&self, zone: ZoneKind, name: &str) -> Option<EntityId> {
        self.zones
            .cards(zone)
            .iter()
            .copied()
            .find(|id| self.cards.get(id).is_some_and(|c| c.name() == name))
    }

    #[must_use]
    pub fn attackers(&self) -> &[EntityId] {
        &self.combat.attackers
    }

    #[must_use]
    pub fn combat(&self) -> &CombatState {
        &self.combat
    }

    #[must_use]
    pub fn trigger_registry(&self) -> &TriggerRegistry {
        &self.triggers
    }

    /// Creature an equipment is attached to.
    #[must_use]
    pub fn attached_to(&self, equipment: EntityId) -> Option<EntityId> {
        self.attachments.get(&equipment).copied()
    }

    /// Equipment attached to a creature, in entity order.
    #[must_use]
    pub fn equipment_on(&self, creature: EntityId) -> Vec<EntityId> {
        let mut equipment: Vec<EntityId> = self
            .attachments
            .iter()
            .filter(|(_, &c)| c == creature)
            .map(|(&e, _)| e)
            .collect();
        equipment.sort();
        equipment
    }

    /// Lands on the battlefield, tapped or not.
    #[must_use]
    pub fn land_count(&self) -> usize {
        self.zones.len(ZoneKind::UntappedLands) + self.zones.len(ZoneKind::TappedLands)
    }

    /// Whether every card is in exactly one zone and agrees with it.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.zones.is_consistent()
            && self.zones.total_cards() == self.cards.len()
            && self
                .cards
                .values()
                .all(|c| self.zones.zone_of(c.entity_id) == Some(c.zone))
    }

    // === Zone primitives ===

    /// Draw up to `n` cards from the front of the library.
    ///
    /// Stops early when the library runs out; that is not an error.
    pub fn draw_cards(&mut self, n: usize) -> Vec<EntityId> {
        let mut drawn = Vec::with_capacity(n);
        for _ in 0..n {
            let Some(top) = self.zones.front(ZoneKind::Library) else {
                debug!(requested = n, drawn = drawn.len(), "library exhausted");
                break;
            };
            if self
                .move_card(top, ZoneKind::Library, ZoneKind::Hand)
                .is_ok()
            {
                drawn.push(top);
            }
        }
        self.cards_drawn += drawn.len() as u32;
        drawn
    }

    /// Move a card from `from` to the back of `to`.
    pub fn move_card(&mut self, entity: EntityId, from: ZoneKind, to: ZoneKind) -> EngineResult<()> {
        self.move_card_at(entity, from, to, ZonePosition::Back)
    }

    /// Move a card, choosing where it lands in `to`.
    #[instrument(level = Level::DEBUG, skip(self))]
    pub fn move_card_at(
        &mut self,
        entity: EntityId,
        from: ZoneKind,
        to: ZoneKind,
        position: ZonePosition,
    ) -> EngineResult<()> {
        self.zones.move_card(entity, from, to, position)?;

        let leaving = from.is_battlefield() && !to.is_battlefield();
        let entering = !from.is_battlefield() && to.is_battlefield();

        if let Some(card) = self.cards.get_mut(&entity) {
            card.zone = to;
            if to.is_land_zone() {
                card.tapped = to == ZoneKind::TappedLands;
            }
        }

        if leaving {
            self.on_leave_battlefield(entity);
        }
        if entering {
            self.on_enter_battlefield(entity, to);
        }
        Ok(())
    }

    /// Put a card into the graveyard from `from`.
    ///
    /// The leader goes back to its holding zone instead. Returns the zone
    /// the card ended up in.
    pub fn move_to_graveyard(&mut self, entity: EntityId, from: ZoneKind) -> EngineResult<ZoneKind> {
        let to = if self.cards.get(&entity).is_some_and(|c| c.is_leader) {
            ZoneKind::Leader
        } else {
            ZoneKind::Graveyard
        };
        self.move_card(entity, from, to)?;
        Ok(to)
    }

    /// Move a card onto the battlefield without resolving anything.
    pub fn move_to_battlefield(&mut self, entity: EntityId, from: ZoneKind, to: ZoneKind) -> EngineResult<()> {
        if !to.is_battlefield() {
            return Err(EngineError::NotOnBattlefield(entity));
        }
        self.move_card(entity, from, to)
    }

    pub fn shuffle_library(&mut self) {
        self.zones.shuffle_zone(ZoneKind::Library, &mut self.rng);
    }

    /// Tap a permanent. Lands move to the tapped-lands zone.
    pub(crate) fn tap(&mut self, entity: EntityId) -> EngineResult<()> {
        match self.zones.zone_of(entity) {
            Some(ZoneKind::UntappedLands) => {
                self.move_card(entity, ZoneKind::UntappedLands, ZoneKind::TappedLands)
            }
            Some(zone) if zone.is_battlefield() => {
                if let Some(card) = self.cards.get_mut(&entity) {
                    card.tapped = true;
                }
                Ok(())
            }
            _ => Err(EngineError::NotOnBattlefield(entity)),
        }
    }

    fn on_enter_battlefield(&mut self, entity: EntityId, zone: ZoneKind) {
        let turn = self.turn;
        let Some(card) = self.cards.get_mut(&entity) else {
            return;
        };
        card.entered_turn = Some(turn);
        if !zone.is_land_zone() {
            card.tapped = false;
        }
        if zone == ZoneKind::Planeswalkers {
            if let Some(loyalty) = card.def.loyalty {
                card.add_counters(LOYALTY, loyalty);
            }
        }
        let def = card.def.clone();
        self.triggers.register_source(entity, &def);
        debug!(%entity, name = %def.name, %zone, "entered the battlefield");
    }

    fn on_leave_battlefield(&mut self, entity: EntityId) {
        self.triggers.remove_for_source(entity);
        self.combat.attackers.retain(|&a| a != entity);
        if self.combat.last_damaged == Some(entity) {
            self.combat.last_damaged = None;
        }
        self.detach_all(entity);

        let is_token = match self.cards.get_mut(&entity) {
            Some(card) => {
                card.reset_battlefield_state();
                card.is_token
            }
            None => false,
        };
        if is_token {
            self.zones.remove(entity);
            self.cards.remove(&entity);
            debug!(%entity, "token ceased to exist");
        }
    }

    // === Turn structure ===

    /// Start the next turn.
    ///
    /// Untaps everything, clears marked damage and per-turn counters, and
    /// rebuilds the pool from untapped mana producers.
    #[instrument(level = Level::DEBUG, skip(self))]
    pub fn begin_turn(&mut self) {
        self.turn += 1;

        let tapped: Vec<EntityId> = self.zones.cards(ZoneKind::TappedLands).to_vec();
        for land in tapped {
            // Both zones are on the battlefield, so this only relocates.
            let _ = self.move_card(land, ZoneKind::TappedLands, ZoneKind::UntappedLands);
        }
        for id in self.zones.battlefield() {
            if let Some(card) = self.cards.get_mut(&id) {
                card.tapped = false;
                card.damage = 0;
            }
        }

        self.plays_this_turn = 0;
        self.lands_played_this_turn = 0;
        self.casts_this_turn.clear();
        self.rebuild_pool();

        debug!(turn = self.turn, pool = %self.pool, "turn started");
    }

    /// Refill the pool from untapped permanents whose mana is free.
    ///
    /// Lands count when they are plain mana lands; other permanents count
    /// when they produce mana and have no activated abilities.
    pub fn rebuild_pool(&mut self) {
        self.pool.clear();
        for id in self.zones.battlefield() {
            let Some(card) = self.cards.get(&id) else {
                continue;
            };
            if card.tapped || !Self::produces_free_mana(&card.def) {
                continue;
            }
            for unit in &card.def.produces {
                self.pool.add(unit.clone());
            }
        }
    }

    pub(crate) fn produces_free_mana(def: &CardDefinition) -> bool {
        if def.is_land() {
            def.is_plain_mana_land()
        } else {
            !def.produces.is_empty() && def.activated.is_empty()
        }
    }

    // === Bookkeeping ===

    /// Record a paid cast.
    pub(crate) fn record_cast(&mut self, entity: EntityId) {
        self.plays_this_turn += 1;
        self.total_plays += 1;
        self.casts_this_turn.push(entity);
        self.log_play(entity);
    }

    pub(crate) fn log_play(&mut self, entity: EntityId) {
        let name = self
            .cards
            .get(&entity)
            .map(|c| c.name().to_string())
            .unwrap_or_default();
        self.play_log.push_back(PlayRecord {
            turn: self.turn,
            entity,
            name,
        });
    }

    /// Deal damage to the absent opponent.
    pub fn damage_opponent(&mut self, amount: i64) {
        self.damage_dealt += amount;
        self.opponent_life -= amount;
    }

    /// Battlefield zone a non-land permanent of `def` enters.
    ///
    /// A leader enters as a creature when it has power, otherwise as a
    /// planeswalker.
    #[must_use]
    pub fn permanent_zone(def: &CardDefinition) -> Option<ZoneKind> {
        match def.category {
            Category::Leader if def.power.is_some() => Some(ZoneKind::Creatures),
            Category::Leader => Some(ZoneKind::Planeswalkers),
            Category::Land | Category::Instant | Category::Sorcery => None,
            other => other.battlefield_zone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mana::{ManaSymbol, ManaUnit};

    fn catalog() -> CardCatalog {
        let mut catalog = CardCatalog::new();
        catalog.register(
            CardDefinition::new("Forest", Category::Land)
                .basic()
                .producing(ManaUnit::single(ManaSymbol::Green)),
        );
        catalog.register(CardDefinition::new("Bear", Category::Creature).with_cost("1G").with_stats(2, 2));
        catalog.register(
            CardDefinition::new("Boss", Category::Leader)
                .with_cost("2G")
                .with_stats(3, 3)
                .legendary(),
        );
        catalog
    }

    fn board() -> BoardState {
        let deck = DeckList::new()
            .with_leader("Boss")
            .with_card("Forest", 5)
            .with_card("Bear", 5);
        BoardState::new(&catalog(), &deck, SimConfig::new(), GameRng::new(7)).unwrap()
    }

    #[test]
    fn test_new_board() {
        let board = board();
        assert_eq!(board.library().len(), 10);
        assert!(board.hand().is_empty());
        assert_eq!(board.cards_in(ZoneKind::Leader).len(), 1);
        assert_eq!(board.life, 40);
        assert_eq!(board.turn, 0);
        assert!(board.is_consistent());
    }

    #[test]
    fn test_unknown_card() {
        let deck = DeckList::new().with_card("Nope", 1);
        let err = BoardState::new(&catalog(), &deck, SimConfig::new(), GameRng::new(1)).unwrap_err();
        assert_eq!(err, EngineError::UnknownCard("Nope".to_string()));
    }

    #[test]
    fn test_draw_stops_at_empty_library() {
        let mut board = board();
        let first = board.library()[0];
        let drawn = board.draw_cards(3);
        assert_eq!(drawn[0], first);
        assert_eq!(board.hand(), drawn.as_slice());

        let rest = board.draw_cards(20);
        assert_eq!(rest.len(), 7);
        assert!(board.library().is_empty());
        assert_eq!(board.cards_drawn, 10);
        assert!(board.draw_cards(1).is_empty());
    }

    #[test]
    fn test_move_from_wrong_zone_fails() {
        let mut board = board();
        let card = board.library()[0];
        let err = board.move_card(card, ZoneKind::Hand, ZoneKind::Graveyard).unwrap_err();
        assert_eq!(
            err,
            EngineError::CardNotInExpectedZone {
                card,
                expected: ZoneKind::Hand,
            }
        );
        assert_eq!(board.zone_of(card), Some(ZoneKind::Library));
    }

    #[test]
    fn test_leader_returns_to_leader_zone() {
        let mut board = board();
        let leader = board.leader().unwrap();
        board
            .move_to_battlefield(leader, ZoneKind::Leader, ZoneKind::Creatures)
            .unwrap();
        assert_eq!(board.card(leader).unwrap().entered_turn, Some(0));

        let to = board.move_to_graveyard(leader, ZoneKind::Creatures).unwrap();
        assert_eq!(to, ZoneKind::Leader);
        assert!(board.is_consistent());
    }

    #[test]
    fn test_begin_turn_untaps_and_rebuilds_pool() {
        let mut board = board();
        let forest = board.find_in(ZoneKind::Library, "Forest").unwrap();
        board
            .move_to_battlefield(forest, ZoneKind::Library, ZoneKind::TappedLands)
            .unwrap();
        assert!(board.card(forest).unwrap().tapped);
        board.plays_this_turn = 3;

        board.begin_turn();
        assert_eq!(board.turn, 1);
        assert_eq!(board.zone_of(forest), Some(ZoneKind::UntappedLands));
        assert!(!board.card(forest).unwrap().tapped);
        assert_eq!(board.pool.len(), 1);
        assert_eq!(board.plays_this_turn, 0);
    }

    #[test]
    fn test_permanent_zone() {
        let boss = CardDefinition::new("Boss", Category::Leader).with_stats(3, 3);
        assert_eq!(BoardState::permanent_zone(&boss), Some(ZoneKind::Creatures));

        let walker = CardDefinition::new("Walker", Category::Leader).with_loyalty(4);
        assert_eq!(BoardState::permanent_zone(&walker), Some(ZoneKind::Planeswalkers));

        let bolt = CardDefinition::new("Bolt", Category::Instant);
        assert_eq!(BoardState::permanent_zone(&bolt), None);
    }
}
