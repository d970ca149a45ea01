//! Combat and equipment integration tests.
//!
//! Attack-trigger deduplication within a combat, the "another attacking
//! legendary" gate, equipment buffs and the attachment relation.

use std::sync::Arc;

use goldfish_engine::cards::{
    CardDefinition, Category, Keyword, StaticAbility, TriggerEvent, TriggerGate, TriggeredAbility,
};
use goldfish_engine::cast::CastRouter;
use goldfish_engine::core::{EngineError, GameRng, SimConfig};
use goldfish_engine::effects::Effect;
use goldfish_engine::mana::{ManaSymbol, ManaUnit};
use goldfish_engine::zones::ZoneKind;
use goldfish_engine::BoardState;
use pretty_assertions::assert_eq;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn board() -> BoardState {
    init_logging();
    let mut board = BoardState::empty(SimConfig::new(), GameRng::new(7));
    board.begin_turn();
    board
}

fn add_mana(board: &mut BoardState, symbol: ManaSymbol, count: u32) {
    board.pool.add_many(&ManaUnit::single(symbol), count);
}

fn raider(name: &str) -> CardDefinition {
    CardDefinition::new(name, Category::Creature)
        .with_stats(2, 2)
        .with_trigger(TriggeredAbility::new(TriggerEvent::Attack).with_effect(Effect::DamageOpponent(1)))
}

fn ally(name: &str) -> CardDefinition {
    CardDefinition::new(name, Category::Creature)
        .with_cost("1W")
        .with_stats(2, 2)
        .legendary()
        .with_subtype("Ally")
        .with_trigger(
            TriggeredAbility::new(TriggerEvent::Attack)
                .with_gate(TriggerGate::AnotherAttackingLegendary)
                .with_effect(Effect::GainLife(3)),
        )
}

#[test]
fn test_repeated_declarations_fire_each_ability_once() {
    let mut board = board();
    let a = board.add_card(Arc::new(raider("Raider A")), ZoneKind::Creatures);
    let b = board.add_card(Arc::new(raider("Raider B")), ZoneKind::Creatures);

    assert_eq!(board.attack(a).unwrap(), 1);
    assert_eq!(board.attack(b).unwrap(), 1);
    assert_eq!(board.attack(a).unwrap(), 0);
    assert_eq!(board.attack(b).unwrap(), 0);

    assert_eq!(board.damage_dealt, 2);
    assert_eq!(board.attackers(), &[a, b]);
    assert_eq!(board.combat().fired.len(), 2);
}

#[test]
fn test_ally_gate_waits_for_second_legendary() {
    let mut board = board();
    add_mana(&mut board, ManaSymbol::White, 4);

    let first = board.add_card(Arc::new(ally("Ally One")), ZoneKind::Hand);
    let second = board.add_card(Arc::new(ally("Ally Two")), ZoneKind::Hand);
    CastRouter::cast(&mut board, first).unwrap();
    CastRouter::cast(&mut board, second).unwrap();
    assert_eq!(board.life, 40);

    // Summoning sickness is the driver's concern; the board lets them attack.
    assert_eq!(board.attack(first).unwrap(), 0);
    assert_eq!(board.life, 40);

    // The second legendary attacker opens both gates.
    assert_eq!(board.attack(second).unwrap(), 2);
    assert_eq!(board.life, 46);

    assert_eq!(board.attack(first).unwrap(), 0);
    assert_eq!(board.life, 46);
}

#[test]
fn test_ally_gate_ignores_nonlegendary_partner() {
    let mut board = board();
    let ally = board.add_card(Arc::new(ally("Ally One")), ZoneKind::Creatures);
    let grunt = board.add_card(
        Arc::new(CardDefinition::new("Grunt", Category::Creature).with_stats(1, 1)),
        ZoneKind::Creatures,
    );

    board.attack(ally).unwrap();
    assert_eq!(board.attack(grunt).unwrap(), 0);
    assert_eq!(board.life, 40);
}

#[test]
fn test_new_turn_starts_new_combat() {
    let mut board = board();
    let a = board.add_card(Arc::new(raider("Raider")), ZoneKind::Creatures);
    board.attack(a).unwrap();
    board.begin_turn();

    assert_eq!(board.attack(a).unwrap(), 1);
    assert_eq!(board.combat().combat_turn, Some(2));
    assert_eq!(board.damage_dealt, 2);
}

fn sword() -> CardDefinition {
    CardDefinition::new("Sword of Haste", Category::Artifact)
        .with_cost("2")
        .with_equip_cost("2")
        .with_static(StaticAbility::EquippedBuff { power: 2, toughness: 2 })
        .with_static(StaticAbility::EquippedGrants(Keyword::Haste))
        .with_trigger(TriggeredAbility::new(TriggerEvent::Equip).with_effect(Effect::draw(1)))
}

#[test]
fn test_equip_buffs_grants_and_triggers() {
    let mut board = board();
    add_mana(&mut board, ManaSymbol::Colorless, 2);
    board.add_card(Arc::new(CardDefinition::new("Card", Category::Sorcery)), ZoneKind::Library);

    let sword = board.add_card(Arc::new(sword()), ZoneKind::Artifacts);
    let bear = board.add_card(
        Arc::new(CardDefinition::new("Bear", Category::Creature).with_stats(2, 2)),
        ZoneKind::Creatures,
    );

    board.equip(sword, bear).unwrap();
    let bear_card = board.card(bear).unwrap();
    assert_eq!(bear_card.power(), Some(4));
    assert_eq!(bear_card.toughness(), Some(4));
    assert!(bear_card.has_keyword(Keyword::Haste));
    assert_eq!(board.attached_to(sword), Some(bear));
    assert_eq!(board.hand().len(), 1);
    assert!(board.pool.is_empty());
    assert_eq!(board.mana_spent, 2);
}

#[test]
fn test_equip_moves_buff_between_creatures() {
    let mut board = board();
    add_mana(&mut board, ManaSymbol::Colorless, 4);
    let sword = board.add_card(Arc::new(sword()), ZoneKind::Artifacts);
    let bear_def = Arc::new(CardDefinition::new("Bear", Category::Creature).with_stats(2, 2));
    let first = board.add_card(bear_def.clone(), ZoneKind::Creatures);
    let second = board.add_card(bear_def, ZoneKind::Creatures);

    board.equip(sword, first).unwrap();
    board.equip(sword, second).unwrap();

    assert_eq!(board.card(first).unwrap().power(), Some(2));
    assert!(!board.card(first).unwrap().has_keyword(Keyword::Haste));
    assert_eq!(board.card(second).unwrap().power(), Some(4));
    assert_eq!(board.equipment_on(second), vec![sword]);
    assert!(board.equipment_on(first).is_empty());
}

#[test]
fn test_equip_unpaid_leaves_board_unchanged() {
    let mut board = board();
    add_mana(&mut board, ManaSymbol::Colorless, 1);
    let sword = board.add_card(Arc::new(sword()), ZoneKind::Artifacts);
    let bear = board.add_card(
        Arc::new(CardDefinition::new("Bear", Category::Creature).with_stats(2, 2)),
        ZoneKind::Creatures,
    );

    assert_eq!(board.equip(sword, bear).unwrap_err(), EngineError::InsufficientMana);
    assert_eq!(board.attached_to(sword), None);
    assert_eq!(board.pool.len(), 1);
    assert_eq!(board.card(bear).unwrap().power(), Some(2));
}

#[test]
fn test_dead_creature_drops_attachment() {
    let mut board = board();
    add_mana(&mut board, ManaSymbol::Colorless, 2);
    let sword = board.add_card(Arc::new(sword()), ZoneKind::Artifacts);
    let bear = board.add_card(
        Arc::new(CardDefinition::new("Bear", Category::Creature).with_stats(2, 2)),
        ZoneKind::Creatures,
    );
    board.equip(sword, bear).unwrap();

    board.deal_damage(bear, 4).unwrap();
    assert_eq!(board.zone_of(bear), Some(ZoneKind::Graveyard));
    assert_eq!(board.attached_to(sword), None);
    assert_eq!(board.card(bear).unwrap().power(), Some(2));
    assert_eq!(board.zone_of(sword), Some(ZoneKind::Artifacts));
}
