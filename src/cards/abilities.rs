//! Structured abilities.
//!
//! Abilities arrive already structured from the card data supplier. The
//! engine never reads rules text to decide behaviour; it only consumes
//! these values.

use serde::{Deserialize, Serialize};

use super::attributes::Keyword;
use crate::effects::Effect;
use crate::mana::ManaCost;

/// Events a triggered ability can listen for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerEvent {
    /// The source entered the battlefield.
    Etb,
    /// The source was declared as an attacker.
    Attack,
    /// A land entered the battlefield under our control.
    Landfall,
    /// The source (an equipment) became attached.
    Equip,
    /// A creature was dealt damage.
    Damage,
}

impl std::fmt::Display for TriggerEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TriggerEvent::Etb => "etb",
            TriggerEvent::Attack => "attack",
            TriggerEvent::Landfall => "landfall",
            TriggerEvent::Equip => "equip",
            TriggerEvent::Damage => "damage",
        };
        f.write_str(name)
    }
}

/// Extra condition checked when a trigger's event fires.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerGate {
    #[default]
    Always,
    /// The source must have haste.
    RequiresHaste,
    /// A different legendary creature must also be attacking.
    AnotherAttackingLegendary,
    /// The damaged creature must be the source itself.
    SelfDamaged,
}

/// Index of a triggered ability in its card's declaration list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AbilityId(pub u16);

/// A triggered ability.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggeredAbility {
    pub event: TriggerEvent,

    #[serde(default)]
    pub gate: TriggerGate,

    pub effects: Vec<Effect>,
}

impl TriggeredAbility {
    #[must_use]
    pub fn new(event: TriggerEvent) -> Self {
        Self {
            event,
            gate: TriggerGate::Always,
            effects: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_gate(mut self, gate: TriggerGate) -> Self {
        self.gate = gate;
        self
    }

    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// An activated ability: pay a cost (and maybe tap) to resolve effects.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivatedAbility {
    #[serde(default)]
    pub cost: ManaCost,

    /// Tapping the source is part of the cost.
    #[serde(default)]
    pub tap: bool,

    pub effects: Vec<Effect>,
}

impl ActivatedAbility {
    #[must_use]
    pub fn new(cost: ManaCost, tap: bool) -> Self {
        Self {
            cost,
            tap,
            effects: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    /// A free tap ability whose only effects add mana.
    #[must_use]
    pub fn is_free_mana_ability(&self) -> bool {
        self.cost.is_free()
            && !self.effects.is_empty()
            && self.effects.iter().all(|e| matches!(e, Effect::AddMana { .. }))
    }
}

/// Continuous abilities.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaticAbility {
    /// Equipment: the equipped creature gets +power/+toughness.
    EquippedBuff { power: i32, toughness: i32 },

    /// Equipment: the equipped creature has a keyword.
    EquippedGrants(Keyword),

    /// Creature: has a keyword as long as it is equipped.
    KeywordWhileEquipped(Keyword),

    /// Creature: damage dealt to it is reduced by this amount.
    PreventDamage(i32),
}
