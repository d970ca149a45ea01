//! Card definitions - static card data.
//!
//! `CardDefinition` holds the immutable properties of a card as supplied by
//! the card data source. Boards share definitions through `Arc` and never
//! mutate them; everything that changes during a game (tapped, damage,
//! counters, buffs) lives on `CardInstance`.

use serde::{Deserialize, Serialize};

use super::abilities::{ActivatedAbility, StaticAbility, TriggerEvent, TriggeredAbility};
use super::attributes::{Category, Keyword, KeywordSet};
use crate::effects::Effect;
use crate::mana::{parse_cost, ManaCost, ManaUnit};

/// Rules deciding whether a land enters tapped.
///
/// Categories are checked in priority order and only the first one the land
/// declares applies:
///
/// 1. `always_tapped`
/// 2. `controls_any` - untapped iff we control a permanent with one of the names
/// 3. `basic_lands` - untapped iff we control at least N basic lands
/// 4. `lands` - untapped iff we control at least N lands
/// 5. `reveal` - untapped iff the hand holds a matching card
/// 6. otherwise untapped unless the card's `enters_tapped` flag is set
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UntapRules {
    pub always_tapped: bool,
    pub controls_any: Vec<String>,
    pub basic_lands: Option<u32>,
    pub lands: Option<u32>,
    pub reveal: Option<CardFilter>,
}

impl UntapRules {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == UntapRules::default()
    }
}

/// What a fetch land searches for.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchSpec {
    pub basic_only: bool,
    /// Land subtypes accepted; empty accepts any land.
    pub types: Vec<String>,
    pub force_tapped: bool,
}

/// Filter over card definitions, used by searches and reveal rules.
///
/// Every populated field must match. Names and subtypes compare
/// case-insensitively; `subtypes` matches if any listed subtype is present.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardFilter {
    pub category: Option<Category>,
    pub names: Vec<String>,
    pub subtypes: Vec<String>,
    pub basic_only: bool,
    pub max_mana_value: Option<u32>,
}

impl CardFilter {
    #[must_use]
    pub fn category(category: Category) -> Self {
        Self {
            category: Some(category),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_subtype(mut self, subtype: impl Into<String>) -> Self {
        self.subtypes.push(subtype.into());
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.names.push(name.into());
        self
    }

    #[must_use]
    pub fn matches(&self, def: &CardDefinition) -> bool {
        if self.category.is_some_and(|c| c != def.category) {
            return false;
        }
        if self.basic_only && !def.basic {
            return false;
        }
        if !self.names.is_empty() && !self.names.iter().any(|n| n.eq_ignore_ascii_case(&def.name)) {
            return false;
        }
        if !self.subtypes.is_empty() && !self.subtypes.iter().any(|t| def.has_subtype(t)) {
            return false;
        }
        if self.max_mana_value.is_some_and(|max| def.cost.mana_value() > max) {
            return false;
        }
        true
    }
}

/// Static card definition.
///
/// ```
/// use goldfish_engine::cards::{CardDefinition, Category};
/// use goldfish_engine::mana::{ManaSymbol, ManaUnit};
///
/// let forest = CardDefinition::new("Forest", Category::Land)
///     .basic()
///     .with_subtype("Forest")
///     .producing(ManaUnit::single(ManaSymbol::Green));
///
/// assert!(forest.is_plain_mana_land());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDefinition {
    pub name: String,

    pub category: Category,

    #[serde(default)]
    pub cost: ManaCost,

    #[serde(default)]
    pub power: Option<i32>,

    #[serde(default)]
    pub toughness: Option<i32>,

    /// Starting loyalty for planeswalkers.
    #[serde(default)]
    pub loyalty: Option<i32>,

    #[serde(default)]
    pub legendary: bool,

    #[serde(default)]
    pub basic: bool,

    #[serde(default)]
    pub subtypes: Vec<String>,

    #[serde(default)]
    pub keywords: KeywordSet,

    /// Mana added on entry (lands) or at untap (mana rocks), one unit each.
    #[serde(default)]
    pub produces: Vec<ManaUnit>,

    #[serde(default)]
    pub enters_tapped: bool,

    #[serde(default)]
    pub untap: UntapRules,

    #[serde(default)]
    pub fetch: Option<FetchSpec>,

    #[serde(default)]
    pub equip_cost: Option<ManaCost>,

    #[serde(default)]
    pub triggered: Vec<TriggeredAbility>,

    #[serde(default)]
    pub activated: Vec<ActivatedAbility>,

    #[serde(default)]
    pub statics: Vec<StaticAbility>,

    /// One-shot effects of an instant or sorcery, applied in order.
    #[serde(default)]
    pub spell_effects: Vec<Effect>,

    /// Rules text, used only to infer search destinations when the
    /// structured data leaves them open.
    #[serde(default)]
    pub oracle_text: String,
}

impl CardDefinition {
    /// Create a definition with no cost, stats or abilities.
    #[must_use]
    pub fn new(name: impl Into<String>, category: Category) -> Self {
        Self {
            name: name.into(),
            category,
            cost: ManaCost::free(),
            power: None,
            toughness: None,
            loyalty: None,
            legendary: false,
            basic: false,
            subtypes: Vec::new(),
            keywords: KeywordSet::new(),
            produces: Vec::new(),
            enters_tapped: false,
            untap: UntapRules::default(),
            fetch: None,
            equip_cost: None,
            triggered: Vec::new(),
            activated: Vec::new(),
            statics: Vec::new(),
            spell_effects: Vec::new(),
            oracle_text: String::new(),
        }
    }

    /// Set the cost from an expression.
    ///
    /// Panics on a malformed expression: definitions built in code are
    /// programmer input. Catalog data goes through serde and is validated
    /// on load instead.
    #[must_use]
    pub fn with_cost(mut self, expr: &str) -> Self {
        self.cost = parse_cost(expr).unwrap_or_else(|err| panic!("{}", err));
        self
    }

    #[must_use]
    pub fn with_stats(mut self, power: i32, toughness: i32) -> Self {
        self.power = Some(power);
        self.toughness = Some(toughness);
        self
    }

    #[must_use]
    pub fn with_loyalty(mut self, loyalty: i32) -> Self {
        self.loyalty = Some(loyalty);
        self
    }

    #[must_use]
    pub fn legendary(mut self) -> Self {
        self.legendary = true;
        self
    }

    #[must_use]
    pub fn basic(mut self) -> Self {
        self.basic = true;
        self
    }

    #[must_use]
    pub fn with_subtype(mut self, subtype: impl Into<String>) -> Self {
        self.subtypes.push(subtype.into());
        self
    }

    #[must_use]
    pub fn with_keyword(mut self, keyword: Keyword) -> Self {
        self.keywords.insert(keyword);
        self
    }

    #[must_use]
    pub fn producing(mut self, unit: ManaUnit) -> Self {
        self.produces.push(unit);
        self
    }

    #[must_use]
    pub fn enters_tapped(mut self) -> Self {
        self.enters_tapped = true;
        self
    }

    #[must_use]
    pub fn with_untap_rules(mut self, rules: UntapRules) -> Self {
        self.untap = rules;
        self
    }

    #[must_use]
    pub fn with_fetch(mut self, fetch: FetchSpec) -> Self {
        self.fetch = Some(fetch);
        self
    }

    /// Set the equip cost. Panics on a malformed expression, like `with_cost`.
    #[must_use]
    pub fn with_equip_cost(mut self, expr: &str) -> Self {
        self.equip_cost = Some(parse_cost(expr).unwrap_or_else(|err| panic!("{}", err)));
        self
    }

    #[must_use]
    pub fn with_trigger(mut self, ability: TriggeredAbility) -> Self {
        self.triggered.push(ability);
        self
    }

    #[must_use]
    pub fn with_activated(mut self, ability: ActivatedAbility) -> Self {
        self.activated.push(ability);
        self
    }

    #[must_use]
    pub fn with_static(mut self, ability: StaticAbility) -> Self {
        self.statics.push(ability);
        self
    }

    #[must_use]
    pub fn with_spell_effect(mut self, effect: Effect) -> Self {
        self.spell_effects.push(effect);
        self
    }

    #[must_use]
    pub fn with_oracle_text(mut self, text: impl Into<String>) -> Self {
        self.oracle_text = text.into();
        self
    }

    // === Queries ===

    #[must_use]
    pub fn has_subtype(&self, subtype: &str) -> bool {
        self.subtypes.iter().any(|s| s.eq_ignore_ascii_case(subtype))
    }

    #[must_use]
    pub fn is_land(&self) -> bool {
        self.category == Category::Land
    }

    #[must_use]
    pub fn is_creature(&self) -> bool {
        self.power.is_some() && matches!(self.category, Category::Creature | Category::Leader)
    }

    #[must_use]
    pub fn is_equipment(&self) -> bool {
        self.equip_cost.is_some()
    }

    /// A land that taps for its `produces` list on entry: no activated
    /// abilities and no fetch behaviour.
    #[must_use]
    pub fn is_plain_mana_land(&self) -> bool {
        self.is_land() && self.activated.is_empty() && self.fetch.is_none()
    }

    /// Triggered abilities for `event`, with their declaration index.
    pub fn triggers_for(&self, event: TriggerEvent) -> impl Iterator<Item = (usize, &TriggeredAbility)> {
        self.triggered
            .iter()
            .enumerate()
            .filter(move |(_, t)| t.event == event)
    }

    #[must_use]
    pub fn has_trigger(&self, event: TriggerEvent) -> bool {
        self.triggered.iter().any(|t| t.event == event)
    }

    /// Every effect the card carries: triggered, then activated, then spell.
    pub fn effects(&self) -> impl Iterator<Item = &Effect> {
        self.triggered
            .iter()
            .flat_map(|t| &t.effects)
            .chain(self.activated.iter().flat_map(|a| &a.effects))
            .chain(&self.spell_effects)
    }
}
