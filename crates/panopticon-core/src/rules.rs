//! The world rule engine: scheduled and state-triggered facility rules.
//!
//! Rules are the environment's side of the simulation -- meal service,
//! ration hand-outs, scarcity pressure. Each rule pairs a trigger (a set
//! of firing hours, or a predicate over world state) with an effect
//! closure that mutates the world and reports what it did as event
//! lines. Rules run in priority order, highest first, and a rule that
//! fails is isolated: it logs the fault and the rest still run.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use panopticon_types::enums::{CellKind, ItemKind, Role, RuleCategory};
use panopticon_types::structs::{Item, Position};
use panopticon_world::WorldState;
use tracing::{debug, warn};

/// How far from the cafeteria hunger pressure is measured.
const SCARCITY_WATCH_RANGE: u32 = 3;

/// How close an agent must be to feel the scarcity competition.
const SCARCITY_PRESSURE_RANGE: u32 = 2;

/// An effect failed while mutating the world.
#[derive(Debug, thiserror::Error)]
#[error("rule {rule_id} failed: {message}")]
pub struct RuleFault {
    /// The rule whose effect failed.
    pub rule_id: String,
    /// What went wrong.
    pub message: String,
}

/// When a rule fires.
pub enum RuleTrigger {
    /// Fires at minute 0 of each listed hour.
    AtHours(BTreeSet<u32>),
    /// Fires whenever the predicate holds.
    State(Box<dyn Fn(&WorldState) -> bool + Send + Sync>),
}

type RuleEffect = Box<dyn FnMut(&mut WorldState) -> Result<Vec<String>, RuleFault> + Send>;

/// A single facility rule.
pub struct WorldRule {
    /// Stable identifier, used for enable/disable and history.
    pub id: String,
    /// Human-readable summary.
    pub description: String,
    /// Grouping for status reporting.
    pub category: RuleCategory,
    /// Execution priority; higher runs first.
    pub priority: u32,
    /// Disabled rules are skipped entirely.
    pub enabled: bool,
    trigger: RuleTrigger,
    effect: RuleEffect,
}

impl core::fmt::Debug for WorldRule {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WorldRule")
            .field("id", &self.id)
            .field("category", &self.category)
            .field("priority", &self.priority)
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

impl WorldRule {
    /// Create a rule.
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        category: RuleCategory,
        priority: u32,
        trigger: RuleTrigger,
        effect: RuleEffect,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            category,
            priority,
            enabled: true,
            trigger,
            effect,
        }
    }

    fn is_triggered(&self, world: &WorldState) -> bool {
        match &self.trigger {
            RuleTrigger::AtHours(hours) => world.minute == 0 && hours.contains(&world.hour),
            RuleTrigger::State(predicate) => predicate(world),
        }
    }
}

/// One recorded rule execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleFiring {
    /// The rule that fired.
    pub rule_id: String,
    /// In-sim day of the firing.
    pub day: u32,
    /// In-sim hour of the firing.
    pub hour: u32,
    /// How many event lines the effect produced.
    pub events_count: usize,
    /// The rule's category.
    pub category: RuleCategory,
}

/// Aggregate rule status for operators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleStatus {
    /// Total registered rules.
    pub total: usize,
    /// Rules currently enabled.
    pub enabled: usize,
    /// Rule count per category.
    pub by_category: BTreeMap<RuleCategory, usize>,
    /// The most recent firings, newest last, capped at ten.
    pub recent_firings: Vec<RuleFiring>,
}

/// The registered rule set plus execution history.
#[derive(Debug, Default)]
pub struct RuleBook {
    rules: Vec<WorldRule>,
    history: Vec<RuleFiring>,
}

impl RuleBook {
    /// An empty rule book.
    pub fn new() -> Self {
        Self::default()
    }

    /// The rule book with the three standard facility rules.
    pub fn with_default_rules() -> Self {
        let mut book = Self::new();
        book.register(cafeteria_food_supply_rule());
        book.register(guard_food_distribution_rule());
        book.register(food_scarcity_rule());
        book
    }

    /// Register a rule.
    pub fn register(&mut self, rule: WorldRule) {
        self.rules.push(rule);
    }

    /// Run every enabled, triggered rule against the world, highest
    /// priority first. Returns the event lines produced this pass; the
    /// same lines are appended to the world event log.
    pub fn execute_rules(&mut self, world: &mut WorldState) -> Vec<String> {
        let mut order: Vec<usize> = (0..self.rules.len())
            .filter(|index| self.rules[*index].enabled)
            .collect();
        order.sort_by(|a, b| self.rules[*b].priority.cmp(&self.rules[*a].priority));

        let mut all_events = Vec::new();
        for index in order {
            let rule = &mut self.rules[index];
            if !rule.is_triggered(world) {
                continue;
            }
            match (rule.effect)(world) {
                Ok(events) => {
                    debug!(rule = %rule.id, events = events.len(), "Rule fired");
                    self.history.push(RuleFiring {
                        rule_id: rule.id.clone(),
                        day: world.day,
                        hour: world.hour,
                        events_count: events.len(),
                        category: rule.category,
                    });
                    for line in &events {
                        world.log(line.clone());
                    }
                    all_events.extend(events);
                }
                Err(fault) => {
                    // One bad rule must not take down the pass.
                    warn!(rule = %rule.id, error = %fault, "Rule effect failed");
                }
            }
        }
        all_events
    }

    /// Enable a rule by id. Returns whether the rule exists.
    pub fn enable(&mut self, rule_id: &str) -> bool {
        self.set_enabled(rule_id, true)
    }

    /// Disable a rule by id. Returns whether the rule exists.
    pub fn disable(&mut self, rule_id: &str) -> bool {
        self.set_enabled(rule_id, false)
    }

    fn set_enabled(&mut self, rule_id: &str, enabled: bool) -> bool {
        match self.rules.iter_mut().find(|rule| rule.id == rule_id) {
            Some(rule) => {
                rule.enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// Aggregate status: counts, per-category totals, recent firings.
    pub fn status(&self) -> RuleStatus {
        let mut by_category = BTreeMap::new();
        for rule in &self.rules {
            *by_category.entry(rule.category).or_insert(0) += 1;
        }
        let recent_firings = self
            .history
            .iter()
            .rev()
            .take(10)
            .rev()
            .cloned()
            .collect();
        RuleStatus {
            total: self.rules.len(),
            enabled: self.rules.iter().filter(|rule| rule.enabled).count(),
            by_category,
            recent_firings,
        }
    }

    /// Full firing history, oldest first.
    pub fn history(&self) -> &[RuleFiring] {
        &self.history
    }
}

// ---------------------------------------------------------------------------
// Default rules
// ---------------------------------------------------------------------------

/// Meals stocked per service hour: (food, water) before scarcity.
const MEAL_TIMES: [(u32, u32, u32); 5] = [
    (7, 8, 6),
    (12, 10, 8),
    (15, 4, 3),
    (18, 10, 8),
    (21, 3, 2),
];

/// Portion of the nominal stock that actually arrives, in percent.
const SCARCITY_FACTOR_PCT: u32 = 80;

/// Cafeteria restocking: clears leftovers and lays out the meal for the
/// current service hour, reduced by the scarcity factor.
fn cafeteria_food_supply_rule() -> WorldRule {
    let hours = MEAL_TIMES.iter().map(|(hour, _, _)| *hour).collect();
    WorldRule::new(
        "cafeteria_food_supply",
        "Stocks the cafeteria at meal times, short of demand",
        RuleCategory::Temporal,
        9,
        RuleTrigger::AtHours(hours),
        Box::new(|world| {
            let Some(cafeteria) = world.map.find_cell(CellKind::Cafeteria) else {
                return Err(RuleFault {
                    rule_id: String::from("cafeteria_food_supply"),
                    message: String::from("no cafeteria cell on the map"),
                });
            };
            let Some((_, food, water)) =
                MEAL_TIMES.iter().find(|(hour, _, _)| *hour == world.hour)
            else {
                return Ok(Vec::new());
            };

            // Leftovers do not accumulate between services.
            while world.map.take_item_of_kind(cafeteria, ItemKind::Food).is_some() {}
            while world.map.take_item_of_kind(cafeteria, ItemKind::Water).is_some() {}

            let food_count = scarce(*food);
            let water_count = scarce(*water);
            for _ in 0..food_count {
                let _ = world.map.place_item(
                    cafeteria,
                    Item::new("Prison Food", "Basic cafeteria meal", ItemKind::Food),
                );
            }
            for _ in 0..water_count {
                let _ = world.map.place_item(
                    cafeteria,
                    Item::new("Water", "Clean drinking water", ItemKind::Water),
                );
            }

            let prisoners = world
                .agents
                .values()
                .filter(|agent| agent.is_alive() && agent.role == Role::Prisoner)
                .count();
            let mut events = vec![format!(
                "Cafeteria stocked: {food_count} meals, {water_count} water for {prisoners} prisoners"
            )];
            if (food_count as usize) < prisoners {
                events.push(String::from("There is not enough food for everyone"));
            }
            Ok(events)
        }),
    )
}

/// Apply the scarcity factor with a floor of one.
const fn scarce(nominal: u32) -> u32 {
    let reduced = nominal * SCARCITY_FACTOR_PCT / 100;
    if reduced == 0 { 1 } else { reduced }
}

/// Ration hand-out: every guard receives food and water to distribute at
/// fixed hours.
fn guard_food_distribution_rule() -> WorldRule {
    WorldRule::new(
        "guard_food_distribution",
        "Issues distribution rations to every guard",
        RuleCategory::Temporal,
        8,
        RuleTrigger::AtHours(BTreeSet::from([8, 12, 16, 20])),
        Box::new(|world| {
            let (day, hour) = (world.day, world.hour);
            let mut events = Vec::new();
            for agent in world.agents.values_mut() {
                if !agent.is_alive() || agent.role != Role::Guard {
                    continue;
                }
                for _ in 0..2 {
                    agent.inventory.push(Item::new(
                        "Food Ration",
                        "A sealed ration for distribution",
                        ItemKind::Food,
                    ));
                    agent.inventory.push(Item::new(
                        "Water Ration",
                        "A sealed cup of water",
                        ItemKind::Water,
                    ));
                }
                agent.remember(day, hour, "Received food and water rations to distribute");
                events.push(format!("{} received distribution rations", agent.name));
            }
            Ok(events)
        }),
    )
}

/// Scarcity pressure: when hungry prisoners crowd a near-empty
/// cafeteria, the ones closest feel the competition.
fn food_scarcity_rule() -> WorldRule {
    WorldRule::new(
        "food_scarcity",
        "Raises competition when hungry prisoners outnumber the food",
        RuleCategory::Resource,
        6,
        RuleTrigger::State(Box::new(|world| {
            let Some(cafeteria) = world.map.find_cell(CellKind::Cafeteria) else {
                return false;
            };
            hungry_prisoners_near(world, cafeteria, SCARCITY_WATCH_RANGE, 50) >= 3
        })),
        Box::new(|world| {
            let Some(cafeteria) = world.map.find_cell(CellKind::Cafeteria) else {
                return Ok(Vec::new());
            };
            let remaining = world.map.count_items_of_kind(cafeteria, ItemKind::Food);
            if remaining > 2 {
                return Ok(Vec::new());
            }
            let (day, hour) = (world.day, world.hour);
            let mut pressured = 0_u32;
            for agent in world.agents.values_mut() {
                if agent.is_alive()
                    && agent.role == Role::Prisoner
                    && agent.hunger > 60
                    && agent.position.manhattan_distance(cafeteria) <= SCARCITY_PRESSURE_RANGE
                {
                    agent.remember(
                        day,
                        hour,
                        "The food supply is running low; competition is growing",
                    );
                    pressured += 1;
                }
            }
            if pressured == 0 {
                Ok(Vec::new())
            } else {
                Ok(vec![format!(
                    "Food scarcity near the cafeteria: {pressured} prisoners feel the pressure"
                )])
            }
        }),
    )
}

fn hungry_prisoners_near(
    world: &WorldState,
    origin: Position,
    range: u32,
    hunger_above: u32,
) -> usize {
    world
        .agents
        .values()
        .filter(|agent| {
            agent.is_alive()
                && agent.role == Role::Prisoner
                && agent.hunger > hunger_above
                && agent.position.manhattan_distance(origin) <= range
        })
        .count()
}
