//! The tick cycle: one in-sim hour per tick, in four phases.
//!
//! 1. **Interventions** -- apply operator-queued world changes.
//! 2. **Status** -- advance the clock and decay every living agent's
//!    vitals (see [`clock`](crate::clock)).
//! 3. **Rules** -- run the world rule engine in priority order.
//! 4. **Actions** -- guards first, then prisoners, each spending action
//!    points until exhausted. Commands come from the decision source,
//!    falling back to the goal evaluator, then to a random legal action.
//!    A rejected command ends that agent's turn.
//!
//! Every executed action, death, and rule firing is appended to the
//! event sink. The cycle is deterministic given the same seed and
//! decision source outputs.

use panopticon_agents::fallback::random_fallback_command;
use panopticon_agents::goals::select_goal;
use panopticon_agents::actions::execute_command;
use panopticon_types::actions::{ActionCommand, ActionResult};
use panopticon_types::enums::EventKind;
use panopticon_types::ids::AgentId;
use panopticon_types::structs::{Objective, VITAL_MAX};
use panopticon_world::WorldState;
use rand::rngs::SmallRng;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::clock::advance_hour;
use crate::config::SimulationConfig;
use crate::decision::DecisionSource;
use crate::events::{EventError, EventRecord, EventSink};
use crate::operator::{Intervention, VitalKind};
use crate::rules::RuleBook;

/// Errors that can occur during tick execution.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// The event sink rejected a record.
    #[error("event error: {source}")]
    Event {
        /// The underlying sink error.
        #[from]
        source: EventError,
    },
}

/// The mutable simulation state passed through the tick cycle.
#[derive(Debug)]
pub struct SimulationState {
    /// The world being simulated.
    pub world: WorldState,
    /// The registered facility rules.
    pub rules: RuleBook,
    /// The loaded configuration.
    pub config: SimulationConfig,
    /// The single seeded RNG all in-tick randomness draws from.
    pub rng: SmallRng,
    /// Ticks executed so far.
    pub tick: u64,
}

/// Summary of a single tick's execution.
#[derive(Debug, Clone)]
pub struct TickSummary {
    /// The tick number that was executed (1-based).
    pub tick: u64,
    /// In-sim day after the tick.
    pub day: u32,
    /// In-sim hour after the tick.
    pub hour: u32,
    /// Number of living agents at end of tick.
    pub agents_alive: u32,
    /// Agents who died during this tick, from any cause.
    pub deaths: Vec<AgentId>,
    /// Event lines produced by the rule engine.
    pub rule_events: Vec<String>,
    /// Result of every attempted action, in execution order.
    pub action_results: Vec<ActionResult>,
}

/// Execute one complete tick of the simulation.
///
/// # Errors
///
/// Returns [`TickError`] if the event sink fails. Per-agent decision
/// faults are isolated: the agent falls through to goals and then to a
/// random action.
pub fn run_tick(
    state: &mut SimulationState,
    decision_source: &mut dyn DecisionSource,
    sink: &dyn EventSink,
    interventions: Vec<Intervention>,
) -> Result<TickSummary, TickError> {
    let SimulationState {
        world,
        rules,
        config,
        rng,
        tick,
    } = state;

    *tick += 1;
    let tick_number = *tick;

    // --- Phase 1: Interventions ---
    for intervention in interventions {
        apply_intervention(world, &intervention, sink)?;
    }

    // --- Phase 2: Status ---
    let advance = advance_hour(world, &config.status);
    let mut deaths = advance.deaths.clone();
    for agent_id in &advance.deaths {
        record_death(world, *agent_id, "hunger and thirst", sink)?;
    }

    info!(
        tick = tick_number,
        day = advance.day,
        hour = advance.hour,
        "Tick started"
    );

    // --- Phase 3: Rules ---
    let rule_events = rules.execute_rules(world);
    for line in &rule_events {
        sink.append(EventRecord::new(
            world.day,
            world.hour,
            EventKind::Rule,
            None,
            line.clone(),
            json!({}),
        ))?;
    }

    // --- Phase 4: Actions ---
    let mut action_results = Vec::new();
    world.last_decision_trace.clear();
    for agent_id in world.scheduled_agent_ids() {
        let alive = world
            .agents
            .get(&agent_id)
            .is_some_and(panopticon_types::structs::Agent::is_alive);
        if !alive {
            continue;
        }

        loop {
            let remaining = world
                .agents
                .get(&agent_id)
                .map_or(0, |agent| agent.action_points);
            if remaining == 0 {
                break;
            }

            let Some((command, trace)) = next_command(world, agent_id, decision_source, config, rng)
            else {
                break;
            };
            world.last_decision_trace.insert(agent_id, trace);

            let living_before: Vec<AgentId> = world
                .agents
                .values()
                .filter(|agent| agent.is_alive())
                .map(|agent| agent.id)
                .collect();

            match execute_command(world, agent_id, &command, &config.combat, rng) {
                Ok(report) => {
                    world.last_action_at_hours = world.clock_hours();
                    sink.append(EventRecord::new(
                        world.day,
                        world.hour,
                        report.event_kind,
                        Some(agent_id),
                        report.description.clone(),
                        report.details.clone(),
                    ))?;
                    action_results.push(ActionResult {
                        agent_id,
                        kind: command.kind,
                        success: true,
                        rejection: None,
                    });
                    // Pick up combat deaths.
                    for casualty in living_before {
                        let still_alive = world
                            .agents
                            .get(&casualty)
                            .is_some_and(panopticon_types::structs::Agent::is_alive);
                        if !still_alive {
                            deaths.push(casualty);
                            record_death(world, casualty, "injuries", sink)?;
                        }
                    }
                }
                Err(rejection) => {
                    debug!(agent = %agent_id, kind = ?command.kind, %rejection, "Action rejected");
                    action_results.push(ActionResult {
                        agent_id,
                        kind: command.kind,
                        success: false,
                        rejection: Some(rejection),
                    });
                    // A failed action forfeits the rest of the turn.
                    break;
                }
            }
        }
    }

    let agents_alive = u32::try_from(world.living_count()).unwrap_or(u32::MAX);

    Ok(TickSummary {
        tick: tick_number,
        day: world.day,
        hour: world.hour,
        agents_alive,
        deaths,
        rule_events,
        action_results,
    })
}

/// Decision chain: external source, then goal evaluator, then random
/// legal action. Returns the command and a short trace of its origin.
fn next_command(
    world: &WorldState,
    agent_id: AgentId,
    decision_source: &mut dyn DecisionSource,
    config: &SimulationConfig,
    rng: &mut SmallRng,
) -> Option<(ActionCommand, String)> {
    let agent = world.agents.get(&agent_id)?;
    match decision_source.decide(agent, world, config.world.decision_timeout_ms) {
        Ok(Some(command)) => {
            let trace = format!("external decision: {:?}", command.kind);
            return Some((command, trace));
        }
        Ok(None) => {}
        Err(error) => {
            warn!(agent = %agent_id, %error, "Decision source failed; falling back");
        }
    }
    if let Some(goal) = select_goal(world, agent_id, rng) {
        debug!(agent = %agent_id, goal = %goal.name, score = goal.score, "Goal selected");
        let trace = format!("goal '{}' ({:?}, score {})", goal.name, goal.tier, goal.score);
        return Some((goal.command, trace));
    }
    let command = random_fallback_command(world, agent_id, rng)?;
    let trace = format!("random fallback: {:?}", command.kind);
    Some((command, trace))
}

fn record_death(
    world: &WorldState,
    agent_id: AgentId,
    cause: &str,
    sink: &dyn EventSink,
) -> Result<(), TickError> {
    let name = world
        .agents
        .get(&agent_id)
        .map_or_else(|| String::from("unknown"), |agent| agent.name.clone());
    sink.append(EventRecord::new(
        world.day,
        world.hour,
        EventKind::Death,
        Some(agent_id),
        format!("{name} died of {cause}"),
        json!({ "cause": cause }),
    ))?;
    Ok(())
}

/// Apply one operator intervention to the world.
fn apply_intervention(
    world: &mut WorldState,
    intervention: &Intervention,
    sink: &dyn EventSink,
) -> Result<(), TickError> {
    let description = match intervention {
        Intervention::SetVital {
            agent_id,
            vital,
            value,
        } => {
            let clamped = (*value).min(VITAL_MAX);
            if let Some(agent) = world.agents.get_mut(agent_id) {
                match vital {
                    VitalKind::Health => agent.health = clamped,
                    VitalKind::Sanity => agent.sanity = clamped,
                    VitalKind::Hunger => agent.hunger = clamped,
                    VitalKind::Thirst => agent.thirst = clamped,
                }
                format!("Operator set {} {vital:?} to {clamped}", agent.name)
            } else {
                format!("Operator vital change ignored: unknown agent {agent_id}")
            }
        }
        Intervention::InjectObjective {
            agent_id,
            name,
            description,
        } => {
            if let Some(agent) = world.agents.get_mut(agent_id) {
                agent.objectives.push(Objective::new(name, description));
                format!("Operator gave {} a new objective: {name}", agent.name)
            } else {
                format!("Operator objective ignored: unknown agent {agent_id}")
            }
        }
        Intervention::ClearObjectives { agent_id } => {
            if let Some(agent) = world.agents.get_mut(agent_id) {
                agent.objectives.clear();
                format!("Operator cleared objectives for {}", agent.name)
            } else {
                format!("Operator clear ignored: unknown agent {agent_id}")
            }
        }
        Intervention::SetEnvironment { context } => {
            world.environment_context = Some(context.clone());
            format!("Environment: {context}")
        }
        Intervention::ClearEnvironment => {
            world.environment_context = None;
            String::from("Environment framing cleared")
        }
        Intervention::PlaceItem { position, kind } => {
            let item = default_item_of_kind(*kind);
            let name = item.name.clone();
            match world.map.place_item(*position, item) {
                Ok(()) => format!("Operator placed {name} at {position}"),
                Err(error) => format!("Operator item placement failed: {error}"),
            }
        }
    };
    world.log(description.clone());
    sink.append(EventRecord::new(
        world.day,
        world.hour,
        EventKind::System,
        None,
        description,
        json!({}),
    ))?;
    Ok(())
}

fn default_item_of_kind(kind: panopticon_types::enums::ItemKind) -> panopticon_types::structs::Item {
    use panopticon_types::enums::ItemKind;
    use panopticon_types::structs::Item;
    match kind {
        ItemKind::Food => Item::new("Prison Food", "Basic cafeteria meal", kind),
        ItemKind::Water => Item::new("Water", "Clean drinking water", kind),
        ItemKind::Book => Item::new("Book", "A worn paperback book", kind),
        ItemKind::Spoon => Item::new("Spoon", "A metal spoon", kind),
        ItemKind::Shiv => Item::new("Shiv", "An improvised blade", kind),
        _ => Item::new(format!("{kind:?}"), "Operator-placed item", kind),
    }
}
