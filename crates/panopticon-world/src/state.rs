//! The mutable world state shared by every subsystem.

use std::collections::BTreeMap;

use panopticon_types::ids::AgentId;
use panopticon_types::structs::{Agent, Position};
use serde::{Deserialize, Serialize};

use crate::map::GameMap;

/// Everything that changes as the simulation runs: the clock fields, the
/// agents, the map contents, and the rolling event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldState {
    /// In-sim day, 1-based.
    pub day: u32,
    /// In-sim hour, 0-23.
    pub hour: u32,
    /// In-sim minute; temporal rules fire only at minute 0.
    pub minute: u32,
    /// All agents, living and dead, keyed by id.
    pub agents: BTreeMap<AgentId, Agent>,
    /// The facility grid.
    pub map: GameMap,
    /// Human-readable rolling log of everything that happened.
    pub event_log: Vec<String>,
    /// Operator-injected environmental framing, if any.
    pub environment_context: Option<String>,
    /// Absolute in-sim hour of the last successful action; used for
    /// stall detection.
    pub last_action_at_hours: u64,
    /// Where each agent's most recent command came from. Cleared at the
    /// start of every action phase, overwritten per action slot.
    pub last_decision_trace: BTreeMap<AgentId, String>,
}

impl WorldState {
    /// Create a world state over `map` starting at day 1, hour 8.
    pub fn new(map: GameMap) -> Self {
        let mut state = Self {
            day: 1,
            hour: 8,
            minute: 0,
            agents: BTreeMap::new(),
            map,
            event_log: Vec::new(),
            environment_context: None,
            last_action_at_hours: 0,
            last_decision_trace: BTreeMap::new(),
        };
        state.last_action_at_hours = state.clock_hours();
        state
    }

    /// Absolute in-sim hours elapsed since day 1, hour 0.
    pub const fn clock_hours(&self) -> u64 {
        (self.day.saturating_sub(1) as u64) * 24 + self.hour as u64
    }

    /// Append a line to the rolling event log.
    pub fn log(&mut self, line: impl Into<String>) {
        self.event_log.push(line.into());
    }

    /// Number of living agents.
    pub fn living_count(&self) -> usize {
        self.agents.values().filter(|agent| agent.is_alive()).count()
    }

    /// Whether any living agent (other than `exclude`, if given) stands
    /// at `position`.
    pub fn is_occupied(&self, position: Position, exclude: Option<AgentId>) -> bool {
        self.agents.values().any(|agent| {
            agent.is_alive() && agent.position == position && Some(agent.id) != exclude
        })
    }

    /// Agent ids in action-phase order: guards before prisoners, then by
    /// name. Names are assigned deterministically at spawn, so the order
    /// is stable across runs with the same seed.
    pub fn scheduled_agent_ids(&self) -> Vec<AgentId> {
        let mut ids: Vec<AgentId> = self.agents.keys().copied().collect();
        ids.sort_by_key(|id| {
            self.agents.get(id).map_or_else(
                || (u8::MAX, String::new(), *id),
                |agent| (agent.role.schedule_rank(), agent.name.clone(), *id),
            )
        });
        ids
    }

    /// Living agents within `range` Manhattan distance of `from`,
    /// excluding `from` itself. Sorted by name so callers that pick the
    /// first (or a seeded-random) entry behave the same across runs.
    pub fn living_agents_near(&self, from: AgentId, range: u32) -> Vec<AgentId> {
        let Some(origin) = self.agents.get(&from).map(|agent| agent.position) else {
            return Vec::new();
        };
        let mut nearby: Vec<(&str, AgentId)> = self
            .agents
            .values()
            .filter(|agent| {
                agent.id != from
                    && agent.is_alive()
                    && origin.manhattan_distance(agent.position) <= range
            })
            .map(|agent| (agent.name.as_str(), agent.id))
            .collect();
        nearby.sort_unstable();
        nearby.into_iter().map(|(_, id)| id).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use panopticon_types::enums::Role;
    use panopticon_types::structs::Traits;

    use super::*;

    fn traits() -> Traits {
        Traits {
            aggression: 50,
            empathy: 50,
            logic: 50,
            obedience: 50,
            resilience: 50,
        }
    }

    fn world_with(agents: Vec<Agent>) -> WorldState {
        let map = GameMap::new(9, 16).unwrap();
        let mut state = WorldState::new(map);
        for agent in agents {
            state.agents.insert(agent.id, agent);
        }
        state
    }

    #[test]
    fn starts_on_day_one_hour_eight() {
        let state = world_with(Vec::new());
        assert_eq!(state.day, 1);
        assert_eq!(state.hour, 8);
        assert_eq!(state.clock_hours(), 8);
        assert_eq!(state.last_action_at_hours, 8);
    }

    #[test]
    fn schedule_puts_guards_first() {
        let prisoner = Agent::new("Prisoner 1", Role::Prisoner, traits(), Position::new(3, 3));
        let guard = Agent::new("Guard 1", Role::Guard, traits(), Position::new(1, 1));
        let guard_id = guard.id;
        let state = world_with(vec![prisoner, guard]);
        let order = state.scheduled_agent_ids();
        assert_eq!(order.first().copied(), Some(guard_id));
    }

    #[test]
    fn occupancy_ignores_the_dead_and_the_excluded() {
        let mut dead = Agent::new("Prisoner 1", Role::Prisoner, traits(), Position::new(4, 4));
        dead.health = 0;
        let living = Agent::new("Prisoner 2", Role::Prisoner, traits(), Position::new(5, 5));
        let living_id = living.id;
        let state = world_with(vec![dead, living]);
        assert!(!state.is_occupied(Position::new(4, 4), None));
        assert!(state.is_occupied(Position::new(5, 5), None));
        assert!(!state.is_occupied(Position::new(5, 5), Some(living_id)));
    }

    #[test]
    fn nearby_search_uses_manhattan_range() {
        let a = Agent::new("Guard 1", Role::Guard, traits(), Position::new(4, 4));
        let b = Agent::new("Prisoner 1", Role::Prisoner, traits(), Position::new(5, 5));
        let c = Agent::new("Prisoner 2", Role::Prisoner, traits(), Position::new(8, 8));
        let (a_id, b_id) = (a.id, b.id);
        let state = world_with(vec![a, b, c]);
        let near = state.living_agents_near(a_id, 2);
        assert_eq!(near, vec![b_id]);
    }
}
