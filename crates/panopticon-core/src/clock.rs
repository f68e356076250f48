//! Clock advancement and the hourly status phase.
//!
//! Each tick is one in-sim hour. Advancing the clock also runs the
//! status phase: every living agent's vitals decay, status tags are
//! recomputed, action points reset, and deaths are detected exactly once
//! on the alive-to-dead transition.

use panopticon_agents::VitalsConfig;
use panopticon_agents::vitals::apply_hourly_decay;
use panopticon_types::ids::AgentId;
use panopticon_world::WorldState;
use tracing::{debug, info};

/// What one clock advance did to the world.
#[derive(Debug, Clone, Default)]
pub struct ClockAdvance {
    /// The day after the advance.
    pub day: u32,
    /// The hour after the advance.
    pub hour: u32,
    /// Whether the advance rolled over into a new day.
    pub new_day: bool,
    /// Agents that died during this status phase.
    pub deaths: Vec<AgentId>,
    /// Total health lost across all agents this hour.
    pub total_damage: u32,
}

/// Advance the world clock by one hour and run the status phase.
pub fn advance_hour(world: &mut WorldState, vitals: &VitalsConfig) -> ClockAdvance {
    world.hour += 1;
    world.minute = 0;
    let new_day = world.hour >= 24;
    if new_day {
        world.hour = 0;
        world.day += 1;
        let day = world.day;
        world.log(format!("--- Day {day} begins ---"));
        info!(day, "New day");
    }

    let (day, hour) = (world.day, world.hour);
    let mut deaths = Vec::new();
    let mut total_damage: u32 = 0;
    let mut death_lines = Vec::new();

    for agent in world.agents.values_mut() {
        if !agent.is_alive() {
            continue;
        }
        let result = apply_hourly_decay(agent, vitals);
        total_damage = total_damage.saturating_add(result.damage_taken);
        if result.damage_taken > 0 {
            let damage = result.damage_taken;
            agent.remember(day, hour, format!("Lost {damage} HP to hunger and thirst"));
        }
        if result.died {
            deaths.push(agent.id);
            death_lines.push(format!("{} has died", agent.name));
        }
    }
    for line in death_lines {
        info!("{line}");
        world.log(line);
    }
    debug!(day, hour, total_damage, deaths = deaths.len(), "Status phase complete");

    ClockAdvance {
        day,
        hour,
        new_day,
        deaths,
        total_damage,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use panopticon_types::enums::Role;
    use panopticon_types::structs::{Agent, Position, Traits};
    use panopticon_world::GameMap;

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
    fn hour_advances_and_day_rolls_over() {
        let mut world = world_with(Vec::new());
        let vitals = VitalsConfig::default();
        // Day 1 starts at hour 8; 16 advances reach the rollover.
        for _ in 0..15 {
            let advance = advance_hour(&mut world, &vitals);
            assert!(!advance.new_day);
        }
        assert_eq!(world.hour, 23);
        let advance = advance_hour(&mut world, &vitals);
        assert!(advance.new_day);
        assert_eq!(world.day, 2);
        assert_eq!(world.hour, 0);
        assert!(world.event_log.iter().any(|line| line == "--- Day 2 begins ---"));
    }

    #[test]
    fn status_phase_decays_every_living_agent() {
        let a = Agent::new("Guard 1", Role::Guard, traits(), Position::new(1, 1));
        let b = Agent::new("Prisoner 1", Role::Prisoner, traits(), Position::new(3, 3));
        let ids = vec![a.id, b.id];
        let mut world = world_with(vec![a, b]);
        advance_hour(&mut world, &VitalsConfig::default());
        for id in ids {
            let agent = world.agents.get(&id).unwrap();
            assert_eq!(agent.hunger, 3);
            assert_eq!(agent.thirst, 4);
        }
    }

    #[test]
    fn starvation_death_is_logged_and_reported_once() {
        let mut doomed = Agent::new("Prisoner 1", Role::Prisoner, traits(), Position::new(3, 3));
        doomed.health = 10;
        doomed.hunger = 100;
        doomed.thirst = 100;
        let doomed_id = doomed.id;
        let mut world = world_with(vec![doomed]);

        let advance = advance_hour(&mut world, &VitalsConfig::default());
        assert_eq!(advance.deaths, vec![doomed_id]);
        assert!(world.event_log.iter().any(|line| line == "Prisoner 1 has died"));

        let advance = advance_hour(&mut world, &VitalsConfig::default());
        assert!(advance.deaths.is_empty());
    }

    #[test]
    fn damage_leaves_a_memory() {
        let mut agent = Agent::new("Prisoner 1", Role::Prisoner, traits(), Position::new(3, 3));
        agent.hunger = 95;
        let id = agent.id;
        let mut world = world_with(vec![agent]);
        advance_hour(&mut world, &VitalsConfig::default());
        let agent = world.agents.get(&id).unwrap();
        assert!(agent.memory.iter().any(|entry| entry.text.contains("Lost")));
    }
}
