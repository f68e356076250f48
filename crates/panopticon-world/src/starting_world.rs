//! Seeded generation of the initial facility.
//!
//! Layout: the border and every unremarkable interior cell are cell
//! blocks; the guard room sits at (1,1), the cafeteria at (w-2,h-2),
//! the yard at the center, and solitary at (1,h-2). Guards spawn in the
//! guard room, prisoners at random interior cells. Every pair of agents
//! starts at the configured neutral relationship.

use panopticon_types::enums::{CellKind, ItemKind, Role};
use panopticon_types::structs::{Agent, Item, Objective, Position, Relationship, Traits};
use rand::Rng;

use crate::error::WorldError;
use crate::map::GameMap;
use crate::state::WorldState;

/// Tunable knobs for starting world generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartingWorldParams {
    /// Map width in cells.
    pub width: i32,
    /// Map height in cells.
    pub height: i32,
    /// How many guards to spawn.
    pub guard_count: u32,
    /// How many prisoners to spawn.
    pub prisoner_count: u32,
    /// Neutral relationship score every pair starts at.
    pub default_relationship: u32,
}

impl Default for StartingWorldParams {
    fn default() -> Self {
        Self {
            width: 9,
            height: 16,
            guard_count: 2,
            prisoner_count: 4,
            default_relationship: 50,
        }
    }
}

/// Build the starting world from `params`, drawing all randomness
/// (traits, spawn cells, book placement) from `rng`.
///
/// # Errors
///
/// Returns [`WorldError`] if the dimensions are degenerate or no agents
/// were requested.
pub fn create_starting_world(
    params: &StartingWorldParams,
    rng: &mut impl Rng,
) -> Result<WorldState, WorldError> {
    if params.guard_count == 0 && params.prisoner_count == 0 {
        return Err(WorldError::InvalidParams {
            reason: String::from("at least one agent is required"),
        });
    }

    let mut map = GameMap::new(params.width, params.height)?;
    lay_out_cells(&mut map);

    let mut state = WorldState::new(map);
    spawn_agents(&mut state, params, rng);
    link_relationships(&mut state, params.default_relationship);
    place_initial_items(&mut state, rng);

    state.log("World initialized");
    state.log("Agents ready for activation");
    Ok(state)
}

/// Fill the grid: bordered cell blocks with the four special rooms.
fn lay_out_cells(map: &mut GameMap) {
    let (w, h) = (map.width, map.height);
    for x in 0..w {
        for y in 0..h {
            let position = Position::new(x, y);
            let kind = if x == 1 && y == 1 {
                CellKind::GuardRoom
            } else if x == w - 2 && y == h - 2 {
                CellKind::Cafeteria
            } else if x == w / 2 && y == h / 2 {
                CellKind::Yard
            } else if x == 1 && y == h - 2 {
                CellKind::Solitary
            } else {
                CellKind::CellBlock
            };
            map.cells.insert(position, kind);
        }
    }
}

fn spawn_agents(state: &mut WorldState, params: &StartingWorldParams, rng: &mut impl Rng) {
    let guard_room = state
        .map
        .find_cell(CellKind::GuardRoom)
        .unwrap_or(Position::new(1, 1));

    for index in 1..=params.guard_count {
        let traits = Traits {
            aggression: rng.random_range(40..=80),
            empathy: rng.random_range(20..=60),
            logic: rng.random_range(50..=90),
            obedience: rng.random_range(60..=95),
            resilience: rng.random_range(60..=90),
        };
        let mut agent = Agent::new(format!("Guard {index}"), Role::Guard, traits, guard_room);
        agent.objectives.push(Objective::new(
            "Maintain Order",
            "Keep the prisoners in line and prevent riots",
        ));
        state.agents.insert(agent.id, agent);
    }

    for index in 1..=params.prisoner_count {
        let traits = Traits {
            aggression: rng.random_range(30..=70),
            empathy: rng.random_range(30..=70),
            logic: rng.random_range(40..=80),
            obedience: rng.random_range(20..=60),
            resilience: rng.random_range(40..=80),
        };
        let position = random_interior_cell(&state.map, rng);
        let mut agent = Agent::new(format!("Prisoner {index}"), Role::Prisoner, traits, position);
        agent
            .objectives
            .push(Objective::new("Survive", "Stay alive and maintain sanity"));
        state.agents.insert(agent.id, agent);
    }
}

/// A random interior cell away from the border rows used by spawn points.
fn random_interior_cell(map: &GameMap, rng: &mut impl Rng) -> Position {
    let max_x = (map.width - 3).max(2);
    let max_y = (map.height - 4).max(2);
    Position::new(rng.random_range(2..=max_x), rng.random_range(2..=max_y))
}

/// Give every ordered pair of agents a neutral starting relationship.
fn link_relationships(state: &mut WorldState, default_score: u32) {
    let roster: Vec<(panopticon_types::AgentId, String)> = state
        .agents
        .values()
        .map(|agent| (agent.id, agent.name.clone()))
        .collect();

    for agent in state.agents.values_mut() {
        for (other_id, other_name) in &roster {
            if *other_id != agent.id {
                agent.relationships.insert(
                    *other_id,
                    Relationship::new(
                        default_score,
                        format!("Initial neutral relationship with {other_name}"),
                    ),
                );
            }
        }
    }
}

/// Stock the cafeteria and scatter three books.
fn place_initial_items(state: &mut WorldState, rng: &mut impl Rng) {
    if let Some(cafeteria) = state.map.find_cell(CellKind::Cafeteria) {
        let _ = state.map.place_item(
            cafeteria,
            Item::new("Prison Food", "Basic cafeteria meal", ItemKind::Food),
        );
        let _ = state.map.place_item(
            cafeteria,
            Item::new("Water", "Clean drinking water", ItemKind::Water),
        );
    }

    for _ in 0..3 {
        let position = Position::new(
            rng.random_range(1..=state.map.width - 2),
            rng.random_range(1..=state.map.height - 2),
        );
        let _ = state.map.place_item(
            position,
            Item::new("Book", "A worn paperback book", ItemKind::Book),
        );
    }
}
