//! Random fallback behavior for agents with no usable decision.
//!
//! When the decision source times out or returns nothing, and the goal
//! evaluator produces nothing either, the agent still has to spend its
//! turn somehow. This module builds a random but legal command from
//! whatever the surroundings allow.

use panopticon_types::actions::ActionCommand;
use panopticon_types::enums::ActionKind;
use panopticon_types::ids::AgentId;
use panopticon_types::structs::Position;
use panopticon_world::WorldState;
use rand::Rng;
use rand::seq::{IndexedRandom, IteratorRandom};

use crate::actions::costs::INTERACTION_RANGE;
use crate::actions::validation::available_kinds;

const FALLBACK_MESSAGES: [&str; 4] = [
    "How are you holding up?",
    "Stay out of my way.",
    "Have you heard anything?",
    "This place is getting to me.",
];

const FALLBACK_ATTACK_REASONS: [&str; 3] =
    ["a sudden outburst", "simmering frustration", "an old grudge"];

/// Build a random legal command for `actor_id`, or `None` when nothing
/// at all is affordable.
pub fn random_fallback_command(
    world: &WorldState,
    actor_id: AgentId,
    rng: &mut impl Rng,
) -> Option<ActionCommand> {
    let kinds = available_kinds(world, actor_id);
    let kind = *kinds.choose(rng)?;

    match kind {
        ActionKind::Move => Some(random_move(world, actor_id, rng)),
        ActionKind::Speak => {
            let target = random_neighbor(world, actor_id, rng)?;
            let message = *FALLBACK_MESSAGES.choose(rng)?;
            Some(ActionCommand::speak(target, message))
        }
        ActionKind::Attack => {
            let target = random_neighbor(world, actor_id, rng)?;
            let reason = *FALLBACK_ATTACK_REASONS.choose(rng)?;
            Some(ActionCommand::attack(target, reason))
        }
        ActionKind::UseItem => {
            let actor = world.agents.get(&actor_id)?;
            let item = actor
                .inventory
                .iter()
                .filter(|item| item.kind.is_usable())
                .choose(rng)?;
            Some(ActionCommand::use_item(item.id))
        }
        _ => Some(ActionCommand::rest()),
    }
}

/// A move to a random free adjacent cell; resting in place when boxed in.
fn random_move(world: &WorldState, actor_id: AgentId, rng: &mut impl Rng) -> ActionCommand {
    let Some(actor) = world.agents.get(&actor_id) else {
        return ActionCommand::rest();
    };
    let from = actor.position;
    let destination = (-1..=1)
        .flat_map(|dx| (-1..=1).map(move |dy| Position::new(from.x + dx, from.y + dy)))
        .filter(|candidate| {
            *candidate != from
                && world.map.in_bounds(*candidate)
                && !world.is_occupied(*candidate, Some(actor_id))
        })
        .choose(rng);
    match destination {
        Some(target) => ActionCommand::move_to(target),
        None => ActionCommand::rest(),
    }
}

fn random_neighbor(world: &WorldState, actor_id: AgentId, rng: &mut impl Rng) -> Option<AgentId> {
    world
        .living_agents_near(actor_id, INTERACTION_RANGE)
        .choose(rng)
        .copied()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use panopticon_types::enums::{ItemKind, Role};
    use panopticon_types::structs::{Agent, Item, Traits};
    use panopticon_world::GameMap;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

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
    fn fallback_is_always_legal_for_a_loner() {
        let actor = Agent::new("Prisoner 1", Role::Prisoner, traits(), Position::new(4, 4));
        let id = actor.id;
        let world = world_with(vec![actor]);
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..50 {
            let command = random_fallback_command(&world, id, &mut rng).unwrap();
            assert!(
                crate::actions::validate_command(&world, id, &command).is_ok(),
                "illegal fallback: {command:?}"
            );
            // A loner with an empty inventory can only rest or move.
            assert!(matches!(
                command.kind,
                ActionKind::Rest | ActionKind::Move
            ));
        }
    }

    #[test]
    fn fallback_can_interact_when_neighbors_and_items_exist() {
        let mut actor = Agent::new("Prisoner 1", Role::Prisoner, traits(), Position::new(4, 4));
        actor
            .inventory
            .push(Item::new("Prison Food", "Basic cafeteria meal", ItemKind::Food));
        let neighbor = Agent::new("Prisoner 2", Role::Prisoner, traits(), Position::new(4, 5));
        let id = actor.id;
        let world = world_with(vec![actor, neighbor]);
        let mut rng = SmallRng::seed_from_u64(7);
        let mut kinds_seen = std::collections::BTreeSet::new();
        for _ in 0..200 {
            let command = random_fallback_command(&world, id, &mut rng).unwrap();
            assert!(crate::actions::validate_command(&world, id, &command).is_ok());
            kinds_seen.insert(command.kind);
        }
        assert!(kinds_seen.contains(&ActionKind::Speak));
        assert!(kinds_seen.contains(&ActionKind::Attack));
        assert!(kinds_seen.contains(&ActionKind::UseItem));
    }

    #[test]
    fn unusable_items_never_produce_use_commands() {
        let mut actor = Agent::new("Prisoner 1", Role::Prisoner, traits(), Position::new(4, 4));
        actor
            .inventory
            .push(Item::new("Shiv", "An improvised blade", ItemKind::Shiv));
        actor
            .inventory
            .push(Item::new("Spoon", "A metal spoon", ItemKind::Spoon));
        let id = actor.id;
        let world = world_with(vec![actor]);
        let mut rng = SmallRng::seed_from_u64(11);
        for _ in 0..50 {
            let command = random_fallback_command(&world, id, &mut rng).unwrap();
            assert!(crate::actions::validate_command(&world, id, &command).is_ok());
            assert_ne!(command.kind, ActionKind::UseItem);
        }
    }

    #[test]
    fn dead_agents_get_nothing() {
        let mut actor = Agent::new("Prisoner 1", Role::Prisoner, traits(), Position::new(4, 4));
        actor.health = 0;
        let id = actor.id;
        let world = world_with(vec![actor]);
        let mut rng = SmallRng::seed_from_u64(7);
        assert!(random_fallback_command(&world, id, &mut rng).is_none());
    }
}
