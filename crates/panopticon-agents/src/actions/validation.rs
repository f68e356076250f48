//! Precondition checks for action commands.
//!
//! Staged pipeline: liveness, parameter shape, AP budget, role gating,
//! then kind-specific world preconditions. The first failing stage wins.
//! Move destination checks are the one exception -- the handler adjusts
//! the destination (redirect, clamp) before re-validating occupancy, so
//! they live in execution.

use panopticon_types::actions::{ActionCommand, ActionParams};
use panopticon_types::enums::{ActionKind, CellKind, ItemKind, RejectionReason};
use panopticon_types::ids::{AgentId, ItemId};
use panopticon_world::WorldState;

use crate::actions::costs::{INTERACTION_RANGE, ap_cost};

/// Check whether `actor_id` may execute `command` against the current
/// world state.
///
/// # Errors
///
/// Returns the first applicable [`RejectionReason`].
pub fn validate_command(
    world: &WorldState,
    actor_id: AgentId,
    command: &ActionCommand,
) -> Result<(), RejectionReason> {
    let Some(actor) = world.agents.get(&actor_id) else {
        return Err(RejectionReason::ActorDead);
    };
    if !actor.is_alive() {
        return Err(RejectionReason::ActorDead);
    }
    if command.kind != command.params.kind() {
        return Err(RejectionReason::InvalidParameters);
    }
    if actor.action_points < ap_cost(command.kind) {
        return Err(RejectionReason::InsufficientActionPoints);
    }
    if let Some(required) = command.kind.required_role()
        && actor.role != required
    {
        return Err(RejectionReason::WrongRole);
    }

    match &command.params {
        ActionParams::Rest | ActionParams::Move { .. } | ActionParams::Announce { .. } => Ok(()),
        ActionParams::Assemble => Ok(()),
        ActionParams::Speak { target, .. } | ActionParams::Inspect { target } => {
            check_target_in_range(world, actor_id, *target)
        }
        ActionParams::Attack { target, .. } => check_target_in_range(world, actor_id, *target),
        ActionParams::UseItem { item } => {
            check_item_held(world, actor_id, *item)?;
            check_item_usable(world, actor_id, *item)
        }
        ActionParams::Give { target, item } => {
            check_target_in_range(world, actor_id, *target)?;
            check_item_held(world, actor_id, *item)
        }
        ActionParams::Punish { target, .. } => {
            check_target_in_range(world, actor_id, *target)?;
            check_solitary_available(world, *target)
        }
        ActionParams::Steal { target } => {
            check_target_in_range(world, actor_id, *target)?;
            let has_anything = world
                .agents
                .get(target)
                .is_some_and(|victim| !victim.inventory.is_empty());
            if has_anything {
                Ok(())
            } else {
                Err(RejectionReason::NothingToTake)
            }
        }
        ActionParams::Craft => {
            let holds_spoon = world
                .agents
                .get(&actor_id)
                .is_some_and(|agent| agent.holds_kind(ItemKind::Spoon));
            if holds_spoon {
                Ok(())
            } else {
                Err(RejectionReason::MissingMaterial)
            }
        }
    }
}

/// Target must exist, be alive, not be the actor, and sit within the
/// interaction range.
fn check_target_in_range(
    world: &WorldState,
    actor_id: AgentId,
    target_id: AgentId,
) -> Result<(), RejectionReason> {
    if target_id == actor_id {
        return Err(RejectionReason::InvalidTarget);
    }
    let Some(target) = world.agents.get(&target_id) else {
        return Err(RejectionReason::InvalidTarget);
    };
    if !target.is_alive() {
        return Err(RejectionReason::InvalidTarget);
    }
    let Some(actor) = world.agents.get(&actor_id) else {
        return Err(RejectionReason::ActorDead);
    };
    if actor.position.manhattan_distance(target.position) > INTERACTION_RANGE {
        return Err(RejectionReason::TargetTooFar);
    }
    Ok(())
}

fn check_item_held(
    world: &WorldState,
    actor_id: AgentId,
    item_id: ItemId,
) -> Result<(), RejectionReason> {
    let held = world
        .agents
        .get(&actor_id)
        .is_some_and(|agent| agent.inventory_index(item_id).is_some());
    if held {
        Ok(())
    } else {
        Err(RejectionReason::ItemNotHeld)
    }
}

/// Only food, water, and books respond to `UseItem`.
fn check_item_usable(
    world: &WorldState,
    actor_id: AgentId,
    item_id: ItemId,
) -> Result<(), RejectionReason> {
    let usable = world.agents.get(&actor_id).is_some_and(|agent| {
        agent.inventory.iter().any(|item| {
            item.id == item_id
                && matches!(item.kind, ItemKind::Food | ItemKind::Water | ItemKind::Book)
        })
    });
    if usable {
        Ok(())
    } else {
        Err(RejectionReason::ItemNotUsable)
    }
}

/// The solitary cell must exist and hold no living agent other than the
/// punished target.
fn check_solitary_available(world: &WorldState, target_id: AgentId) -> Result<(), RejectionReason> {
    let Some(solitary) = world.map.find_cell(CellKind::Solitary) else {
        return Err(RejectionReason::SolitaryUnavailable);
    };
    if world.is_occupied(solitary, Some(target_id)) {
        return Err(RejectionReason::SolitaryUnavailable);
    }
    Ok(())
}

/// Kinds whose preconditions currently hold for `actor_id`, ignoring
/// parameters. Used by the random fallback generator.
pub fn available_kinds(world: &WorldState, actor_id: AgentId) -> Vec<ActionKind> {
    let Some(actor) = world.agents.get(&actor_id) else {
        return Vec::new();
    };
    if !actor.is_alive() {
        return Vec::new();
    }

    let mut kinds = vec![ActionKind::Rest, ActionKind::Move];
    let has_neighbors = !world
        .living_agents_near(actor_id, INTERACTION_RANGE)
        .is_empty();
    if has_neighbors {
        kinds.push(ActionKind::Speak);
        kinds.push(ActionKind::Attack);
    }
    if actor.inventory.iter().any(|item| item.kind.is_usable()) {
        kinds.push(ActionKind::UseItem);
    }
    kinds.retain(|kind| actor.action_points >= ap_cost(*kind));
    kinds
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use panopticon_types::enums::Role;
    use panopticon_types::structs::{Agent, Item, Position, Traits};
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
        let mut map = GameMap::new(9, 16).unwrap();
        map.cells.insert(Position::new(1, 14), CellKind::Solitary);
        let mut state = WorldState::new(map);
        for agent in agents {
            state.agents.insert(agent.id, agent);
        }
        state
    }

    #[test]
    fn dead_actors_cannot_act() {
        let mut actor = Agent::new("Prisoner 1", Role::Prisoner, traits(), Position::new(3, 3));
        actor.health = 0;
        let id = actor.id;
        let world = world_with(vec![actor]);
        assert_eq!(
            validate_command(&world, id, &ActionCommand::rest()),
            Err(RejectionReason::ActorDead)
        );
    }

    #[test]
    fn ap_budget_is_enforced() {
        let mut actor = Agent::new("Guard 1", Role::Guard, traits(), Position::new(1, 1));
        actor.action_points = 1;
        let target = Agent::new("Prisoner 1", Role::Prisoner, traits(), Position::new(1, 2));
        let (actor_id, target_id) = (actor.id, target.id);
        let world = world_with(vec![actor, target]);
        assert_eq!(
            validate_command(
                &world,
                actor_id,
                &ActionCommand::attack(target_id, "test")
            ),
            Err(RejectionReason::InsufficientActionPoints)
        );
        assert!(validate_command(&world, actor_id, &ActionCommand::rest()).is_ok());
    }

    #[test]
    fn role_gating_rejects_prisoner_punish() {
        let prisoner = Agent::new("Prisoner 1", Role::Prisoner, traits(), Position::new(3, 3));
        let other = Agent::new("Prisoner 2", Role::Prisoner, traits(), Position::new(3, 4));
        let (actor_id, target_id) = (prisoner.id, other.id);
        let world = world_with(vec![prisoner, other]);
        let command = ActionCommand::from_params(ActionParams::Punish {
            target: target_id,
            reason: String::from("test"),
        });
        assert_eq!(
            validate_command(&world, actor_id, &command),
            Err(RejectionReason::WrongRole)
        );
    }

    #[test]
    fn speak_range_is_manhattan_two() {
        let a = Agent::new("Prisoner 1", Role::Prisoner, traits(), Position::new(3, 3));
        let near = Agent::new("Prisoner 2", Role::Prisoner, traits(), Position::new(4, 4));
        let far = Agent::new("Prisoner 3", Role::Prisoner, traits(), Position::new(6, 6));
        let (a_id, near_id, far_id) = (a.id, near.id, far.id);
        let world = world_with(vec![a, near, far]);
        assert!(validate_command(&world, a_id, &ActionCommand::speak(near_id, "hi")).is_ok());
        assert_eq!(
            validate_command(&world, a_id, &ActionCommand::speak(far_id, "hi")),
            Err(RejectionReason::TargetTooFar)
        );
    }

    #[test]
    fn self_target_is_invalid() {
        let a = Agent::new("Prisoner 1", Role::Prisoner, traits(), Position::new(3, 3));
        let a_id = a.id;
        let world = world_with(vec![a]);
        assert_eq!(
            validate_command(&world, a_id, &ActionCommand::attack(a_id, "why")),
            Err(RejectionReason::InvalidTarget)
        );
    }

    #[test]
    fn use_item_requires_a_usable_held_item() {
        let mut actor = Agent::new("Prisoner 1", Role::Prisoner, traits(), Position::new(3, 3));
        let shiv = Item::new("Shiv", "An improvised blade", ItemKind::Shiv);
        let shiv_id = shiv.id;
        actor.inventory.push(shiv);
        let actor_id = actor.id;
        let world = world_with(vec![actor]);
        assert_eq!(
            validate_command(&world, actor_id, &ActionCommand::use_item(ItemId::new())),
            Err(RejectionReason::ItemNotHeld)
        );
        assert_eq!(
            validate_command(&world, actor_id, &ActionCommand::use_item(shiv_id)),
            Err(RejectionReason::ItemNotUsable)
        );
    }

    #[test]
    fn craft_needs_a_spoon() {
        let actor = Agent::new("Prisoner 1", Role::Prisoner, traits(), Position::new(3, 3));
        let actor_id = actor.id;
        let world = world_with(vec![actor]);
        assert_eq!(
            validate_command(
                &world,
                actor_id,
                &ActionCommand::from_params(ActionParams::Craft)
            ),
            Err(RejectionReason::MissingMaterial)
        );
    }

    #[test]
    fn punish_requires_free_solitary_cell() {
        let guard = Agent::new("Guard 1", Role::Guard, traits(), Position::new(2, 13));
        let target = Agent::new("Prisoner 1", Role::Prisoner, traits(), Position::new(2, 14));
        let squatter = Agent::new("Prisoner 2", Role::Prisoner, traits(), Position::new(1, 14));
        let (guard_id, target_id) = (guard.id, target.id);
        let world = world_with(vec![guard, target, squatter]);
        let command = ActionCommand::from_params(ActionParams::Punish {
            target: target_id,
            reason: String::from("contraband"),
        });
        assert_eq!(
            validate_command(&world, guard_id, &command),
            Err(RejectionReason::SolitaryUnavailable)
        );
    }

    #[test]
    fn available_kinds_track_surroundings() {
        let loner = Agent::new("Prisoner 1", Role::Prisoner, traits(), Position::new(3, 3));
        let loner_id = loner.id;
        let world = world_with(vec![loner]);
        let kinds = available_kinds(&world, loner_id);
        assert!(kinds.contains(&ActionKind::Rest));
        assert!(kinds.contains(&ActionKind::Move));
        assert!(!kinds.contains(&ActionKind::Speak));
        assert!(!kinds.contains(&ActionKind::UseItem));
    }

    #[test]
    fn available_kinds_offer_use_item_only_for_usables() {
        let mut holder = Agent::new("Prisoner 1", Role::Prisoner, traits(), Position::new(3, 3));
        holder
            .inventory
            .push(Item::new("Shiv", "An improvised blade", ItemKind::Shiv));
        let holder_id = holder.id;
        let world = world_with(vec![holder]);
        // Contraband can be carried but not consumed.
        assert!(!available_kinds(&world, holder_id).contains(&ActionKind::UseItem));

        let mut eater = Agent::new("Prisoner 2", Role::Prisoner, traits(), Position::new(5, 5));
        eater
            .inventory
            .push(Item::new("Prison Food", "Basic cafeteria meal", ItemKind::Food));
        let eater_id = eater.id;
        let world = world_with(vec![eater]);
        assert!(available_kinds(&world, eater_id).contains(&ActionKind::UseItem));
    }
}
