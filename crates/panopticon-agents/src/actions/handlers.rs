//! Atomic execution for every action kind.
//!
//! `execute_command` validates first, then runs a kind-specific handler.
//! Handlers compute everything that can still fail before touching the
//! world, so a rejection always leaves state exactly as it was. AP is
//! deducted as part of the same effect set.

use panopticon_types::actions::{ActionCommand, ActionParams, ActionReport};
use panopticon_types::enums::{ActionKind, CellKind, EventKind, ItemKind, RejectionReason, Role};
use panopticon_types::ids::{AgentId, ItemId};
use panopticon_types::structs::{Item, Position, VITAL_MAX};
use panopticon_world::WorldState;
use rand::Rng;
use serde_json::json;

use crate::actions::costs::{MOVE_STEP_BUDGET, ap_cost};
use crate::actions::validation::validate_command;
use crate::config::CombatConfig;

/// Sanity lost by an agent sent to solitary.
const PUNISH_SANITY_COST: u32 = 15;

/// Relationship drop from the punished toward the punishing guard.
const PUNISH_RESENTMENT: u32 = 20;

/// Relationship drop from an inspected agent who lost contraband.
const CONFISCATION_RESENTMENT: u32 = 10;

/// Relationship gain from receiving a gift.
const GIFT_GOODWILL: u32 = 5;

/// Relationship drop from a victim who noticed a theft.
const THEFT_RESENTMENT: u32 = 15;

/// Hunger removed by eating food.
const FOOD_HUNGER_RELIEF: u32 = 50;

/// Thirst removed by drinking water.
const WATER_THIRST_RELIEF: u32 = 40;

/// Sanity restored by reading a book.
const BOOK_SANITY_RELIEF: u32 = 10;

/// Validate and execute one command atomically.
///
/// # Errors
///
/// Returns a [`RejectionReason`] without mutating the world when any
/// precondition fails, including occupancy at a move destination after
/// redirect and clamp.
pub fn execute_command(
    world: &mut WorldState,
    actor_id: AgentId,
    command: &ActionCommand,
    combat: &CombatConfig,
    rng: &mut impl Rng,
) -> Result<ActionReport, RejectionReason> {
    validate_command(world, actor_id, command)?;

    match &command.params {
        ActionParams::Rest => execute_rest(world, actor_id),
        ActionParams::Move { target } => execute_move(world, actor_id, *target),
        ActionParams::Speak { target, message } => execute_speak(world, actor_id, *target, message),
        ActionParams::Attack { target, reason } => {
            execute_attack(world, actor_id, *target, reason, combat, rng)
        }
        ActionParams::UseItem { item } => execute_use_item(world, actor_id, *item),
        ActionParams::Give { target, item } => execute_give(world, actor_id, *target, *item),
        ActionParams::Announce { message } => execute_announce(world, actor_id, message),
        ActionParams::Inspect { target } => execute_inspect(world, actor_id, *target),
        ActionParams::Punish { target, reason } => execute_punish(world, actor_id, *target, reason),
        ActionParams::Assemble => execute_assemble(world, actor_id),
        ActionParams::Steal { target } => execute_steal(world, actor_id, *target, combat, rng),
        ActionParams::Craft => execute_craft(world, actor_id),
    }
}

/// Deduct the AP cost from the actor. Called once per handler, after
/// all preconditions have passed.
fn spend_ap(world: &mut WorldState, actor_id: AgentId, kind: ActionKind) -> u32 {
    if let Some(actor) = world.agents.get_mut(&actor_id) {
        actor.action_points = actor.action_points.saturating_sub(ap_cost(kind));
        actor.action_points
    } else {
        0
    }
}

fn actor_name(world: &WorldState, actor_id: AgentId) -> String {
    world
        .agents
        .get(&actor_id)
        .map_or_else(|| String::from("unknown"), |agent| agent.name.clone())
}

// ---------------------------------------------------------------------------
// Rest
// ---------------------------------------------------------------------------

fn execute_rest(world: &mut WorldState, actor_id: AgentId) -> Result<ActionReport, RejectionReason> {
    let (day, hour) = (world.day, world.hour);
    let name = actor_name(world, actor_id);

    if let Some(actor) = world.agents.get_mut(&actor_id) {
        actor.remember(day, hour, "Rested and observed the surroundings");
    }
    let ap_remaining = spend_ap(world, actor_id, ActionKind::Rest);
    world.log(format!("{name} rests and observes."));

    Ok(ActionReport {
        kind: ActionKind::Rest,
        description: String::from("Rested and observed the surroundings"),
        event_kind: EventKind::Rest,
        details: json!({ "action_points_remaining": ap_remaining }),
        adjusted: false,
    })
}

// ---------------------------------------------------------------------------
// Move
// ---------------------------------------------------------------------------

/// Redirect a requested destination onto the step budget, keeping the
/// bearing: each axis is clamped to at most one budget step.
fn redirect_toward(from: Position, requested: Position) -> Position {
    Position {
        x: from.x + (requested.x - from.x).clamp(-MOVE_STEP_BUDGET, MOVE_STEP_BUDGET),
        y: from.y + (requested.y - from.y).clamp(-MOVE_STEP_BUDGET, MOVE_STEP_BUDGET),
    }
}

fn execute_move(
    world: &mut WorldState,
    actor_id: AgentId,
    requested: Position,
) -> Result<ActionReport, RejectionReason> {
    let Some(actor) = world.agents.get(&actor_id) else {
        return Err(RejectionReason::ActorDead);
    };
    let from = actor.position;

    // Redirect onto the step budget, then clamp into bounds, then
    // re-validate occupancy at the adjusted cell. Order matters: a
    // distant out-of-bounds request still resolves to a legal step
    // along the same bearing.
    let stepped = redirect_toward(from, requested);
    let destination = world.map.clamp(stepped);
    let adjusted = destination != requested;

    if world.is_occupied(destination, Some(actor_id)) {
        return Err(RejectionReason::PositionOccupied);
    }

    let (day, hour) = (world.day, world.hour);
    let name = actor_name(world, actor_id);
    if let Some(actor) = world.agents.get_mut(&actor_id) {
        actor.position = destination;
        actor.remember(day, hour, format!("Moved to position {destination}"));
    }
    let ap_remaining = spend_ap(world, actor_id, ActionKind::Move);
    world.log(format!("{name} moves to {destination}"));

    Ok(ActionReport {
        kind: ActionKind::Move,
        description: format!("Moved to position {destination}"),
        event_kind: EventKind::Move,
        details: json!({
            "from": [from.x, from.y],
            "to": [destination.x, destination.y],
            "requested": [requested.x, requested.y],
            "adjusted": adjusted,
            "action_points_remaining": ap_remaining,
        }),
        adjusted,
    })
}

// ---------------------------------------------------------------------------
// Speak
// ---------------------------------------------------------------------------

fn execute_speak(
    world: &mut WorldState,
    actor_id: AgentId,
    target_id: AgentId,
    message: &str,
) -> Result<ActionReport, RejectionReason> {
    let (day, hour) = (world.day, world.hour);
    let speaker = actor_name(world, actor_id);
    let listener = actor_name(world, target_id);

    if let Some(actor) = world.agents.get_mut(&actor_id) {
        actor.remember(day, hour, format!("Said to {listener}: '{message}'"));
    }
    if let Some(target) = world.agents.get_mut(&target_id) {
        target.remember(day, hour, format!("{speaker} said: '{message}'"));
    }
    spend_ap(world, actor_id, ActionKind::Speak);
    world.log(format!("{speaker} says to {listener}: '{message}'"));

    Ok(ActionReport {
        kind: ActionKind::Speak,
        description: format!("Said to {listener}: '{message}'"),
        event_kind: EventKind::Speech,
        details: json!({ "target": target_id, "message": message }),
        adjusted: false,
    })
}

// ---------------------------------------------------------------------------
// Attack
// ---------------------------------------------------------------------------

fn execute_attack(
    world: &mut WorldState,
    actor_id: AgentId,
    target_id: AgentId,
    reason: &str,
    combat: &CombatConfig,
    rng: &mut impl Rng,
) -> Result<ActionReport, RejectionReason> {
    let (day, hour) = (world.day, world.hour);
    let attacker_name = actor_name(world, actor_id);
    let target_name = actor_name(world, target_id);

    let (attacker_strength, target_strength) = {
        let attacker = world
            .agents
            .get(&actor_id)
            .ok_or(RejectionReason::ActorDead)?;
        let target = world
            .agents
            .get(&target_id)
            .ok_or(RejectionReason::InvalidTarget)?;
        (i64::from(attacker.strength), i64::from(target.strength))
    };

    // base + truncated strength-difference bonus + uniform roll, never
    // below 1.
    let strength_bonus = (attacker_strength - target_strength) * combat.strength_modifier_pct / 100;
    let roll = i64::from(rng.random_range(0..=combat.random_damage_max));
    let damage = (combat.base_damage + strength_bonus + roll).max(1) as u32;

    let mut target_died = false;
    if let Some(target) = world.agents.get_mut(&target_id) {
        target.health = target.health.saturating_sub(damage);
        target.worsen_relationship(actor_id, combat.victim_penalty);
        target.remember(
            day,
            hour,
            format!("Was attacked by {attacker_name} for {damage} damage"),
        );
        if !target.is_alive() {
            target_died = true;
            target.action_points = 0;
            target.status_tags.insert(
                panopticon_types::enums::StatusTag::Deceased,
            );
        }
    }
    let mut attacker_died = false;
    if let Some(attacker) = world.agents.get_mut(&actor_id) {
        attacker.health = attacker.health.saturating_sub(combat.recoil_damage);
        attacker.worsen_relationship(target_id, combat.attacker_penalty);
        attacker.remember(day, hour, format!("Attacked {target_name}. Reason: {reason}"));
        if !attacker.is_alive() {
            attacker_died = true;
            attacker.action_points = 0;
            attacker.status_tags.insert(
                panopticon_types::enums::StatusTag::Deceased,
            );
        }
    }
    spend_ap(world, actor_id, ActionKind::Attack);
    world.log(format!(
        "{attacker_name} attacks {target_name} for {damage} damage! Reason: {reason}"
    ));
    if target_died {
        world.log(format!("{target_name} has died"));
    }
    if attacker_died {
        world.log(format!("{attacker_name} has died"));
    }

    Ok(ActionReport {
        kind: ActionKind::Attack,
        description: format!("Attacked {target_name} for {damage} damage"),
        event_kind: EventKind::Combat,
        details: json!({
            "target": target_id,
            "damage": damage,
            "reason": reason,
            "target_died": target_died,
            "attacker_died": attacker_died,
        }),
        adjusted: false,
    })
}

// ---------------------------------------------------------------------------
// UseItem
// ---------------------------------------------------------------------------

fn execute_use_item(
    world: &mut WorldState,
    actor_id: AgentId,
    item_id: ItemId,
) -> Result<ActionReport, RejectionReason> {
    let (day, hour) = (world.day, world.hour);
    let name = actor_name(world, actor_id);

    let Some(actor) = world.agents.get_mut(&actor_id) else {
        return Err(RejectionReason::ActorDead);
    };
    let Some(index) = actor.inventory_index(item_id) else {
        return Err(RejectionReason::ItemNotHeld);
    };
    let (item_name, item_kind) = {
        let item = &actor.inventory[index];
        (item.name.clone(), item.kind)
    };

    let line = match item_kind {
        ItemKind::Food => {
            actor.hunger = actor.hunger.saturating_sub(FOOD_HUNGER_RELIEF);
            actor.inventory.remove(index);
            format!("{name} eats {item_name}")
        }
        ItemKind::Water => {
            actor.thirst = actor.thirst.saturating_sub(WATER_THIRST_RELIEF);
            actor.inventory.remove(index);
            format!("{name} drinks {item_name}")
        }
        ItemKind::Book => {
            // Books are not consumed.
            actor.sanity = actor.sanity.saturating_add(BOOK_SANITY_RELIEF).min(VITAL_MAX);
            format!("{name} reads {item_name}")
        }
        _ => return Err(RejectionReason::ItemNotUsable),
    };
    actor.remember(day, hour, format!("Used {item_name}"));
    let ap_remaining = spend_ap(world, actor_id, ActionKind::UseItem);
    world.log(line);

    Ok(ActionReport {
        kind: ActionKind::UseItem,
        description: format!("Used {item_name}"),
        event_kind: EventKind::ItemUse,
        details: json!({
            "item": item_id,
            "item_name": item_name,
            "item_kind": item_kind,
            "action_points_remaining": ap_remaining,
        }),
        adjusted: false,
    })
}

// ---------------------------------------------------------------------------
// Give
// ---------------------------------------------------------------------------

fn execute_give(
    world: &mut WorldState,
    actor_id: AgentId,
    target_id: AgentId,
    item_id: ItemId,
) -> Result<ActionReport, RejectionReason> {
    let (day, hour) = (world.day, world.hour);
    let giver = actor_name(world, actor_id);
    let recipient = actor_name(world, target_id);

    let item = {
        let Some(actor) = world.agents.get_mut(&actor_id) else {
            return Err(RejectionReason::ActorDead);
        };
        let Some(index) = actor.inventory_index(item_id) else {
            return Err(RejectionReason::ItemNotHeld);
        };
        let item = actor.inventory.remove(index);
        actor.remember(day, hour, format!("Gave {} to {recipient}", item.name));
        item
    };
    let item_name = item.name.clone();
    if let Some(target) = world.agents.get_mut(&target_id) {
        target.remember(day, hour, format!("{giver} gave me {item_name}"));
        target.improve_relationship(actor_id, GIFT_GOODWILL);
        target.inventory.push(item);
    }
    spend_ap(world, actor_id, ActionKind::Give);
    world.log(format!("{giver} gives {item_name} to {recipient}"));

    Ok(ActionReport {
        kind: ActionKind::Give,
        description: format!("Gave {item_name} to {recipient}"),
        event_kind: EventKind::ItemUse,
        details: json!({ "target": target_id, "item": item_id, "item_name": item_name }),
        adjusted: false,
    })
}

// ---------------------------------------------------------------------------
// Announce (guard)
// ---------------------------------------------------------------------------

fn execute_announce(
    world: &mut WorldState,
    actor_id: AgentId,
    message: &str,
) -> Result<ActionReport, RejectionReason> {
    let (day, hour) = (world.day, world.hour);
    let announcer = actor_name(world, actor_id);

    let mut heard_by = 0_u32;
    for agent in world.agents.values_mut() {
        if !agent.is_alive() {
            continue;
        }
        if agent.id == actor_id {
            agent.remember(day, hour, format!("Announced: '{message}'"));
        } else {
            agent.remember(day, hour, format!("{announcer} announced: '{message}'"));
            heard_by += 1;
        }
    }
    spend_ap(world, actor_id, ActionKind::Announce);
    world.log(format!("{announcer} announces: '{message}'"));

    Ok(ActionReport {
        kind: ActionKind::Announce,
        description: format!("Announced: '{message}'"),
        event_kind: EventKind::Speech,
        details: json!({ "message": message, "heard_by": heard_by }),
        adjusted: false,
    })
}

// ---------------------------------------------------------------------------
// Inspect (guard)
// ---------------------------------------------------------------------------

fn execute_inspect(
    world: &mut WorldState,
    actor_id: AgentId,
    target_id: AgentId,
) -> Result<ActionReport, RejectionReason> {
    let (day, hour) = (world.day, world.hour);
    let guard = actor_name(world, actor_id);
    let suspect = actor_name(world, target_id);

    let seized: Vec<Item> = {
        let Some(target) = world.agents.get_mut(&target_id) else {
            return Err(RejectionReason::InvalidTarget);
        };
        let mut seized = Vec::new();
        let mut index = 0;
        while index < target.inventory.len() {
            if target.inventory[index].kind.is_contraband() {
                seized.push(target.inventory.remove(index));
            } else {
                index += 1;
            }
        }
        if seized.is_empty() {
            target.remember(day, hour, format!("Was searched by {guard}; nothing found"));
        } else {
            target.remember(day, hour, format!("{guard} confiscated my contraband"));
            target.worsen_relationship(actor_id, CONFISCATION_RESENTMENT);
        }
        seized
    };

    let seized_count = seized.len();
    let seized_names: Vec<String> = seized.iter().map(|item| item.name.clone()).collect();
    if let Some(actor) = world.agents.get_mut(&actor_id) {
        actor.remember(
            day,
            hour,
            format!("Searched {suspect}; seized {seized_count} item(s)"),
        );
        actor.inventory.extend(seized);
    }
    spend_ap(world, actor_id, ActionKind::Inspect);
    if seized_count > 0 {
        world.log(format!(
            "{guard} searches {suspect} and confiscates {seized_count} contraband item(s)"
        ));
    } else {
        world.log(format!("{guard} searches {suspect}; nothing found"));
    }

    Ok(ActionReport {
        kind: ActionKind::Inspect,
        description: format!("Searched {suspect}; seized {seized_count} item(s)"),
        event_kind: EventKind::ItemUse,
        details: json!({ "target": target_id, "seized": seized_names }),
        adjusted: false,
    })
}

// ---------------------------------------------------------------------------
// Punish (guard)
// ---------------------------------------------------------------------------

fn execute_punish(
    world: &mut WorldState,
    actor_id: AgentId,
    target_id: AgentId,
    reason: &str,
) -> Result<ActionReport, RejectionReason> {
    let Some(solitary) = world.map.find_cell(CellKind::Solitary) else {
        return Err(RejectionReason::SolitaryUnavailable);
    };
    if world.is_occupied(solitary, Some(target_id)) {
        return Err(RejectionReason::SolitaryUnavailable);
    }

    let (day, hour) = (world.day, world.hour);
    let guard = actor_name(world, actor_id);
    let punished = actor_name(world, target_id);

    if let Some(target) = world.agents.get_mut(&target_id) {
        target.position = solitary;
        target.sanity = target.sanity.saturating_sub(PUNISH_SANITY_COST);
        target.worsen_relationship(actor_id, PUNISH_RESENTMENT);
        target.remember(
            day,
            hour,
            format!("Sent to solitary by {guard}. Reason: {reason}"),
        );
    }
    if let Some(actor) = world.agents.get_mut(&actor_id) {
        actor.remember(day, hour, format!("Sent {punished} to solitary: {reason}"));
    }
    spend_ap(world, actor_id, ActionKind::Punish);
    world.log(format!(
        "{guard} sends {punished} to solitary! Reason: {reason}"
    ));

    Ok(ActionReport {
        kind: ActionKind::Punish,
        description: format!("Sent {punished} to solitary"),
        event_kind: EventKind::Combat,
        details: json!({
            "target": target_id,
            "reason": reason,
            "solitary": [solitary.x, solitary.y],
        }),
        adjusted: false,
    })
}

// ---------------------------------------------------------------------------
// Assemble (guard)
// ---------------------------------------------------------------------------

fn execute_assemble(
    world: &mut WorldState,
    actor_id: AgentId,
) -> Result<ActionReport, RejectionReason> {
    let (day, hour) = (world.day, world.hour);
    let guard = actor_name(world, actor_id);

    let mut ordered = 0_u32;
    for agent in world.agents.values_mut() {
        if agent.is_alive() && agent.role == Role::Prisoner {
            agent.remember(day, hour, format!("Ordered to assemble by {guard}"));
            ordered += 1;
        }
    }
    if let Some(actor) = world.agents.get_mut(&actor_id) {
        actor.remember(day, hour, "Called an emergency assembly");
    }
    spend_ap(world, actor_id, ActionKind::Assemble);
    world.log(format!("{guard} calls an emergency assembly"));

    Ok(ActionReport {
        kind: ActionKind::Assemble,
        description: String::from("Called an emergency assembly"),
        event_kind: EventKind::Speech,
        details: json!({ "prisoners_ordered": ordered }),
        adjusted: false,
    })
}

// ---------------------------------------------------------------------------
// Steal (prisoner)
// ---------------------------------------------------------------------------

fn execute_steal(
    world: &mut WorldState,
    actor_id: AgentId,
    target_id: AgentId,
    combat: &CombatConfig,
    rng: &mut impl Rng,
) -> Result<ActionReport, RejectionReason> {
    let (day, hour) = (world.day, world.hour);
    let thief = actor_name(world, actor_id);
    let victim = actor_name(world, target_id);

    let (item, detected) = {
        let Some(target) = world.agents.get_mut(&target_id) else {
            return Err(RejectionReason::InvalidTarget);
        };
        if target.inventory.is_empty() {
            return Err(RejectionReason::NothingToTake);
        }
        let index = rng.random_range(0..target.inventory.len());
        let item = target.inventory.remove(index);
        let detected = rng.random_range(0..100) < combat.steal_detection_pct;
        if detected {
            target.worsen_relationship(actor_id, THEFT_RESENTMENT);
            target.remember(day, hour, format!("Caught {thief} stealing my {}", item.name));
        }
        (item, detected)
    };

    let item_name = item.name.clone();
    let item_id = item.id;
    if let Some(actor) = world.agents.get_mut(&actor_id) {
        actor.remember(day, hour, format!("Stole {item_name} from {victim}"));
        actor.inventory.push(item);
    }
    spend_ap(world, actor_id, ActionKind::Steal);
    if detected {
        world.log(format!("{thief} is caught stealing {item_name} from {victim}!"));
    } else {
        world.log(format!("{thief} slips something out of {victim}'s pocket"));
    }

    Ok(ActionReport {
        kind: ActionKind::Steal,
        description: format!("Stole {item_name} from {victim}"),
        event_kind: EventKind::ItemUse,
        details: json!({ "target": target_id, "item": item_id, "detected": detected }),
        adjusted: false,
    })
}

// ---------------------------------------------------------------------------
// Craft (prisoner)
// ---------------------------------------------------------------------------

fn execute_craft(
    world: &mut WorldState,
    actor_id: AgentId,
) -> Result<ActionReport, RejectionReason> {
    let (day, hour) = (world.day, world.hour);
    let name = actor_name(world, actor_id);

    let Some(actor) = world.agents.get_mut(&actor_id) else {
        return Err(RejectionReason::ActorDead);
    };
    let Some(index) = actor
        .inventory
        .iter()
        .position(|item| item.kind == ItemKind::Spoon)
    else {
        return Err(RejectionReason::MissingMaterial);
    };
    actor.inventory.remove(index);
    let shiv = Item::new("Shiv", "A spoon worked into an improvised blade", ItemKind::Shiv);
    let shiv_id = shiv.id;
    actor.inventory.push(shiv);
    actor.remember(day, hour, "Worked a spoon into a shiv");
    spend_ap(world, actor_id, ActionKind::Craft);
    world.log(format!("{name} quietly works on something metallic"));

    Ok(ActionReport {
        kind: ActionKind::Craft,
        description: String::from("Crafted a shiv from a spoon"),
        event_kind: EventKind::ItemUse,
        details: json!({ "produced": shiv_id }),
        adjusted: false,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use panopticon_types::structs::{Agent, Traits};
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
        let mut map = GameMap::new(9, 16).unwrap();
        map.cells.insert(Position::new(1, 14), CellKind::Solitary);
        let mut state = WorldState::new(map);
        for mut agent in agents {
            // Pairs start neutral so relationship deltas are observable.
            agent.relationships.clear();
            state.agents.insert(agent.id, agent);
        }
        let ids: Vec<AgentId> = state.agents.keys().copied().collect();
        for id in &ids {
            for other in &ids {
                if id != other {
                    let relationship =
                        panopticon_types::structs::Relationship::new(50, "neutral");
                    state
                        .agents
                        .get_mut(id)
                        .unwrap()
                        .relationships
                        .insert(*other, relationship);
                }
            }
        }
        state
    }

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(99)
    }

    #[test]
    fn rest_spends_one_ap_and_leaves_a_memory() {
        let actor = Agent::new("Prisoner 1", Role::Prisoner, traits(), Position::new(3, 3));
        let id = actor.id;
        let mut world = world_with(vec![actor]);
        let report =
            execute_command(&mut world, id, &ActionCommand::rest(), &CombatConfig::default(), &mut rng())
                .unwrap();
        assert_eq!(report.kind, ActionKind::Rest);
        let actor = world.agents.get(&id).unwrap();
        assert_eq!(actor.action_points, 2);
        assert_eq!(actor.memory.len(), 1);
    }

    #[test]
    fn adjacent_move_lands_exactly() {
        let actor = Agent::new("Prisoner 1", Role::Prisoner, traits(), Position::new(3, 3));
        let id = actor.id;
        let mut world = world_with(vec![actor]);
        let report = execute_command(
            &mut world,
            id,
            &ActionCommand::move_to(Position::new(4, 3)),
            &CombatConfig::default(),
            &mut rng(),
        )
        .unwrap();
        assert!(!report.adjusted);
        assert_eq!(world.agents.get(&id).unwrap().position, Position::new(4, 3));
    }

    #[test]
    fn distant_move_redirects_one_step_along_bearing() {
        let actor = Agent::new("Prisoner 1", Role::Prisoner, traits(), Position::new(3, 3));
        let id = actor.id;
        let mut world = world_with(vec![actor]);
        let report = execute_command(
            &mut world,
            id,
            &ActionCommand::move_to(Position::new(7, 10)),
            &CombatConfig::default(),
            &mut rng(),
        )
        .unwrap();
        assert!(report.adjusted);
        assert_eq!(world.agents.get(&id).unwrap().position, Position::new(4, 4));
    }

    #[test]
    fn out_of_bounds_move_clamps_after_redirect() {
        let actor = Agent::new("Prisoner 1", Role::Prisoner, traits(), Position::new(0, 0));
        let id = actor.id;
        let mut world = world_with(vec![actor]);
        let report = execute_command(
            &mut world,
            id,
            &ActionCommand::move_to(Position::new(-5, -5)),
            &CombatConfig::default(),
            &mut rng(),
        )
        .unwrap();
        assert!(report.adjusted);
        assert_eq!(world.agents.get(&id).unwrap().position, Position::new(0, 0));
    }

    #[test]
    fn move_into_occupied_cell_is_rejected_without_side_effects() {
        let actor = Agent::new("Prisoner 1", Role::Prisoner, traits(), Position::new(3, 3));
        let blocker = Agent::new("Prisoner 2", Role::Prisoner, traits(), Position::new(4, 3));
        let id = actor.id;
        let mut world = world_with(vec![actor, blocker]);
        let result = execute_command(
            &mut world,
            id,
            &ActionCommand::move_to(Position::new(4, 3)),
            &CombatConfig::default(),
            &mut rng(),
        );
        assert_eq!(result.unwrap_err(), RejectionReason::PositionOccupied);
        let actor = world.agents.get(&id).unwrap();
        // Atomic: no AP spent, no movement, no memory.
        assert_eq!(actor.position, Position::new(3, 3));
        assert_eq!(actor.action_points, 3);
        assert!(actor.memory.is_empty());
    }

    #[test]
    fn attack_applies_damage_recoil_and_asymmetric_fallout() {
        let attacker = Agent::new("Prisoner 1", Role::Prisoner, traits(), Position::new(3, 3));
        let target = Agent::new("Prisoner 2", Role::Prisoner, traits(), Position::new(3, 4));
        let (attacker_id, target_id) = (attacker.id, target.id);
        let mut world = world_with(vec![attacker, target]);
        let combat = CombatConfig::default();
        let report = execute_command(
            &mut world,
            attacker_id,
            &ActionCommand::attack(target_id, "provocation"),
            &combat,
            &mut rng(),
        )
        .unwrap();
        assert_eq!(report.event_kind, EventKind::Combat);

        let target = world.agents.get(&target_id).unwrap();
        let attacker = world.agents.get(&attacker_id).unwrap();
        // Equal strength: damage is base + roll, so at least base.
        assert!(target.health <= 100 - combat.base_damage as u32);
        assert_eq!(attacker.health, 100 - combat.recoil_damage);
        assert_eq!(attacker.action_points, 1);
        // Victim resents more than the attacker devalues.
        assert_eq!(attacker.relationships.get(&target_id).unwrap().score, 40);
        assert_eq!(target.relationships.get(&attacker_id).unwrap().score, 25);
    }

    #[test]
    fn attack_damage_never_below_one() {
        let mut weak = Agent::new("Prisoner 1", Role::Prisoner, traits(), Position::new(3, 3));
        weak.strength = 0;
        let strong = Agent::new("Prisoner 2", Role::Prisoner, traits(), Position::new(3, 4));
        let (weak_id, strong_id) = (weak.id, strong.id);
        let mut world = world_with(vec![weak, strong]);
        let combat = CombatConfig {
            base_damage: 0,
            random_damage_max: 0,
            ..CombatConfig::default()
        };
        execute_command(
            &mut world,
            weak_id,
            &ActionCommand::attack(strong_id, "desperation"),
            &combat,
            &mut rng(),
        )
        .unwrap();
        assert_eq!(world.agents.get(&strong_id).unwrap().health, 99);
    }

    #[test]
    fn recoil_death_marks_the_attacker_deceased() {
        let mut attacker = Agent::new("Prisoner 1", Role::Prisoner, traits(), Position::new(3, 3));
        attacker.health = 2;
        let target = Agent::new("Prisoner 2", Role::Prisoner, traits(), Position::new(3, 4));
        let (attacker_id, target_id) = (attacker.id, target.id);
        let mut world = world_with(vec![attacker, target]);
        let report = execute_command(
            &mut world,
            attacker_id,
            &ActionCommand::attack(target_id, "a last stand"),
            &CombatConfig::default(),
            &mut rng(),
        )
        .unwrap();
        assert_eq!(report.details["attacker_died"], true);

        let attacker = world.agents.get(&attacker_id).unwrap();
        assert!(!attacker.is_alive());
        assert!(attacker
            .status_tags
            .contains(&panopticon_types::enums::StatusTag::Deceased));
        assert_eq!(attacker.action_points, 0);
        assert!(world
            .event_log
            .iter()
            .any(|line| line == "Prisoner 1 has died"));
    }

    #[test]
    fn eating_consumes_food_and_reading_keeps_the_book() {
        let mut actor = Agent::new("Prisoner 1", Role::Prisoner, traits(), Position::new(3, 3));
        actor.hunger = 80;
        actor.sanity = 50;
        let food = Item::new("Prison Food", "Basic cafeteria meal", ItemKind::Food);
        let book = Item::new("Book", "A worn paperback", ItemKind::Book);
        let (food_id, book_id) = (food.id, book.id);
        actor.inventory.push(food);
        actor.inventory.push(book);
        let id = actor.id;
        let mut world = world_with(vec![actor]);

        execute_command(&mut world, id, &ActionCommand::use_item(food_id), &CombatConfig::default(), &mut rng())
            .unwrap();
        execute_command(&mut world, id, &ActionCommand::use_item(book_id), &CombatConfig::default(), &mut rng())
            .unwrap();

        let actor = world.agents.get(&id).unwrap();
        assert_eq!(actor.hunger, 30);
        assert_eq!(actor.sanity, 60);
        assert_eq!(actor.inventory.len(), 1);
        assert_eq!(actor.inventory[0].id, book_id);
        assert_eq!(actor.action_points, 1);
    }

    #[test]
    fn give_transfers_item_and_earns_goodwill() {
        let mut giver = Agent::new("Prisoner 1", Role::Prisoner, traits(), Position::new(3, 3));
        let cigarettes = Item::new("Cigarettes", "A half pack", ItemKind::Cigarettes);
        let item_id = cigarettes.id;
        giver.inventory.push(cigarettes);
        let receiver = Agent::new("Prisoner 2", Role::Prisoner, traits(), Position::new(3, 4));
        let (giver_id, receiver_id) = (giver.id, receiver.id);
        let mut world = world_with(vec![giver, receiver]);

        let command = ActionCommand::from_params(ActionParams::Give {
            target: receiver_id,
            item: item_id,
        });
        execute_command(&mut world, giver_id, &command, &CombatConfig::default(), &mut rng())
            .unwrap();

        let receiver = world.agents.get(&receiver_id).unwrap();
        assert!(receiver.inventory.iter().any(|item| item.id == item_id));
        assert_eq!(receiver.relationships.get(&giver_id).unwrap().score, 55);
        assert!(world.agents.get(&giver_id).unwrap().inventory.is_empty());
    }

    #[test]
    fn announce_reaches_every_living_agent() {
        let guard = Agent::new("Guard 1", Role::Guard, traits(), Position::new(1, 1));
        let prisoner = Agent::new("Prisoner 1", Role::Prisoner, traits(), Position::new(7, 12));
        let mut dead = Agent::new("Prisoner 2", Role::Prisoner, traits(), Position::new(5, 5));
        dead.health = 0;
        let (guard_id, prisoner_id, dead_id) = (guard.id, prisoner.id, dead.id);
        let mut world = world_with(vec![guard, prisoner, dead]);

        let command = ActionCommand::from_params(ActionParams::Announce {
            message: String::from("Lights out at 22:00"),
        });
        execute_command(&mut world, guard_id, &command, &CombatConfig::default(), &mut rng())
            .unwrap();

        assert_eq!(world.agents.get(&prisoner_id).unwrap().memory.len(), 1);
        assert!(world.agents.get(&dead_id).unwrap().memory.is_empty());
        assert_eq!(world.agents.get(&guard_id).unwrap().memory.len(), 1);
    }

    #[test]
    fn inspect_confiscates_only_contraband() {
        let guard = Agent::new("Guard 1", Role::Guard, traits(), Position::new(3, 3));
        let mut prisoner = Agent::new("Prisoner 1", Role::Prisoner, traits(), Position::new(3, 4));
        prisoner
            .inventory
            .push(Item::new("Shiv", "An improvised blade", ItemKind::Shiv));
        prisoner
            .inventory
            .push(Item::new("Diary", "A personal diary", ItemKind::Diary));
        let (guard_id, prisoner_id) = (guard.id, prisoner.id);
        let mut world = world_with(vec![guard, prisoner]);

        let command = ActionCommand::from_params(ActionParams::Inspect { target: prisoner_id });
        execute_command(&mut world, guard_id, &command, &CombatConfig::default(), &mut rng())
            .unwrap();

        let prisoner = world.agents.get(&prisoner_id).unwrap();
        assert_eq!(prisoner.inventory.len(), 1);
        assert_eq!(prisoner.inventory[0].kind, ItemKind::Diary);
        assert_eq!(prisoner.relationships.get(&guard_id).unwrap().score, 40);
        let guard = world.agents.get(&guard_id).unwrap();
        assert!(guard.inventory.iter().any(|item| item.kind == ItemKind::Shiv));
    }

    #[test]
    fn punish_relocates_to_solitary_and_breaks_spirit() {
        let guard = Agent::new("Guard 1", Role::Guard, traits(), Position::new(2, 13));
        let prisoner = Agent::new("Prisoner 1", Role::Prisoner, traits(), Position::new(2, 14));
        let (guard_id, prisoner_id) = (guard.id, prisoner.id);
        let mut world = world_with(vec![guard, prisoner]);

        let command = ActionCommand::from_params(ActionParams::Punish {
            target: prisoner_id,
            reason: String::from("contraband"),
        });
        execute_command(&mut world, guard_id, &command, &CombatConfig::default(), &mut rng())
            .unwrap();

        let prisoner = world.agents.get(&prisoner_id).unwrap();
        assert_eq!(prisoner.position, Position::new(1, 14));
        assert_eq!(prisoner.sanity, 85);
        assert_eq!(prisoner.relationships.get(&guard_id).unwrap().score, 30);
        assert_eq!(world.agents.get(&guard_id).unwrap().action_points, 1);
    }

    #[test]
    fn steal_moves_a_random_item_to_the_thief() {
        let thief = Agent::new("Prisoner 1", Role::Prisoner, traits(), Position::new(3, 3));
        let mut victim = Agent::new("Prisoner 2", Role::Prisoner, traits(), Position::new(3, 4));
        victim
            .inventory
            .push(Item::new("Soap", "A bar of soap", ItemKind::Soap));
        let (thief_id, victim_id) = (thief.id, victim.id);
        let mut world = world_with(vec![thief, victim]);

        let command = ActionCommand::from_params(ActionParams::Steal { target: victim_id });
        let report =
            execute_command(&mut world, thief_id, &command, &CombatConfig::default(), &mut rng())
                .unwrap();

        assert!(world.agents.get(&victim_id).unwrap().inventory.is_empty());
        assert_eq!(world.agents.get(&thief_id).unwrap().inventory.len(), 1);
        assert!(report.details.get("detected").is_some());
    }

    #[test]
    fn craft_turns_a_spoon_into_a_shiv() {
        let mut prisoner = Agent::new("Prisoner 1", Role::Prisoner, traits(), Position::new(3, 3));
        prisoner
            .inventory
            .push(Item::new("Spoon", "A metal spoon", ItemKind::Spoon));
        let id = prisoner.id;
        let mut world = world_with(vec![prisoner]);

        let command = ActionCommand::from_params(ActionParams::Craft);
        execute_command(&mut world, id, &command, &CombatConfig::default(), &mut rng()).unwrap();

        let prisoner = world.agents.get(&id).unwrap();
        assert_eq!(prisoner.inventory.len(), 1);
        assert_eq!(prisoner.inventory[0].kind, ItemKind::Shiv);
        assert_eq!(prisoner.action_points, 1);
    }
}
