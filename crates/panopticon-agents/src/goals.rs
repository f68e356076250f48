//! Need-driven goal selection.
//!
//! Candidate goals are generated tier by tier (survival, safety, social,
//! role duty, exploration) and scored; the highest score wins, with ties
//! going to the earlier tier. A living agent always gets at least the
//! do-nothing goal, so selection never comes back empty for someone who
//! can act.

use panopticon_types::actions::ActionCommand;
use panopticon_types::enums::{ItemKind, NeedTier, Role};
use panopticon_types::ids::AgentId;
use panopticon_types::structs::{Agent, Position};
use panopticon_world::WorldState;
use rand::Rng;
use rand::seq::IteratorRandom;

use crate::actions::costs::INTERACTION_RANGE;

/// Relationship score below which another agent reads as a threat.
const HOSTILE_BELOW: u32 = 40;

/// Relationship score above which another agent counts as an ally.
const ALLY_ABOVE: u32 = 60;

/// How far an escape search looks for candidate cells.
const ESCAPE_SEARCH_RANGE: u32 = 8;

/// Minimum distance from the threat an escape cell must have.
const ESCAPE_CLEARANCE: u32 = 3;

/// One scored candidate produced by the need evaluator.
#[derive(Debug, Clone)]
pub struct Goal {
    /// Short name, e.g. "find food".
    pub name: String,
    /// Which need tier produced this goal.
    pub tier: NeedTier,
    /// Urgency score; higher wins.
    pub score: u32,
    /// The command that pursues the goal.
    pub command: ActionCommand,
    /// Why the goal exists, for logs and decision prompts.
    pub rationale: String,
}

impl Goal {
    fn new(
        name: impl Into<String>,
        tier: NeedTier,
        score: u32,
        command: ActionCommand,
        rationale: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            tier,
            score,
            command,
            rationale: rationale.into(),
        }
    }
}

/// Evaluate every need tier for `agent_id` and return the winning goal.
///
/// Returns `None` only for missing or dead agents. Ties break toward the
/// earlier tier, so survival beats safety beats social at equal scores.
pub fn select_goal(world: &WorldState, agent_id: AgentId, rng: &mut impl Rng) -> Option<Goal> {
    let agent = world.agents.get(&agent_id)?;
    if !agent.is_alive() {
        return None;
    }

    let mut candidates = Vec::new();
    survival_goals(world, agent, &mut candidates);
    safety_goals(world, agent, &mut candidates);
    social_goals(world, agent, &mut candidates);
    role_goals(world, agent, &mut candidates);
    exploration_goals(world, agent, rng, &mut candidates);
    candidates.push(Goal::new(
        "do nothing",
        NeedTier::Exploration,
        1,
        ActionCommand::rest(),
        "No pressing needs",
    ));

    // First strictly-greater score wins, so earlier tiers take ties.
    candidates.into_iter().reduce(|best, candidate| {
        if candidate.score > best.score {
            candidate
        } else {
            best
        }
    })
}

// ---------------------------------------------------------------------------
// Tier generators
// ---------------------------------------------------------------------------

fn survival_goals(world: &WorldState, agent: &Agent, out: &mut Vec<Goal>) {
    // Critically wounded: get away from whoever is hostile, or lie low.
    if agent.health < 30 {
        let score = 100 - agent.health;
        let command = match nearest_threat(world, agent) {
            Some((threat_pos, _)) => escape_position(world, agent, threat_pos)
                .map_or_else(ActionCommand::rest, ActionCommand::move_to),
            None => ActionCommand::rest(),
        };
        out.push(Goal::new(
            "preserve life",
            NeedTier::Survival,
            score,
            command,
            format!("Health critical at {}", agent.health),
        ));
    }

    if agent.hunger > 85 {
        let score = 90 + agent.hunger - 85;
        if let Some(goal) = food_goal(world, agent, NeedTier::Survival, score) {
            out.push(goal);
        }
    }
    if agent.thirst > 80 {
        let score = 88 + agent.thirst - 80;
        if let Some(goal) = water_goal(world, agent, NeedTier::Survival, score) {
            out.push(goal);
        }
    }
}

fn safety_goals(world: &WorldState, agent: &Agent, out: &mut Vec<Goal>) {
    if let Some((threat_pos, threat_id)) = nearest_threat(world, agent) {
        let distance = agent.position.manhattan_distance(threat_pos);
        if distance <= INTERACTION_RANGE
            && let Some(escape) = escape_position(world, agent, threat_pos)
        {
            let threat_name = world
                .agents
                .get(&threat_id)
                .map_or_else(|| String::from("a hostile"), |threat| threat.name.clone());
            out.push(Goal::new(
                "escape threat",
                NeedTier::Safety,
                80 - distance * 10,
                ActionCommand::move_to(escape),
                format!("{threat_name} is too close"),
            ));
        }
    }

    if agent.hunger > 60 {
        let score = 50 + agent.hunger - 60;
        if let Some(goal) = food_goal(world, agent, NeedTier::Safety, score) {
            out.push(goal);
        }
    }
    if agent.thirst > 55 {
        let score = 48 + agent.thirst - 55;
        if let Some(goal) = water_goal(world, agent, NeedTier::Safety, score) {
            out.push(goal);
        }
    }
}

fn social_goals(world: &WorldState, agent: &Agent, out: &mut Vec<Goal>) {
    let has_allies = agent
        .relationships
        .iter()
        .any(|(other, relationship)| relationship.score > ALLY_ABOVE && is_living(world, *other));

    if has_allies {
        // Keep an existing bond warm when an ally is in earshot.
        let ally_nearby = world
            .living_agents_near(agent.id, INTERACTION_RANGE)
            .into_iter()
            .find(|other| regard(agent, *other).is_some_and(|score| score > ALLY_ABOVE));
        if let Some(ally) = ally_nearby {
            out.push(Goal::new(
                "maintain bond",
                NeedTier::Social,
                30,
                ActionCommand::speak(ally, "Good to see a familiar face."),
                "Staying close to an ally",
            ));
        }
        return;
    }

    // Lonely: approach a same-role agent who is not hostile.
    let candidate = world
        .living_agents_near(agent.id, INTERACTION_RANGE)
        .into_iter()
        .find(|other| {
            let same_role = world
                .agents
                .get(other)
                .is_some_and(|other_agent| other_agent.role == agent.role);
            let not_hostile = regard(agent, *other).is_none_or(|score| score > 30);
            same_role && not_hostile
        });
    if let Some(target) = candidate {
        out.push(Goal::new(
            "make an ally",
            NeedTier::Social,
            40,
            ActionCommand::speak(target, "We should look out for each other."),
            "No allies yet",
        ));
    }
}

fn role_goals(world: &WorldState, agent: &Agent, out: &mut Vec<Goal>) {
    let width = world.map.width;
    let height = world.map.height;
    match agent.role {
        Role::Guard => {
            // Patrol the far corners and the center; head for whichever
            // is farthest from here.
            let posts = [
                Position::new(1, 1),
                Position::new(width - 2, 1),
                Position::new(1, height - 2),
                Position::new(width - 2, height - 2),
                Position::new(width / 2, height / 2),
            ];
            let farthest = posts
                .into_iter()
                .max_by_key(|post| (agent.position.manhattan_distance(*post), post.x, post.y));
            if let Some(post) = farthest {
                out.push(Goal::new(
                    "patrol",
                    NeedTier::RoleDuty,
                    25,
                    ActionCommand::move_to(post),
                    "Walking the rounds",
                ));
            }
        }
        Role::Prisoner => {
            // Drift toward the quieter spots near the yard.
            let safe_areas = [
                Position::new(2, height - 6),
                Position::new(width - 3, height - 6),
                Position::new(width / 2, height - 4),
            ];
            let nearest = safe_areas
                .into_iter()
                .filter(|area| *area != agent.position)
                .min_by_key(|area| (agent.position.manhattan_distance(*area), area.x, area.y));
            if let Some(area) = nearest {
                out.push(Goal::new(
                    "keep a low profile",
                    NeedTier::RoleDuty,
                    20,
                    ActionCommand::move_to(area),
                    "Staying out of trouble",
                ));
            }
        }
    }
}

fn exploration_goals(world: &WorldState, agent: &Agent, rng: &mut impl Rng, out: &mut Vec<Goal>) {
    if agent.sanity < 60 {
        if let Some(book) = agent
            .inventory
            .iter()
            .find(|item| item.kind == ItemKind::Book)
        {
            out.push(Goal::new(
                "read",
                NeedTier::Exploration,
                17,
                ActionCommand::use_item(book.id),
                "A book would settle the nerves",
            ));
        } else if let Some(book_pos) = world.map.nearest_item_of_kind(agent.position, ItemKind::Book)
        {
            out.push(Goal::new(
                "find a book",
                NeedTier::Exploration,
                15,
                ActionCommand::move_to(book_pos),
                "A book would settle the nerves",
            ));
        }
    }

    let width = world.map.width;
    let height = world.map.height;
    let far_corners = [
        Position::new(0, 0),
        Position::new(width - 1, 0),
        Position::new(0, height - 1),
        Position::new(width - 1, height - 1),
        Position::new(width / 2, height / 2),
    ];
    let destination = far_corners
        .into_iter()
        .filter(|corner| agent.position.manhattan_distance(*corner) > 3)
        .choose(rng);
    if let Some(corner) = destination {
        out.push(Goal::new(
            "wander",
            NeedTier::Exploration,
            10,
            ActionCommand::move_to(corner),
            "Nothing better to do",
        ));
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Eat what is carried, otherwise head for the nearest food on the map.
/// Eating scores slightly above walking.
fn food_goal(world: &WorldState, agent: &Agent, tier: NeedTier, score: u32) -> Option<Goal> {
    if let Some(food) = agent
        .inventory
        .iter()
        .find(|item| item.kind == ItemKind::Food)
    {
        return Some(Goal::new(
            "eat",
            tier,
            score + 2,
            ActionCommand::use_item(food.id),
            format!("Hunger at {}", agent.hunger),
        ));
    }
    let food_pos = world
        .map
        .nearest_item_of_kind(agent.position, ItemKind::Food)?;
    Some(Goal::new(
        "find food",
        tier,
        score,
        ActionCommand::move_to(food_pos),
        format!("Hunger at {}", agent.hunger),
    ))
}

fn water_goal(world: &WorldState, agent: &Agent, tier: NeedTier, score: u32) -> Option<Goal> {
    if let Some(water) = agent
        .inventory
        .iter()
        .find(|item| item.kind == ItemKind::Water)
    {
        return Some(Goal::new(
            "drink",
            tier,
            score + 2,
            ActionCommand::use_item(water.id),
            format!("Thirst at {}", agent.thirst),
        ));
    }
    let water_pos = world
        .map
        .nearest_item_of_kind(agent.position, ItemKind::Water)?;
    Some(Goal::new(
        "find water",
        tier,
        score,
        ActionCommand::move_to(water_pos),
        format!("Thirst at {}", agent.thirst),
    ))
}

fn regard(agent: &Agent, other: AgentId) -> Option<u32> {
    agent
        .relationships
        .get(&other)
        .map(|relationship| relationship.score)
}

fn is_living(world: &WorldState, id: AgentId) -> bool {
    world.agents.get(&id).is_some_and(Agent::is_alive)
}

/// The most dangerous hostile: regard below [`HOSTILE_BELOW`], weighted
/// by proximity.
fn nearest_threat(world: &WorldState, agent: &Agent) -> Option<(Position, AgentId)> {
    agent
        .relationships
        .iter()
        .filter(|(_, relationship)| relationship.score < HOSTILE_BELOW)
        .filter_map(|(other, relationship)| {
            let other_agent = world.agents.get(other)?;
            if !other_agent.is_alive() {
                return None;
            }
            let distance = agent.position.manhattan_distance(other_agent.position);
            let weight = (HOSTILE_BELOW - relationship.score) * (5 - distance.min(4));
            Some((weight, other_agent.position, *other))
        })
        .max_by_key(|(weight, position, _)| (*weight, position.x, position.y))
        .map(|(_, position, id)| (position, id))
}

/// A free cell near the agent that puts clearance between it and the
/// threat, preferring the cell farthest from the threat.
fn escape_position(world: &WorldState, agent: &Agent, threat: Position) -> Option<Position> {
    let range = ESCAPE_SEARCH_RANGE as i32;
    let mut best: Option<(u32, Position)> = None;
    for dx in -range..=range {
        for dy in -range..=range {
            let candidate = Position::new(agent.position.x + dx, agent.position.y + dy);
            if !world.map.in_bounds(candidate)
                || agent.position.manhattan_distance(candidate) > ESCAPE_SEARCH_RANGE
            {
                continue;
            }
            let clearance = candidate.manhattan_distance(threat);
            if clearance <= ESCAPE_CLEARANCE {
                continue;
            }
            if world.is_occupied(candidate, Some(agent.id)) {
                continue;
            }
            let better = match best {
                Some((best_clearance, _)) => clearance > best_clearance,
                None => true,
            };
            if better {
                best = Some((clearance, candidate));
            }
        }
    }
    best.map(|(_, position)| position)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use panopticon_types::enums::ActionKind;
    use panopticon_types::structs::{Item, Relationship, Traits};
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

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(11)
    }

    #[test]
    fn starving_agent_moves_toward_food() {
        let mut agent = Agent::new("Prisoner 1", Role::Prisoner, traits(), Position::new(4, 4));
        agent.hunger = 95;
        let id = agent.id;
        let mut world = world_with(vec![agent]);
        world
            .map
            .place_item(
                Position::new(4, 7),
                Item::new("Prison Food", "Basic cafeteria meal", ItemKind::Food),
            )
            .unwrap();

        let goal = select_goal(&world, id, &mut rng()).unwrap();
        assert_eq!(goal.tier, NeedTier::Survival);
        assert_eq!(goal.score, 100);
        assert_eq!(goal.command.kind, ActionKind::Move);
    }

    #[test]
    fn carried_food_beats_walking_to_food() {
        let mut agent = Agent::new("Prisoner 1", Role::Prisoner, traits(), Position::new(4, 4));
        agent.hunger = 90;
        agent
            .inventory
            .push(Item::new("Prison Food", "Basic cafeteria meal", ItemKind::Food));
        let id = agent.id;
        let mut world = world_with(vec![agent]);
        world
            .map
            .place_item(
                Position::new(4, 5),
                Item::new("Prison Food", "Basic cafeteria meal", ItemKind::Food),
            )
            .unwrap();

        let goal = select_goal(&world, id, &mut rng()).unwrap();
        assert_eq!(goal.name, "eat");
        assert_eq!(goal.command.kind, ActionKind::UseItem);
        assert_eq!(goal.score, 97);
    }

    #[test]
    fn wounded_agent_flees_the_hostile() {
        let mut agent = Agent::new("Prisoner 1", Role::Prisoner, traits(), Position::new(4, 4));
        agent.health = 20;
        let enemy = Agent::new("Prisoner 2", Role::Prisoner, traits(), Position::new(4, 5));
        agent
            .relationships
            .insert(enemy.id, Relationship::new(10, "attacked me"));
        let id = agent.id;
        let world = world_with(vec![agent, enemy]);

        let goal = select_goal(&world, id, &mut rng()).unwrap();
        assert_eq!(goal.tier, NeedTier::Survival);
        assert_eq!(goal.score, 80);
        assert_eq!(goal.command.kind, ActionKind::Move);
        // The flight destination clears the threat.
        if let panopticon_types::actions::ActionParams::Move { target } = goal.command.params {
            assert!(target.manhattan_distance(Position::new(4, 5)) > 3);
        }
    }

    #[test]
    fn adjacent_hostile_triggers_safety_escape() {
        let mut agent = Agent::new("Prisoner 1", Role::Prisoner, traits(), Position::new(4, 4));
        let enemy = Agent::new("Prisoner 2", Role::Prisoner, traits(), Position::new(4, 5));
        agent
            .relationships
            .insert(enemy.id, Relationship::new(20, "threatened me"));
        let id = agent.id;
        let world = world_with(vec![agent, enemy]);

        let goal = select_goal(&world, id, &mut rng()).unwrap();
        assert_eq!(goal.tier, NeedTier::Safety);
        assert_eq!(goal.name, "escape threat");
        assert_eq!(goal.score, 70);
    }

    #[test]
    fn lonely_agent_reaches_out() {
        let agent = Agent::new("Prisoner 1", Role::Prisoner, traits(), Position::new(4, 4));
        let peer = Agent::new("Prisoner 2", Role::Prisoner, traits(), Position::new(4, 5));
        let id = agent.id;
        let world = world_with(vec![agent, peer]);

        let goal = select_goal(&world, id, &mut rng()).unwrap();
        assert_eq!(goal.tier, NeedTier::Social);
        assert_eq!(goal.name, "make an ally");
        assert_eq!(goal.score, 40);
        assert_eq!(goal.command.kind, ActionKind::Speak);
    }

    #[test]
    fn content_guard_walks_the_rounds() {
        let guard = Agent::new("Guard 1", Role::Guard, traits(), Position::new(1, 1));
        let id = guard.id;
        let world = world_with(vec![guard]);

        let goal = select_goal(&world, id, &mut rng()).unwrap();
        assert_eq!(goal.tier, NeedTier::RoleDuty);
        assert_eq!(goal.name, "patrol");
        assert_eq!(goal.score, 25);
        // Farthest post from (1, 1) is the opposite corner.
        if let panopticon_types::actions::ActionParams::Move { target } = goal.command.params {
            assert_eq!(target, Position::new(7, 14));
        }
    }

    #[test]
    fn hunger_outranks_thirst_at_equal_scores() {
        // hunger 90 -> 95, thirst 87 -> 95: same score, hunger generated
        // first, so it wins the tie.
        let mut agent = Agent::new("Prisoner 1", Role::Prisoner, traits(), Position::new(4, 4));
        agent.hunger = 90;
        agent.thirst = 87;
        let id = agent.id;
        let mut world = world_with(vec![agent]);
        world
            .map
            .place_item(
                Position::new(4, 6),
                Item::new("Prison Food", "Basic cafeteria meal", ItemKind::Food),
            )
            .unwrap();
        world
            .map
            .place_item(
                Position::new(4, 2),
                Item::new("Water Ration", "A sealed cup of water", ItemKind::Water),
            )
            .unwrap();

        let goal = select_goal(&world, id, &mut rng()).unwrap();
        assert_eq!(goal.score, 95);
        assert_eq!(goal.name, "find food");
    }

    #[test]
    fn dead_agents_have_no_goals() {
        let mut agent = Agent::new("Prisoner 1", Role::Prisoner, traits(), Position::new(4, 4));
        agent.health = 0;
        let id = agent.id;
        let world = world_with(vec![agent]);
        assert!(select_goal(&world, id, &mut rng()).is_none());
    }

    #[test]
    fn frazzled_agent_seeks_a_book() {
        let mut agent = Agent::new("Prisoner 1", Role::Prisoner, traits(), Position::new(4, 4));
        agent.sanity = 50;
        agent
            .inventory
            .push(Item::new("Book", "A worn paperback", ItemKind::Book));
        let id = agent.id;
        let world = world_with(vec![agent]);

        // Book beats the role-duty drift only when nothing above fires;
        // here role duty (20) outranks reading (17).
        let goal = select_goal(&world, id, &mut rng()).unwrap();
        assert_eq!(goal.tier, NeedTier::RoleDuty);

        // Strip the role goal by standing on every safe area in turn is
        // impractical; instead check the tier list directly.
        let mut candidates = Vec::new();
        let agent_ref = world.agents.get(&id).unwrap();
        exploration_goals(&world, agent_ref, &mut rng(), &mut candidates);
        assert!(candidates.iter().any(|goal| goal.name == "read"));
    }
}
