//! Hourly vital decay, starvation damage, status tags, and AP reset.
//!
//! Order of operations each status phase, per agent:
//!
//! 1. Hunger and thirst rise by their hourly rates, clamped to 100.
//! 2. Starvation damage: convex curves kick in above the thresholds --
//!    `(hunger - threshold)^2 / divisor` capped per hour, likewise for
//!    thirst. Health saturates at 0.
//! 3. Sanity drops by a flat penalty for each physical-distress tag that
//!    was active going into this hour.
//! 4. Status tags are recomputed from scratch as a pure function of the
//!    updated vitals.
//! 5. Action points reset from current health.
//!
//! All arithmetic clamps; nothing here can overflow or panic.

use std::collections::BTreeSet;

use panopticon_types::enums::StatusTag;
use panopticon_types::structs::{ACTION_POINTS_MAX, Agent, VITAL_MAX};

use crate::config::VitalsConfig;

/// What one status phase did to an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VitalTickResult {
    /// Health lost to hunger and thirst this hour.
    pub damage_taken: u32,
    /// Sanity lost to active distress tags this hour.
    pub sanity_lost: u32,
    /// Whether the agent died during this phase.
    pub died: bool,
}

/// Action points granted for a given health value:
/// `min(3, 3 - max(0, (100 - health) / 25))` in integer arithmetic.
pub const fn action_points_for_health(health: u32) -> u32 {
    let deficit = (VITAL_MAX.saturating_sub(health)) / 25;
    ACTION_POINTS_MAX.saturating_sub(deficit)
}

/// Recompute the full status tag set from current vitals.
///
/// Pure: same vitals in, same tags out, no dependence on prior tags.
pub fn derive_status_tags(health: u32, sanity: u32, hunger: u32, thirst: u32) -> BTreeSet<StatusTag> {
    let mut tags = BTreeSet::new();

    if hunger > 90 {
        tags.insert(StatusTag::Starving);
    } else if hunger > 80 {
        tags.insert(StatusTag::VeryHungry);
    } else if hunger > 60 {
        tags.insert(StatusTag::Hungry);
    }

    if thirst > 85 {
        tags.insert(StatusTag::Dehydrated);
    } else if thirst > 75 {
        tags.insert(StatusTag::VeryThirsty);
    } else if thirst > 55 {
        tags.insert(StatusTag::Thirsty);
    }

    if health < 20 {
        tags.insert(StatusTag::Critical);
    } else if health < 40 {
        tags.insert(StatusTag::Injured);
    } else if health < 60 {
        tags.insert(StatusTag::Wounded);
    }

    if sanity < 20 {
        tags.insert(StatusTag::Unhinged);
    } else if sanity < 40 {
        tags.insert(StatusTag::Unstable);
    } else if sanity < 60 {
        tags.insert(StatusTag::Stressed);
    }

    if health == 0 {
        tags.insert(StatusTag::Deceased);
    }

    tags
}

/// Convex damage curve: `(value - threshold)^2 / divisor`, capped.
fn starvation_damage(value: u32, threshold: u32, divisor: u32, cap: u32) -> u32 {
    if value <= threshold || divisor == 0 {
        return 0;
    }
    let excess = value - threshold;
    (excess.saturating_mul(excess) / divisor).min(cap)
}

/// Apply one hour of decay to a living agent.
///
/// The caller is responsible for skipping dead agents and for recording
/// the returned damage/death in memories and the event log.
pub fn apply_hourly_decay(agent: &mut Agent, config: &VitalsConfig) -> VitalTickResult {
    let was_alive = agent.is_alive();

    // 1. Hunger and thirst rise.
    agent.hunger = agent.hunger.saturating_add(config.hunger_per_hour).min(VITAL_MAX);
    agent.thirst = agent.thirst.saturating_add(config.thirst_per_hour).min(VITAL_MAX);

    // 2. Starvation and dehydration damage.
    let hunger_damage = starvation_damage(
        agent.hunger,
        config.hunger_damage_threshold,
        config.hunger_damage_divisor,
        config.hunger_damage_cap,
    );
    let thirst_damage = starvation_damage(
        agent.thirst,
        config.thirst_damage_threshold,
        config.thirst_damage_divisor,
        config.thirst_damage_cap,
    );
    let damage_taken = hunger_damage.saturating_add(thirst_damage);
    agent.health = agent.health.saturating_sub(damage_taken);

    // 3. Sanity erosion from the tags that were active going into this hour.
    let distress_tags = agent
        .status_tags
        .iter()
        .filter(|tag| tag.erodes_sanity())
        .count() as u32;
    let sanity_lost = distress_tags.saturating_mul(config.sanity_penalty_per_tag);
    agent.sanity = agent.sanity.saturating_sub(sanity_lost);

    // 4. Recompute tags from the updated vitals.
    agent.status_tags = derive_status_tags(agent.health, agent.sanity, agent.hunger, agent.thirst);

    // 5. Reset action points from current health.
    agent.action_points = action_points_for_health(agent.health);

    VitalTickResult {
        damage_taken,
        sanity_lost,
        died: was_alive && !agent.is_alive(),
    }
}
