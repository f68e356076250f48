//! Tunable vitals and combat parameters.
//!
//! Both structs deserialize from the `status:` and `combat:` sections of
//! the simulation YAML; every field has a named default so partial
//! documents parse.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Vitals
// ---------------------------------------------------------------------------

/// Parameters for the hourly status phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VitalsConfig {
    /// Hunger gained per in-sim hour.
    #[serde(default = "default_hunger_per_hour")]
    pub hunger_per_hour: u32,

    /// Thirst gained per in-sim hour.
    #[serde(default = "default_thirst_per_hour")]
    pub thirst_per_hour: u32,

    /// Sanity lost per active physical-distress status tag per hour.
    #[serde(default = "default_sanity_penalty_per_tag")]
    pub sanity_penalty_per_tag: u32,

    /// Hunger level above which starvation damage begins.
    #[serde(default = "default_hunger_damage_threshold")]
    pub hunger_damage_threshold: u32,

    /// Divisor in the convex hunger damage curve `(excess^2 / divisor)`.
    #[serde(default = "default_hunger_damage_divisor")]
    pub hunger_damage_divisor: u32,

    /// Maximum health lost to hunger in one hour.
    #[serde(default = "default_hunger_damage_cap")]
    pub hunger_damage_cap: u32,

    /// Thirst level above which dehydration damage begins.
    #[serde(default = "default_thirst_damage_threshold")]
    pub thirst_damage_threshold: u32,

    /// Divisor in the convex thirst damage curve `(excess^2 / divisor)`.
    #[serde(default = "default_thirst_damage_divisor")]
    pub thirst_damage_divisor: u32,

    /// Maximum health lost to thirst in one hour.
    #[serde(default = "default_thirst_damage_cap")]
    pub thirst_damage_cap: u32,
}

impl Default for VitalsConfig {
    fn default() -> Self {
        Self {
            hunger_per_hour: default_hunger_per_hour(),
            thirst_per_hour: default_thirst_per_hour(),
            sanity_penalty_per_tag: default_sanity_penalty_per_tag(),
            hunger_damage_threshold: default_hunger_damage_threshold(),
            hunger_damage_divisor: default_hunger_damage_divisor(),
            hunger_damage_cap: default_hunger_damage_cap(),
            thirst_damage_threshold: default_thirst_damage_threshold(),
            thirst_damage_divisor: default_thirst_damage_divisor(),
            thirst_damage_cap: default_thirst_damage_cap(),
        }
    }
}

const fn default_hunger_per_hour() -> u32 {
    3
}

const fn default_thirst_per_hour() -> u32 {
    4
}

const fn default_sanity_penalty_per_tag() -> u32 {
    2
}

const fn default_hunger_damage_threshold() -> u32 {
    80
}

const fn default_hunger_damage_divisor() -> u32 {
    40
}

const fn default_hunger_damage_cap() -> u32 {
    15
}

const fn default_thirst_damage_threshold() -> u32 {
    75
}

const fn default_thirst_damage_divisor() -> u32 {
    30
}

const fn default_thirst_damage_cap() -> u32 {
    20
}

// ---------------------------------------------------------------------------
// Combat
// ---------------------------------------------------------------------------

/// Parameters for attacks, theft, and relationship fallout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatConfig {
    /// Flat damage every attack starts from.
    #[serde(default = "default_base_damage")]
    pub base_damage: i64,

    /// Percentage of the attacker/target strength difference added to
    /// damage (50 means half the difference).
    #[serde(default = "default_strength_modifier_pct")]
    pub strength_modifier_pct: i64,

    /// Upper bound of the uniform random damage bonus (inclusive).
    #[serde(default = "default_random_damage_max")]
    pub random_damage_max: u32,

    /// Health the attacker loses for throwing a punch.
    #[serde(default = "default_recoil_damage")]
    pub recoil_damage: u32,

    /// How much the attacker's regard for the target drops.
    #[serde(default = "default_attacker_penalty")]
    pub attacker_penalty: u32,

    /// How much the target's regard for the attacker drops. Strictly
    /// larger than `attacker_penalty`: the victim resents the attack
    /// more than the attacker devalues the victim.
    #[serde(default = "default_victim_penalty")]
    pub victim_penalty: u32,

    /// Percent chance a theft is noticed by the victim.
    #[serde(default = "default_steal_detection_pct")]
    pub steal_detection_pct: u32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            base_damage: default_base_damage(),
            strength_modifier_pct: default_strength_modifier_pct(),
            random_damage_max: default_random_damage_max(),
            recoil_damage: default_recoil_damage(),
            attacker_penalty: default_attacker_penalty(),
            victim_penalty: default_victim_penalty(),
            steal_detection_pct: default_steal_detection_pct(),
        }
    }
}

const fn default_base_damage() -> i64 {
    10
}

const fn default_strength_modifier_pct() -> i64 {
    50
}

const fn default_random_damage_max() -> u32 {
    5
}

const fn default_recoil_damage() -> u32 {
    2
}

const fn default_attacker_penalty() -> u32 {
    10
}

const fn default_victim_penalty() -> u32 {
    25
}

const fn default_steal_detection_pct() -> u32 {
    50
}
