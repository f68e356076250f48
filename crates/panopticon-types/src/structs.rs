//! Core entity structs for the Panopticon simulation.
//!
//! Vitals are integer scales. Health, sanity, hunger, and thirst live on
//! 0-100; action points on 0-3. All mutation helpers clamp rather than
//! overflow, so invariant enforcement lives next to the data.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::enums::{ItemKind, Role, StatusTag};
use crate::ids::{AgentId, ItemId, ObjectiveId};

/// Upper bound for health, sanity, hunger, and thirst.
pub const VITAL_MAX: u32 = 100;

/// Action points granted at full health.
pub const ACTION_POINTS_MAX: u32 = 3;

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A cell coordinate on the facility grid.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct Position {
    /// Column, 0-based from the west wall.
    pub x: i32,
    /// Row, 0-based from the north wall.
    pub y: i32,
}

impl Position {
    /// Create a position from coordinates.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance to another position.
    pub const fn manhattan_distance(self, other: Self) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Chebyshev (king-move) distance to another position.
    pub fn chebyshev_distance(self, other: Self) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }
}

impl core::fmt::Display for Position {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Fixed personality traits assigned at spawn, each on 0-100.
///
/// Traits do not change during a run; they shade decision prompts and
/// future behavioral rules rather than the core mechanics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Traits {
    /// Willingness to use force.
    pub aggression: u32,
    /// Concern for others' wellbeing.
    pub empathy: u32,
    /// Preference for reasoned plans over impulse.
    pub logic: u32,
    /// Deference to authority and rules.
    pub obedience: u32,
    /// Tolerance for stress before breaking down.
    pub resilience: u32,
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

/// A physical object in an inventory or on a map cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Unique identifier.
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// Flavor description.
    pub description: String,
    /// Mechanical kind.
    pub kind: ItemKind,
}

impl Item {
    /// Create an item with a fresh id.
    pub fn new(name: impl Into<String>, description: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            id: ItemId::new(),
            name: name.into(),
            description: description.into(),
            kind,
        }
    }
}

// ---------------------------------------------------------------------------
// Relationships
// ---------------------------------------------------------------------------

/// How one agent regards another. 50 is neutral; below 40 reads as hostile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    /// Regard score on 0-100.
    pub score: u32,
    /// Free-form note on how the relationship got here.
    pub context: String,
}

impl Relationship {
    /// Create a relationship at the given score.
    pub fn new(score: u32, context: impl Into<String>) -> Self {
        Self {
            score: score.min(VITAL_MAX),
            context: context.into(),
        }
    }

    /// Lower the score by `amount`, saturating at zero.
    pub const fn worsen(&mut self, amount: u32) {
        self.score = self.score.saturating_sub(amount);
    }

    /// Raise the score by `amount`, clamped to 100.
    pub fn improve(&mut self, amount: u32) {
        self.score = self.score.saturating_add(amount).min(VITAL_MAX);
    }
}

// ---------------------------------------------------------------------------
// Objectives & Memory
// ---------------------------------------------------------------------------

/// A standing objective attached to an agent (role default or injected
/// by an operator).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Objective {
    /// Unique identifier.
    pub id: ObjectiveId,
    /// Short name.
    pub name: String,
    /// What the objective asks of the agent.
    pub description: String,
}

impl Objective {
    /// Create an objective with a fresh id.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: ObjectiveId::new(),
            name: name.into(),
            description: description.into(),
        }
    }
}

/// One line of episodic memory, stamped with in-sim time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryEntry {
    /// In-sim day the memory was formed.
    pub day: u32,
    /// In-sim hour the memory was formed.
    pub hour: u32,
    /// What the agent remembers.
    pub text: String,
}

// ---------------------------------------------------------------------------
// Agent
// ---------------------------------------------------------------------------

/// A single simulated inhabitant of the facility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    /// Unique identifier.
    pub id: AgentId,
    /// Display name (e.g. "Guard 1", "Prisoner 3").
    pub name: String,
    /// Guard or prisoner.
    pub role: Role,
    /// Fixed personality traits.
    pub traits: Traits,
    /// Hit points, 0-100. Zero means dead.
    pub health: u32,
    /// Mental stability, 0-100.
    pub sanity: u32,
    /// Hunger level, 0-100; higher is worse.
    pub hunger: u32,
    /// Thirst level, 0-100; higher is worse.
    pub thirst: u32,
    /// Physical strength, 0-100; feeds the combat formula.
    pub strength: u32,
    /// Action points remaining this tick, 0-3.
    pub action_points: u32,
    /// Current grid position.
    pub position: Position,
    /// Items carried.
    pub inventory: Vec<Item>,
    /// Conditions derived from current vitals.
    pub status_tags: BTreeSet<StatusTag>,
    /// How this agent regards every other agent.
    pub relationships: BTreeMap<AgentId, Relationship>,
    /// Append-only episodic memory.
    pub memory: Vec<MemoryEntry>,
    /// Standing objectives.
    pub objectives: Vec<Objective>,
}

impl Agent {
    /// Create an agent with full vitals at the given position.
    pub fn new(name: impl Into<String>, role: Role, traits: Traits, position: Position) -> Self {
        Self {
            id: AgentId::new(),
            name: name.into(),
            role,
            traits,
            health: VITAL_MAX,
            sanity: VITAL_MAX,
            hunger: 0,
            thirst: 0,
            strength: VITAL_MAX,
            action_points: ACTION_POINTS_MAX,
            position,
            inventory: Vec::new(),
            status_tags: BTreeSet::new(),
            relationships: BTreeMap::new(),
            memory: Vec::new(),
            objectives: Vec::new(),
        }
    }

    /// Whether the agent is still alive.
    pub const fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Append an episodic memory stamped with the given in-sim time.
    pub fn remember(&mut self, day: u32, hour: u32, text: impl Into<String>) {
        self.memory.push(MemoryEntry {
            day,
            hour,
            text: text.into(),
        });
    }

    /// Find the inventory index of an item by id.
    pub fn inventory_index(&self, item_id: ItemId) -> Option<usize> {
        self.inventory.iter().position(|item| item.id == item_id)
    }

    /// Whether the agent carries at least one item of the given kind.
    pub fn holds_kind(&self, kind: ItemKind) -> bool {
        self.inventory.iter().any(|item| item.kind == kind)
    }

    /// Worsen this agent's regard for `other` by `amount`.
    pub fn worsen_relationship(&mut self, other: AgentId, amount: u32) {
        if let Some(relationship) = self.relationships.get_mut(&other) {
            relationship.worsen(amount);
        }
    }

    /// Improve this agent's regard for `other` by `amount`.
    pub fn improve_relationship(&mut self, other: AgentId, amount: u32) {
        if let Some(relationship) = self.relationships.get_mut(&other) {
            relationship.improve(amount);
        }
    }
}
