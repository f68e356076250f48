//! Enumeration types for the Panopticon simulation.
//!
//! Closed sets shared across the workspace: roles, cell kinds, items,
//! actions, status tags, need tiers, event kinds, rule categories, and
//! the action rejection catalog.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Roles
// ---------------------------------------------------------------------------

/// The role an agent holds in the facility.
///
/// Guards act before prisoners in every tick's action phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Maintains order; acts first each turn.
    Guard,
    /// Serves time; acts after the guards.
    Prisoner,
}

impl Role {
    /// Scheduling rank: lower ranks act earlier in the tick.
    pub const fn schedule_rank(self) -> u8 {
        match self {
            Self::Guard => 0,
            Self::Prisoner => 1,
        }
    }
}

// ---------------------------------------------------------------------------
// Cell Kinds
// ---------------------------------------------------------------------------

/// The kind of cell a grid position belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CellKind {
    /// General housing block; also the border fill.
    CellBlock,
    /// Where meals are stocked by the supply rules.
    Cafeteria,
    /// Open recreation area at the map center.
    Yard,
    /// Isolation cell used by the punishment action.
    Solitary,
    /// Guard station; guards spawn here.
    GuardRoom,
}

// ---------------------------------------------------------------------------
// Item Kinds
// ---------------------------------------------------------------------------

/// A kind of item that can sit on the map or in an inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    // --- Basic consumables ---
    /// Reduces hunger by 50 when used; consumed.
    Food,
    /// Reduces thirst by 40 when used; consumed.
    Water,
    /// Restores 10 sanity when read; not consumed.
    Book,

    // --- Guard equipment ---
    /// Standard-issue baton.
    Baton,
    /// Restraints.
    Handcuffs,
    /// Two-way radio.
    Radio,
    /// Cell keys.
    Keys,
    /// First aid kit.
    FirstAid,
    /// Whistle.
    Whistle,

    // --- Prisoner belongings ---
    /// Cigarettes, the informal currency.
    Cigarettes,
    /// A deck of playing cards.
    PlayingCards,
    /// A personal diary.
    Diary,
    /// A metal spoon; crafting material for a shiv.
    Spoon,
    /// A bedsheet.
    Bedsheet,
    /// A bar of soap.
    Soap,

    // --- Crafted / contraband ---
    /// An improvised blade. Contraband.
    Shiv,
    /// A length of rope. Contraband.
    Rope,
    /// A lock-picking tool. Contraband.
    Lockpick,
}

impl ItemKind {
    /// Whether a guard inspection confiscates this item.
    pub const fn is_contraband(self) -> bool {
        matches!(self, Self::Shiv | Self::Rope | Self::Lockpick)
    }

    /// Whether `UseItem` has an effect for this kind.
    pub const fn is_usable(self) -> bool {
        matches!(self, Self::Food | Self::Water | Self::Book)
    }
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// The closed set of actions agents can take.
///
/// Guard-only and prisoner-only kinds are gated during validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    // --- Common ---
    /// Do nothing; observe the surroundings.
    Rest,
    /// Step to an adjacent cell (distant targets are redirected).
    Move,
    /// Say something to a nearby agent.
    Speak,
    /// Strike a nearby agent.
    Attack,
    /// Consume or read an item from inventory.
    UseItem,
    /// Hand an item to a nearby agent.
    Give,

    // --- Guard-only ---
    /// Broadcast a rule or order to every living agent.
    Announce,
    /// Search a nearby agent for contraband.
    Inspect,
    /// Send a nearby agent to solitary.
    Punish,
    /// Order all prisoners to assemble.
    Assemble,

    // --- Prisoner-only ---
    /// Take an item from a nearby agent.
    Steal,
    /// Work a spoon into a shiv.
    Craft,
}

impl ActionKind {
    /// The role this action is restricted to, if any.
    pub const fn required_role(self) -> Option<Role> {
        match self {
            Self::Announce | Self::Inspect | Self::Punish | Self::Assemble => Some(Role::Guard),
            Self::Steal | Self::Craft => Some(Role::Prisoner),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Status Tags
// ---------------------------------------------------------------------------

/// A condition derived purely from an agent's current vitals.
///
/// Tags are recomputed from scratch every status phase; they are never
/// edited incrementally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StatusTag {
    /// Hunger above 90.
    Starving,
    /// Hunger above 80.
    VeryHungry,
    /// Hunger above 60.
    Hungry,
    /// Thirst above 85.
    Dehydrated,
    /// Thirst above 75.
    VeryThirsty,
    /// Thirst above 55.
    Thirsty,
    /// Health below 20.
    Critical,
    /// Health below 40.
    Injured,
    /// Health below 60.
    Wounded,
    /// Sanity below 20.
    Unhinged,
    /// Sanity below 40.
    Unstable,
    /// Sanity below 60.
    Stressed,
    /// Health has reached zero.
    Deceased,
}

impl StatusTag {
    /// Whether this tag contributes to the per-tick sanity penalty.
    ///
    /// Physical distress (hunger, thirst, injury) erodes sanity; the
    /// sanity-derived tags and death do not compound.
    pub const fn erodes_sanity(self) -> bool {
        matches!(
            self,
            Self::Starving
                | Self::VeryHungry
                | Self::Hungry
                | Self::Dehydrated
                | Self::VeryThirsty
                | Self::Thirsty
                | Self::Critical
                | Self::Injured
                | Self::Wounded
        )
    }
}

// ---------------------------------------------------------------------------
// Need Tiers
// ---------------------------------------------------------------------------

/// Hierarchy tiers for the needs-based goal system, highest urgency first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NeedTier {
    /// Immediate threats to life: critical health, starvation, dehydration.
    Survival,
    /// Avoiding danger before it becomes lethal.
    Safety,
    /// Alliances and relationship maintenance.
    Social,
    /// Role obligations: patrols for guards, adaptation for prisoners.
    RoleDuty,
    /// Curiosity and mental upkeep.
    Exploration,
}

// ---------------------------------------------------------------------------
// Event Kinds
// ---------------------------------------------------------------------------

/// Classification of a durable event log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// An agent rested.
    Rest,
    /// An agent changed position.
    Move,
    /// An agent spoke or broadcast.
    Speech,
    /// An attack or punishment.
    Combat,
    /// An item was used, given, stolen, crafted, or confiscated.
    ItemUse,
    /// An agent died.
    Death,
    /// A world rule fired.
    Rule,
    /// Engine lifecycle messages.
    System,
}

// ---------------------------------------------------------------------------
// Rule Categories
// ---------------------------------------------------------------------------

/// Grouping for world rules, used in status summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RuleCategory {
    /// Fires at specific in-sim hours.
    Temporal,
    /// Reacts to resource levels.
    Resource,
    /// Shapes agent behavior.
    Behavior,
    /// Alters the environment.
    Environmental,
    /// Affects relationships.
    Social,
}

impl RuleCategory {
    /// All categories, in summary display order.
    pub const ALL: [Self; 5] = [
        Self::Temporal,
        Self::Resource,
        Self::Behavior,
        Self::Environmental,
        Self::Social,
    ];
}

// ---------------------------------------------------------------------------
// Rejection Reasons
// ---------------------------------------------------------------------------

/// Why an action failed validation or a precondition at execution time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RejectionReason {
    /// The acting agent is dead.
    ActorDead,
    /// The agent lacks the action points for this action.
    InsufficientActionPoints,
    /// The action is reserved for the other role.
    WrongRole,
    /// Parameters do not match the action kind.
    InvalidParameters,
    /// Target agent does not exist or is dead.
    InvalidTarget,
    /// Target is beyond the action's range.
    TargetTooFar,
    /// Destination is outside the map.
    OutOfBounds,
    /// Destination cell is occupied by another agent.
    PositionOccupied,
    /// The referenced item is not in the agent's inventory.
    ItemNotHeld,
    /// The item kind cannot be used this way.
    ItemNotUsable,
    /// The target carries nothing to take.
    NothingToTake,
    /// A required crafting material is missing.
    MissingMaterial,
    /// The solitary cell is unavailable.
    SolitaryUnavailable,
}

impl core::fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let text = match self {
            Self::ActorDead => "actor is dead",
            Self::InsufficientActionPoints => "insufficient action points",
            Self::WrongRole => "action not permitted for this role",
            Self::InvalidParameters => "invalid parameters",
            Self::InvalidTarget => "invalid target",
            Self::TargetTooFar => "target too far away",
            Self::OutOfBounds => "destination out of bounds",
            Self::PositionOccupied => "position occupied",
            Self::ItemNotHeld => "item not in inventory",
            Self::ItemNotUsable => "cannot use this item",
            Self::NothingToTake => "target has nothing to take",
            Self::MissingMaterial => "missing crafting material",
            Self::SolitaryUnavailable => "solitary cell unavailable",
        };
        f.write_str(text)
    }
}
