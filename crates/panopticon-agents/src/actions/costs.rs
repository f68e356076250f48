//! AP costs per action type.
//!
//! Every action has a fixed, role-independent cost. Heavier actions
//! (attacks, punishment details, assemblies, crafting) cost 2; the rest
//! cost 1. There are no free actions -- even resting spends the point.

use panopticon_types::enums::ActionKind;

/// Return the action point cost for a given action kind.
pub const fn ap_cost(kind: ActionKind) -> u32 {
    match kind {
        ActionKind::Rest
        | ActionKind::Move
        | ActionKind::Speak
        | ActionKind::UseItem
        | ActionKind::Give
        | ActionKind::Announce
        | ActionKind::Inspect
        | ActionKind::Steal => 1,
        ActionKind::Attack
        | ActionKind::Punish
        | ActionKind::Assemble
        | ActionKind::Craft => 2,
    }
}

/// Manhattan range for targeted interactions (speak, attack, give,
/// inspect, punish, steal).
pub const INTERACTION_RANGE: u32 = 2;

/// Chebyshev step budget for a single move action.
pub const MOVE_STEP_BUDGET: i32 = 1;
