//! Action command and result types.
//!
//! A command is plain data: a kind plus a matching parameter variant.
//! Validation and execution live in `panopticon-agents`; the types here
//! are what decision sources produce and what the tick cycle consumes.

use serde::{Deserialize, Serialize};

use crate::enums::{ActionKind, EventKind, RejectionReason};
use crate::ids::{AgentId, ItemId};
use crate::structs::Position;

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

/// Action-specific parameters. Each variant corresponds to one
/// [`ActionKind`] and carries the data needed to validate and execute it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionParams {
    /// Parameters for [`ActionKind::Rest`].
    Rest,
    /// Parameters for [`ActionKind::Move`].
    Move {
        /// Requested destination. Targets beyond the step budget are
        /// redirected toward the same bearing.
        target: Position,
    },
    /// Parameters for [`ActionKind::Speak`].
    Speak {
        /// The agent spoken to.
        target: AgentId,
        /// What is said.
        message: String,
    },
    /// Parameters for [`ActionKind::Attack`].
    Attack {
        /// The agent attacked.
        target: AgentId,
        /// Stated reason, recorded in memories and the event log.
        reason: String,
    },
    /// Parameters for [`ActionKind::UseItem`].
    UseItem {
        /// The inventory item to use.
        item: ItemId,
    },
    /// Parameters for [`ActionKind::Give`].
    Give {
        /// The recipient.
        target: AgentId,
        /// The inventory item handed over.
        item: ItemId,
    },
    /// Parameters for [`ActionKind::Announce`].
    Announce {
        /// The broadcast message.
        message: String,
    },
    /// Parameters for [`ActionKind::Inspect`].
    Inspect {
        /// The agent searched.
        target: AgentId,
    },
    /// Parameters for [`ActionKind::Punish`].
    Punish {
        /// The agent sent to solitary.
        target: AgentId,
        /// Stated reason.
        reason: String,
    },
    /// Parameters for [`ActionKind::Assemble`].
    Assemble,
    /// Parameters for [`ActionKind::Steal`].
    Steal {
        /// The agent stolen from.
        target: AgentId,
    },
    /// Parameters for [`ActionKind::Craft`].
    Craft,
}

impl ActionParams {
    /// The action kind these parameters belong to.
    pub const fn kind(&self) -> ActionKind {
        match self {
            Self::Rest => ActionKind::Rest,
            Self::Move { .. } => ActionKind::Move,
            Self::Speak { .. } => ActionKind::Speak,
            Self::Attack { .. } => ActionKind::Attack,
            Self::UseItem { .. } => ActionKind::UseItem,
            Self::Give { .. } => ActionKind::Give,
            Self::Announce { .. } => ActionKind::Announce,
            Self::Inspect { .. } => ActionKind::Inspect,
            Self::Punish { .. } => ActionKind::Punish,
            Self::Assemble => ActionKind::Assemble,
            Self::Steal { .. } => ActionKind::Steal,
            Self::Craft => ActionKind::Craft,
        }
    }
}

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// A single action an agent intends to take this tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionCommand {
    /// The action kind; must agree with `params`.
    pub kind: ActionKind,
    /// Kind-specific data.
    pub params: ActionParams,
}

impl ActionCommand {
    /// Build a command from parameters, deriving the kind.
    pub const fn from_params(params: ActionParams) -> Self {
        let kind = params.kind();
        Self { kind, params }
    }

    /// A rest command.
    pub const fn rest() -> Self {
        Self::from_params(ActionParams::Rest)
    }

    /// A move command toward `target`.
    pub const fn move_to(target: Position) -> Self {
        Self::from_params(ActionParams::Move { target })
    }

    /// A speak command.
    pub fn speak(target: AgentId, message: impl Into<String>) -> Self {
        Self::from_params(ActionParams::Speak {
            target,
            message: message.into(),
        })
    }

    /// An attack command.
    pub fn attack(target: AgentId, reason: impl Into<String>) -> Self {
        Self::from_params(ActionParams::Attack {
            target,
            reason: reason.into(),
        })
    }

    /// A use-item command.
    pub const fn use_item(item: ItemId) -> Self {
        Self::from_params(ActionParams::UseItem { item })
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// What a successfully executed action did, in loggable form.
///
/// The tick cycle turns this into event log lines and durable records;
/// handlers do not talk to sinks directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionReport {
    /// The action that ran.
    pub kind: ActionKind,
    /// Human-readable summary for the world event log.
    pub description: String,
    /// Classification for the durable event log.
    pub event_kind: EventKind,
    /// Structured details for the durable event log.
    pub details: serde_json::Value,
    /// For moves: whether the requested destination was adjusted
    /// (redirected or clamped) before execution.
    pub adjusted: bool,
}

/// The outcome of one action slot in the action phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult {
    /// The acting agent.
    pub agent_id: AgentId,
    /// The action attempted.
    pub kind: ActionKind,
    /// Whether the action executed.
    pub success: bool,
    /// Failure cause, present only when `success` is false.
    pub rejection: Option<RejectionReason>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_kind_agrees_with_constructors() {
        assert_eq!(ActionCommand::rest().kind, ActionKind::Rest);
        assert_eq!(
            ActionCommand::move_to(Position::new(2, 3)).kind,
            ActionKind::Move
        );
        let speak = ActionCommand::speak(AgentId::new(), "hello");
        assert_eq!(speak.kind, speak.params.kind());
        let attack = ActionCommand::attack(AgentId::new(), "provocation");
        assert_eq!(attack.kind, ActionKind::Attack);
    }

    #[test]
    fn command_roundtrip_serde() {
        let command = ActionCommand::move_to(Position::new(4, 8));
        let json = serde_json::to_string(&command).ok();
        assert!(json.is_some());
        let restored: Result<ActionCommand, _> =
            serde_json::from_str(json.as_deref().unwrap_or(""));
        assert_eq!(restored.ok(), Some(command));
    }
}
