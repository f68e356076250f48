//! Decision source trait and stub implementation.
//!
//! During the action phase the engine asks a [`DecisionSource`] for each
//! agent's next command. The trait abstracts the mechanism -- an LLM
//! backend, a scripted bot, a human player, or a test stub. A source may
//! decline (`Ok(None)`), in which case the engine falls back to the goal
//! evaluator, and then to a random legal action.

use panopticon_types::actions::ActionCommand;
use panopticon_types::ids::AgentId;
use panopticon_types::structs::Agent;
use panopticon_world::WorldState;

/// Errors that can occur while obtaining a decision.
#[derive(Debug, thiserror::Error)]
pub enum DecisionError {
    /// The source did not answer within the deadline.
    #[error("agent {agent_id} timed out (deadline: {deadline_ms}ms)")]
    Timeout {
        /// The agent whose decision timed out.
        agent_id: AgentId,
        /// The deadline in milliseconds.
        deadline_ms: u64,
    },

    /// An internal error in the decision source.
    #[error("decision source error: {message}")]
    Internal {
        /// Description of the error.
        message: String,
    },
}

/// A source of agent decisions.
///
/// The engine calls [`decide`] once per agent per action slot. Returning
/// `Ok(None)` declines the slot and hands the agent to the fallback
/// chain; returning an error does the same but is logged as a fault.
///
/// [`decide`]: DecisionSource::decide
pub trait DecisionSource {
    /// Produce the next command for `agent`, or decline.
    ///
    /// `deadline_ms` is the budget the source has before the engine
    /// moves on without it.
    ///
    /// # Errors
    ///
    /// Returns [`DecisionError`] when the source fails or exceeds the
    /// deadline.
    fn decide(
        &mut self,
        agent: &Agent,
        world: &WorldState,
        deadline_ms: u64,
    ) -> Result<Option<ActionCommand>, DecisionError>;
}

/// A stub decision source that always declines.
///
/// With this source every agent runs on the goal evaluator, which is how
/// the engine is exercised end-to-end without an external backend.
#[derive(Debug, Clone, Default)]
pub struct StubDecisionSource;

impl StubDecisionSource {
    /// Create a new stub decision source.
    pub const fn new() -> Self {
        Self
    }
}

impl DecisionSource for StubDecisionSource {
    fn decide(
        &mut self,
        _agent: &Agent,
        _world: &WorldState,
        _deadline_ms: u64,
    ) -> Result<Option<ActionCommand>, DecisionError> {
        Ok(None)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use panopticon_types::enums::Role;
    use panopticon_types::structs::{Position, Traits};
    use panopticon_world::GameMap;

    use super::*;

    #[test]
    fn stub_always_declines() {
        let mut source = StubDecisionSource::new();
        let agent = Agent::new(
            "Prisoner 1",
            Role::Prisoner,
            Traits {
                aggression: 50,
                empathy: 50,
                logic: 50,
                obedience: 50,
                resilience: 50,
            },
            Position::new(3, 3),
        );
        let world = WorldState::new(GameMap::new(9, 16).unwrap());
        let decision = source.decide(&agent, &world, 1000).unwrap();
        assert!(decision.is_none());
    }
}
