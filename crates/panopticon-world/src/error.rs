//! Error types for the `panopticon-world` crate.

use panopticon_types::AgentId;
use panopticon_types::structs::Position;

/// Errors that can occur during map and world-state operations.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// Map dimensions were invalid at construction.
    #[error("invalid map dimensions {width}x{height}: {reason}")]
    InvalidDimensions {
        /// Requested width.
        width: i32,
        /// Requested height.
        height: i32,
        /// Why the dimensions were rejected.
        reason: String,
    },

    /// A position outside the map was referenced.
    #[error("position {0} is out of bounds")]
    OutOfBounds(Position),

    /// An agent id was not found in the world state.
    #[error("agent not found: {0}")]
    AgentNotFound(AgentId),

    /// World generation parameters were invalid.
    #[error("invalid starting world parameters: {reason}")]
    InvalidParams {
        /// Why the parameters were rejected.
        reason: String,
    },
}
