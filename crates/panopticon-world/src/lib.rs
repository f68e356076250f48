//! The physical facility for the Panopticon simulation.
//!
//! This crate models the world grid and its contents: cell kinds, item
//! placement, the mutable world state shared by every subsystem, and the
//! deterministic starting world generator.
//!
//! # Modules
//!
//! - [`error`] -- Error types for map and world-state operations.
//! - [`map`] -- [`GameMap`]: bounded grid of cells with items on the floor.
//! - [`state`] -- [`WorldState`]: agents, map, clock fields, event log.
//! - [`starting_world`] -- Seeded generation of the initial facility.

pub mod error;
pub mod map;
pub mod starting_world;
pub mod state;

pub use error::WorldError;
pub use map::GameMap;
pub use starting_world::{StartingWorldParams, create_starting_world};
pub use state::WorldState;
