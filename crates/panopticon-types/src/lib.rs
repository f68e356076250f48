//! Shared type definitions for the Panopticon simulation.
//!
//! This crate is the single source of truth for all types used across the
//! Panopticon workspace. It has no simulation logic of its own; every
//! other crate builds on what is defined here.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for all entity identifiers
//! - [`enums`] -- Enumeration types (roles, cells, items, actions, status)
//! - [`structs`] -- Core entity structs (agents, items, relationships)
//! - [`actions`] -- Action command/report types for agent-engine communication

pub mod actions;
pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use actions::{ActionCommand, ActionParams, ActionReport, ActionResult};
pub use enums::{
    ActionKind, CellKind, EventKind, ItemKind, NeedTier, RejectionReason, Role, RuleCategory,
    StatusTag,
};
pub use ids::{AgentId, EventId, ItemId, ObjectiveId};
pub use structs::{
    ACTION_POINTS_MAX, Agent, Item, MemoryEntry, Objective, Position, Relationship, Traits,
    VITAL_MAX,
};
