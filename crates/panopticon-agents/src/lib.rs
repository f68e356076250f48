//! Agent mechanics for the Panopticon simulation.
//!
//! # Modules
//!
//! - [`config`] -- Tunable vitals and combat parameters.
//! - [`vitals`] -- Hourly decay, starvation damage, status tags, AP reset.
//! - [`actions`] -- AP costs, validation, and atomic execution per action.
//! - [`goals`] -- Five-tier needs evaluation producing a best goal.
//! - [`fallback`] -- Random legal command generation for decision fallback.

pub mod actions;
pub mod config;
pub mod fallback;
pub mod goals;
pub mod vitals;

pub use config::{CombatConfig, VitalsConfig};
pub use fallback::random_fallback_command;
pub use goals::{Goal, select_goal};
pub use vitals::{VitalTickResult, apply_hourly_decay, derive_status_tags};
