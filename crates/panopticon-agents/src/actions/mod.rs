//! Action validation and atomic execution.
//!
//! Commands are validated against liveness, AP budget, role gating, and
//! world preconditions, then executed atomically: either the full effect
//! set lands (vitals, positions, inventories, relationships, memories,
//! AP deduction) or the world is untouched and a
//! [`RejectionReason`](panopticon_types::enums::RejectionReason) comes
//! back.
//!
//! # Submodules
//!
//! - [`costs`] -- AP cost per action kind.
//! - [`validation`] -- Precondition checks shared by execution and the
//!   random fallback generator.
//! - [`handlers`] -- One execute function per action kind.

pub mod costs;
pub mod handlers;
pub mod validation;

pub use costs::ap_cost;
pub use handlers::execute_command;
pub use validation::validate_command;
