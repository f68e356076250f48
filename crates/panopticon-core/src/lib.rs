//! Clock, rules, tick cycle, and orchestration for the Panopticon
//! simulation.
//!
//! This crate owns the hourly tick cycle that drives the simulation:
//! interventions, status decay, world rules, and the agent action phase.
//!
//! # Modules
//!
//! - [`clock`] -- Clock advancement and the hourly status phase.
//! - [`config`] -- Configuration loading from `panopticon-config.yaml`
//!   into strongly-typed structs.
//! - [`decision`] -- [`DecisionSource`] trait and [`StubDecisionSource`].
//! - [`events`] -- Structured event records and the sink boundary.
//! - [`operator`] -- Shared pause/stop/intervention control state.
//! - [`rules`] -- The world rule engine and the default facility rules.
//! - [`tick`] -- The four-phase tick cycle.
//! - [`runner`] -- The bounded simulation loop around the tick cycle.
//!
//! [`DecisionSource`]: decision::DecisionSource
//! [`StubDecisionSource`]: decision::StubDecisionSource

pub mod clock;
pub mod config;
pub mod decision;
pub mod events;
pub mod operator;
pub mod rules;
pub mod runner;
pub mod tick;

pub use config::{ConfigError, SimulationConfig};
pub use decision::{DecisionError, DecisionSource, StubDecisionSource};
pub use events::{EventFilter, EventRecord, EventSink, MemoryEventSink};
pub use operator::{Intervention, OperatorState, SimulationEndReason, VitalKind};
pub use rules::{RuleBook, RuleFiring, RuleStatus, RuleTrigger, WorldRule};
pub use runner::{NoOpCallback, RunnerError, SimulationResult, TickCallback, run_simulation};
pub use tick::{SimulationState, TickError, TickSummary, run_tick};
