//! Simulation loop runner with operator controls.
//!
//! [`run_simulation`] drives the tick loop with support for:
//!
//! - **Bounded simulation**: stop after `max_days` in-sim days
//! - **Extinction**: stop when the last agent dies
//! - **Stall detection**: stop when no agent has acted for
//!   `stall_hours` in-sim hours
//! - **Pause/resume and clean stop**: operator-driven, at tick
//!   boundaries
//! - **Variable tick speed**: interval adjustable at runtime
//!
//! The runner wraps the single-tick [`run_tick`] function and adds the
//! control plane around it.
//!
//! [`run_tick`]: crate::tick::run_tick

use std::sync::Arc;

use panopticon_types::enums::EventKind;
use panopticon_world::WorldState;
use serde_json::json;
use tracing::info;

use crate::decision::DecisionSource;
use crate::events::{EventRecord, EventSink};
use crate::operator::{OperatorState, SimulationEndReason};
use crate::tick::{self, SimulationState, TickError, TickSummary};

/// Errors that can occur during the simulation run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A tick execution failed.
    #[error("tick error: {source}")]
    Tick {
        /// The underlying tick error.
        #[from]
        source: TickError,
    },
}

/// Result of the simulation run.
#[derive(Debug)]
pub struct SimulationResult {
    /// The reason the simulation ended.
    pub end_reason: SimulationEndReason,
    /// The last tick summary, if any tick completed.
    pub final_summary: Option<TickSummary>,
    /// Total number of ticks executed.
    pub total_ticks: u64,
}

/// Callback invoked after each tick completes.
///
/// Implementations can use this to stream tick summaries to a UI, dump
/// snapshots, and so on.
pub trait TickCallback: Send {
    /// Called after a tick completes successfully.
    fn on_tick(&mut self, summary: &TickSummary, state: &SimulationState);
}

/// A no-op tick callback for testing.
pub struct NoOpCallback;

impl TickCallback for NoOpCallback {
    fn on_tick(&mut self, _summary: &TickSummary, _state: &SimulationState) {}
}

/// Run the simulation loop until a termination condition is met.
///
/// # Errors
///
/// Returns [`RunnerError`] if a tick execution fails unrecoverably.
pub async fn run_simulation(
    state: &mut SimulationState,
    decision_source: &mut dyn DecisionSource,
    sink: &dyn EventSink,
    operator: &Arc<OperatorState>,
    callback: &mut dyn TickCallback,
) -> Result<SimulationResult, RunnerError> {
    let mut last_summary: Option<TickSummary> = None;
    let mut total_ticks: u64 = 0;

    info!(
        max_days = state.config.bounds.max_days,
        stall_hours = state.config.bounds.stall_hours,
        tick_interval_ms = operator.tick_interval_ms(),
        "Simulation starting"
    );

    loop {
        // --- Check pause ---
        if operator.is_paused() {
            info!("Simulation paused, waiting for resume...");
            operator.wait_if_paused().await;
            info!("Simulation resumed");
        }

        // --- Check stop request (before tick) ---
        if operator.is_stop_requested() {
            info!("Operator stop requested");
            return finish(
                &mut state.world,
                sink,
                operator,
                SimulationEndReason::OperatorStop,
                last_summary,
                total_ticks,
            )
            .await;
        }

        // --- Execute tick ---
        let interventions = operator.drain_interventions().await;
        let summary = tick::run_tick(state, decision_source, sink, interventions)?;
        total_ticks = total_ticks.saturating_add(1);

        // --- Notify callback ---
        callback.on_tick(&summary, state);

        // --- Check extinction ---
        if summary.agents_alive == 0 {
            info!(tick = summary.tick, "All agents dead -- extinction");
            return finish(
                &mut state.world,
                sink,
                operator,
                SimulationEndReason::Extinction,
                Some(summary),
                total_ticks,
            )
            .await;
        }

        // --- Check day limit ---
        let max_days = state.config.bounds.max_days;
        if max_days > 0 && summary.day > max_days {
            info!(day = summary.day, max_days, "Day limit reached");
            return finish(
                &mut state.world,
                sink,
                operator,
                SimulationEndReason::MaxDaysReached,
                Some(summary),
                total_ticks,
            )
            .await;
        }

        // --- Check stall ---
        let idle_hours = state
            .world
            .clock_hours()
            .saturating_sub(state.world.last_action_at_hours);
        if idle_hours >= state.config.bounds.stall_hours {
            info!(idle_hours, "No agent has acted for too long -- stalled");
            return finish(
                &mut state.world,
                sink,
                operator,
                SimulationEndReason::Stalled,
                Some(summary),
                total_ticks,
            )
            .await;
        }

        last_summary = Some(summary);

        // --- Sleep for tick interval ---
        let interval_ms = operator.tick_interval_ms();
        if interval_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(interval_ms)).await;
        }
    }
}

/// Record the stopping condition in the world log and the event sink,
/// then assemble the run result.
async fn finish(
    world: &mut WorldState,
    sink: &dyn EventSink,
    operator: &Arc<OperatorState>,
    reason: SimulationEndReason,
    final_summary: Option<TickSummary>,
    total_ticks: u64,
) -> Result<SimulationResult, RunnerError> {
    let line = match &reason {
        SimulationEndReason::OperatorStop => String::from("Simulation stopped by the operator"),
        SimulationEndReason::Extinction => String::from("Simulation over: no agents left alive"),
        SimulationEndReason::MaxDaysReached => {
            format!("Simulation over: day limit reached on day {}", world.day)
        }
        SimulationEndReason::Stalled => {
            String::from("Simulation over: no agent has acted for too long")
        }
    };
    world.log(line.clone());
    sink.append(EventRecord::new(
        world.day,
        world.hour,
        EventKind::System,
        None,
        line,
        json!({ "end_reason": format!("{reason:?}") }),
    ))
    .map_err(TickError::from)?;
    operator.set_end_reason(reason.clone()).await;
    Ok(SimulationResult {
        end_reason: reason,
        final_summary,
        total_ticks,
    })
}

/// Log the simulation end sequence.
pub fn log_simulation_end(result: &SimulationResult) {
    info!(
        reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        final_day = result.final_summary.as_ref().map(|summary| summary.day),
        final_agents_alive = result.final_summary.as_ref().map(|summary| summary.agents_alive),
        "Simulation ended"
    );
}
