//! Operator control state for runtime simulation management.
//!
//! The operator can pause/resume, change tick speed, queue world
//! interventions, and trigger a clean shutdown without stopping the
//! process. All of it is shared atomic state so the tick loop reads
//! lock-free on the hot path.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use panopticon_types::enums::ItemKind;
use panopticon_types::ids::AgentId;
use panopticon_types::structs::Position;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, Notify};

/// Reason why the simulation ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimulationEndReason {
    /// Reached the configured `max_days` limit.
    MaxDaysReached,
    /// All agents are dead.
    Extinction,
    /// No agent acted for the configured stall window.
    Stalled,
    /// An operator issued a stop command.
    OperatorStop,
}

/// Which vital an intervention targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VitalKind {
    /// Hit points.
    Health,
    /// Mental stability.
    Sanity,
    /// Hunger level.
    Hunger,
    /// Thirst level.
    Thirst,
}

/// An operator-queued world change, applied at the start of the next
/// tick before the status phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Intervention {
    /// Set one vital of one agent to an absolute value (clamped).
    SetVital {
        /// The agent to change.
        agent_id: AgentId,
        /// Which vital.
        vital: VitalKind,
        /// New value, clamped to 0-100.
        value: u32,
    },
    /// Attach a new objective to an agent.
    InjectObjective {
        /// The agent to receive the objective.
        agent_id: AgentId,
        /// Objective name.
        name: String,
        /// What the objective asks.
        description: String,
    },
    /// Remove all objectives from an agent.
    ClearObjectives {
        /// The agent to clear.
        agent_id: AgentId,
    },
    /// Set the global environment framing string.
    SetEnvironment {
        /// The framing text.
        context: String,
    },
    /// Clear the global environment framing.
    ClearEnvironment,
    /// Drop an item onto a map cell.
    PlaceItem {
        /// Where to place it.
        position: Position,
        /// What kind of item.
        kind: ItemKind,
    },
}

/// Shared operator control state.
///
/// Wrapped in `Arc` and shared between the tick loop and whatever
/// control surface drives it. Atomics keep tick-loop reads lock-free.
#[derive(Debug)]
pub struct OperatorState {
    /// Whether the simulation is currently paused.
    paused: AtomicBool,

    /// Notification used to wake the tick loop when resumed.
    resume_notify: Notify,

    /// Whether a stop has been requested.
    stop_requested: AtomicBool,

    /// Current tick interval in milliseconds (runtime-adjustable).
    tick_interval_ms: AtomicU64,

    /// Wall-clock time when the simulation started.
    started_at: DateTime<Utc>,

    /// Queue of interventions awaiting the next tick.
    interventions: Mutex<Vec<Intervention>>,

    /// Reason the simulation ended, if it has.
    end_reason: Mutex<Option<SimulationEndReason>>,
}

impl OperatorState {
    /// Create a new operator state.
    pub fn new(tick_interval_ms: u64) -> Self {
        Self {
            paused: AtomicBool::new(false),
            resume_notify: Notify::new(),
            stop_requested: AtomicBool::new(false),
            tick_interval_ms: AtomicU64::new(tick_interval_ms),
            started_at: Utc::now(),
            interventions: Mutex::new(Vec::new()),
            end_reason: Mutex::new(None),
        }
    }

    // -----------------------------------------------------------------------
    // Pause / Resume
    // -----------------------------------------------------------------------

    /// Check whether the simulation is paused.
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    /// Pause the simulation. The tick loop will sleep until resumed.
    pub fn pause(&self) {
        self.paused.store(true, Ordering::Release);
    }

    /// Resume the simulation and wake the tick loop.
    pub fn resume(&self) {
        self.paused.store(false, Ordering::Release);
        self.resume_notify.notify_one();
    }

    /// Wait until the simulation is no longer paused.
    ///
    /// Returns immediately if not paused. Otherwise blocks until
    /// [`resume`](Self::resume) is called.
    pub async fn wait_if_paused(&self) {
        while self.paused.load(Ordering::Acquire) {
            self.resume_notify.notified().await;
        }
    }

    // -----------------------------------------------------------------------
    // Stop
    // -----------------------------------------------------------------------

    /// Request a clean simulation stop.
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
        // A paused loop must wake to observe the stop.
        self.resume_notify.notify_one();
    }

    /// Check whether a stop has been requested.
    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }

    /// Record the reason the simulation ended.
    pub async fn set_end_reason(&self, reason: SimulationEndReason) {
        let mut guard = self.end_reason.lock().await;
        *guard = Some(reason);
    }

    /// Get the reason the simulation ended, if it has.
    pub async fn end_reason(&self) -> Option<SimulationEndReason> {
        self.end_reason.lock().await.clone()
    }

    // -----------------------------------------------------------------------
    // Tick Speed
    // -----------------------------------------------------------------------

    /// Get the current tick interval in milliseconds.
    pub fn tick_interval_ms(&self) -> u64 {
        self.tick_interval_ms.load(Ordering::Acquire)
    }

    /// Set the tick interval in milliseconds.
    ///
    /// Returns the previous interval.
    pub fn set_tick_interval_ms(&self, ms: u64) -> u64 {
        self.tick_interval_ms.swap(ms, Ordering::AcqRel)
    }

    /// Return the wall-clock start time.
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    // -----------------------------------------------------------------------
    // Interventions
    // -----------------------------------------------------------------------

    /// Queue an intervention for the next tick.
    pub async fn queue_intervention(&self, intervention: Intervention) {
        self.interventions.lock().await.push(intervention);
    }

    /// Take all queued interventions, leaving the queue empty.
    pub async fn drain_interventions(&self) -> Vec<Intervention> {
        let mut guard = self.interventions.lock().await;
        std::mem::take(&mut *guard)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn pause_and_resume_round_trip() {
        let operator = OperatorState::new(1000);
        assert!(!operator.is_paused());
        operator.pause();
        assert!(operator.is_paused());
        operator.resume();
        assert!(!operator.is_paused());
        // Not paused: returns immediately.
        operator.wait_if_paused().await;
    }

    #[tokio::test]
    async fn stop_request_sticks() {
        let operator = OperatorState::new(1000);
        assert!(!operator.is_stop_requested());
        operator.request_stop();
        assert!(operator.is_stop_requested());
        operator
            .set_end_reason(SimulationEndReason::OperatorStop)
            .await;
        assert_eq!(
            operator.end_reason().await,
            Some(SimulationEndReason::OperatorStop)
        );
    }

    #[tokio::test]
    async fn interventions_drain_in_order() {
        let operator = OperatorState::new(1000);
        operator
            .queue_intervention(Intervention::ClearEnvironment)
            .await;
        operator
            .queue_intervention(Intervention::SetEnvironment {
                context: String::from("A storm is coming"),
            })
            .await;
        let drained = operator.drain_interventions().await;
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0], Intervention::ClearEnvironment);
        assert!(operator.drain_interventions().await.is_empty());
    }

    #[test]
    fn tick_interval_is_adjustable() {
        let operator = OperatorState::new(1000);
        assert_eq!(operator.tick_interval_ms(), 1000);
        let previous = operator.set_tick_interval_ms(250);
        assert_eq!(previous, 1000);
        assert_eq!(operator.tick_interval_ms(), 250);
    }
}
