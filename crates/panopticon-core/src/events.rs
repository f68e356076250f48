//! Structured event records and the sink boundary.
//!
//! Beyond the human-readable world event log, every notable occurrence
//! is captured as a typed [`EventRecord`] and handed to an [`EventSink`].
//! The in-memory sink is the default; a persistent store can implement
//! the same trait without the engine caring.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use panopticon_types::enums::EventKind;
use panopticon_types::ids::{AgentId, EventId};
use serde::{Deserialize, Serialize};

/// Errors from an event sink.
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    /// The sink could not accept or return records.
    #[error("event sink error: {message}")]
    Sink {
        /// Description of the failure.
        message: String,
    },
}

/// One recorded simulation event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Unique identifier.
    pub id: EventId,
    /// In-sim day the event occurred.
    pub day: u32,
    /// In-sim hour the event occurred.
    pub hour: u32,
    /// Mechanical classification.
    pub kind: EventKind,
    /// The acting agent, if the event has one.
    pub agent_id: Option<AgentId>,
    /// Human-readable description.
    pub description: String,
    /// Structured payload specific to the event kind.
    pub details: serde_json::Value,
    /// Wall-clock time the record was written.
    pub recorded_at: DateTime<Utc>,
}

impl EventRecord {
    /// Create a record stamped with the current wall-clock time.
    pub fn new(
        day: u32,
        hour: u32,
        kind: EventKind,
        agent_id: Option<AgentId>,
        description: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            id: EventId::new(),
            day,
            hour,
            kind,
            agent_id,
            description: description.into(),
            details,
            recorded_at: Utc::now(),
        }
    }
}

/// Criteria for querying recorded events. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    /// Only events of this kind.
    pub kind: Option<EventKind>,
    /// Only events by this agent.
    pub agent_id: Option<AgentId>,
    /// Only events on this day.
    pub day: Option<u32>,
    /// At most this many records, newest last.
    pub limit: Option<usize>,
}

impl EventFilter {
    fn matches(&self, record: &EventRecord) -> bool {
        self.kind.is_none_or(|kind| record.kind == kind)
            && self.agent_id.is_none_or(|id| record.agent_id == Some(id))
            && self.day.is_none_or(|day| record.day == day)
    }
}

/// Destination for event records.
pub trait EventSink: Send {
    /// Append one record.
    ///
    /// # Errors
    ///
    /// Returns [`EventError`] if the sink cannot accept the record.
    fn append(&self, record: EventRecord) -> Result<(), EventError>;

    /// Query records matching `filter`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`EventError`] if the sink cannot be read.
    fn query(&self, filter: &EventFilter) -> Result<Vec<EventRecord>, EventError>;
}

/// An in-memory event sink backed by a mutex-guarded vector.
#[derive(Debug, Default)]
pub struct MemoryEventSink {
    records: Mutex<Vec<EventRecord>>,
}

impl MemoryEventSink {
    /// An empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records held.
    ///
    /// # Errors
    ///
    /// Returns [`EventError`] if the backing lock is poisoned.
    pub fn len(&self) -> Result<usize, EventError> {
        Ok(self.lock()?.len())
    }

    /// Whether the sink holds no records.
    ///
    /// # Errors
    ///
    /// Returns [`EventError`] if the backing lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, EventError> {
        Ok(self.lock()?.is_empty())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<EventRecord>>, EventError> {
        self.records.lock().map_err(|_| EventError::Sink {
            message: String::from("event sink lock poisoned"),
        })
    }
}

impl EventSink for MemoryEventSink {
    fn append(&self, record: EventRecord) -> Result<(), EventError> {
        self.lock()?.push(record);
        Ok(())
    }

    fn query(&self, filter: &EventFilter) -> Result<Vec<EventRecord>, EventError> {
        let records = self.lock()?;
        let matching: Vec<EventRecord> = records
            .iter()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect();
        let trimmed = match filter.limit {
            Some(limit) if matching.len() > limit => {
                matching[matching.len() - limit..].to_vec()
            }
            _ => matching,
        };
        Ok(trimmed)
    }
}
