use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::SessionRecord;
use crate::timer::TimerPhase;

/// Every state change of the timer produces an Event.
/// Callers match on these instead of wiring callbacks into the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    PresetSelected {
        label: String,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    TimerStarted {
        label: String,
        remaining_secs: u64,
        /// True when continuing a paused countdown.
        resumed: bool,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// The countdown reached zero. The cue has already been requested.
    /// `record` is `None` when the title was empty at completion.
    TimerCompleted {
        label: String,
        duration_min: u32,
        record: Option<SessionRecord>,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        phase: TimerPhase,
        label: String,
        title: String,
        remaining_secs: u64,
        total_secs: u64,
        paused: bool,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// The session record carried by a completion, if any.
    pub fn completed_record(&self) -> Option<&SessionRecord> {
        match self {
            Event::TimerCompleted { record, .. } => record.as_ref(),
            _ => None,
        }
    }

    pub fn is_completion(&self) -> bool {
        matches!(self, Event::TimerCompleted { .. })
    }
}
