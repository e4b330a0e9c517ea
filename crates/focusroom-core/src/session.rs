//! Completed-session records.
//!
//! A [`SessionRecord`] is the immutable evidence that one titled countdown
//! ran to zero. The serialized shape is the storage contract shared with the
//! persistence collaborator:
//!
//! ```json
//! { "id": 1718000000000, "title": "Write report", "type": "Focus Time",
//!   "duration": 25, "completedAt": "2024-06-10T06:13:20Z", "date": "6/10/2024" }
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::PresetDuration;

/// Session identifier.
///
/// Fresh ids are epoch milliseconds. Histories written by older tools may
/// carry string ids, so both forms are accepted and written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SessionId {
    Numeric(i64),
    Text(String),
}

impl SessionId {
    pub fn as_numeric(&self) -> Option<i64> {
        match self {
            SessionId::Numeric(n) => Some(*n),
            SessionId::Text(_) => None,
        }
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionId::Numeric(n) => write!(f, "{n}"),
            SessionId::Text(s) => f.write_str(s),
        }
    }
}

impl FromStr for SessionId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.parse::<i64>() {
            Ok(n) => SessionId::Numeric(n),
            Err(_) => SessionId::Text(s.to_string()),
        })
    }
}

impl From<i64> for SessionId {
    fn from(n: i64) -> Self {
        SessionId::Numeric(n)
    }
}

/// Hands out strictly increasing time-derived ids.
#[derive(Debug, Clone, Default)]
pub struct SessionIdGenerator {
    last: i64,
}

impl SessionIdGenerator {
    pub fn next_id(&mut self, now: DateTime<Utc>) -> SessionId {
        let id = now.timestamp_millis().max(self.last.saturating_add(1));
        self.last = id;
        SessionId::Numeric(id)
    }

    /// Never issue an id at or below `id` from now on.
    pub fn reserve_through(&mut self, id: i64) {
        self.last = self.last.max(id);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub id: SessionId,
    pub title: String,
    /// Preset label at the time of completion.
    #[serde(rename = "type")]
    pub session_type: String,
    #[serde(rename = "duration")]
    pub duration_min: u32,
    pub completed_at: DateTime<Utc>,
    /// Local calendar date of `completed_at`, `M/D/YYYY`.
    pub date: String,
}

impl SessionRecord {
    pub fn new(
        id: SessionId,
        title: impl Into<String>,
        preset: &PresetDuration,
        completed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            session_type: preset.label.clone(),
            duration_min: preset.minutes,
            completed_at,
            date: local_date_string(completed_at),
        }
    }

    /// Calendar event window: `[completed_at, completed_at + duration]`.
    pub fn calendar_window(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let end = self.completed_at + Duration::minutes(i64::from(self.duration_min));
        (self.completed_at, end)
    }

    /// Completion time of day in the local timezone, `HH:MM:SS`.
    pub fn completed_local_time(&self) -> String {
        self.completed_at
            .with_timezone(&Local)
            .format("%H:%M:%S")
            .to_string()
    }
}

pub(crate) fn local_date_string(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%-m/%-d/%Y").to_string()
}
