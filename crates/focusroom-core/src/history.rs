//! Append-only session history.

use serde::Serialize;

use crate::session::{SessionId, SessionRecord};

/// Count and total minutes over a history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Totals {
    pub sessions: u64,
    pub minutes: u64,
}

/// Completed sessions in completion order.
///
/// Records go in through [`append`](Self::append) and out through
/// [`remove`](Self::remove); they are never edited in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionHistory {
    sessions: Vec<SessionRecord>,
}

impl SessionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(sessions: Vec<SessionRecord>) -> Self {
        Self { sessions }
    }

    pub fn append(&mut self, record: SessionRecord) {
        self.sessions.push(record);
    }

    /// Remove the session with `id`. Returns whether anything was removed;
    /// removing an unknown id is a no-op.
    pub fn remove(&mut self, id: &SessionId) -> bool {
        let before = self.sessions.len();
        self.sessions.retain(|s| &s.id != id);
        self.sessions.len() != before
    }

    /// Insertion order.
    pub fn list(&self) -> &[SessionRecord] {
        &self.sessions
    }

    /// Most recent first. A copy; storage order is untouched.
    pub fn recent_first(&self) -> Vec<SessionRecord> {
        self.sessions.iter().rev().cloned().collect()
    }

    pub fn get(&self, id: &SessionId) -> Option<&SessionRecord> {
        self.sessions.iter().find(|s| &s.id == id)
    }

    /// Match an id as typed by a user against the stored ids.
    ///
    /// Numeric ids win; a text id that happens to look like a number
    /// (`"42"`) is found through its text form.
    pub fn resolve_id(&self, raw: &str) -> Option<SessionId> {
        let parsed: SessionId = match raw.parse() {
            Ok(id) => id,
            Err(never) => match never {},
        };
        if self.get(&parsed).is_some() {
            return Some(parsed);
        }
        let text = SessionId::Text(raw.to_string());
        self.get(&text).map(|_| text)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Largest numeric id in the history.
    pub fn max_numeric_id(&self) -> Option<i64> {
        self.sessions.iter().filter_map(|s| s.id.as_numeric()).max()
    }

    pub fn totals(&self) -> Totals {
        self.sessions.iter().fold(Totals::default(), |acc, s| Totals {
            sessions: acc.sessions + 1,
            minutes: acc.minutes + u64::from(s.duration_min),
        })
    }
}
