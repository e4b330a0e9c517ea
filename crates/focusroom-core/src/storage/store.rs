//! Persistence contract for the session history.

use std::sync::{Arc, Mutex};

use crate::error::PersistenceError;
use crate::session::SessionRecord;

/// Durable home of the session history.
///
/// The controller loads once at startup and pushes the full ordered
/// sequence after every append or remove.
pub trait SessionStore {
    /// Previously saved history. `Ok(None)` when nothing was ever saved.
    fn load(&self) -> Result<Option<Vec<SessionRecord>>, PersistenceError>;

    fn save(&self, sessions: &[SessionRecord]) -> Result<(), PersistenceError>;
}

/// In-process store, used for `--ephemeral` runs and tests.
///
/// Clones share the same contents, so a test can keep one handle and give
/// the other to a controller.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    sessions: Option<Vec<SessionRecord>>,
    fail: bool,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sessions(sessions: Vec<SessionRecord>) -> Self {
        let store = Self::default();
        store.lock().sessions = Some(sessions);
        store
    }

    /// Make every subsequent load and save fail.
    pub fn set_unavailable(&self, fail: bool) {
        self.lock().fail = fail;
    }

    /// What the last successful save wrote.
    pub fn saved(&self) -> Option<Vec<SessionRecord>> {
        self.lock().sessions.clone()
    }

    pub fn save_count(&self) -> usize {
        self.lock().saves
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryInner> {
        // A poisoned lock only means a test panicked mid-save.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl SessionStore for MemoryStore {
    fn load(&self) -> Result<Option<Vec<SessionRecord>>, PersistenceError> {
        let inner = self.lock();
        if inner.fail {
            return Err(PersistenceError::Unavailable("memory store offline".into()));
        }
        Ok(inner.sessions.clone())
    }

    fn save(&self, sessions: &[SessionRecord]) -> Result<(), PersistenceError> {
        let mut inner = self.lock();
        if inner.fail {
            return Err(PersistenceError::Unavailable("memory store offline".into()));
        }
        inner.sessions = Some(sessions.to_vec());
        inner.saves += 1;
        Ok(())
    }
}

/// Store that could not be opened. Every call fails with the original
/// reason, which puts the controller in memory-only mode.
#[derive(Debug, Clone)]
pub struct UnavailableStore {
    reason: String,
}

impl UnavailableStore {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl SessionStore for UnavailableStore {
    fn load(&self) -> Result<Option<Vec<SessionRecord>>, PersistenceError> {
        Err(PersistenceError::Unavailable(self.reason.clone()))
    }

    fn save(&self, _sessions: &[SessionRecord]) -> Result<(), PersistenceError> {
        Err(PersistenceError::Unavailable(self.reason.clone()))
    }
}
