//! Composition root: engine + clock + history + persistence + calendar.
//!
//! User actions go through [`FocusController`], which forwards them to the
//! engine and then keeps the clock registration in step with the engine
//! phase. Completed sessions are appended to the history and the whole
//! history is pushed to the store before the call returns.

use chrono::{DateTime, Utc};

use crate::calendar::CalendarLink;
use crate::clock::Ticker;
use crate::error::{CoreError, GuardRejection, PersistenceError, Result};
use crate::events::Event;
use crate::history::SessionHistory;
use crate::session::{SessionId, SessionRecord};
use crate::storage::{CalendarConfig, SessionStore};
use crate::timer::TimerEngine;

/// Whether history changes are reaching the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceStatus {
    Durable,
    /// The store failed; history lives in memory until the process exits.
    MemoryOnly { reason: String },
}

type CalendarOpener = Box<dyn Fn(&CalendarLink) -> Result<()>>;

pub struct FocusController {
    engine: TimerEngine,
    history: SessionHistory,
    store: Box<dyn SessionStore>,
    ticker: Ticker,
    calendar: CalendarConfig,
    opener: CalendarOpener,
    persistence: PersistenceStatus,
}

impl FocusController {
    /// Load the saved history and wrap the engine.
    ///
    /// A store that cannot be read is not fatal: the controller starts with
    /// an empty history and stops writing to that store.
    pub fn open(
        mut engine: TimerEngine,
        store: Box<dyn SessionStore>,
        calendar: CalendarConfig,
    ) -> Self {
        let (history, persistence) = match store.load() {
            Ok(Some(sessions)) => {
                tracing::debug!(sessions = sessions.len(), "loaded session history");
                (SessionHistory::from_records(sessions), PersistenceStatus::Durable)
            }
            Ok(None) => (SessionHistory::new(), PersistenceStatus::Durable),
            Err(e) => {
                tracing::warn!(error = %e, "session history unavailable; running in memory only");
                (
                    SessionHistory::new(),
                    PersistenceStatus::MemoryOnly {
                        reason: e.to_string(),
                    },
                )
            }
        };
        if let Some(max) = history.max_numeric_id() {
            engine.reserve_session_ids_through(max);
        }
        Self {
            engine,
            history,
            store,
            ticker: Ticker::new(),
            calendar,
            opener: Box::new(|link: &CalendarLink| link.open()),
            persistence,
        }
    }

    /// Replace how calendar links are launched.
    pub fn with_calendar_opener(
        mut self,
        opener: impl Fn(&CalendarLink) -> Result<()> + 'static,
    ) -> Self {
        self.opener = Box::new(opener);
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn engine(&self) -> &TimerEngine {
        &self.engine
    }

    pub fn history(&self) -> &SessionHistory {
        &self.history
    }

    pub fn persistence_status(&self) -> &PersistenceStatus {
        &self.persistence
    }

    pub fn clock_armed(&self) -> bool {
        self.ticker.is_armed()
    }

    // ── User actions ─────────────────────────────────────────────────
    //
    // Anything that can move the engine into or out of Running needs a
    // tokio runtime, because it arms or drops the clock registration.

    pub fn select_preset(&mut self, label: &str) -> Result<Event> {
        let event = self.engine.select_preset(label)?;
        self.sync_clock();
        Ok(event)
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.engine.set_title(title);
    }

    pub fn start(&mut self) -> std::result::Result<Event, GuardRejection> {
        let result = self.engine.start();
        self.sync_clock();
        result
    }

    pub fn pause(&mut self) -> Option<Event> {
        let event = self.engine.pause();
        self.sync_clock();
        event
    }

    pub fn toggle(&mut self) -> std::result::Result<Event, GuardRejection> {
        let result = self.engine.toggle();
        self.sync_clock();
        result
    }

    pub fn reset(&mut self) -> Event {
        let event = self.engine.reset();
        self.sync_clock();
        event
    }

    /// Wait for the next clock tick and apply it.
    ///
    /// Never resolves while the countdown is not running.
    pub async fn next_tick(&mut self) -> Option<Event> {
        self.ticker.tick().await;
        self.apply_tick()
    }

    /// Apply one tick without waiting for the clock.
    pub fn apply_tick(&mut self) -> Option<Event> {
        let event = self.engine.tick();
        self.sync_clock();
        if let Some(record) = event.as_ref().and_then(Event::completed_record) {
            self.record_completion(record.clone());
        }
        event
    }

    /// Delete a session. Deleting an unknown id is a no-op.
    ///
    /// # Errors
    /// Returns the persistence failure when the session was removed from
    /// memory but the store no longer reflects it.
    pub fn delete_session(
        &mut self,
        id: &SessionId,
    ) -> std::result::Result<bool, PersistenceError> {
        if !self.history.remove(id) {
            return Ok(false);
        }
        tracing::info!(id = %id, "session deleted");
        self.persist()?;
        Ok(true)
    }

    pub fn calendar_link_for(&self, id: &SessionId) -> Result<CalendarLink> {
        self.history
            .get(id)
            .map(CalendarLink::for_record)
            .ok_or_else(|| CoreError::SessionNotFound(id.to_string()))
    }

    /// Link for the countdown as currently configured, starting `now`.
    pub fn calendar_link_for_current(&self, now: DateTime<Utc>) -> Result<CalendarLink> {
        CalendarLink::in_progress(self.engine.title(), self.engine.active_preset(), now)
    }

    /// Stop the countdown and release the clock.
    pub fn shutdown(&mut self) {
        self.engine.pause();
        self.ticker.disarm();
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn sync_clock(&mut self) {
        if self.engine.is_running() {
            self.ticker.arm();
        } else {
            self.ticker.disarm();
        }
    }

    fn record_completion(&mut self, record: SessionRecord) {
        let link = CalendarLink::for_record(&record);
        self.history.append(record);
        // Failures are logged and visible through `persistence_status`.
        let _ = self.persist();
        if self.calendar.open_on_complete {
            if let Err(e) = (self.opener)(&link) {
                tracing::warn!(error = %e, "could not open calendar event");
            }
        }
    }

    fn persist(&mut self) -> std::result::Result<(), PersistenceError> {
        if let PersistenceStatus::MemoryOnly { reason } = &self.persistence {
            return Err(PersistenceError::Unavailable(reason.clone()));
        }
        if let Err(e) = self.store.save(self.history.list()) {
            tracing::warn!(error = %e, "session history not saved; continuing in memory only");
            self.persistence = PersistenceStatus::MemoryOnly {
                reason: e.to_string(),
            };
            return Err(e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cue::SilentCue;
    use crate::storage::MemoryStore;
    use crate::timer::{PresetCatalog, PresetDuration};
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::Arc;

    fn engine() -> TimerEngine {
        let catalog = PresetCatalog::new(vec![
            PresetDuration::new("One", 1),
            PresetDuration::new("Two", 2),
        ])
        .unwrap();
        TimerEngine::new(Arc::new(catalog), Arc::new(SilentCue))
    }

    fn quiet_calendar() -> CalendarConfig {
        CalendarConfig {
            open_on_complete: false,
        }
    }

    fn run_to_completion(controller: &mut FocusController) -> Event {
        loop {
            if let Some(event) = controller.apply_tick() {
                return event;
            }
        }
    }

    #[tokio::test]
    async fn clock_follows_running_phase() {
        let mut c = FocusController::open(engine(), Box::new(MemoryStore::new()), quiet_calendar());
        c.set_title("Work");
        assert!(!c.clock_armed());

        c.start().unwrap();
        assert!(c.clock_armed());
        c.pause();
        assert!(!c.clock_armed());
        c.toggle().unwrap();
        assert!(c.clock_armed());
        c.select_preset("Two").unwrap();
        assert!(!c.clock_armed());
        c.start().unwrap();
        c.reset();
        assert!(!c.clock_armed());
    }

    #[tokio::test]
    async fn rejected_start_leaves_clock_disarmed() {
        let mut c = FocusController::open(engine(), Box::new(MemoryStore::new()), quiet_calendar());
        assert_eq!(c.start(), Err(GuardRejection::EmptyTitle));
        assert!(!c.clock_armed());
    }

    #[tokio::test]
    async fn completion_appends_and_persists() {
        let store = MemoryStore::new();
        let mut c = FocusController::open(engine(), Box::new(store.clone()), quiet_calendar());
        c.set_title("Work");
        c.start().unwrap();

        let event = run_to_completion(&mut c);
        assert!(event.completed_record().is_some());
        assert!(!c.clock_armed());
        assert_eq!(c.history().len(), 1);
        assert_eq!(store.saved().unwrap(), c.history().list().to_vec());
    }

    #[tokio::test]
    async fn untitled_completion_is_not_persisted() {
        let store = MemoryStore::new();
        let mut c = FocusController::open(engine(), Box::new(store.clone()), quiet_calendar());
        c.set_title("Work");
        c.start().unwrap();
        c.set_title("");

        run_to_completion(&mut c);
        assert!(c.history().is_empty());
        assert_eq!(store.save_count(), 0);
    }

    #[tokio::test]
    async fn delete_persists_and_is_idempotent() {
        let store = MemoryStore::new();
        let mut c = FocusController::open(engine(), Box::new(store.clone()), quiet_calendar());
        c.set_title("Work");
        c.start().unwrap();
        let event = run_to_completion(&mut c);
        let id = event.completed_record().unwrap().id.clone();

        assert!(c.delete_session(&id).unwrap());
        assert_eq!(store.saved(), Some(vec![]));
        assert!(!c.delete_session(&id).unwrap());
        assert_eq!(store.save_count(), 2);
    }

    #[test]
    fn delete_reports_unsaved_removal() {
        let old = SessionRecord::new(
            SessionId::Numeric(1),
            "old",
            &PresetDuration::new("One", 1),
            Utc::now(),
        );
        let store = MemoryStore::with_sessions(vec![old.clone()]);
        let mut c = FocusController::open(engine(), Box::new(store.clone()), quiet_calendar());
        store.set_unavailable(true);

        assert!(c.delete_session(&old.id).is_err());
        assert!(c.history().is_empty());
        assert!(matches!(
            c.persistence_status(),
            PersistenceStatus::MemoryOnly { .. }
        ));
        store.set_unavailable(false);
        assert_eq!(store.saved(), Some(vec![old]));
    }

    #[test]
    fn delete_in_memory_only_mode_is_an_error() {
        let store = MemoryStore::new();
        store.set_unavailable(true);
        let mut c = FocusController::open(engine(), Box::new(store), quiet_calendar());
        assert!(!c.delete_session(&SessionId::Numeric(5)).unwrap());

        c.history.append(SessionRecord::new(
            SessionId::Numeric(5),
            "kept in memory",
            &PresetDuration::new("One", 1),
            Utc::now(),
        ));
        assert!(matches!(
            c.delete_session(&SessionId::Numeric(5)),
            Err(PersistenceError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn loads_saved_history_and_continues_ids() {
        let seeded = i64::MAX / 2;
        let old = SessionRecord::new(
            SessionId::Numeric(seeded),
            "old",
            &PresetDuration::new("One", 1),
            Utc::now(),
        );
        let store = MemoryStore::with_sessions(vec![old.clone()]);
        let mut c = FocusController::open(engine(), Box::new(store), quiet_calendar());
        assert_eq!(c.history().list(), &[old]);
        assert_eq!(c.persistence_status(), &PersistenceStatus::Durable);

        c.set_title("Work");
        c.start().unwrap();
        let event = run_to_completion(&mut c);
        let id = event.completed_record().unwrap().id.as_numeric();
        assert!(id > Some(seeded));
        assert_eq!(c.history().len(), 2);
    }

    #[tokio::test]
    async fn unreadable_store_degrades_to_memory_only() {
        let store = MemoryStore::new();
        store.set_unavailable(true);
        let mut c = FocusController::open(engine(), Box::new(store.clone()), quiet_calendar());
        assert!(matches!(
            c.persistence_status(),
            PersistenceStatus::MemoryOnly { .. }
        ));

        store.set_unavailable(false);
        c.set_title("Work");
        c.start().unwrap();
        run_to_completion(&mut c);
        assert_eq!(c.history().len(), 1);
        // Never overwrite a store whose contents were not loaded.
        assert_eq!(store.save_count(), 0);
    }

    #[tokio::test]
    async fn failing_save_keeps_the_countdown_going() {
        let store = MemoryStore::new();
        let mut c = FocusController::open(engine(), Box::new(store.clone()), quiet_calendar());
        store.set_unavailable(true);
        c.set_title("Work");
        c.start().unwrap();
        run_to_completion(&mut c);

        assert_eq!(c.history().len(), 1);
        assert!(matches!(
            c.persistence_status(),
            PersistenceStatus::MemoryOnly { .. }
        ));
        assert!(c.start().is_ok());
    }

    #[tokio::test]
    async fn opens_calendar_on_completion_when_enabled() {
        let opened = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&opened);
        let mut c = FocusController::open(
            engine(),
            Box::new(MemoryStore::new()),
            CalendarConfig {
                open_on_complete: true,
            },
        )
        .with_calendar_opener(move |link| {
            sink.borrow_mut().push(link.title.clone());
            Ok(())
        });
        c.set_title("Work");
        c.start().unwrap();
        run_to_completion(&mut c);
        assert_eq!(opened.borrow().as_slice(), ["Work (One)".to_string()]);
    }

    #[tokio::test]
    async fn calendar_failures_are_not_fatal() {
        let mut c = FocusController::open(
            engine(),
            Box::new(MemoryStore::new()),
            CalendarConfig {
                open_on_complete: true,
            },
        )
        .with_calendar_opener(|_| Err(CoreError::Calendar("no browser".into())));
        c.set_title("Work");
        c.start().unwrap();
        run_to_completion(&mut c);
        assert_eq!(c.history().len(), 1);
    }

    #[test]
    fn calendar_links_for_history_and_current() {
        let mut c = FocusController::open(engine(), Box::new(MemoryStore::new()), quiet_calendar());
        assert!(matches!(
            c.calendar_link_for(&SessionId::Numeric(1)),
            Err(CoreError::SessionNotFound(_))
        ));
        assert!(c.calendar_link_for_current(Utc::now()).is_err());
        c.set_title("Plan");
        let link = c.calendar_link_for_current(Utc::now()).unwrap();
        assert_eq!(link.title, "Plan (One)");
    }

    #[tokio::test(start_paused = true)]
    async fn next_tick_drives_a_full_countdown() {
        let mut c = FocusController::open(engine(), Box::new(MemoryStore::new()), quiet_calendar());
        c.set_title("Work");
        c.start().unwrap();
        let mut ticks = 0;
        let completed = loop {
            ticks += 1;
            if let Some(event) = c.next_tick().await {
                break event;
            }
        };
        assert_eq!(ticks, 60);
        assert!(completed.is_completion());
        assert!(!c.clock_armed());
    }

    #[tokio::test]
    async fn shutdown_releases_the_clock() {
        let mut c = FocusController::open(engine(), Box::new(MemoryStore::new()), quiet_calendar());
        c.set_title("Work");
        c.start().unwrap();
        c.shutdown();
        assert!(!c.clock_armed());
        assert!(!c.engine().is_running());
    }
}
