//! Timer engine implementation.
//!
//! The engine is a push-driven state machine. It owns no clock: an external
//! one-second source calls `tick()` while the engine reports `Running`.
//!
//! ## State Transitions
//!
//! ```text
//! Idle --start--> Running --tick x N--> Completed --(bundle)--> Idle
//!   ^               |
//!   +----pause------+
//! ```
//!
//! Paused is `Idle` with a partially consumed countdown; starting again
//! continues from where it stopped.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(catalog, cue);
//! engine.set_title("Write report");
//! engine.start()?;
//! // once per second:
//! if let Some(Event::TimerCompleted { record, .. }) = engine.tick() { ... }
//! ```

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::preset::{PresetCatalog, PresetDuration};
use crate::cue::CueRequest;
use crate::error::{CoreError, GuardRejection, Result};
use crate::events::Event;
use crate::session::{SessionIdGenerator, SessionRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerPhase {
    Idle,
    Running,
    /// Transient: held only while the completion bundle fires.
    Completed,
}

/// Core timer engine.
pub struct TimerEngine {
    catalog: Arc<PresetCatalog>,
    cue: Arc<dyn CueRequest>,
    phase: TimerPhase,
    active: usize,
    remaining_secs: u64,
    title: String,
    ids: SessionIdGenerator,
}

impl TimerEngine {
    /// Create a new engine, idle at the first preset's full duration.
    pub fn new(catalog: Arc<PresetCatalog>, cue: Arc<dyn CueRequest>) -> Self {
        let remaining_secs = catalog.first().duration_secs();
        Self {
            catalog,
            cue,
            phase: TimerPhase::Idle,
            active: 0,
            remaining_secs,
            title: String::new(),
            ids: SessionIdGenerator::default(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == TimerPhase::Running
    }

    /// Idle with part of the countdown already consumed.
    pub fn is_paused(&self) -> bool {
        self.phase == TimerPhase::Idle && self.remaining_secs < self.total_secs()
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn total_secs(&self) -> u64 {
        self.active_preset().duration_secs()
    }

    pub fn active_preset(&self) -> &PresetDuration {
        self.catalog.get(self.active).unwrap_or_else(|| self.catalog.first())
    }

    pub fn catalog(&self) -> &Arc<PresetCatalog> {
        &self.catalog
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// 0.0 .. 1.0 progress through the current countdown.
    pub fn progress(&self) -> f64 {
        let total = self.total_secs();
        if total == 0 {
            return 0.0;
        }
        1.0 - (self.remaining_secs as f64 / total as f64)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            phase: self.phase,
            label: self.active_preset().label.clone(),
            title: self.title.clone(),
            remaining_secs: self.remaining_secs,
            total_secs: self.total_secs(),
            paused: self.is_paused(),
            at: Utc::now(),
        }
    }

    /// Make sure fresh session ids are above `id`.
    pub fn reserve_session_ids_through(&mut self, id: i64) {
        self.ids.reserve_through(id);
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Switch to a catalog preset. Stops a running countdown.
    ///
    /// # Errors
    /// Returns `CoreError::UnknownPreset` if `label` is not in the catalog;
    /// the engine is left untouched.
    pub fn select_preset(&mut self, label: &str) -> Result<Event> {
        let index = self
            .catalog
            .position(label)
            .ok_or_else(|| CoreError::UnknownPreset {
                label: label.to_string(),
            })?;
        self.active = index;
        self.phase = TimerPhase::Idle;
        self.remaining_secs = self.total_secs();
        tracing::debug!(preset = label, "preset selected");
        Ok(Event::PresetSelected {
            label: label.to_string(),
            duration_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Begin or continue the countdown.
    ///
    /// # Errors
    /// Rejected when the title is blank or the countdown is already
    /// running. A rejection never changes state.
    pub fn start(&mut self) -> std::result::Result<Event, GuardRejection> {
        if self.phase == TimerPhase::Running {
            return Err(GuardRejection::AlreadyRunning);
        }
        if self.title.trim().is_empty() {
            tracing::debug!("start rejected: empty title");
            return Err(GuardRejection::EmptyTitle);
        }
        let resumed = self.is_paused();
        self.phase = TimerPhase::Running;
        tracing::debug!(remaining_secs = self.remaining_secs, resumed, "timer started");
        Ok(Event::TimerStarted {
            label: self.active_preset().label.clone(),
            remaining_secs: self.remaining_secs,
            resumed,
            at: Utc::now(),
        })
    }

    /// Stop the countdown, keeping the remaining time.
    pub fn pause(&mut self) -> Option<Event> {
        if self.phase != TimerPhase::Running {
            return None;
        }
        self.phase = TimerPhase::Idle;
        tracing::debug!(remaining_secs = self.remaining_secs, "timer paused");
        Some(Event::TimerPaused {
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Pause when running, otherwise start (subject to the start guard).
    pub fn toggle(&mut self) -> std::result::Result<Event, GuardRejection> {
        match self.pause() {
            Some(event) => Ok(event),
            None => self.start(),
        }
    }

    pub fn reset(&mut self) -> Event {
        self.phase = TimerPhase::Idle;
        self.remaining_secs = self.total_secs();
        Event::TimerReset {
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        }
    }

    /// Advance one second. Returns `Some(Event::TimerCompleted)` when the
    /// countdown reaches zero. Ticks outside `Running` are ignored.
    pub fn tick(&mut self) -> Option<Event> {
        if self.phase != TimerPhase::Running {
            tracing::debug!(phase = ?self.phase, "ignoring tick outside running phase");
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs > 0 {
            return None;
        }
        Some(self.complete())
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Fire the completion bundle: cue first, then the record, then reset.
    fn complete(&mut self) -> Event {
        self.phase = TimerPhase::Completed;
        self.cue.request();

        let now = Utc::now();
        let preset = self.active_preset().clone();
        let record = if self.title.trim().is_empty() {
            tracing::info!(preset = %preset.label, "countdown completed without a title; not recorded");
            None
        } else {
            let id = self.ids.next_id(now);
            tracing::info!(preset = %preset.label, id = %id, "countdown completed");
            Some(SessionRecord::new(id, self.title.clone(), &preset, now))
        };

        self.phase = TimerPhase::Idle;
        self.remaining_secs = preset.duration_secs();

        Event::TimerCompleted {
            label: preset.label,
            duration_min: preset.minutes,
            record,
            at: now,
        }
    }
}

/// Render seconds as `MM:SS`. Minutes keep growing past 99.
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
