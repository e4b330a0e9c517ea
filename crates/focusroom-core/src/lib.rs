//! # Focusroom Core Library
//!
//! This library provides the core logic of the Focusroom focus timer: pick a
//! preset, name the task, count down, and keep a record of every finished
//! session. The CLI is a thin layer over the same library.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a push-driven state machine; an external one-second
//!   clock calls `tick()` while it is running
//! - **Cue**: three staggered pulses fired when a countdown completes
//! - **History**: append-only list of completed sessions, persisted in
//!   full after every change
//! - **Storage**: SQLite-backed history and TOML-based configuration
//! - **Calendar**: prefilled Google Calendar event links
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`FocusController`]: Composition root wiring engine, clock and storage
//! - [`CueScheduler`]: Completion cue playback
//! - [`Database`]: Session history persistence
//! - [`Config`]: Application configuration management

pub mod calendar;
pub mod clock;
pub mod controller;
pub mod cue;
pub mod error;
pub mod events;
pub mod history;
pub mod session;
pub mod storage;
pub mod timer;

pub use calendar::CalendarLink;
pub use clock::Ticker;
pub use controller::{FocusController, PersistenceStatus};
pub use cue::{CueRequest, CueScheduler, SilentCue, Tone, ToneSink};
pub use error::{ConfigError, CoreError, GuardRejection, PersistenceError};
pub use events::Event;
pub use history::{SessionHistory, Totals};
pub use session::{SessionId, SessionRecord};
pub use storage::{Config, Database, MemoryStore, SessionStore, UnavailableStore};
pub use timer::{format_clock, PresetCatalog, PresetDuration, TimerEngine, TimerPhase};
