pub mod calendar;
pub mod config;
pub mod history;
pub mod presets;
pub mod run;

use std::sync::Arc;

use focusroom_core::{
    Config, CueRequest, Database, FocusController, PersistenceStatus, SessionStore, SilentCue,
    TimerEngine, UnavailableStore,
};

/// Open the on-disk history, or a failing store when it cannot be opened.
pub fn open_store() -> Box<dyn SessionStore> {
    match Database::open() {
        Ok(db) => Box::new(db),
        Err(e) => {
            tracing::warn!(error = %e, "could not open session database");
            Box::new(UnavailableStore::new(e.to_string()))
        }
    }
}

/// Controller with a silent cue, for commands that never run a countdown.
pub fn open_controller(config: &Config) -> Result<FocusController, Box<dyn std::error::Error>> {
    let catalog = Arc::new(config.catalog()?);
    let cue: Arc<dyn CueRequest> = Arc::new(SilentCue);
    let engine = TimerEngine::new(catalog, cue);
    Ok(FocusController::open(engine, open_store(), config.calendar.clone()))
}

/// Like [`open_controller`], but refuses to work on a history it could not load.
pub fn open_durable_controller(
    config: &Config,
) -> Result<FocusController, Box<dyn std::error::Error>> {
    let controller = open_controller(config)?;
    if let PersistenceStatus::MemoryOnly { reason } = controller.persistence_status() {
        return Err(format!("session history unavailable: {reason}").into());
    }
    Ok(controller)
}
