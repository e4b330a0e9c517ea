mod config;
pub mod database;
mod store;

pub use config::{CalendarConfig, Config, CueConfig};
pub use database::Database;
pub use store::{MemoryStore, SessionStore, UnavailableStore};

use std::path::PathBuf;

use crate::error::PersistenceError;

/// Returns the data directory, creating it if needed.
///
/// `FOCUSROOM_DATA_DIR` wins when set. Otherwise `~/.config/focusroom`, or
/// `~/.config/focusroom-dev` with `FOCUSROOM_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, PersistenceError> {
    let dir = match std::env::var_os("FOCUSROOM_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("FOCUSROOM_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("focusroom-dev")
            } else {
                base_dir.join("focusroom")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| PersistenceError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
