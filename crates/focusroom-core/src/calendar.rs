//! Google Calendar "create event" deep links.
//!
//! Nothing here talks to the network: the link opens a prefilled event in
//! the user's browser and the user confirms it there.

use std::fmt;

use chrono::{DateTime, Duration, Utc};

use crate::error::{CoreError, GuardRejection, Result};
use crate::session::SessionRecord;
use crate::timer::PresetDuration;

const RENDER_URL: &str = "https://calendar.google.com/calendar/render";

/// A prefilled calendar event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarLink {
    pub title: String,
    pub details: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl CalendarLink {
    /// Event for a completed session, `[completed_at, completed_at + duration]`.
    pub fn for_record(record: &SessionRecord) -> Self {
        let (start, end) = record.calendar_window();
        Self::build(&record.title, &record.session_type, record.duration_min, start, end)
    }

    /// Event for a session that has not finished yet, `[now, now + duration]`.
    ///
    /// # Errors
    /// Rejected with `GuardRejection::EmptyTitle` when the title is blank.
    pub fn in_progress(title: &str, preset: &PresetDuration, now: DateTime<Utc>) -> Result<Self> {
        if title.trim().is_empty() {
            return Err(CoreError::Rejected(GuardRejection::EmptyTitle));
        }
        let end = now + Duration::minutes(i64::from(preset.minutes));
        Ok(Self::build(title, &preset.label, preset.minutes, now, end))
    }

    fn build(
        title: &str,
        kind: &str,
        minutes: u32,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self {
        Self {
            title: format!("{title} ({kind})"),
            details: format!("Completed a {minutes} minute {kind} session"),
            start,
            end,
        }
    }

    pub fn url(&self) -> String {
        format!(
            "{RENDER_URL}?action=TEMPLATE&text={}&details={}&dates={}/{}",
            urlencoding::encode(&self.title),
            urlencoding::encode(&self.details),
            format_stamp(self.start),
            format_stamp(self.end),
        )
    }

    /// Open the link in the default browser.
    ///
    /// # Errors
    /// Returns `CoreError::Calendar` if no browser could be launched.
    pub fn open(&self) -> Result<()> {
        open::that(self.url()).map_err(|e| CoreError::Calendar(e.to_string()))
    }
}

impl fmt::Display for CalendarLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url())
    }
}

/// Basic-format UTC stamp, e.g. `20240610T061320Z`.
fn format_stamp(at: DateTime<Utc>) -> String {
    at.format("%Y%m%dT%H%M%SZ").to_string()
}
