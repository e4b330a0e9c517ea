//! One-second clock source.
//!
//! The engine never schedules itself. The composition root arms a [`Ticker`]
//! when the countdown starts and disarms it the moment the countdown stops
//! for any reason, so no tick can arrive for a state that has moved on.

use std::time::Duration;

use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Holds at most one periodic registration.
#[derive(Debug, Default)]
pub struct Ticker {
    interval: Option<Interval>,
}

impl Ticker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the periodic tick. The first tick lands one period from now.
    /// Re-arming an armed ticker keeps the existing registration.
    ///
    /// Must be called from inside a tokio runtime.
    pub fn arm(&mut self) {
        if self.interval.is_some() {
            return;
        }
        let mut interval = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
        // After a stall, resume one tick per second instead of bursting.
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.interval = Some(interval);
    }

    /// Drop the registration, if any.
    pub fn disarm(&mut self) {
        self.interval = None;
    }

    pub fn is_armed(&self) -> bool {
        self.interval.is_some()
    }

    /// Wait for the next tick. Never resolves while disarmed.
    pub async fn tick(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }
}
