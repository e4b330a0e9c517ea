//! Completion cue scheduling.
//!
//! A cue is three short pulses at 0 ms, 500 ms and 1000 ms after the
//! request. Every pulse is its own detached task, so a second request while
//! the first sequence is still playing overlaps it instead of queueing, and
//! nothing the engine does afterwards (reset, preset change) cancels pulses
//! already scheduled.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;

/// Offsets of the pulses from the request instant.
pub const PULSE_OFFSETS_MS: [u64; 3] = [0, 500, 1000];

/// The engine's view of the cue collaborator.
pub trait CueRequest: Send + Sync {
    /// Schedule a cue sequence. Must return without waiting for playback.
    fn request(&self);
}

/// One short pulse: a fixed-frequency tone with an exponential decay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tone {
    pub frequency_hz: f32,
    /// Starting amplitude, 0.0 ..= 1.0.
    pub gain: f32,
    /// Time for the envelope to decay to silence.
    pub decay_ms: u64,
}

impl Tone {
    pub fn decay(&self) -> Duration {
        Duration::from_millis(self.decay_ms)
    }
}

impl Default for Tone {
    fn default() -> Self {
        Self {
            frequency_hz: 800.0,
            gain: 0.3,
            decay_ms: 300,
        }
    }
}

/// Whatever actually makes the noise.
pub trait ToneSink: Send + Sync {
    fn play(&self, tone: &Tone);
}

/// Fires pulse sequences onto a tokio runtime.
///
/// The runtime handle and sink are handed in at construction; the
/// scheduler never looks up an ambient audio device or executor.
pub struct CueScheduler {
    runtime: Handle,
    sink: Arc<dyn ToneSink>,
    tone: Tone,
}

impl CueScheduler {
    pub fn new(runtime: Handle, sink: Arc<dyn ToneSink>, tone: Tone) -> Self {
        Self {
            runtime,
            sink,
            tone,
        }
    }
}

impl CueRequest for CueScheduler {
    fn request(&self) {
        tracing::debug!(pulses = PULSE_OFFSETS_MS.len(), "scheduling completion cue");
        for offset_ms in PULSE_OFFSETS_MS {
            let sink = Arc::clone(&self.sink);
            let tone = self.tone;
            self.runtime.spawn(async move {
                if offset_ms > 0 {
                    tokio::time::sleep(Duration::from_millis(offset_ms)).await;
                }
                sink.play(&tone);
            });
        }
    }
}

/// Cue that does nothing, for when cues are disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentCue;

impl CueRequest for SilentCue {
    fn request(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tokio::time::Instant;

    struct RecordingSink {
        origin: Instant,
        played: Mutex<Vec<u64>>,
    }

    impl RecordingSink {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                origin: Instant::now(),
                played: Mutex::new(Vec::new()),
            })
        }

        fn offsets(&self) -> Vec<u64> {
            self.played.lock().unwrap().clone()
        }
    }

    impl ToneSink for RecordingSink {
        fn play(&self, _tone: &Tone) {
            let elapsed = self.origin.elapsed().as_millis() as u64;
            self.played.lock().unwrap().push(elapsed);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn plays_three_pulses_half_a_second_apart() {
        let sink = RecordingSink::new();
        let cue = CueScheduler::new(Handle::current(), sink.clone(), Tone::default());

        cue.request();
        tokio::time::sleep(Duration::from_millis(2_000)).await;

        assert_eq!(sink.offsets(), vec![0, 500, 1000]);
    }

    #[tokio::test(start_paused = true)]
    async fn request_does_not_wait_for_playback() {
        let sink = RecordingSink::new();
        let cue = CueScheduler::new(Handle::current(), sink.clone(), Tone::default());

        cue.request();
        // Nothing has been polled yet: the request only scheduled work.
        assert!(sink.offsets().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn overlapping_requests_interleave() {
        let sink = RecordingSink::new();
        let cue = CueScheduler::new(Handle::current(), sink.clone(), Tone::default());

        cue.request();
        tokio::time::sleep(Duration::from_millis(250)).await;
        cue.request();
        tokio::time::sleep(Duration::from_millis(2_000)).await;

        assert_eq!(sink.offsets(), vec![0, 250, 500, 750, 1000, 1250]);
    }

    #[test]
    fn default_tone() {
        let tone = Tone::default();
        assert_eq!(tone.frequency_hz, 800.0);
        assert_eq!(tone.decay(), Duration::from_millis(300));
    }
}
