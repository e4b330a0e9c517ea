//! Tone sinks for the completion cue.
//!
//! Without the `audio` feature every pulse rings the terminal bell. With it,
//! pulses are synthesized and mixed on the default output device.

use std::io::Write;
use std::sync::Arc;

use focusroom_core::{Tone, ToneSink};

/// Rings the terminal bell once per pulse.
pub struct BellSink;

impl ToneSink for BellSink {
    fn play(&self, tone: &Tone) {
        tracing::debug!(frequency_hz = tone.frequency_hz, "cue pulse");
        let mut err = std::io::stderr();
        let _ = err.write_all(b"\x07");
        let _ = err.flush();
    }
}

/// The best sink available in this build.
pub fn default_sink() -> Arc<dyn ToneSink> {
    #[cfg(feature = "audio")]
    {
        match speaker::SpeakerSink::open() {
            Ok(sink) => return Arc::new(sink),
            Err(e) => tracing::warn!(error = %e, "audio output unavailable; using terminal bell"),
        }
    }
    Arc::new(BellSink)
}

#[cfg(feature = "audio")]
mod speaker {
    use std::f32::consts::PI;
    use std::sync::mpsc::{self, Sender};
    use std::thread;
    use std::time::Duration;

    use focusroom_core::{Tone, ToneSink};
    use rodio::{OutputStream, Source};

    const SAMPLE_RATE: u32 = 44_100;
    /// Level the envelope decays to by the end of the pulse.
    const FLOOR: f32 = 0.01;

    /// Sine pulse with an exponential decay envelope.
    pub struct DecayingTone {
        frequency_hz: f32,
        gain: f32,
        total_samples: usize,
        num_sample: usize,
    }

    impl DecayingTone {
        pub fn new(tone: &Tone) -> Self {
            let total_samples =
                (tone.decay().as_secs_f32() * SAMPLE_RATE as f32).round() as usize;
            Self {
                frequency_hz: tone.frequency_hz,
                gain: tone.gain,
                total_samples,
                num_sample: 0,
            }
        }
    }

    impl Iterator for DecayingTone {
        type Item = f32;

        fn next(&mut self) -> Option<Self::Item> {
            if self.num_sample >= self.total_samples || self.gain <= 0.0 {
                return None;
            }
            let t = self.num_sample as f32 / SAMPLE_RATE as f32;
            let progress = self.num_sample as f32 / self.total_samples as f32;
            let ratio = (FLOOR / self.gain).min(1.0);
            let envelope = self.gain * ratio.powf(progress);
            self.num_sample += 1;
            Some((2.0 * PI * self.frequency_hz * t).sin() * envelope)
        }
    }

    impl Source for DecayingTone {
        fn current_frame_len(&self) -> Option<usize> {
            Some(self.total_samples.saturating_sub(self.num_sample))
        }

        fn channels(&self) -> u16 {
            1
        }

        fn sample_rate(&self) -> u32 {
            SAMPLE_RATE
        }

        fn total_duration(&self) -> Option<Duration> {
            Some(Duration::from_secs_f32(
                self.total_samples as f32 / SAMPLE_RATE as f32,
            ))
        }
    }

    /// Plays pulses on a dedicated thread that owns the (non-Send) output
    /// stream. Each pulse is mixed independently, so sequences overlap.
    pub struct SpeakerSink {
        tx: Sender<Tone>,
    }

    impl SpeakerSink {
        pub fn open() -> Result<Self, String> {
            let (tx, rx) = mpsc::channel::<Tone>();
            let (ready_tx, ready_rx) = mpsc::channel::<Result<(), String>>();

            thread::Builder::new()
                .name("cue-audio".to_string())
                .spawn(move || {
                    let (_stream, handle) = match OutputStream::try_default() {
                        Ok(pair) => {
                            let _ = ready_tx.send(Ok(()));
                            pair
                        }
                        Err(e) => {
                            let _ = ready_tx
                                .send(Err(format!("Failed to create audio output stream: {e}")));
                            return;
                        }
                    };
                    while let Ok(tone) = rx.recv() {
                        if let Err(e) = handle.play_raw(DecayingTone::new(&tone)) {
                            tracing::warn!(error = %e, "failed to play cue pulse");
                        }
                    }
                })
                .map_err(|e| e.to_string())?;

            ready_rx
                .recv()
                .map_err(|e| e.to_string())
                .and_then(|ready| ready)?;
            Ok(Self { tx })
        }
    }

    impl ToneSink for SpeakerSink {
        fn play(&self, tone: &Tone) {
            let _ = self.tx.send(*tone);
        }
    }

}
