mod engine;
mod preset;

pub use engine::{format_clock, TimerEngine, TimerPhase};
pub use preset::{default_presets, PresetCatalog, PresetDuration};
