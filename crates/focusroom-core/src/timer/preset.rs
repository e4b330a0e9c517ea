use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// A named, fixed countdown duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetDuration {
    pub label: String,
    /// Duration in minutes.
    pub minutes: u32,
}

impl PresetDuration {
    pub fn new(label: impl Into<String>, minutes: u32) -> Self {
        Self {
            label: label.into(),
            minutes,
        }
    }

    /// Get preset duration in seconds.
    pub fn duration_secs(&self) -> u64 {
        u64::from(self.minutes).saturating_mul(60)
    }
}

/// Ordered, non-empty, immutable list of presets.
///
/// Built once at startup and shared with the engine; there is no way to
/// add or remove presets afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PresetCatalog {
    presets: Vec<PresetDuration>,
}

impl PresetCatalog {
    /// Validate and build a catalog.
    ///
    /// # Errors
    /// Returns `CoreError::InvalidCatalog` if the list is empty, a label is
    /// blank or duplicated, or a preset has zero minutes.
    pub fn new(presets: Vec<PresetDuration>) -> Result<Self> {
        if presets.is_empty() {
            return Err(CoreError::InvalidCatalog(
                "at least one preset is required".into(),
            ));
        }
        let mut seen = HashSet::new();
        for preset in &presets {
            if preset.label.trim().is_empty() {
                return Err(CoreError::InvalidCatalog("preset label is blank".into()));
            }
            if preset.minutes == 0 {
                return Err(CoreError::InvalidCatalog(format!(
                    "preset '{}' has zero minutes",
                    preset.label
                )));
            }
            if !seen.insert(preset.label.as_str()) {
                return Err(CoreError::InvalidCatalog(format!(
                    "duplicate preset label '{}'",
                    preset.label
                )));
            }
        }
        Ok(Self { presets })
    }

    pub fn presets(&self) -> &[PresetDuration] {
        &self.presets
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    /// Always false for a validated catalog.
    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PresetDuration> {
        self.presets.get(index)
    }

    pub fn first(&self) -> &PresetDuration {
        &self.presets[0]
    }

    pub fn position(&self, label: &str) -> Option<usize> {
        self.presets.iter().position(|p| p.label == label)
    }

    pub fn find(&self, label: &str) -> Option<&PresetDuration> {
        self.presets.iter().find(|p| p.label == label)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PresetDuration> {
        self.presets.iter()
    }
}

impl Default for PresetCatalog {
    fn default() -> Self {
        Self {
            presets: default_presets(),
        }
    }
}

/// The stock catalog offered when the config does not override it.
pub fn default_presets() -> Vec<PresetDuration> {
    vec![
        PresetDuration::new("Focus Time", 25),
        PresetDuration::new("Deep Work", 45),
        PresetDuration::new("Extended Focus", 55),
        PresetDuration::new("Power Session", 90),
    ]
}

impl<'de> Deserialize<'de> for PresetCatalog {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let presets = Vec::<PresetDuration>::deserialize(deserializer)?;
        PresetCatalog::new(presets).map_err(serde::de::Error::custom)
    }
}
