use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, time::Duration};

/// Engine cadences. The defaults match the product behavior: a 1-second
/// clock tick and a 2-second pace refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineSettings {
    pub clock_tick_ms: u64,
    pub pace_refresh_ms: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            clock_tick_ms: 1_000,
            pace_refresh_ms: 2_000,
        }
    }
}

impl EngineSettings {
    pub fn clock_tick(&self) -> Duration {
        Duration::from_millis(self.clock_tick_ms)
    }

    pub fn pace_refresh(&self) -> Duration {
        Duration::from_millis(self.pace_refresh_ms)
    }

    /// Load from a JSON file, falling back to defaults when the file is
    /// missing or unreadable as settings.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read engine settings from {}", path.display()))?;
        Ok(serde_json::from_str(&contents).unwrap_or_default())
    }

    pub fn persist(&self, path: &Path) -> Result<()> {
        let serialized = serde_json::to_string_pretty(self)?;
        fs::write(path, serialized)
            .with_context(|| format!("Failed to write engine settings to {}", path.display()))
    }
}
