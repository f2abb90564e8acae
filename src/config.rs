//! Scheduler configuration, loadable from TOML.
//!
//! ```toml
//! completion_margin_ms = 500
//! housekeeping_interval_ms = 1000
//! always_use_fallback_timer = false
//! reset_state_on_interruption = false
//!
//! [sink]
//! clip_dir = "sounds"
//! default_extension = "wav"
//! volume = 1.0
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SchedulerError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Added to the clip duration when completion is derived from a timer
    pub completion_margin_ms: u64,
    /// Volume poll period; 0 disables the poll
    pub housekeeping_interval_ms: u64,
    /// Arm the duration timer even when the sink reports completion itself
    pub always_use_fallback_timer: bool,
    /// On interruption-begin, mark the scheduler idle instead of only stopping the sink.
    /// Off by default: the state stays `Playing` until the interruption ends with a resume
    /// or a completion arrives, and enqueues in between do not start playback.
    pub reset_state_on_interruption: bool,
    pub sink: SinkConfig,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            completion_margin_ms: 500,
            housekeeping_interval_ms: 1000,
            always_use_fallback_timer: false,
            reset_state_on_interruption: false,
            sink: SinkConfig::default(),
        }
    }
}

impl SchedulerConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| SchedulerError::Config(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        toml::from_str(&text)
            .map_err(|e| SchedulerError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn completion_margin(&self) -> Duration {
        Duration::from_millis(self.completion_margin_ms)
    }

    pub fn housekeeping_interval(&self) -> Option<Duration> {
        match self.housekeeping_interval_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SinkConfig {
    /// Directory identifiers are resolved against
    pub clip_dir: PathBuf,
    /// Appended to identifiers that carry no extension
    pub default_extension: String,
    pub volume: f32,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            clip_dir: PathBuf::from("."),
            default_extension: "wav".to_string(),
            volume: 1.0,
        }
    }
}
