//! Configuration loaded from `callsight.toml`.
//!
//! [`CallsightConfig`] carries the backend address and the per-phase poll
//! budgets. Missing keys use defaults matching observed backend timing.
//! The `CALLSIGHT_BASE_URL` environment variable takes precedence over the
//! file.

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use serde::Deserialize;

use crate::poller::PollConfig;

/// Top-level configuration loaded from `callsight.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct CallsightConfig {
    /// Base URL of the unified analysis backend.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Delay between status polls, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Attempt budget for the transcription phase.
    #[serde(default = "default_transcription_attempts")]
    pub transcription_attempts: u32,

    /// Attempt budget for the analysis phase. Dual-engine analysis is
    /// long-running, so this budget is considerably larger.
    #[serde(default = "default_analysis_attempts")]
    pub analysis_attempts: u32,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

// 3 seconds between polls.
fn default_poll_interval_ms() -> u64 {
    3000
}

// 240 x 3s = 720s ceiling for transcription.
fn default_transcription_attempts() -> u32 {
    240
}

// 600 x 3s = 1800s ceiling for analysis.
fn default_analysis_attempts() -> u32 {
    600
}

impl Default for CallsightConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            poll_interval_ms: default_poll_interval_ms(),
            transcription_attempts: default_transcription_attempts(),
            analysis_attempts: default_analysis_attempts(),
        }
    }
}

impl CallsightConfig {
    /// Load configuration from `callsight.toml` in the current directory,
    /// falling back to defaults when the file does not exist.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(Path::new("callsight.toml"))?;

        // Environment takes precedence over the file for the backend URL.
        if let Ok(url) = std::env::var("CALLSIGHT_BASE_URL")
            && !url.is_empty()
        {
            config.base_url = url;
        }

        Ok(config)
    }

    /// Load configuration from a specific file, defaults when it is absent.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str::<CallsightConfig>(&contents)?)
    }

    pub fn transcription_budget(&self) -> PollConfig {
        PollConfig::new(
            Duration::from_millis(self.poll_interval_ms),
            self.transcription_attempts,
        )
    }

    pub fn analysis_budget(&self) -> PollConfig {
        PollConfig::new(
            Duration::from_millis(self.poll_interval_ms),
            self.analysis_attempts,
        )
    }
}
