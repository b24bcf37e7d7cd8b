use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, time::Duration};

use crate::checkins::{
    activity::DEFAULT_RECENT_CAPACITY,
    board::{TickParams, DEFAULT_AGE_STEP_MINUTES, DEFAULT_ARRIVAL_PROBABILITY},
    catalog::SeedKind,
};

/// Env var naming an optional JSON settings file.
pub const SETTINGS_PATH_ENV: &str = "VIBE_CHECK_SETTINGS";
/// `1`/`true` logs a check-in summary on every tick.
pub const DEBUG_ENV: &str = "VIBE_CHECK_DEBUG";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineSettings {
    pub checkin_interval_ms: u64,
    pub arrival_probability: f64,
    pub age_step_minutes: f64,
    pub recent_capacity: usize,
    pub seed: SeedKind,
    pub synthetic_feed_interval_ms: u64,
    pub feed_buffer: usize,
    pub summary_every_ticks: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            checkin_interval_ms: 3_000,
            arrival_probability: DEFAULT_ARRIVAL_PROBABILITY,
            age_step_minutes: DEFAULT_AGE_STEP_MINUTES,
            recent_capacity: DEFAULT_RECENT_CAPACITY,
            seed: SeedKind::Demo,
            synthetic_feed_interval_ms: 50,
            feed_buffer: 32,
            summary_every_ticks: 10,
        }
    }
}

impl EngineSettings {
    /// Reads settings from `path` if given, otherwise starts from defaults.
    /// Fields missing from the file keep their defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let settings = match path {
            Some(path) => {
                let contents = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read settings from {}", path.display()))?;
                serde_json::from_str(&contents)
                    .with_context(|| format!("Failed to parse settings in {}", path.display()))?
            }
            None => Self::default(),
        };

        settings.validate()?;
        Ok(settings)
    }

    /// [`EngineSettings::load`] driven by the process environment.
    pub fn from_env() -> Result<Self> {
        let path = std::env::var_os(SETTINGS_PATH_ENV).map(std::path::PathBuf::from);
        let mut settings = Self::load(path.as_deref())?;

        let debug_mode = std::env::var(DEBUG_ENV)
            .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        if debug_mode {
            settings.summary_every_ticks = 1;
        }
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.arrival_probability) {
            bail!(
                "arrivalProbability must be within [0, 1], got {}",
                self.arrival_probability
            );
        }
        if !self.age_step_minutes.is_finite() || self.age_step_minutes < 0.0 {
            bail!("ageStepMinutes must be >= 0, got {}", self.age_step_minutes);
        }
        if self.recent_capacity == 0 {
            bail!("recentCapacity must be greater than zero");
        }
        if self.checkin_interval_ms == 0 || self.synthetic_feed_interval_ms == 0 {
            bail!("intervals must be greater than zero");
        }
        Ok(())
    }

    pub fn checkin_interval(&self) -> Duration {
        Duration::from_millis(self.checkin_interval_ms)
    }

    pub fn synthetic_feed_interval(&self) -> Duration {
        Duration::from_millis(self.synthetic_feed_interval_ms)
    }

    pub fn tick_params(&self) -> TickParams {
        TickParams {
            arrival_probability: self.arrival_probability,
            age_step_minutes: self.age_step_minutes,
        }
    }
}
