//! Runtime settings, read from `config.toml` and `ATTENDANCE_*` environment variables.

use serde::Deserialize;

use crate::access::{Identity, Role};
use crate::error::ValidationError;
use crate::sample::{MAX_HISTORY_DAYS, SampleOptions};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SampleSettings {
    pub seed: u64,
    pub presence_probability: f64,
    pub history_days: u32,
}

impl Default for SampleSettings {
    fn default() -> Self {
        let options = SampleOptions::default();
        Self {
            seed: options.seed,
            presence_probability: options.presence_probability,
            history_days: options.history_days,
        }
    }
}

impl From<&SampleSettings> for SampleOptions {
    fn from(settings: &SampleSettings) -> Self {
        Self {
            seed: settings.seed,
            presence_probability: settings.presence_probability,
            history_days: settings.history_days,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalyticsSettings {
    /// Number of days shown in the daily trend.
    pub window_days: u32,
    /// Number of days the absentee rate looks back over.
    pub recent_days: u32,
    pub top_performers: usize,
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self {
            window_days: 14,
            recent_days: 7,
            top_performers: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct IdentitySettings {
    pub name: String,
    pub role: Role,
}

impl Default for IdentitySettings {
    fn default() -> Self {
        Self {
            name: "Faculty User".to_string(),
            role: Role::Faculty,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub sample: SampleSettings,
    pub analytics: AnalyticsSettings,
    pub identity: IdentitySettings,
}

impl Settings {
    pub fn identity(&self) -> Identity {
        Identity::new(self.identity.name.clone(), self.identity.role)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(0.0..=1.0).contains(&self.sample.presence_probability) {
            return Err(ValidationError::InvalidSetting(format!(
                "sample.presence_probability must be between 0 and 1, got {}",
                self.sample.presence_probability
            )));
        }
        if self.sample.history_days > MAX_HISTORY_DAYS {
            return Err(ValidationError::InvalidSetting(format!(
                "sample.history_days must be at most {MAX_HISTORY_DAYS}, got {}",
                self.sample.history_days
            )));
        }
        if self.analytics.window_days == 0 {
            return Err(ValidationError::InvalidSetting(
                "analytics.window_days must be at least 1".to_string(),
            ));
        }
        if self.analytics.recent_days == 0 {
            return Err(ValidationError::InvalidSetting(
                "analytics.recent_days must be at least 1".to_string(),
            ));
        }
        if self.identity.name.trim().is_empty() {
            return Err(ValidationError::InvalidSetting(
                "identity.name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
