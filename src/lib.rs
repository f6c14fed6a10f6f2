use anyhow::Result;
use chrono::NaiveDate;
use config::{Config, Environment, File};

pub mod access;
pub mod analytics;
pub mod cli;
pub mod display;
pub mod error;
pub mod manager;
pub mod models;
pub mod sample;
pub mod settings;
pub mod store;

use crate::manager::AttendanceManager;
use crate::sample::SampleOptions;
use crate::settings::Settings;

/// Loads settings from an optional `config.toml` and `ATTENDANCE_*` environment variables.
///
/// Nested keys use a double underscore, e.g. `ATTENDANCE_SAMPLE__SEED=7`.
pub fn load_settings() -> Result<Settings> {
    let settings: Settings = Config::builder()
        .add_source(File::with_name("config").required(false))
        .add_source(
            Environment::with_prefix("ATTENDANCE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()?;

    settings.validate()?;
    Ok(settings)
}

/// Creates a manager filled with sample data ending on `today`, as configured by `settings`.
pub fn create_manager(settings: &Settings, today: NaiveDate) -> Result<AttendanceManager> {
    let options = SampleOptions::from(&settings.sample);
    Ok(AttendanceManager::with_sample_data(&options, today)?)
}
