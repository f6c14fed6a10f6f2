//! Prints the generated sample data set as JSON.
//!
//! Uses the same settings as the dashboard, so the output is exactly the data the dashboard starts
//! from for a given seed and day. Pass a `YYYY-MM-DD` argument to pick the last day of history.

use anyhow::Result;
use attendance_dashboard::load_settings;
use attendance_dashboard::models::parse_date;
use attendance_dashboard::sample::{self, SampleOptions};
use chrono::Local;
use dotenvy::dotenv;

pub fn main() -> Result<()> {
    dotenv().ok();
    env_logger::init();

    let settings = load_settings()?;

    let today = match std::env::args().nth(1) {
        Some(arg) => parse_date(&arg)?,
        None => Local::now().date_naive(),
    };

    let data = sample::generate(&SampleOptions::from(&settings.sample), today)?;
    println!("{}", serde_json::to_string_pretty(&data)?);

    Ok(())
}
