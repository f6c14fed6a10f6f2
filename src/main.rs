use anyhow::{Context, Result};
use attendance_dashboard::cli::{Cli, Command};
use attendance_dashboard::error::ValidationError;
use attendance_dashboard::store::Upsert;
use attendance_dashboard::{create_manager, display, load_settings};
use chrono::Local;
use clap::Parser;
use dotenvy::dotenv;
use env_logger::Env;

fn main() -> Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let mut settings = load_settings().context("failed to load settings")?;
    cli.apply_overrides(&mut settings);
    settings.validate()?;

    let today = cli.today.unwrap_or_else(|| Local::now().date_naive());
    let identity = settings.identity();
    let mut manager = create_manager(&settings, today)?;

    match cli.command {
        Command::Dashboard => {
            display::show_dashboard(&manager, &identity, today, &settings.analytics)
        }
        Command::Analytics => display::show_analytics(&manager, today, &settings.analytics),
        Command::Classes { search } => {
            display::show_classes(&manager, &identity, search.as_deref())
        }
        Command::Class { id } => display::show_class(&manager, &identity, &id)?,
        Command::Students { search } => display::show_students(&manager, search.as_deref()),
        Command::History { class } => {
            display::show_history(&manager, &identity, class.as_deref())?
        }
        Command::Mark {
            class,
            date,
            absent,
        } => {
            // Only the owner of a class (or an admin) can take its attendance.
            if !manager
                .get_class(&class)
                .is_ok_and(|found| identity.can_view(found))
            {
                return Err(ValidationError::UnknownClass(class).into());
            }

            let mut sheet = manager.attendance_sheet(&class, today)?;
            if let Some(date) = date {
                sheet.set_date(date);
            }
            for student_id in &absent {
                sheet.mark_absent(student_id)?;
            }

            let date = sheet.date();
            let outcome = manager.submit_attendance(sheet.into_submission())?;
            match outcome {
                Upsert::Inserted => println!("Attendance saved for {date}."),
                Upsert::Replaced => println!("Attendance for {date} replaced the earlier record."),
            }

            if let Some(record) = manager.records().get(&class, date) {
                display::show_record(&manager, record);
            }
            println!("Changes are kept in memory only and end with this run.");
        }
    }

    Ok(())
}
