//! This module contains the command-line interface [`Cli`] parser for the attendance dashboard.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::access::Role;
use crate::models::parse_date;
use crate::settings::Settings;

/// The command line configuration struct, where the command-line interface parser is automatically
/// derived by [`clap::Parser`].
#[derive(Parser, Debug)]
#[command(version, about = "Faculty attendance dashboard")]
pub struct Cli {
    /// Act as this faculty member instead of the configured one.
    #[arg(long, global = true)]
    pub name: Option<String>,

    /// Act with this role instead of the configured one.
    #[arg(long, value_enum, global = true)]
    pub role: Option<Role>,

    /// Treat this day (YYYY-MM-DD) as today. Defaults to the local date.
    #[arg(long, global = true, value_parser = parse_date)]
    pub today: Option<NaiveDate>,

    /// Seed for the generated sample attendance.
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// The different views and actions available.
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show headline numbers, the daily attendance trend and your classes.
    Dashboard,

    /// Show daily trends, a comparison of classes and the top performing classes.
    Analytics,

    /// List the classes you can see, optionally only those matching a search term.
    Classes {
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Show a class with its attendance rate, roster and attendance history.
    Class { id: String },

    /// List students, optionally only those matching a search term.
    Students {
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Show attendance history, most recent first.
    History {
        /// Only show this class.
        #[arg(short, long)]
        class: Option<String>,
    },

    /// Take attendance for a class. Every enrolled student is present unless listed as absent.
    Mark {
        class: String,

        /// The day attendance is for (YYYY-MM-DD). Defaults to today.
        #[arg(short, long, value_parser = parse_date)]
        date: Option<NaiveDate>,

        /// ID of a student who was absent. May be repeated.
        #[arg(short, long)]
        absent: Vec<String>,
    },
}

impl Cli {
    /// Applies the command-line overrides on top of the loaded settings.
    pub fn apply_overrides(&self, settings: &mut Settings) {
        if let Some(name) = &self.name {
            settings.identity.name = name.clone();
        }
        if let Some(role) = self.role {
            settings.identity.role = role;
        }
        if let Some(seed) = self.seed {
            settings.sample.seed = seed;
        }
    }
}
