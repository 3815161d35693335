use crate::application::{Config, TimetableApp};
use crate::domain::{
    CriterionPolicy, DoctorId, EntryId, NewTimetableEntry, TimetableEntry, TimetableError,
};
use anyhow::{Context, Result, anyhow};
use chrono::{NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::FmtSubscriber;
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser, Debug)]
#[command(name = "timetable")]
#[command(about = "Manage and query a clinic's doctor timetable")]
#[command(version)]
pub struct Cli {
    /// Database file (overrides TIMETABLE_DB)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Only use calendar-valid days and months in `by-date`
    #[arg(long, global = true)]
    pub bounded: bool,

    /// Log rendered queries
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Book a new appointment
    Add {
        #[arg(long)]
        surname: String,
        /// YYYY-MM-DD
        #[arg(long)]
        date: String,
        /// HH:MM or HH:MM:SS
        #[arg(long)]
        time: String,
        #[arg(long)]
        doctor: DoctorId,
    },
    /// Show a record that has not been cancelled
    Get { id: EntryId },
    /// Filter by any combination of day, month and year
    ByDate {
        #[arg(long)]
        doctor: DoctorId,
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        day: i32,
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        month: i32,
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        year: i32,
    },
    /// Records on a day of the month
    ByDay {
        #[arg(long)]
        doctor: DoctorId,
        #[arg(long, allow_hyphen_values = true)]
        day: i32,
    },
    /// Records in a month of the year
    ByMonth {
        #[arg(long)]
        doctor: DoctorId,
        #[arg(long, allow_hyphen_values = true)]
        month: i32,
    },
    /// Records in a year
    ByYear {
        #[arg(long)]
        doctor: DoctorId,
        #[arg(long, allow_hyphen_values = true)]
        year: i32,
    },
    /// Every record of a doctor, cancelled ones included
    All {
        #[arg(long)]
        doctor: DoctorId,
    },
    /// Mark a record as cancelled
    Cancel { id: EntryId },
}

impl Cli {
    pub fn run() -> Result<()> {
        let cli = Self::parse();

        let level = if cli.verbose {
            LevelFilter::DEBUG
        } else {
            LevelFilter::INFO
        };
        FmtSubscriber::builder()
            .with_max_level(level)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();

        let app = TimetableApp::new(cli.config()?)?;
        let stdout = std::io::stdout();
        cli.execute(&app, &mut stdout.lock())
    }

    pub fn config(&self) -> Result<Config> {
        let mut config = Config::from_env()?;
        if let Some(db) = &self.db {
            config.db_path = db.clone();
        }
        if self.bounded {
            config.criterion_policy = CriterionPolicy::Bounded;
        }
        Ok(config)
    }

    pub fn execute<W: Write>(&self, app: &TimetableApp, out: &mut W) -> Result<()> {
        let service = app.service();

        match &self.command {
            Commands::Add {
                surname,
                date,
                time,
                doctor,
            } => {
                let entry =
                    NewTimetableEntry::new(surname.as_str(), parse_date(date)?, parse_time(time)?, *doctor);
                let id = service.add_entry(entry)?;
                writeln!(out, "{id}")?;
            }
            Commands::Get { id } => {
                let entry = service.get_entry_by_id(*id)?;
                writeln!(out, "{}", serde_json::to_string_pretty(&entry)?)?;
            }
            Commands::ByDate {
                doctor,
                day,
                month,
                year,
            } => print_entries(
                out,
                &service.get_entries_by_flexible_date(*doctor, *day, *month, *year)?,
            )?,
            Commands::ByDay { doctor, day } => {
                print_entries(out, &service.get_entries_by_day(*doctor, *day)?)?
            }
            Commands::ByMonth { doctor, month } => {
                print_entries(out, &service.get_entries_by_month(*doctor, *month)?)?
            }
            Commands::ByYear { doctor, year } => {
                print_entries(out, &service.get_entries_by_year(*doctor, *year)?)?
            }
            Commands::All { doctor } => {
                print_entries(out, &service.get_all_entries_for_doctor(*doctor)?)?
            }
            Commands::Cancel { id } => {
                app.cancel_entry(*id)?;
                writeln!(out, "cancelled {id}")?;
            }
        }

        Ok(())
    }
}

/// Exit status for a failed run: 2 when the caller supplied a bad value,
/// 1 for everything else.
pub fn exit_code(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<TimetableError>() {
        Some(e) if e.is_validation() => ExitCode::from(2),
        _ => ExitCode::FAILURE,
    }
}

fn print_entries<W: Write>(out: &mut W, entries: &[TimetableEntry]) -> Result<()> {
    writeln!(out, "{}", serde_json::to_string_pretty(entries)?)?;
    Ok(())
}

fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .with_context(|| format!("invalid date '{input}', expected YYYY-MM-DD"))
}

fn parse_time(input: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(input, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(input, "%H:%M"))
        .map_err(|_| anyhow!("invalid time '{input}', expected HH:MM or HH:MM:SS"))
}
