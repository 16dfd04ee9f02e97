//! Command-line argument definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;
use pd_core::TaskCase;

/// Compile free-text work logs into a weekly timesheet.
///
/// Each input line describes one day of work: time ranges such as `9-12` or
/// `0900-1700`, optionally followed by `at LOCATION`, `for CLIENT` or
/// `with CLIENT` and a task. Segments separated by `|` add blocks or fill in
/// missing details.
#[derive(Debug, Parser)]
#[command(name = "payday", version, about, long_about = None)]
pub struct Cli {
    /// Work-log file to read. Piped stdin is read when omitted.
    pub input: Option<PathBuf>,

    /// Where to write the CSV [default: cpd.csv].
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Print rows and the weekly total as JSON instead of writing the CSV.
    #[arg(long)]
    pub json: bool,

    /// Reference date for resolved times [default: the local date].
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub today: Option<NaiveDate>,

    /// Only deduct lunch when a line mentions lunch or a break.
    #[arg(long)]
    pub no_default_lunch: bool,

    /// Slack, in seconds, when dropping a block that spans the others.
    #[arg(long, value_name = "SECS")]
    pub tolerance: Option<i64>,

    /// Casing for tasks: title or sentence.
    #[arg(long, value_name = "CASE")]
    pub task_case: Option<TaskCase>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}
