//! `PayDay` CLI library.
//!
//! Reads a work log, parses it with [`pd_core::WorkLogParser`] and writes the
//! timesheet through [`pd_report`].

mod cli;
mod config;
pub mod input;
pub mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Local;
use pd_core::WorkLogParser;
use pd_report::{CsvWriter, render_json};

pub use cli::Cli;
pub use config::Config;
pub use input::InputError;

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The CSV was written.
    Wrote { path: PathBuf, rows: usize },
    /// The timesheet was printed as JSON.
    Printed { rows: usize },
    /// No line held a time range.
    NoRows,
}

impl Outcome {
    /// Process exit code: 0 on output, 1 when nothing was parsed.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::Wrote { .. } | Self::Printed { .. } => ExitCode::SUCCESS,
            Self::NoRows => ExitCode::from(1),
        }
    }
}

/// Exit code for input, configuration and output failures.
pub const FAILURE_EXIT: u8 = 2;

/// Runs one compile: read input, parse, then write or print.
pub fn run(cli: &Cli, config: &Config) -> Result<Outcome> {
    config
        .policy
        .validate()
        .context("invalid policy configuration")?;

    let text = input::read_input(cli.input.as_deref())?;
    let today = cli.today.unwrap_or_else(|| Local::now().date_naive());
    tracing::debug!(%today, policy = ?config.policy, "parsing work log");

    let sheet = WorkLogParser::new(config.policy.clone(), today).parse(&text);
    if sheet.is_empty() {
        tracing::error!("no valid work entries parsed, nothing to write");
        return Ok(Outcome::NoRows);
    }

    if cli.json {
        println!("{}", render_json(&sheet)?);
        return Ok(Outcome::Printed { rows: sheet.len() });
    }

    let path = CsvWriter::new(&config.output_path)
        .write(&sheet)
        .context("failed to write timesheet")?;
    tracing::info!("wrote {} row(s) -> {}", sheet.len(), path.display());
    Ok(Outcome::Wrote {
        path,
        rows: sheet.len(),
    })
}
