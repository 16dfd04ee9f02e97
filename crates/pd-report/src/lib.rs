//! Output artifacts for `PayDay` timesheets.
//!
//! # CSV layout
//!
//! ```text
//! Day,TimeBlocks,Location,Tasks/Details,Client(s),Hours
//! monday,"0900-1200, 1200-1700",...,7.5
//! TOTAL,,,,,7.5
//! # Compiled with PayDay <version>
//! ```
//!
//! Multi-block columns are joined with `", "`, so they are always quoted.
//! Hours use one decimal; the `TOTAL` row sums every row. The trailing
//! comment line is a fixed watermark.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use pd_core::{COLUMNS, Row, Timesheet};
use serde::Serialize;
use thiserror::Error;

/// Footer comment written after the `TOTAL` row.
pub const WATERMARK: &str = concat!("Compiled with PayDay ", env!("CARGO_PKG_VERSION"));

/// Default output file name, relative to the working directory.
pub const DEFAULT_OUTPUT: &str = "cpd.csv";

/// Errors writing an output artifact.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The parent directory of the output could not be created.
    #[error("failed to create directory {}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The output file could not be written.
    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The timesheet could not be serialized.
    #[error("failed to serialize timesheet: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Quotes a CSV field when it holds a delimiter, quote or line break.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn csv_line<S: AsRef<str>>(out: &mut String, cells: &[S]) {
    let line = cells
        .iter()
        .map(|c| csv_field(c.as_ref()))
        .collect::<Vec<_>>()
        .join(",");
    out.push_str(&line);
    out.push('\n');
}

/// Renders the complete CSV document for a timesheet.
pub fn render_csv(sheet: &Timesheet) -> String {
    let mut out = String::new();
    csv_line(&mut out, &COLUMNS);
    for row in &sheet.rows {
        csv_line(&mut out, &row.cells());
    }
    let total = format!("{:.1}", sheet.total_hours());
    csv_line(&mut out, &["TOTAL", "", "", "", "", total.as_str()]);
    // Infallible for String.
    let _ = writeln!(out, "# {WATERMARK}");
    out
}

#[derive(Serialize)]
struct JsonReport<'a> {
    rows: &'a [Row],
    total_hours: f64,
}

/// Renders the timesheet as pretty-printed JSON.
pub fn render_json(sheet: &Timesheet) -> Result<String, ReportError> {
    let report = JsonReport {
        rows: &sheet.rows,
        total_hours: sheet.total_hours(),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

/// Writes timesheets as CSV files.
#[derive(Debug, Clone)]
pub struct CsvWriter {
    path: PathBuf,
}

impl Default for CsvWriter {
    fn default() -> Self {
        Self::new(DEFAULT_OUTPUT)
    }
}

impl CsvWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the CSV, creating parent directories as needed.
    ///
    /// Returns the path written.
    pub fn write(&self, sheet: &Timesheet) -> Result<PathBuf, ReportError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| ReportError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&self.path, render_csv(sheet)).map_err(|source| ReportError::Write {
            path: self.path.clone(),
            source,
        })?;
        tracing::info!(
            path = %self.path.display(),
            rows = sheet.len(),
            total_hours = sheet.total_hours(),
            "wrote timesheet"
        );
        Ok(self.path.clone())
    }
}
