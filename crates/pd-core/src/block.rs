//! Parsed work blocks and the rows they roll up into.

use serde::Serialize;

use crate::timeparse::{TimeSpan, round2};

/// Rendered value of a field the extractors could not determine.
pub const SENTINEL: &str = "NaN";

/// Rendered day when a line names no weekday.
pub const UNKNOWN_DAY: &str = "unknown";

/// Column headers, in output order.
pub const COLUMNS: [&str; 6] = [
    "Day",
    "TimeBlocks",
    "Location",
    "Tasks/Details",
    "Client(s)",
    "Hours",
];

/// Location, client and task attributed to a block. `None` is the sentinel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields {
    pub location: Option<String>,
    pub client: Option<String>,
    pub task: Option<String>,
}

impl Fields {
    /// Fills fields that are still undetermined; set fields are never overwritten.
    pub fn fill_missing(&mut self, other: Self) {
        if self.location.is_none() {
            self.location = other.location;
        }
        if self.client.is_none() {
            self.client = other.client;
        }
        if self.task.is_none() {
            self.task = other.task;
        }
    }
}

/// One recognized work interval.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub span: TimeSpan,
    pub fields: Fields,
    /// Duration in hours, rounded to two decimals.
    pub hours: f64,
}

impl Block {
    pub fn new(span: TimeSpan, fields: Fields) -> Self {
        Self {
            span,
            fields,
            hours: span.hours(),
        }
    }
}

/// One output record per parsed line.
///
/// The joined columns hold one entry per surviving block, in block order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    #[serde(rename = "Day")]
    pub day: String,
    #[serde(rename = "TimeBlocks")]
    pub time_blocks: String,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Tasks/Details")]
    pub tasks: String,
    #[serde(rename = "Client(s)")]
    pub clients: String,
    #[serde(rename = "Hours")]
    pub hours: f64,
}

impl Row {
    /// Cells in [`COLUMNS`] order, with hours at one decimal.
    pub fn cells(&self) -> [String; 6] {
        [
            self.day.clone(),
            self.time_blocks.clone(),
            self.location.clone(),
            self.tasks.clone(),
            self.clients.clone(),
            format!("{:.1}", self.hours),
        ]
    }
}

/// Rows parsed from one input text, in input line order.
///
/// An empty timesheet means no line held a recognizable time range.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Timesheet {
    pub rows: Vec<Row>,
}

impl Timesheet {
    pub const fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Sum of row hours across the whole input.
    pub fn total_hours(&self) -> f64 {
        round2(self.rows.iter().map(|r| r.hours).sum())
    }
}
