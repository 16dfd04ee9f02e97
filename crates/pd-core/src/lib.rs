//! Core parsing logic for `PayDay`.
//!
//! This crate turns free-text work logs into timesheet rows:
//! - Time parsing: resolving tokens such as `0930`, `9am` or `17:45` and ranges between them
//! - Extraction: location, client and task from `at`/`for`/`with` directives
//! - Policy: lunch deduction, umbrella-block removal and hour aggregation
//! - Formatting: title and sentence casing for display

mod block;
mod extract;
mod parser;
mod patterns;
mod policy;
pub mod text;
pub mod timeparse;

pub use block::{Block, COLUMNS, Fields, Row, SENTINEL, Timesheet, UNKNOWN_DAY};
pub use extract::derive_day;
pub use parser::WorkLogParser;
pub use policy::{LunchDecision, Policy, PolicyError, TaskCase, sum_hours};
pub use timeparse::{RangeMatch, TimeSpan, extract_range, resolve};
