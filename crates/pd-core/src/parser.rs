//! Line and segment parsing.
//!
//! Each input line is split on `|` into segments. A segment holding a time
//! range opens a new block and becomes the current one; a segment without a
//! range only fills still-undetermined fields of the current block, and is
//! dropped when no block exists yet. After the segment loop the line's
//! policies run and one row is emitted.

use chrono::NaiveDate;
use rayon::prelude::*;

use crate::block::{Block, Fields, Row, SENTINEL, Timesheet, UNKNOWN_DAY};
use crate::extract::{derive_day, parse_directive_tail, parse_equals_tail, parse_modifier};
use crate::policy::{Policy, TaskCase, sum_hours};
use crate::text::{clean_text, sentence_case, title_case};
use crate::timeparse::{BareRanges, TimeSpan, find_range};

/// Turns free-text work logs into timesheet rows.
///
/// Parsing depends only on the text, the reference date and the policy.
#[derive(Debug, Clone)]
pub struct WorkLogParser {
    policy: Policy,
    today: NaiveDate,
}

impl WorkLogParser {
    /// Creates a parser resolving bare times against `today`.
    pub const fn new(policy: Policy, today: NaiveDate) -> Self {
        Self { policy, today }
    }

    pub const fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Parses every line of `text`. Lines without a time range yield no row.
    ///
    /// Lines are independent and parsed in parallel; rows keep input order.
    pub fn parse(&self, text: &str) -> Timesheet {
        let lines: Vec<&str> = text.split(['\r', '\n']).collect();
        let rows: Vec<Row> = lines
            .par_iter()
            .filter_map(|line| self.parse_line(line))
            .collect();
        tracing::debug!(lines = lines.len(), rows = rows.len(), "parsed work log");
        Timesheet::new(rows)
    }

    /// Parses a single line into a row, or `None` if it holds no time range.
    pub fn parse_line(&self, raw: &str) -> Option<Row> {
        let line = clean_text(raw);
        if line.is_empty() {
            return None;
        }

        let day = derive_day(&line).unwrap_or(UNKNOWN_DAY);
        let segments: Vec<&str> = line
            .split('|')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        let lunch = self.policy.decide_lunch(&segments);

        let blocks = self.collect_blocks(&segments);
        if blocks.is_empty() {
            tracing::debug!(%line, "no time range found, skipping line");
            return None;
        }

        let mut blocks = self.policy.drop_covering_block(blocks);
        if lunch.subtract && lunch.annotate {
            annotate_lunch(&mut blocks);
        }

        let mut hours = sum_hours(&blocks);
        if lunch.subtract {
            hours = self.policy.apply_lunch(hours);
        }
        tracing::debug!(day, blocks = blocks.len(), hours, ?lunch, "parsed line");

        Some(self.render(day, &blocks, hours))
    }

    fn collect_blocks(&self, segments: &[&str]) -> Vec<Block> {
        let mut blocks: Vec<Block> = Vec::new();
        for (idx, segment) in segments.iter().enumerate() {
            // Later segments only open a bare-hour block when they start with it.
            let bare = if idx == 0 {
                BareRanges::Anywhere
            } else {
                BareRanges::Leading
            };
            let ranges = split_chained_ranges(segment, self.today, bare);
            if ranges.is_empty() {
                match blocks.last_mut() {
                    Some(current) => current.fields.fill_missing(parse_modifier(segment)),
                    None => tracing::debug!(segment, "modifier before any time range ignored"),
                }
                continue;
            }
            for (span, tail) in ranges {
                blocks.push(Block::new(span, block_fields(tail)));
            }
        }
        blocks
    }

    fn render(&self, day: &str, blocks: &[Block], hours: f64) -> Row {
        Row {
            day: day.to_string(),
            time_blocks: join(blocks, |b| b.span.label()),
            location: join(blocks, |b| title_case(shown(b.fields.location.as_deref()))),
            tasks: join(blocks, |b| self.format_task(shown(b.fields.task.as_deref()))),
            clients: join(blocks, |b| title_case(shown(b.fields.client.as_deref()))),
            hours,
        }
    }

    fn format_task(&self, task: &str) -> String {
        match self.policy.task_case {
            TaskCase::Title => title_case(task),
            TaskCase::Sentence => sentence_case(task),
        }
    }
}

fn shown(field: Option<&str>) -> &str {
    field.unwrap_or(SENTINEL)
}

fn join(blocks: &[Block], column: impl Fn(&Block) -> String) -> String {
    blocks.iter().map(column).collect::<Vec<_>>().join(", ")
}

/// Fields for a new block from the text after its range.
fn block_fields(tail: &str) -> Fields {
    match tail.trim().split_once('=') {
        Some((_, after)) => parse_equals_tail(after.trim()),
        None => parse_directive_tail(tail.trim()),
    }
}

/// Appends "(lunch)" to the first block's task unless already present.
fn annotate_lunch(blocks: &mut [Block]) {
    let Some(task) = blocks.first_mut().and_then(|b| b.fields.task.as_mut()) else {
        return;
    };
    if !task.to_lowercase().contains("(lunch)") {
        *task = clean_text(&format!("{task} (lunch)"));
    }
}

/// Length of the glue between two chained ranges: spaces, `,`, `;`, `&`, `and`.
fn chain_gap(tail: &str) -> usize {
    let glue = |c: char| c.is_whitespace() || matches!(c, ',' | ';' | '&');
    let rest = tail.trim_start_matches(glue);
    let rest = match rest.get(..4) {
        Some(word) if word.eq_ignore_ascii_case("and ") => rest[4..].trim_start_matches(glue),
        _ => rest,
    };
    tail.len() - rest.len()
}

/// Time ranges opening `segment`, each paired with its directive text.
///
/// Ranges separated only by glue (`10-14, 16-18`) are split into separate
/// blocks; the earlier ones get no directive text. Empty when the segment
/// holds no range.
fn split_chained_ranges(
    segment: &str,
    today: NaiveDate,
    bare: BareRanges,
) -> Vec<(TimeSpan, &str)> {
    let mut ranges = Vec::new();
    let mut rest = segment;
    let mut bare = bare;
    while let Some(found) = find_range(rest, today, bare) {
        let tail = &rest[found.end..];
        let next = &tail[chain_gap(tail)..];
        bare = BareRanges::Leading;
        match find_range(next, today, bare) {
            Some(following) if following.start == 0 => {
                ranges.push((found.span, ""));
                rest = next;
            }
            _ => {
                ranges.push((found.span, tail));
                break;
            }
        }
    }
    ranges
}
