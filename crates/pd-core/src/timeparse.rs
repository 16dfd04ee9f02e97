//! Time token resolution and range extraction.
//!
//! A token such as `0930`, `9am` or `17:45` resolves to an instant on a
//! reference date. A range resolves both tokens on the same date; when the
//! end is not after the start the shift ran overnight and the end moves to
//! the next day.

use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};
use regex::Captures;

use crate::patterns::{
    BARE_HOUR_RANGE, COLON_TOKEN, COMPACT_TOKEN, DAY, HOUR_TOKEN, LOOSE_TOKEN, TIME_RANGE,
};

/// A resolved work interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeSpan {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeSpan {
    /// Normalized `HHMM-HHMM` label.
    pub fn label(&self) -> String {
        format!("{}-{}", self.start.format("%H%M"), self.end.format("%H%M"))
    }

    pub fn seconds(&self) -> i64 {
        (self.end - self.start).num_seconds()
    }

    /// Duration in hours, rounded to two decimals.
    #[expect(
        clippy::cast_precision_loss,
        reason = "shift lengths are far below 2^52 seconds"
    )]
    pub fn hours(&self) -> f64 {
        round2(self.seconds() as f64 / 3600.0)
    }
}

/// A time range located inside a piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeMatch {
    pub span: TimeSpan,
    /// Byte offset where the range text starts.
    pub start: usize,
    /// Byte offset immediately after the range text.
    pub end: usize,
}

/// Rounds to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Applies the 12-hour clock adjustment for an am/pm suffix.
fn meridiem_hour(hour: u32, suffix: Option<&str>) -> u32 {
    match suffix {
        Some("pm") if hour < 12 => hour + 12,
        Some("am") if hour == 12 => 0,
        _ => hour,
    }
}

fn suffix_of(token: &str) -> Option<&str> {
    if token.ends_with("pm") {
        Some("pm")
    } else if token.ends_with("am") {
        Some("am")
    } else {
        None
    }
}

fn capture_u32(caps: &Captures<'_>, group: usize) -> Option<u32> {
    caps.get(group).and_then(|m| m.as_str().parse().ok())
}

/// Resolves a single time token against `date`.
///
/// Tries, in order: compact `HHMM` (am/pm optional), hour with mandatory
/// am/pm, `H:MM` (am/pm optional), then loose phrases (`noon`, `midnight`,
/// bare 24-hour `H`, `9h30`, `9.30`). Returns `None` if nothing fits.
pub fn resolve(token: &str, date: NaiveDate) -> Option<NaiveDateTime> {
    let tok = token
        .trim()
        .to_lowercase()
        .replace("a.m.", "am")
        .replace("p.m.", "pm");

    if COMPACT_TOKEN.is_match(&tok) {
        let hour: u32 = tok.get(..2)?.parse().ok()?;
        let minute: u32 = tok.get(2..4)?.parse().ok()?;
        return date.and_hms_opt(meridiem_hour(hour, suffix_of(&tok)), minute, 0);
    }

    if let Some(caps) = HOUR_TOKEN.captures(&tok) {
        let hour = capture_u32(&caps, 1)?;
        let suffix = caps.get(2).map(|m| m.as_str());
        return date.and_hms_opt(meridiem_hour(hour, suffix), 0, 0);
    }

    if let Some(caps) = COLON_TOKEN.captures(&tok) {
        let hour = capture_u32(&caps, 1)?;
        let minute = capture_u32(&caps, 2)?;
        let suffix = caps.get(3).map(|m| m.as_str());
        return date.and_hms_opt(meridiem_hour(hour, suffix), minute, 0);
    }

    resolve_loose(&tok, date)
}

fn resolve_loose(tok: &str, date: NaiveDate) -> Option<NaiveDateTime> {
    match tok {
        "noon" | "midday" => return date.and_hms_opt(12, 0, 0),
        "midnight" => return date.and_hms_opt(0, 0, 0),
        _ => {}
    }
    let caps = LOOSE_TOKEN.captures(tok)?;
    let hour = capture_u32(&caps, 1)?;
    let minute = capture_u32(&caps, 2).unwrap_or(0);
    date.and_hms_opt(hour, minute, 0)
}

/// Where a bare-hour range (`9-12`) may appear to be recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BareRanges {
    /// Anywhere in the text.
    Anywhere,
    /// Only at the start, after an optional day name.
    Leading,
}

/// Finds the first time range in `text` and resolves it on `date`.
///
/// Bare-hour ranges are accepted anywhere; see [`find_range`].
pub fn extract_range(text: &str, date: NaiveDate) -> Option<RangeMatch> {
    find_range(text, date, BareRanges::Anywhere)
}

/// Finds the earliest time range in `text`, limiting where bare-hour ranges
/// may appear. Ranges in the regular token grammar are accepted anywhere.
pub fn find_range(text: &str, date: NaiveDate, bare: BareRanges) -> Option<RangeMatch> {
    let regular = extract_regular_range(text, date);
    let bare = extract_bare_range(text, date)
        .filter(|m| bare == BareRanges::Anywhere || leads(text, m.start));
    match (regular, bare) {
        (Some(regular), Some(bare)) if bare.start < regular.start => Some(bare),
        (regular, bare) => regular.or(bare),
    }
}

fn extract_regular_range(text: &str, date: NaiveDate) -> Option<RangeMatch> {
    let caps = TIME_RANGE.captures(text)?;
    let whole = caps.get(0)?;
    let start = resolve(&caps[1], date)?;
    let end = resolve(&caps[2], date)?;
    Some(RangeMatch {
        span: close_overnight(start, end),
        start: whole.start(),
        end: whole.end(),
    })
}

/// Nothing but whitespace and an optional day name precedes `start`.
fn leads(text: &str, start: usize) -> bool {
    let prefix = text[..start].trim_start();
    let prefix = DAY
        .find(prefix)
        .filter(|m| m.start() == 0)
        .map_or(prefix, |m| &prefix[m.end()..]);
    prefix
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, ',' | ':'))
        .is_empty()
}

fn extract_bare_range(text: &str, date: NaiveDate) -> Option<RangeMatch> {
    for caps in BARE_HOUR_RANGE.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        if !standalone(text, whole.start(), whole.end()) {
            continue;
        }
        let (Some(start), Some(mut end)) = (resolve(&caps[1], date), resolve(&caps[2], date))
        else {
            continue;
        };
        if caps[2].bytes().all(|b| b.is_ascii_digit()) {
            end = infer_afternoon(start, end);
        }
        return Some(RangeMatch {
            span: close_overnight(start, end),
            start: whole.start(),
            end: whole.end(),
        });
    }
    None
}

/// A bare range glued to `-`, `/` or `:` is part of a date or ratio.
fn standalone(text: &str, start: usize, end: usize) -> bool {
    let glue = |c: char| matches!(c, '-' | '/' | ':');
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(|c| glue(c) || c == '.') && !after.is_some_and(glue)
}

/// Reads a small end hour as afternoon when that makes the range forward (`9-5`).
fn infer_afternoon(start: NaiveDateTime, end: NaiveDateTime) -> NaiveDateTime {
    let shifted = end + Duration::hours(12);
    if end <= start && end.hour() < 12 && shifted > start {
        shifted
    } else {
        end
    }
}

fn close_overnight(start: NaiveDateTime, end: NaiveDateTime) -> TimeSpan {
    let end = if end <= start {
        end + Duration::days(1)
    } else {
        end
    };
    TimeSpan { start, end }
}
