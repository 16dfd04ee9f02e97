//! Field extraction from the directive text of a segment.
//!
//! Directives attribute fields to a block: `at` introduces a location,
//! `for`/`with` a client, and free text supplies the task. Precedence is
//! fixed: location first, then client (`for` before `with`), then the task
//! from the first source that yields text:
//!
//! | order | task source                                     |
//! |-------|-------------------------------------------------|
//! | 1     | text after `for/with CLIENT,`                   |
//! | 2     | text after the comma of an `at` capture         |
//! | 3     | residual text (equals form) or the lead-in text |

use regex::Regex;

use crate::block::Fields;
use crate::patterns::{
    CLIENT_FOR, CLIENT_KEYWORD, CLIENT_WITH, DAY, DAY_ABBREVIATIONS, DAY_NAMES,
    DIRECTIVE_KEYWORD, DIRECTIVE_PHRASES, LEADING_COMPACT_RANGE, LOCATION_AT, TASK_AFTER_CLIENT,
};
use crate::text::clean_text;

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}

/// Canonical lower-case name of the first weekday mentioned in `line`.
pub fn derive_day(line: &str) -> Option<&'static str> {
    let token = DAY.find(line)?.as_str().to_lowercase();
    DAY_NAMES
        .iter()
        .find(|name| **name == token)
        .copied()
        .or_else(|| {
            DAY_ABBREVIATIONS
                .iter()
                .find(|(abbr, _)| *abbr == token)
                .map(|(_, name)| *name)
        })
}

/// Cleaned first capture group of `pattern` in `text`, if non-empty.
pub fn first_match(text: &str, pattern: &Regex) -> Option<String> {
    let caps = pattern.captures(text)?;
    non_empty(clean_text(caps.get(1)?.as_str()))
}

/// Splits an `at ...` capture into `(location, trailing task)`.
///
/// The location ends before any `for`/`with`; a comma inside what remains
/// separates the location from a trailing task.
pub fn split_location_and_task(chunk: &str) -> (String, String) {
    let cleaned = clean_text(chunk);
    let part = CLIENT_KEYWORD
        .find(&cleaned)
        .map_or(cleaned.as_str(), |m| &cleaned[..m.start()])
        .trim();
    match part.split_once(',') {
        Some((location, rest)) => (clean_text(location), clean_text(rest)),
        None => (clean_text(part), String::new()),
    }
}

/// Removes `at`/`for`/`with` phrases and returns the cleaned residual text.
pub fn strip_directives(text: &str) -> String {
    let residual = DIRECTIVE_PHRASES
        .iter()
        .fold(text.to_string(), |acc, re| re.replace_all(&acc, "").into_owned());
    clean_text(residual.trim_matches([' ', ',', '-', ';']))
}

/// Text after a `for/with CLIENT,` phrase.
pub fn task_after_client(text: &str) -> Option<String> {
    first_match(text, &TASK_AFTER_CLIENT)
}

/// Location and trailing task from the first `at` capture.
fn location_directive(text: &str) -> (Option<String>, Option<String>) {
    first_match(text, &LOCATION_AT).map_or((None, None), |chunk| {
        let (location, trailing) = split_location_and_task(&chunk);
        (non_empty(location), non_empty(trailing))
    })
}

fn client_directive(text: &str) -> Option<String> {
    first_match(text, &CLIENT_FOR).or_else(|| first_match(text, &CLIENT_WITH))
}

/// Parses the text after `=` in a time-range segment.
pub fn parse_equals_tail(after_equals: &str) -> Fields {
    let (location, trailing) = location_directive(after_equals);
    let client = client_directive(after_equals);
    let task = task_after_client(after_equals)
        .or(trailing)
        .or_else(|| non_empty(strip_directives(after_equals)));
    Fields {
        location,
        client,
        task,
    }
}

/// Parses the directive text following a time range (no `=` form).
pub fn parse_directive_tail(tail: &str) -> Fields {
    let (location, trailing) = location_directive(tail);
    let client = client_directive(tail);
    let task = task_after_client(tail)
        .or(trailing)
        .or_else(|| lead_in_task(tail));
    Fields {
        location,
        client,
        task,
    }
}

/// Free text before the first directive keyword, minus leftover range digits.
fn lead_in_task(tail: &str) -> Option<String> {
    let lead = DIRECTIVE_KEYWORD
        .find(tail)
        .map_or(tail, |m| &tail[..m.start()]);
    let lead = clean_text(lead.trim_matches(['-', ':', ' ', ',']));
    non_empty(LEADING_COMPACT_RANGE.replace(&lead, "").trim().to_string())
}

/// Parses a segment without a time range; the result only fills gaps.
pub fn parse_modifier(segment: &str) -> Fields {
    let (location, trailing) = location_directive(segment);
    Fields {
        location,
        client: client_directive(segment),
        task: trailing.or_else(|| task_after_client(segment)),
    }
}
