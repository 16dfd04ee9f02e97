//! Recognized textual patterns: day names, time tokens, range separators,
//! directive keywords and lunch cues.
//!
//! All patterns are case-insensitive and compiled once on first use.

use std::sync::LazyLock;

use regex::Regex;

/// Canonical weekday names, Monday first.
pub const DAY_NAMES: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// Accepted abbreviations and the full name each one stands for.
pub const DAY_ABBREVIATIONS: [(&str, &str); 10] = [
    ("mon", "monday"),
    ("tue", "tuesday"),
    ("tues", "tuesday"),
    ("wed", "wednesday"),
    ("thu", "thursday"),
    ("thur", "thursday"),
    ("thurs", "thursday"),
    ("fri", "friday"),
    ("sat", "saturday"),
    ("sun", "sunday"),
];

/// Words kept lower-case by title casing unless they open a segment.
pub const TITLE_MINOR_WORDS: [&str; 16] = [
    "and", "or", "of", "the", "a", "an", "at", "by", "for", "from", "in", "on", "to", "with", "vs",
    "via",
];

const MERIDIEM: &str = r"(?:am|pm|a\.m\.|p\.m\.)";
const SEPARATOR: &str = r"(?:-|\x{2013}|\x{2014}|to)";

/// Builds the alternation of the three time-token shapes: `H:MM`, `HHMM`, `H am`.
fn time_token() -> String {
    let colon = format!(r"(?:[01]?[0-9]|2[0-3]):[0-5][0-9](?:\s*{MERIDIEM})?");
    let compact = format!(r"(?:[01][0-9]|2[0-3])[0-5][0-9](?:\s*{MERIDIEM})?");
    let hour = format!(r"(?:[01]?[0-9]|2[0-3])\s*{MERIDIEM}");
    format!("(?:{colon}|{compact}|{hour})")
}

fn day_alternation() -> String {
    DAY_NAMES
        .iter()
        .copied()
        .chain(DAY_ABBREVIATIONS.iter().map(|(abbr, _)| *abbr))
        .collect::<Vec<_>>()
        .join("|")
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid built-in pattern {pattern}: {e}"))
}

/// First day name or abbreviation in a line.
pub static DAY: LazyLock<Regex> =
    LazyLock::new(|| compile(&format!(r"(?i)\b(?:{})\b", day_alternation())));

/// Two time tokens joined by a separator, with optional `from` and `to`.
pub static TIME_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    let token = time_token();
    compile(&format!(
        r"(?i)\b(?:from\s+)?({token})\s*{SEPARATOR}\s*(?:to\s+)?({token})"
    ))
});

/// Fallback range of two bare hours (`9-12`, `noon to 5`).
pub static BARE_HOUR_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    let hour = r"(?:noon|midnight|[01]?[0-9]|2[0-3])";
    compile(&format!(
        r"(?i)\b(?:from\s+)?({hour})\s*{SEPARATOR}\s*(?:to\s+)?({hour})\b"
    ))
});

/// Compact `HHMM` token, optionally suffixed with am/pm (already normalized).
pub static COMPACT_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^(?:[01][0-9]|2[0-3])[0-5][0-9](?:\s*(?:am|pm))?$"));

/// Hour-only token with a mandatory am/pm suffix.
pub static HOUR_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^([01]?[0-9]|2[0-3])\s*(am|pm)$"));

/// `H:MM` token with an optional am/pm suffix.
pub static COLON_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^([01]?[0-9]|2[0-3]):([0-5][0-9])\s*(am|pm)?$"));

/// Loose 24-hour phrases: `9`, `17h`, `9h30`, `9.30`, `9 o'clock`.
pub static LOOSE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"^([01]?[0-9]|2[0-3])(?:[h.]([0-5][0-9]))?\s*(?:h|o'?\s*clock)?$")
});

/// Leftover compact range at the start of free text (`0900-1200 ...`).
pub static LEADING_COMPACT_RANGE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^[0-9]{3,4}\s*-\s*[0-9]{3,4}\s*"));

/// `at LOCATION`; greedy over words, spaces and `- & . , ' # /`.
pub static LOCATION_AT: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)\bat\s+([A-Za-z0-9][\w\-\s&.,'#/]+)"));

/// `with CLIENT`; greedy over words, spaces, `&` and `-`.
pub static CLIENT_WITH: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)\bwith\s+([A-Za-z0-9][\w&\-\s]+)\b"));

/// `for CLIENT`; same shape as [`CLIENT_WITH`].
pub static CLIENT_FOR: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)\bfor\s+([A-Za-z0-9][\w&\-\s]+)\b"));

/// `with|for CLIENT, TAIL`; captures the tail as a task.
pub static TASK_AFTER_CLIENT: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)\b(?:with|for)\b\s+[A-Za-z0-9][\w&\-\s]+,\s*(.+)$"));

/// Client keywords that end a location capture.
pub static CLIENT_KEYWORD: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)\b(?:for|with)\b"));

/// Any directive keyword; text before it is a candidate task.
pub static DIRECTIVE_KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)\b(?:at|with|for)\b"));

/// Whole directive phrases, removed when computing residual text.
pub static DIRECTIVE_PHRASES: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        compile(r"(?i)\bat\s+[A-Za-z0-9][\w\-\s&.,'#/]+"),
        compile(r"(?i)\bfor\s+[A-Za-z0-9][\w&\-\s]+"),
        compile(r"(?i)\bwith\s+[A-Za-z0-9][\w&\-\s]+"),
    ]
});

/// `lunch: yes|no|y|n` (colon or equals).
pub static LUNCH_EXPLICIT: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)\blunch\s*[:=]\s*(yes|no|y|n)\b"));

/// `no lunch`, `skip(ped) lunch`, `without lunch`.
pub static LUNCH_NEGATIVE: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?i)\b(?:no\s*lunch|skip(?:ped)?\s*lunch|without\s+lunch)\b")
});

/// `lunch`, `break`, `30 min(s)`, `30 minutes`.
pub static LUNCH_POSITIVE: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?i)\b(?:lunch|break|30\s*minutes|30\s*mins|30\s*min)\b")
});

/// Runs of spaces and tabs.
pub static HORIZONTAL_SPACE: LazyLock<Regex> = LazyLock::new(|| compile(r"[ \t]+"));

/// Acronym-like shapes: `A1`, `X.Y.`, `B737`.
pub static ACRONYM_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"^(?:[A-Z][0-9]+|[A-Z]\.[A-Z]\.?|[A-Z]\w*[0-9]+)$"));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_matches_names_and_abbreviations() {
        assert!(DAY.is_match("Monday 9-5"));
        assert!(DAY.is_match("tues 0900-1700"));
        assert!(DAY.is_match("THURS: shift"));
        assert!(!DAY.is_match("Sundays are off"));
        assert!(!DAY.is_match("mondays"));
    }

    #[test]
    fn time_range_accepts_each_token_shape() {
        for text in [
            "9:00-17:30",
            "0900-1700",
            "8am-4pm",
            "8 a.m. to 4 p.m.",
            "from 9:15am to 5pm",
            "22:00\u{2013}02:00",
            "0800\u{2014}1200",
        ] {
            assert!(TIME_RANGE.is_match(text), "should match {text}");
        }
    }

    #[test]
    fn time_range_rejects_bare_hours() {
        assert!(!TIME_RANGE.is_match("9-12"));
        assert!(BARE_HOUR_RANGE.is_match("9-12"));
        assert!(BARE_HOUR_RANGE.is_match("noon to 5"));
    }

    #[test]
    fn time_range_captures_tokens() {
        let caps = TIME_RANGE.captures("Tue from 9:30 am to 5pm at HQ").unwrap();
        assert_eq!(&caps[1], "9:30 am");
        assert_eq!(&caps[2], "5pm");
    }

    #[test]
    fn client_capture_stops_at_punctuation() {
        let caps = CLIENT_FOR.captures("for Acme, loading").unwrap();
        assert_eq!(&caps[1], "Acme");
        let caps = CLIENT_WITH.captures("with Jane Doe, consulting").unwrap();
        assert_eq!(&caps[1], "Jane Doe");
    }

    #[test]
    fn location_capture_is_greedy() {
        let caps = LOCATION_AT.captures("at Warehouse A for Acme, loading").unwrap();
        assert_eq!(&caps[1], "Warehouse A for Acme, loading");
    }

    #[test]
    fn lunch_cues() {
        assert_eq!(&LUNCH_EXPLICIT.captures("Lunch = Y").unwrap()[1], "Y");
        assert!(LUNCH_NEGATIVE.is_match("skipped lunch today"));
        assert!(LUNCH_NEGATIVE.is_match("worked without lunch"));
        assert!(LUNCH_POSITIVE.is_match("took a 30 min break"));
        assert!(LUNCH_POSITIVE.is_match("30mins"));
        assert!(!LUNCH_POSITIVE.is_match("breakfast meeting"));
    }
}
