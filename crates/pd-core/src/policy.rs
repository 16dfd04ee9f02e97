//! Business rules applied to each parsed line.
//!
//! - Lunch: whether to deduct a fixed break and whether to annotate the task.
//! - Covering blocks: drop an umbrella block whose sub-blocks are also listed.
//! - Aggregation: stable hour summation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::block::Block;
use crate::patterns::{LUNCH_EXPLICIT, LUNCH_NEGATIVE, LUNCH_POSITIVE};
use crate::timeparse::round2;

/// Invalid policy values.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PolicyError {
    /// Lunch deduction must be a finite, non-negative number of hours.
    #[error("lunch deduction must be a non-negative number of hours, got {0}")]
    InvalidLunchDeduction(f64),

    /// Covering tolerance cannot be negative.
    #[error("cover tolerance must be non-negative, got {0} seconds")]
    NegativeTolerance(i64),

    /// Unrecognized task casing name.
    #[error("unknown task case: {0} (expected \"title\" or \"sentence\")")]
    UnknownTaskCase(String),
}

/// How task descriptions are cased for display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskCase {
    #[default]
    Title,
    Sentence,
}

impl TaskCase {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Sentence => "sentence",
        }
    }
}

impl fmt::Display for TaskCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TaskCase {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "title" => Ok(Self::Title),
            "sentence" => Ok(Self::Sentence),
            _ => Err(PolicyError::UnknownTaskCase(s.to_string())),
        }
    }
}

/// Policy parameters, fixed for a parse run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Policy {
    /// Hours subtracted when lunch applies. Default: 0.5.
    pub lunch_deduction_hours: f64,

    /// Append "(lunch)" to the first task when a positive cue is found.
    /// Default: true.
    pub annotate_on_positive: bool,

    /// Subtract lunch when the line carries no lunch cue at all.
    /// Default: true.
    pub subtract_lunch_by_default: bool,

    /// Slack allowed between an umbrella block and its sub-blocks.
    /// Default: 60 seconds.
    pub cover_tolerance_seconds: i64,

    /// Display casing for tasks. Default: title.
    pub task_case: TaskCase,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            lunch_deduction_hours: 0.5,
            annotate_on_positive: true,
            subtract_lunch_by_default: true,
            cover_tolerance_seconds: 60,
            task_case: TaskCase::Title,
        }
    }
}

/// Outcome of lunch cue detection for one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LunchDecision {
    pub subtract: bool,
    pub annotate: bool,
}

impl Policy {
    pub fn validate(&self) -> Result<(), PolicyError> {
        if !self.lunch_deduction_hours.is_finite() || self.lunch_deduction_hours < 0.0 {
            return Err(PolicyError::InvalidLunchDeduction(
                self.lunch_deduction_hours,
            ));
        }
        if self.cover_tolerance_seconds < 0 {
            return Err(PolicyError::NegativeTolerance(self.cover_tolerance_seconds));
        }
        Ok(())
    }

    /// Decides lunch handling from the cues in a line's segments.
    ///
    /// Priority: an explicit `lunch: yes/no` wins, then negative cues, then
    /// positive cues, then the configured default (never annotated).
    pub fn decide_lunch<S: AsRef<str>>(&self, segments: &[S]) -> LunchDecision {
        let joined = segments
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(" | ");

        let positive = LunchDecision {
            subtract: true,
            annotate: self.annotate_on_positive,
        };
        let none = LunchDecision {
            subtract: false,
            annotate: false,
        };

        if let Some(caps) = LUNCH_EXPLICIT.captures(&joined) {
            return match caps[1].to_ascii_lowercase().as_str() {
                "yes" | "y" => positive,
                _ => none,
            };
        }
        if LUNCH_NEGATIVE.is_match(&joined) {
            return none;
        }
        if LUNCH_POSITIVE.is_match(&joined) {
            return positive;
        }
        LunchDecision {
            subtract: self.subtract_lunch_by_default,
            annotate: false,
        }
    }

    /// Deducts lunch from a line total, floored at zero.
    pub fn apply_lunch(&self, total_hours: f64) -> f64 {
        round2((total_hours - self.lunch_deduction_hours).max(0.0))
    }

    /// Drops an umbrella block whose span is covered by the other blocks.
    ///
    /// The umbrella must start at the earliest start and end at the latest
    /// end, and at least two other blocks must add up to its duration within
    /// the tolerance. The first qualifying candidate is dropped; the remaining
    /// blocks keep their order.
    pub fn drop_covering_block(&self, blocks: Vec<Block>) -> Vec<Block> {
        // An umbrella needs at least two other blocks.
        if blocks.len() < 3 {
            return blocks;
        }
        let (Some(min_start), Some(max_end)) = (
            blocks.iter().map(|b| b.span.start).min(),
            blocks.iter().map(|b| b.span.end).max(),
        ) else {
            return blocks;
        };
        let full_seconds = (max_end - min_start).num_seconds();
        let tolerance = self.cover_tolerance_seconds.abs();

        let candidate = blocks
            .iter()
            .enumerate()
            .filter(|(_, b)| b.span.start == min_start && b.span.end == max_end)
            .map(|(idx, _)| idx)
            .find(|&idx| {
                let others: i64 = blocks
                    .iter()
                    .enumerate()
                    .filter(|(j, _)| *j != idx)
                    .map(|(_, b)| b.span.seconds())
                    .sum();
                (others - full_seconds).abs() <= tolerance
            });

        match candidate {
            Some(idx) => {
                tracing::debug!(umbrella = %blocks[idx].span.label(), "dropping covering block");
                blocks
                    .into_iter()
                    .enumerate()
                    .filter(|(j, _)| *j != idx)
                    .map(|(_, b)| b)
                    .collect()
            }
            None => blocks,
        }
    }
}

/// Sum of block durations, rounded to two decimals.
pub fn sum_hours(blocks: &[Block]) -> f64 {
    round2(blocks.iter().map(|b| b.hours).sum())
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};

    use super::*;
    use crate::block::Fields;
    use crate::timeparse::TimeSpan;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 10)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn block(start: (u32, u32), end: (u32, u32)) -> Block {
        Block::new(
            TimeSpan {
                start: at(start.0, start.1),
                end: at(end.0, end.1),
            },
            Fields::default(),
        )
    }

    fn decide(segments: &[&str]) -> LunchDecision {
        Policy::default().decide_lunch(segments)
    }

    #[test]
    fn explicit_lunch_wins() {
        let d = decide(&["0900-1700 lunch: no", "took a break"]);
        assert!(!d.subtract && !d.annotate);
        let d = decide(&["0900-1700", "lunch=Y", "no lunch"]);
        assert!(d.subtract && d.annotate);
    }

    #[test]
    fn negative_beats_positive() {
        let d = decide(&["0900-1700 skipped lunch", "break"]);
        assert!(!d.subtract && !d.annotate);
    }

    #[test]
    fn positive_cue_annotates_when_enabled() {
        let d = decide(&["8am-4pm", "break"]);
        assert!(d.subtract && d.annotate);

        let quiet = Policy {
            annotate_on_positive: false,
            ..Policy::default()
        };
        let d = quiet.decide_lunch(&["8am-4pm", "30 min"]);
        assert!(d.subtract && !d.annotate);
    }

    #[test]
    fn no_cue_falls_back_to_default() {
        let d = decide(&["0900-1700 at HQ"]);
        assert!(d.subtract && !d.annotate);

        let off = Policy {
            subtract_lunch_by_default: false,
            ..Policy::default()
        };
        assert!(!off.decide_lunch(&["0900-1700"]).subtract);
    }

    #[test]
    fn apply_lunch_floors_at_zero() {
        let policy = Policy::default();
        assert!((policy.apply_lunch(8.0) - 7.5).abs() < 1e-9);
        assert!(policy.apply_lunch(0.25).abs() < 1e-9);
    }

    #[test]
    fn sum_hours_is_order_independent() {
        let a = block((9, 0), (12, 20));
        let b = block((13, 0), (17, 10));
        let c = block((18, 0), (18, 45));
        let forward = sum_hours(&[a.clone(), b.clone(), c.clone()]);
        let backward = sum_hours(&[c, b, a]);
        assert!((forward - backward).abs() < 1e-9);
        assert!((forward - 8.25).abs() < 1e-9);
        assert!(sum_hours(&[]).abs() < f64::EPSILON);
    }

    #[test]
    fn drops_umbrella_block() {
        let blocks = vec![
            block((9, 0), (17, 0)),
            block((9, 0), (12, 0)),
            block((12, 0), (17, 0)),
        ];
        let kept = Policy::default().drop_covering_block(blocks);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].span.label(), "0900-1200");
        assert_eq!(kept[1].span.label(), "1200-1700");
        assert!((sum_hours(&kept) - 8.0).abs() < 1e-9);
    }

    #[test]
    fn umbrella_within_tolerance() {
        let blocks = vec![
            block((9, 0), (12, 0)),
            block((12, 1), (17, 0)),
            block((9, 0), (17, 0)),
        ];
        let kept = Policy::default().drop_covering_block(blocks.clone());
        assert_eq!(kept.len(), 2);

        let strict = Policy {
            cover_tolerance_seconds: 0,
            ..Policy::default()
        };
        assert_eq!(strict.drop_covering_block(blocks).len(), 3);
    }

    #[test]
    fn keeps_blocks_with_gaps() {
        let blocks = vec![
            block((9, 0), (17, 0)),
            block((9, 0), (11, 0)),
            block((15, 0), (17, 0)),
        ];
        assert_eq!(Policy::default().drop_covering_block(blocks).len(), 3);
    }

    #[test]
    fn identical_pair_is_kept() {
        let blocks = vec![block((9, 0), (17, 0)), block((9, 0), (17, 0))];
        assert_eq!(Policy::default().drop_covering_block(blocks).len(), 2);
        let pair = vec![block((9, 0), (12, 0)), block((12, 0), (17, 0))];
        assert_eq!(Policy::default().drop_covering_block(pair).len(), 2);
        let single = vec![block((9, 0), (17, 0))];
        assert_eq!(Policy::default().drop_covering_block(single).len(), 1);
    }

    #[test]
    fn duplicate_umbrellas_are_kept() {
        let mut first = block((9, 0), (17, 0));
        first.fields.task = Some("first".to_string());
        let mut second = block((9, 0), (17, 0));
        second.fields.task = Some("second".to_string());
        let blocks = vec![
            first,
            second,
            block((9, 0), (12, 0)),
            block((12, 0), (17, 0)),
        ];
        // Dropping either umbrella leaves 16h of others against an 8h span,
        // so neither qualifies.
        assert_eq!(Policy::default().drop_covering_block(blocks).len(), 4);
    }

    #[test]
    fn validate_rejects_bad_values() {
        assert!(Policy::default().validate().is_ok());
        let negative = Policy {
            lunch_deduction_hours: -1.0,
            ..Policy::default()
        };
        assert_eq!(
            negative.validate(),
            Err(PolicyError::InvalidLunchDeduction(-1.0))
        );
        let tolerance = Policy {
            cover_tolerance_seconds: -5,
            ..Policy::default()
        };
        assert_eq!(tolerance.validate(), Err(PolicyError::NegativeTolerance(-5)));
    }

    #[test]
    fn task_case_parses() {
        assert_eq!("Sentence".parse::<TaskCase>().unwrap(), TaskCase::Sentence);
        assert_eq!("title".parse::<TaskCase>().unwrap(), TaskCase::Title);
        assert!("upper".parse::<TaskCase>().is_err());
        assert_eq!(TaskCase::Sentence.to_string(), "sentence");
    }
}
