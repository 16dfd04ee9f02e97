//! Text normalization and display casing.

use crate::block::SENTINEL;
use crate::patterns::{ACRONYM_SHAPE, HORIZONTAL_SPACE, TITLE_MINOR_WORDS};

/// Maps en and em dashes to `-`, trims, and collapses runs of spaces and tabs.
pub fn clean_text(s: &str) -> String {
    let dashed = s.replace(['\u{2013}', '\u{2014}'], "-");
    HORIZONTAL_SPACE.replace_all(dashed.trim(), " ").into_owned()
}

/// Heuristic for acronyms, initialisms and model numbers (`PM`, `U.S.`, `B737`).
pub fn is_acronym(token: &str) -> bool {
    let letters: String = token
        .chars()
        .filter(|c| !matches!(c, '.' | '-' | '/' | '&'))
        .collect();
    if letters.chars().count() >= 2 && is_upper(&letters) {
        return true;
    }
    ACRONYM_SHAPE.is_match(token)
}

/// At least one cased character, and no lower-case ones.
fn is_upper(s: &str) -> bool {
    s.chars().any(char::is_uppercase) && !s.chars().any(char::is_lowercase)
}

/// Splits text into alternating word and whitespace runs, keeping both.
fn split_keep_whitespace(text: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut in_space = None;
    for (idx, ch) in text.char_indices() {
        let space = ch.is_whitespace();
        if in_space.is_some_and(|prev| prev != space) {
            pieces.push(&text[start..idx]);
            start = idx;
        }
        in_space = Some(space);
    }
    if start < text.len() {
        pieces.push(&text[start..]);
    }
    pieces
}

fn is_space_run(piece: &str) -> bool {
    piece.chars().all(char::is_whitespace)
}

/// Drops one leading quote/bracket and one trailing quote/bracket.
fn strip_wrapping(raw: &str) -> &str {
    let inner = raw
        .strip_prefix(['"', '\'', '(', '['])
        .unwrap_or(raw);
    inner.strip_suffix(['"', '\'', ')', ']']).unwrap_or(inner)
}

fn capitalize(lower: &str) -> String {
    let mut chars = lower.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Title-cases text, keeping acronyms and lower-casing minor words.
///
/// `,` and `/` delimit independently formatted segments; the first word of
/// each segment is always capitalized. The sentinel passes through.
pub fn title_case(text: &str) -> String {
    if text.is_empty() || text == SENTINEL {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut segment_start = 0;
    for (idx, ch) in text.char_indices() {
        if matches!(ch, ',' | '/') {
            out.push_str(&title_segment(&text[segment_start..idx]));
            out.push(ch);
            segment_start = idx + ch.len_utf8();
        }
    }
    out.push_str(&title_segment(&text[segment_start..]));
    out
}

fn title_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    let mut first = true;
    for piece in split_keep_whitespace(segment) {
        if is_space_run(piece) {
            out.push_str(piece);
        } else {
            out.push_str(&title_word(piece, first));
            first = false;
        }
    }
    out
}

fn title_word(raw: &str, first: bool) -> String {
    let base = strip_wrapping(raw);
    if base.is_empty() || is_acronym(base) {
        return raw.to_string();
    }
    // Lone capitals after the first word are designators: "Warehouse A".
    if !first && base.chars().count() == 1 && is_upper(base) {
        return raw.to_string();
    }
    let lower = base.to_lowercase();
    let fixed = if !first && TITLE_MINOR_WORDS.contains(&lower.as_str()) {
        lower
    } else {
        capitalize(&lower)
    };
    raw.replacen(base, &fixed, 1)
}

/// Sentence-cases each `;`-separated clause, keeping acronyms.
///
/// Clauses are trimmed, empty ones dropped, and the rest joined with `"; "`.
pub fn sentence_case(text: &str) -> String {
    if text.is_empty() || text == SENTINEL {
        return text.to_string();
    }
    text.split(';')
        .map(str::trim)
        .filter(|clause| !clause.is_empty())
        .map(sentence_clause)
        .collect::<Vec<_>>()
        .join("; ")
}

fn sentence_clause(clause: &str) -> String {
    if is_acronym(clause) {
        return clause.to_string();
    }
    let mut out = String::with_capacity(clause.len());
    let mut capitalized = false;
    for piece in split_keep_whitespace(clause) {
        if is_space_run(piece) || is_acronym(piece) {
            out.push_str(piece);
        } else if capitalized {
            out.push_str(&piece.to_lowercase());
        } else {
            out.push_str(&capitalize_first_alpha(piece));
            capitalized = true;
        }
    }
    out
}

fn capitalize_first_alpha(word: &str) -> String {
    let Some((idx, ch)) = word.char_indices().find(|(_, c)| c.is_alphabetic()) else {
        return word.to_string();
    };
    let rest = &word[idx + ch.len_utf8()..];
    let mut out = String::with_capacity(word.len());
    out.push_str(&word[..idx]);
    out.extend(ch.to_uppercase());
    out.push_str(&rest.to_lowercase());
    out
}
