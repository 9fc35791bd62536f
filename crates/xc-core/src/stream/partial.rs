//! Best-effort field extraction from a partially-received JSON object
//!
//! The accumulated text is a prefix of one JSON object and only parses once
//! the stream ends, so field values are recovered by pattern scanning in the
//! meantime. This is a preview mechanism: the decoder replaces it with a real
//! JSON parse of the complete text at stream end.

use once_cell::sync::Lazy;
use regex::Regex;

// A closed string value: non-quote/non-backslash runs or backslash-escaped
// pairs, terminated by an unescaped quote.
static TITLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""title"\s*:\s*"((?:[^"\\]|\\.)*)""#).expect("regex compiles"));
static LANGUAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""language"\s*:\s*"((?:[^"\\]|\\.)*)""#).expect("regex compiles"));
// The explanation is written last and is usually still open; only its start
// marker is matched, the remainder is treated as a partial string.
static EXPLANATION_START_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""explanation"\s*:\s*""#).expect("regex compiles"));
// End-of-object heuristic: a quote, optional whitespace, closing brace. Can
// fire early if the text itself contains that sequence.
static EXPLANATION_END_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""\s*\}"#).expect("regex compiles"));

/// Current best estimate of the streamed explanation object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExplanationFields {
    pub title: String,
    pub language: String,
    pub explanation: String,
}

/// Recover the three fields from a growing JSON prefix.
///
/// Pure and idempotent: the same input always yields the same output. Absent
/// patterns fall back to defaults - `language_hint` for the language, empty
/// for the rest.
pub fn extract(accumulated: &str, language_hint: &str) -> ExplanationFields {
    // Title and language are captured raw, without unescaping.
    let title = TITLE_RE
        .captures(accumulated)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    let language = LANGUAGE_RE
        .captures(accumulated)
        .and_then(|caps| caps.get(1))
        .map_or_else(|| language_hint.to_string(), |m| m.as_str().to_string());

    let explanation = EXPLANATION_START_RE
        .find(accumulated)
        .map(|start| {
            let raw = &accumulated[start.end()..];
            let raw = match EXPLANATION_END_RE.find(raw) {
                // The object closed: drop the trailing quote and brace.
                Some(end) => &raw[..end.start()],
                // Mid-string: the whole remainder is a prefix of the value.
                None => raw,
            };
            unescape(raw)
        })
        .unwrap_or_default();

    ExplanationFields {
        title,
        language,
        explanation,
    }
}

/// Unescape a raw slice of a partial JSON string.
///
/// Always applied to the entire raw slice, never to previously-unescaped
/// output, so successive partial views cannot compound escapes. The order is
/// fixed: `\n`, `\"`, `\\`, `\t`.
pub fn unescape(raw: &str) -> String {
    raw.replace("\\n", "\n")
        .replace("\\\"", "\"")
        .replace("\\\\", "\\")
        .replace("\\t", "\t")
}
