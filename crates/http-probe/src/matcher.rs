//! Pattern matching against the captured response.
//!
//! Matching runs over raw bytes (`regex::bytes`): the capture buffer holds
//! whatever the server sent, which is not guaranteed to be UTF-8. The probe
//! looks for the first occurrence only; group 1 (the first explicit
//! parenthesis) is the extraction target.

use regex::bytes::Regex;

use crate::error::{Error, Result};

/// Byte offsets of a successful match into the capture buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSpans {
    /// Span of the whole match (group 0).
    pub whole: (usize, usize),
    /// Span of the first capturing group, when it participated in the match.
    pub group1: Option<(usize, usize)>,
}

/// Result of executing the compiled pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    Matched(MatchSpans),
    /// The pattern is valid but did not occur. A normal negative result,
    /// not an error.
    NoMatch,
    /// A matching-time failure. The regex engine itself cannot fail at
    /// execution time, so the pipeline never produces this; it exists so
    /// the outcome resolver's full decision table stays exercisable.
    PatternError(String),
}

/// Compile the pattern once per invocation.
///
/// A syntax error here is a configuration error, reported before any
/// network activity — distinct from a runtime no-match.
pub fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| Error::Config(format!("bad regex {pattern:?}: {e}")))
}

/// Require at least one capturing group.
///
/// Extraction mode reads group 1; a pattern without any explicit group
/// would have nothing to extract, so it is rejected up front instead of
/// yielding undefined output.
pub fn require_capture_group(re: &Regex) -> Result<()> {
    // captures_len counts group 0 (the whole match).
    if re.captures_len() < 2 {
        return Err(Error::Config(format!(
            "regex {:?} has no capturing group to extract",
            re.as_str()
        )));
    }
    Ok(())
}

/// Execute the compiled pattern against the captured region.
///
/// First occurrence only, searching from offset 0 with default semantics.
pub fn execute(re: &Regex, subject: &[u8]) -> MatchResult {
    match re.captures(subject) {
        Some(caps) => match caps.get(0) {
            Some(whole) => MatchResult::Matched(MatchSpans {
                whole: (whole.start(), whole.end()),
                group1: caps.get(1).map(|g| (g.start(), g.end())),
            }),
            // Group 0 always participates; unreachable in practice.
            None => MatchResult::PatternError("match without a whole-match span".to_string()),
        },
        None => MatchResult::NoMatch,
    }
}
