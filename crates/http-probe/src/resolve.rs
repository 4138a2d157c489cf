//! Outcome resolver: the pure decision function at the end of the pipeline.
//!
//! Combines transport outcome, fail-on-error policy, output mode and match
//! result into exactly one printed payload and exit code. No hidden state;
//! every row of the decision table is reachable with synthetic inputs.

use std::time::Duration;

use crate::config::OutputMode;
use crate::fetch::TransportOutcome;
use crate::matcher::MatchResult;

/// Exit code reported to the monitoring system.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;

/// The probe's final word: one payload, one exit code.
///
/// `trailing_newline` preserves the historical output asymmetry: extraction
/// payloads and diagnostics end with a newline, the bare "0"/"1" status and
/// time sentinels do not. Monitoring item parsers depend on the bare form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub stdout: String,
    pub trailing_newline: bool,
    pub exit_code: i32,
}

impl Verdict {
    fn success(stdout: impl Into<String>, trailing_newline: bool) -> Self {
        Self {
            stdout: stdout.into(),
            trailing_newline,
            exit_code: EXIT_SUCCESS,
        }
    }

    fn failure(stdout: impl Into<String>, trailing_newline: bool) -> Self {
        Self {
            stdout: stdout.into(),
            trailing_newline,
            exit_code: EXIT_FAILURE,
        }
    }

    pub fn is_success(&self) -> bool {
        self.exit_code == EXIT_SUCCESS
    }

    /// The exact bytes to write to stdout.
    pub fn render(&self) -> String {
        if self.trailing_newline {
            format!("{}\n", self.stdout)
        } else {
            self.stdout.clone()
        }
    }
}

/// Resolve the final verdict.
///
/// `body` is the capture buffer's valid region; group spans in
/// `match_result` index into it. Rows are evaluated in table order: the
/// fail-on-error short-circuit first, then pattern errors, then no-match,
/// then the per-mode success payloads.
pub fn resolve(
    outcome: &TransportOutcome,
    fail_on_error: bool,
    mode: OutputMode,
    match_result: &MatchResult,
    elapsed: Duration,
    body: &[u8],
) -> Verdict {
    if !outcome.is_success() && fail_on_error {
        return match mode {
            OutputMode::StatusOnly | OutputMode::MeasureTime => Verdict::failure("0", false),
            OutputMode::Extract => Verdict::failure("", false),
        };
    }

    match match_result {
        MatchResult::PatternError(msg) => Verdict::failure(format!("matching error: {msg}"), true),
        MatchResult::NoMatch => match mode {
            OutputMode::StatusOnly | OutputMode::MeasureTime => Verdict::failure("0", false),
            OutputMode::Extract => Verdict::failure("no match", true),
        },
        MatchResult::Matched(spans) => match mode {
            OutputMode::StatusOnly => Verdict::success("1", false),
            OutputMode::MeasureTime => Verdict::success(format_elapsed(elapsed), false),
            OutputMode::Extract => {
                // A group that did not participate extracts as empty;
                // groupless patterns were already rejected at compile time.
                let text = spans
                    .group1
                    .map(|(start, end)| String::from_utf8_lossy(&body[start..end]).into_owned())
                    .unwrap_or_default();
                Verdict::success(text, true)
            }
        },
    }
}

/// Format a duration as `seconds.microseconds` with six fractional digits.
///
/// `Duration` is non-negative by construction (the orchestrator measures
/// with a monotonic clock), so zero is the floor.
pub fn format_elapsed(elapsed: Duration) -> String {
    format!("{}.{:06}", elapsed.as_secs(), elapsed.subsec_micros())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FailureReason;
    use crate::matcher::MatchSpans;

    fn failure() -> TransportOutcome {
        TransportOutcome::Failure(FailureReason::Timeout)
    }

    fn matched(body: &[u8], group: &[u8]) -> MatchResult {
        let start = body
            .windows(group.len().max(1))
            .position(|w| w == group)
            .unwrap_or(0);
        MatchResult::Matched(MatchSpans {
            whole: (0, body.len()),
            group1: Some((start, start + group.len())),
        })
    }

    const ELAPSED: Duration = Duration::from_micros(1_234_567);

    // Rows 1 and 2: transport failure with fail_on_error set.

    #[test]
    fn failure_with_fail_on_error_prints_zero_in_status_mode() {
        let v = resolve(
            &failure(),
            true,
            OutputMode::StatusOnly,
            &MatchResult::NoMatch,
            ELAPSED,
            b"",
        );
        assert_eq!(v.render(), "0");
        assert_eq!(v.exit_code, EXIT_FAILURE);
    }

    #[test]
    fn failure_with_fail_on_error_prints_zero_in_time_mode() {
        let v = resolve(
            &failure(),
            true,
            OutputMode::MeasureTime,
            &MatchResult::NoMatch,
            ELAPSED,
            b"",
        );
        assert_eq!(v.render(), "0");
        assert_eq!(v.exit_code, EXIT_FAILURE);
    }

    #[test]
    fn failure_with_fail_on_error_prints_nothing_in_extract_mode() {
        let v = resolve(
            &failure(),
            true,
            OutputMode::Extract,
            &MatchResult::NoMatch,
            ELAPSED,
            b"",
        );
        assert_eq!(v.render(), "");
        assert_eq!(v.exit_code, EXIT_FAILURE);
    }

    // Row 3: pattern error.

    #[test]
    fn pattern_error_prints_diagnostic_and_fails() {
        let v = resolve(
            &TransportOutcome::Success,
            false,
            OutputMode::Extract,
            &MatchResult::PatternError("boom".to_string()),
            ELAPSED,
            b"",
        );
        assert_eq!(v.render(), "matching error: boom\n");
        assert_eq!(v.exit_code, EXIT_FAILURE);
    }

    // Rows 4 and 5: no match.

    #[test]
    fn no_match_prints_zero_in_status_and_time_modes() {
        for mode in [OutputMode::StatusOnly, OutputMode::MeasureTime] {
            let v = resolve(
                &TransportOutcome::Success,
                false,
                mode,
                &MatchResult::NoMatch,
                ELAPSED,
                b"body",
            );
            assert_eq!(v.render(), "0");
            assert_eq!(v.exit_code, EXIT_FAILURE);
        }
    }

    #[test]
    fn no_match_prints_diagnostic_in_extract_mode() {
        let v = resolve(
            &TransportOutcome::Success,
            false,
            OutputMode::Extract,
            &MatchResult::NoMatch,
            ELAPSED,
            b"body",
        );
        assert_eq!(v.render(), "no match\n");
        assert_eq!(v.exit_code, EXIT_FAILURE);
    }

    // Rows 6-8: match.

    #[test]
    fn match_prints_one_in_status_mode() {
        let body = b"id=42";
        let v = resolve(
            &TransportOutcome::Success,
            false,
            OutputMode::StatusOnly,
            &matched(body, b"42"),
            ELAPSED,
            body,
        );
        assert_eq!(v.render(), "1");
        assert_eq!(v.exit_code, EXIT_SUCCESS);
    }

    #[test]
    fn match_prints_elapsed_in_time_mode() {
        let body = b"id=42";
        let v = resolve(
            &TransportOutcome::Success,
            false,
            OutputMode::MeasureTime,
            &matched(body, b"42"),
            ELAPSED,
            body,
        );
        assert_eq!(v.render(), "1.234567");
        assert_eq!(v.exit_code, EXIT_SUCCESS);
    }

    #[test]
    fn match_prints_group_text_in_extract_mode() {
        let body = b"id=42 name=foo";
        let v = resolve(
            &TransportOutcome::Success,
            false,
            OutputMode::Extract,
            &matched(body, b"42"),
            ELAPSED,
            body,
        );
        assert_eq!(v.stdout, "42");
        assert!(v.trailing_newline);
        assert_eq!(v.render(), "42\n");
        assert_eq!(v.exit_code, EXIT_SUCCESS);
    }

    #[test]
    fn extract_of_non_participating_group_is_empty_success() {
        let v = resolve(
            &TransportOutcome::Success,
            false,
            OutputMode::Extract,
            &MatchResult::Matched(MatchSpans {
                whole: (0, 3),
                group1: None,
            }),
            ELAPSED,
            b"foo",
        );
        assert_eq!(v.stdout, "");
        assert_eq!(v.exit_code, EXIT_SUCCESS);
    }

    // Without fail_on_error a transport failure falls through to the
    // match rows (very likely NoMatch against an empty buffer).

    #[test]
    fn failure_without_fail_on_error_falls_through_to_match_rows() {
        let v = resolve(
            &failure(),
            false,
            OutputMode::StatusOnly,
            &MatchResult::NoMatch,
            ELAPSED,
            b"",
        );
        assert_eq!(v.render(), "0");
        assert_eq!(v.exit_code, EXIT_FAILURE);
    }

    #[test]
    fn format_elapsed_pads_microseconds() {
        assert_eq!(format_elapsed(Duration::ZERO), "0.000000");
        assert_eq!(format_elapsed(Duration::from_micros(42)), "0.000042");
        assert_eq!(format_elapsed(Duration::from_millis(2500)), "2.500000");
    }
}
