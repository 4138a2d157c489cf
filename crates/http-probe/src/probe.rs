//! The probe pipeline: validate, compile, fetch, match, resolve.

use crate::config::{OutputMode, ProbeConfig};
use crate::error::Result;
use crate::fetch;
use crate::matcher::{self, MatchResult};
use crate::resolve::{self, Verdict};

/// Run one complete probe.
///
/// Configuration problems (empty URL, bad regex, groupless pattern in
/// extraction mode, malformed header) error out here before any network
/// activity. Everything after the fetch is policy, folded into the
/// returned [`Verdict`] rather than an error.
pub async fn run(config: &ProbeConfig) -> Result<Verdict> {
    config.validate()?;

    let re = matcher::compile(&config.pattern)?;
    if config.mode == OutputMode::Extract {
        matcher::require_capture_group(&re)?;
    }

    let report = fetch::fetch(config).await?;
    tracing::trace!(
        body = %String::from_utf8_lossy(report.buffer.bytes()),
        "captured response"
    );

    // With fail_on_error set, a failed transfer short-circuits matching:
    // the regex never runs and the resolver sees a synthetic no-match.
    let match_result = if !report.outcome.is_success() && config.fail_on_error {
        MatchResult::NoMatch
    } else {
        matcher::execute(&re, report.buffer.bytes())
    };

    Ok(resolve::resolve(
        &report.outcome,
        config.fail_on_error,
        config.mode,
        &match_result,
        report.elapsed,
        report.buffer.bytes(),
    ))
}
