//! Probe configuration.
//!
//! Built once by the caller (normally the CLI) before the fetch and never
//! mutated during it.

use crate::error::{Error, Result};

/// Default request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 1000;

/// What the probe prints on a successful match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Print the text of the first capturing group (default).
    #[default]
    Extract,
    /// Print "1" on match, "0" otherwise.
    StatusOnly,
    /// Print the total delivery time in seconds on match, "0" otherwise.
    MeasureTime,
}

impl OutputMode {
    /// Resolve the mode from the two CLI flags.
    ///
    /// Status-only wins when both flags are set. Monitoring templates have
    /// relied on that precedence since the first release, so it is a
    /// documented tie-break rather than an input error.
    pub fn from_flags(status_only: bool, measure_time: bool) -> Self {
        if status_only {
            OutputMode::StatusOnly
        } else if measure_time {
            OutputMode::MeasureTime
        } else {
            OutputMode::Extract
        }
    }
}

/// Resolved configuration for one probe invocation.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Target URL, required.
    pub url: String,
    /// Regex source text, required. Group 1 is the extraction target.
    pub pattern: String,
    /// Request timeout in milliseconds, enforced by the transport.
    pub timeout_ms: u64,
    /// Skip TLS certificate verification.
    pub insecure: bool,
    /// Follow location redirects.
    pub follow_redirects: bool,
    /// Optional literal header line, e.g. `Host: internal.example.org`.
    pub header: Option<String>,
    /// Output mode selector.
    pub mode: OutputMode,
    /// Treat a transport failure as a probe failure instead of matching
    /// against whatever (possibly nothing) was captured.
    pub fail_on_error: bool,
}

impl ProbeConfig {
    /// Create a configuration with the given target and pattern and
    /// defaults for everything else.
    pub fn new(url: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            pattern: pattern.into(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            insecure: false,
            follow_redirects: false,
            header: None,
            mode: OutputMode::default(),
            fail_on_error: false,
        }
    }

    /// Reject configurations that cannot possibly probe anything.
    pub fn validate(&self) -> Result<()> {
        if self.url.is_empty() {
            return Err(Error::Config("no URL specified".to_string()));
        }
        if self.pattern.is_empty() {
            return Err(Error::Config("no matching regex specified".to_string()));
        }
        if self.timeout_ms == 0 {
            return Err(Error::Config("timeout must be positive".to_string()));
        }
        Ok(())
    }
}
