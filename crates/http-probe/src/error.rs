//! Error types for http-probe
//!
//! Transport failures are deliberately NOT errors: they are data
//! ([`crate::fetch::TransportOutcome::Failure`]) that flows into the outcome
//! resolver, because the fail-on-error policy decides what a failed fetch
//! means for the printed result. Only conditions that make the probe itself
//! unrunnable surface here.

use thiserror::Error;

/// Result type alias using http-probe's Error.
pub type Result<T> = std::result::Result<T, Error>;

/// http-probe error types.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid probe configuration (missing URL, bad regex syntax, malformed
    /// header line). Fatal, reported before any network activity.
    #[error("configuration error: {0}")]
    Config(String),

    /// Unexpected internal failure. Must never abort the process with a
    /// panic; the caller maps it to a non-zero exit.
    #[error("internal error: {0}")]
    Internal(String),
}
