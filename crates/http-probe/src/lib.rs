//! http-probe - fetch HTTP(S) urls and extract values for monitoring
//!
//! A single-shot check plugin core: fetch one resource, run one regex over
//! the captured body, print one scalar. Response capture is bounded and
//! overflow-aware; the output mode decides whether the scalar is a boolean
//! status, the delivery time in seconds, or the text of the regex's first
//! capturing group.
//!
//! # Example
//!
//! ```no_run
//! use http_probe::{OutputMode, ProbeConfig};
//!
//! #[tokio::main]
//! async fn main() -> http_probe::Result<()> {
//!     let mut config = ProbeConfig::new("http://example.com/health", "status: (\\w+)");
//!     config.mode = OutputMode::Extract;
//!     let verdict = http_probe::run(&config).await?;
//!     print!("{}", verdict.render());
//!     std::process::exit(verdict.exit_code);
//! }
//! ```

pub mod capture;
pub mod config;
pub mod error;
pub mod fetch;
pub mod matcher;
pub mod probe;
pub mod resolve;

pub use capture::{AppendOutcome, CaptureBuffer, MAX_CAPTURE_BYTES};
pub use config::{DEFAULT_TIMEOUT_MS, OutputMode, ProbeConfig};
pub use error::{Error, Result};
pub use fetch::{FailureReason, FetchReport, TransportOutcome};
pub use matcher::{MatchResult, MatchSpans};
pub use probe::run;
pub use resolve::{EXIT_FAILURE, EXIT_SUCCESS, Verdict, format_elapsed};
