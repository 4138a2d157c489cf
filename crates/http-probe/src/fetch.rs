//! Fetch orchestrator: one transport session, one request, one timing.
//!
//! Drives a single GET through reqwest, streaming every body chunk into a
//! bounded [`CaptureBuffer`]. The moment the buffer rejects a chunk the
//! in-flight transfer is aborted and the run is classified as an overflow
//! failure. Exactly one connection attempt per invocation, no retries —
//! retry policy belongs to the external scheduler invoking the probe.

use std::error::Error as StdError;
use std::fmt;
use std::time::{Duration, Instant};

use futures_util::StreamExt;
use reqwest::Client;
use reqwest::redirect::Policy;

use crate::capture::{AppendOutcome, CaptureBuffer};
use crate::config::ProbeConfig;
use crate::error::{Error, Result};

/// Fixed client signature sent with every request.
pub const USER_AGENT: &str = concat!("http-probe/", env!("CARGO_PKG_VERSION"));

/// Redirect hop limit when `follow_redirects` is set.
pub const MAX_REDIRECTS: usize = 10;

/// Why the transport run failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// DNS resolution or TCP connect failed.
    Connect(String),
    /// TLS handshake or certificate verification failed.
    Tls(String),
    /// The request exceeded the configured timeout.
    Timeout,
    /// The response body exceeded the capture buffer's capacity.
    Overflow,
    /// Any other transport-level failure.
    Other(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Connect(msg) => write!(f, "connect error: {msg}"),
            FailureReason::Tls(msg) => write!(f, "tls error: {msg}"),
            FailureReason::Timeout => write!(f, "operation timed out"),
            FailureReason::Overflow => write!(f, "response exceeded capture buffer"),
            FailureReason::Other(msg) => write!(f, "request failed: {msg}"),
        }
    }
}

/// Transport-level classification of the run.
///
/// HTTP status codes are not part of this classification: a 404 still
/// delivers a body, and the body is what the pattern runs against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportOutcome {
    Success,
    Failure(FailureReason),
}

impl TransportOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TransportOutcome::Success)
    }
}

/// Everything the rest of the pipeline needs from the fetch.
#[derive(Debug)]
pub struct FetchReport {
    pub outcome: TransportOutcome,
    /// Wall-clock duration of the transport call, start to return,
    /// regardless of outcome.
    pub elapsed: Duration,
    pub buffer: CaptureBuffer,
}

/// Perform the single request-response cycle described by `config`.
///
/// Client construction and header parsing happen before the timer starts;
/// both are configuration errors, not transport failures.
pub async fn fetch(config: &ProbeConfig) -> Result<FetchReport> {
    let client = build_client(config)?;
    let header = config
        .header
        .as_deref()
        .map(parse_header_line)
        .transpose()?;

    let mut buffer = CaptureBuffer::new();
    tracing::debug!(url = %config.url, timeout_ms = config.timeout_ms, "sending request");

    let started = Instant::now();
    let outcome = run_transfer(&client, &config.url, header.as_ref(), &mut buffer).await;
    let elapsed = started.elapsed();

    match &outcome {
        TransportOutcome::Success => {
            tracing::debug!(bytes = buffer.len(), ?elapsed, "transfer complete");
        }
        TransportOutcome::Failure(reason) => {
            tracing::debug!(%reason, bytes = buffer.len(), ?elapsed, "transfer failed");
        }
    }

    Ok(FetchReport {
        outcome,
        elapsed,
        buffer,
    })
}

fn build_client(config: &ProbeConfig) -> Result<Client> {
    let redirect = if config.follow_redirects {
        Policy::limited(MAX_REDIRECTS)
    } else {
        Policy::none()
    };

    let mut builder = Client::builder()
        .timeout(Duration::from_millis(config.timeout_ms))
        .user_agent(USER_AGENT)
        .redirect(redirect)
        // No transparent decompression: the capture cap applies to the
        // bytes on the wire, and a small gzip body must not expand past it.
        .no_gzip()
        .no_brotli()
        .no_deflate();

    if config.insecure {
        builder = builder.danger_accept_invalid_certs(true);
    }

    builder
        .build()
        .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))
}

/// Split a literal `Name: value` header line.
fn parse_header_line(line: &str) -> Result<(String, String)> {
    let (name, value) = line
        .split_once(':')
        .ok_or_else(|| Error::Config(format!("malformed header line {line:?}")))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::Config(format!("malformed header line {line:?}")));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

async fn run_transfer(
    client: &Client,
    url: &str,
    header: Option<&(String, String)>,
    buffer: &mut CaptureBuffer,
) -> TransportOutcome {
    let mut request = client.get(url);
    if let Some((name, value)) = header {
        request = request.header(name.as_str(), value.as_str());
    }

    let response = match request.send().await {
        Ok(response) => response,
        Err(e) => return TransportOutcome::Failure(classify(&e)),
    };

    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(e) => return TransportOutcome::Failure(classify(&e)),
        };
        if buffer.append(&chunk) == AppendOutcome::Overflow {
            // Dropping the stream closes the connection and aborts the
            // remainder of the transfer.
            return TransportOutcome::Failure(FailureReason::Overflow);
        }
    }

    TransportOutcome::Success
}

fn classify(err: &reqwest::Error) -> FailureReason {
    if err.is_timeout() {
        return FailureReason::Timeout;
    }
    if err.is_connect() {
        if mentions_tls(err) {
            return FailureReason::Tls(err.to_string());
        }
        return FailureReason::Connect(err.to_string());
    }
    FailureReason::Other(err.to_string())
}

/// Walk the source chain looking for TLS vocabulary. reqwest does not
/// expose a dedicated TLS predicate, and the rustls error sits several
/// layers down.
fn mentions_tls(err: &reqwest::Error) -> bool {
    let mut source: Option<&(dyn StdError + 'static)> = Some(err);
    while let Some(cause) = source {
        let text = cause.to_string().to_ascii_lowercase();
        if text.contains("certificate") || text.contains("tls") || text.contains("handshake") {
            return true;
        }
        source = cause.source();
    }
    false
}
