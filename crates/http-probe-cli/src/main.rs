//! http-probe CLI - fetch http urls and extract values
//!
//! Usage:
//!   http-probe -u URL -r REGEX              # print the first capturing group
//!   http-probe -u URL -r REGEX -s           # print 1 on match, 0 otherwise
//!   http-probe -u URL -r REGEX -m           # print the delivery time in seconds
//!
//! stdout carries exactly one value for the monitoring item; everything
//! diagnostic goes to stderr.

use std::io::Write;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use http_probe::{DEFAULT_TIMEOUT_MS, OutputMode, ProbeConfig};

/// Fetch http urls and extract values for monitoring systems.
#[derive(Parser, Debug)]
#[command(name = "http-probe")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// URL to fetch
    #[arg(short = 'u', long)]
    url: String,

    /// Matching regex; the first capturing group is the extracted value
    #[arg(short = 'r', long)]
    regex: String,

    /// Request timeout in milliseconds
    #[arg(short = 't', long, default_value_t = DEFAULT_TIMEOUT_MS)]
    timeout: u64,

    /// Ignore TLS certificate verification
    #[arg(short = 'i', long)]
    insecure: bool,

    /// Follow location redirects
    #[arg(short = 'l', long)]
    location: bool,

    /// Fail the probe on transport errors (timeouts, capture overflow, ...)
    #[arg(short = 'f', long)]
    fail: bool,

    /// Print only the request status (1 = OK, 0 = NOT OK)
    #[arg(short = 's', long)]
    status: bool,

    /// Print the total delivery time of the request in seconds
    #[arg(short = 'm', long)]
    measure_time: bool,

    /// Send this value as the Host header
    #[arg(short = 'H', long, value_name = "HOSTNAME")]
    host: Option<String>,

    /// Verbose diagnostics on stderr
    #[arg(short = 'v', long)]
    verbose: bool,
}

impl Args {
    fn into_config(self) -> ProbeConfig {
        let mut config = ProbeConfig::new(self.url, self.regex);
        config.timeout_ms = self.timeout;
        config.insecure = self.insecure;
        config.follow_redirects = self.location;
        config.fail_on_error = self.fail;
        config.header = self.host.as_deref().map(|h| format!("Host: {h}"));
        config.mode = OutputMode::from_flags(self.status, self.measure_time);
        config
    }
}

fn init_tracing(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("http_probe=debug,http_probe_cli=debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))
}

/// Echo the resolved configuration and an equivalent invocation line, for
/// pasting straight into a monitoring item definition.
fn echo_configuration(args: &Args) {
    eprintln!("{:<15} {}", "URL", args.url);
    eprintln!("{:<15} {}", "REGEX", args.regex);
    eprintln!("{:<15} {}", "TIMEOUT", args.timeout);
    if let Some(host) = &args.host {
        eprintln!("{:<15} Host: {}", "HOST HEADER", host);
    }
    eprintln!("{:<15} {}", "STATUS ONLY", args.status);

    let mut item = format!(
        "http-probe -t {} -u \"{}\" -r \"{}\"",
        args.timeout, args.url, args.regex
    );
    for (flag, set) in [
        (" -s", args.status),
        (" -m", args.measure_time),
        (" -i", args.insecure),
        (" -l", args.location),
        (" -f", args.fail),
    ] {
        if set {
            item.push_str(flag);
        }
    }
    if let Some(host) = &args.host {
        item.push_str(&format!(" -H {host}"));
    }
    eprintln!("{:<15} [{}]", "MONITOR ITEM", item);
    eprintln!();
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = init_tracing(args.verbose) {
        eprintln!("http-probe: {e}");
    }
    if args.verbose {
        echo_configuration(&args);
    }

    let config = args.into_config();
    match http_probe::run(&config).await {
        Ok(verdict) => {
            print!("{}", verdict.render());
            // The payload may have no trailing newline; make sure it is
            // out before the exit.
            let _ = std::io::stdout().flush();
            std::process::exit(verdict.exit_code);
        }
        Err(e) => {
            eprintln!("http-probe: {e}");
            std::process::exit(http_probe::EXIT_FAILURE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn minimal_invocation_defaults_to_extract() {
        let args = parse(&["http-probe", "-u", "http://example.com", "-r", "id=(\\d+)"]);
        let config = args.into_config();
        assert_eq!(config.mode, OutputMode::Extract);
        assert_eq!(config.timeout_ms, DEFAULT_TIMEOUT_MS);
        assert!(!config.fail_on_error);
    }

    #[test]
    fn status_flag_beats_measure_time() {
        let args = parse(&[
            "http-probe",
            "-u",
            "http://example.com",
            "-r",
            "x",
            "-s",
            "-m",
        ]);
        assert_eq!(args.into_config().mode, OutputMode::StatusOnly);
    }

    #[test]
    fn host_flag_becomes_literal_header_line() {
        let args = parse(&[
            "http-probe",
            "-u",
            "http://example.com",
            "-r",
            "x",
            "-H",
            "internal.example.org",
        ]);
        assert_eq!(
            args.into_config().header.as_deref(),
            Some("Host: internal.example.org")
        );
    }

    #[test]
    fn all_switches_map_onto_config() {
        let args = parse(&[
            "http-probe",
            "-u",
            "https://example.com",
            "-r",
            "x",
            "-t",
            "2500",
            "-i",
            "-l",
            "-f",
            "-m",
        ]);
        let config = args.into_config();
        assert_eq!(config.timeout_ms, 2500);
        assert!(config.insecure);
        assert!(config.follow_redirects);
        assert!(config.fail_on_error);
        assert_eq!(config.mode, OutputMode::MeasureTime);
    }

    #[test]
    fn url_and_regex_are_required() {
        assert!(Args::try_parse_from(["http-probe"]).is_err());
        assert!(Args::try_parse_from(["http-probe", "-u", "http://example.com"]).is_err());
    }
}
