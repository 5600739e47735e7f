//! Bounce Scan - classifies raw messages from files or stdin.
//!
//! Each argument is a path to a raw RFC 5322 message (`.eml`). With no
//! arguments a single message is read from stdin. One JSON line is printed
//! per bounce (per message with `BOUNCE_REPORT_ALL=true`); logs go to stderr.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use tokio::io::AsyncReadExt;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use bounce_parser::{process_raw_email, BounceReport, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured JSON logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .json()
                .flatten_event(true)
                .with_writer(std::io::stderr),
        )
        .init();

    info!("scan_starting");

    // Load configuration from environment
    let config = Config::from_env();
    let classifier = config.classifier();
    info!(
        strict_iteration = config.strict_iteration,
        report_all = config.report_all,
        "config_loaded"
    );

    let paths: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();

    if paths.is_empty() {
        let mut raw = Vec::new();
        tokio::io::stdin()
            .read_to_end(&mut raw)
            .await
            .context("Failed to read stdin")?;

        let report = process_raw_email(&raw, None, &classifier)?;
        emit("-", &report, config.report_all)?;
        return Ok(());
    }

    let mut failed = 0usize;
    for path in &paths {
        let raw = match tokio::fs::read(path).await {
            Ok(raw) => raw,
            Err(e) => {
                error!(path = %path.display(), error = %e, "scan_read_failed");
                failed += 1;
                continue;
            }
        };

        match process_raw_email(&raw, None, &classifier) {
            Ok(report) => emit(&path.display().to_string(), &report, config.report_all)?,
            Err(e) => {
                error!(path = %path.display(), error = %e, "scan_process_failed");
                failed += 1;
            }
        }
    }

    info!(scanned = paths.len(), failed, "scan_complete");

    scan_outcome(paths.len(), failed)
}

/// Fail the run when any input could not be read or classified.
fn scan_outcome(scanned: usize, failed: usize) -> Result<()> {
    if failed > 0 {
        bail!("{failed} of {scanned} messages could not be scanned");
    }
    Ok(())
}

/// Print one JSON line for a report.
fn emit(source: &str, report: &BounceReport, report_all: bool) -> Result<()> {
    if !report_all && !report.result.bounce_type().is_bounce() {
        return Ok(());
    }

    let line = serde_json::json!({
        "source": source,
        "message_id": report.message_id,
        "type": report.result.bounce_type(),
        "reason": report.result.reason(),
        "subject": report.result.subject(),
        "mailbox": report.result.mailbox(),
    });
    println!("{}", serde_json::to_string(&line).context("Failed to encode result")?);

    Ok(())
}
