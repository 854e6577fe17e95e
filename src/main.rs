// maulog - GPL-3.0-or-later
// This file is part of maulog.
//
// Copyright (C) 2025 Daniel Freiermuth
//
// maulog is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// maulog is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with maulog.  If not, see <https://www.gnu.org/licenses/>.

use anyhow::{bail, Context};
use clap::Parser;
use maulog::analytics::{report, Report};
use maulog::apps::AppTag;
use maulog::config::MonitorConfig;
use maulog::core::{LevelFilter, MonitorState, RecordFilter, TailMonitor};
use maulog::parser::record::LogRecord;
use std::collections::HashSet;
use std::path::PathBuf;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

const GIT_HASH: &str = env!("GIT_HASH");

#[derive(Parser, Debug)]
#[command(name = "maulog")]
#[command(author = "Daniel Freiermuth")]
#[command(version)]
#[command(about = "Read, explain and follow Microsoft AutoUpdate logs", long_about = None)]
#[allow(clippy::struct_excessive_bools)]
struct Args {
    /// Log file to open. Defaults to the newest log in the configured folder.
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Keep running and print entries as they are appended
    #[arg(short, long)]
    follow: bool,

    /// Print pattern, application and timeline statistics
    #[arg(short, long)]
    analytics: bool,

    /// Only show errors
    #[arg(long, conflicts_with_all = ["warnings", "info"])]
    errors: bool,

    /// Only show warnings
    #[arg(long, conflicts_with = "info")]
    warnings: bool,

    /// Only show entries that are neither errors nor warnings
    #[arg(long)]
    info: bool,

    /// Only show entries of one application, e.g. "Word" or "Company Portal"
    #[arg(long, value_name = "NAME")]
    app: Option<AppTag>,

    /// Only show entries whose message or source contains TEXT
    #[arg(long, value_name = "TEXT")]
    search: Option<String>,

    /// Configuration file to use instead of the per-user one
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print one JSON object per entry, and the statistics as JSON
    #[arg(long)]
    json: bool,
}

impl Args {
    const fn level(&self) -> LevelFilter {
        if self.errors {
            LevelFilter::Errors
        } else if self.warnings {
            LevelFilter::Warnings
        } else if self.info {
            LevelFilter::Info
        } else {
            LevelFilter::All
        }
    }

    fn record_filter(&self) -> RecordFilter {
        RecordFilter::new()
            .with_level(self.level())
            .with_app(self.app)
            .with_search(self.search.as_deref().unwrap_or_default())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Set RUST_LOG to override, e.g. RUST_LOG=maulog=debug
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!(
        "maulog starting up (version {}, {GIT_HASH})",
        env!("CARGO_PKG_VERSION")
    );

    #[cfg(feature = "cpu-profiling")]
    {
        tracing::info!("CPU profiling enabled with Tracy - run Tracy profiler to connect");
    }

    let args = Args::parse();
    let config = args
        .config
        .as_deref()
        .map_or_else(MonitorConfig::load, MonitorConfig::load_from);
    let filter = args.record_filter();
    let output = if args.json { Output::Json } else { Output::Text };

    let monitor = TailMonitor::new(config);
    let mut changes = monitor.subscribe();
    match &args.file {
        Some(file) => {
            tracing::info!("Opening file from command line: {}", file.display());
            monitor.load_explicit(file);
        }
        None => monitor.load_most_recent(),
    }
    wait_for_load(&monitor, &mut changes).await?;

    let records = monitor.records();
    let mut seen: HashSet<String> = HashSet::with_capacity(records.len());
    for record in filter.apply(records.records()) {
        output.record(record)?;
    }
    seen.extend(records.records().iter().map(|r| r.raw_line.clone()));

    if args.analytics {
        output.report(&report(records.records()))?;
    }

    if !args.follow {
        return Ok(());
    }
    if !monitor.is_monitoring() {
        bail!("cannot follow {}: the file is not watchable", file_label(&monitor));
    }
    tracing::info!("Following {}, press Ctrl-C to stop", file_label(&monitor));

    loop {
        tokio::select! {
            changed = changes.changed() => {
                changed.context("monitor shut down")?;
                let snapshot = monitor.records();
                for record in snapshot.records() {
                    if seen.insert(record.raw_line.clone()) && filter.matches(record) {
                        output.record(record)?;
                    }
                }
            }
            signal = tokio::signal::ctrl_c() => {
                signal.context("cannot listen for Ctrl-C")?;
                break;
            }
        }
    }

    monitor.stop_monitoring();
    Ok(())
}

/// Wait until the initial load finished, failing if it did not succeed
async fn wait_for_load(
    monitor: &TailMonitor,
    changes: &mut watch::Receiver<u64>,
) -> anyhow::Result<()> {
    loop {
        let status = monitor.status();
        match status.state {
            MonitorState::Loading => {}
            MonitorState::Idle if status.error.is_some() => {
                bail!(
                    "{}: {}",
                    status.message,
                    status.error.as_deref().unwrap_or_default()
                );
            }
            MonitorState::Idle
            | MonitorState::Loaded
            | MonitorState::Monitoring
            | MonitorState::Reloading
            | MonitorState::Stopped => return Ok(()),
        }
        changes.changed().await.context("monitor shut down")?;
    }
}

fn file_label(monitor: &TailMonitor) -> String {
    monitor
        .status()
        .file
        .as_ref()
        .map_or_else(|| "log".to_string(), |path| path.display().to_string())
}

#[derive(Debug, Clone, Copy)]
enum Output {
    Text,
    /// JSON lines on stdout
    Json,
}

impl Output {
    fn record(self, record: &LogRecord) -> anyhow::Result<()> {
        match self {
            Self::Text => {
                println!(
                    "{} [{}] <{}> {}: {}",
                    record.timestamp_raw,
                    record.classified_app(),
                    record.severity,
                    record.log_type,
                    record.message
                );
                if record.explanation != record.message {
                    println!("    {}", record.explanation);
                }
            }
            Self::Json => println!("{}", serde_json::to_string(record)?),
        }
        Ok(())
    }

    fn report(self, report: &Report) -> anyhow::Result<()> {
        match self {
            Self::Text => print_report(report),
            Self::Json => println!("{}", serde_json::to_string(report)?),
        }
        Ok(())
    }
}

fn print_report(report: &Report) {
    let summary = &report.summary;
    let analytics = &report.analytics;

    println!();
    println!(
        "{} entries, {} errors, {} warnings ({:.1}% errors)",
        summary.total, summary.errors, summary.warnings, report.error_rate
    );

    println!("\nApplications:");
    for row in &report.applications {
        println!(
            "  {:<20} {:>6} entries {:>6} errors",
            row.app.display_name(),
            row.total,
            row.errors
        );
    }

    if !analytics.patterns.is_empty() {
        println!("\nError patterns:");
        for pattern in &analytics.patterns {
            println!(
                "  {:<20} {:>6}  {}",
                pattern.label,
                pattern.count,
                pattern.severity.label()
            );
        }
    }

    if !analytics.app_errors.is_empty() {
        println!("\nErrors by source:");
        for row in &analytics.app_errors {
            println!("  {:<20} {:>6}  ({})", row.display_name, row.errors, row.source_app);
        }
    }

    println!("\nEntries per hour:");
    for bucket in &analytics.timeline {
        println!("  {}  {:>6}", bucket.hour, bucket.count);
    }
}
