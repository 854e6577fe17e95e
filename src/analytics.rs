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

//! Aggregate statistics over a set of records.
//!
//! Everything here is a pure function of the records passed in, so callers
//! can run it on any snapshot without coordinating with the monitor.

use crate::apps::{display_name_for, AppTag};
use crate::parser::record::LogRecord;
use chrono::Timelike;
use serde::Serialize;
use std::collections::BTreeMap;

/// Recurring problem categories, matched on the lower-cased message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PatternKind {
    FailedOperation,
    ErrorCode,
    DownloadFailure,
    CacheIssue,
    NetworkIssue,
    PermissionIssue,
}

impl PatternKind {
    pub const ALL: [Self; 6] = [
        Self::FailedOperation,
        Self::ErrorCode,
        Self::DownloadFailure,
        Self::CacheIssue,
        Self::NetworkIssue,
        Self::PermissionIssue,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::FailedOperation => "Failed Operation",
            Self::ErrorCode => "Error Code",
            Self::DownloadFailure => "Download Failure",
            Self::CacheIssue => "Cache Issue",
            Self::NetworkIssue => "Network/URL Issue",
            Self::PermissionIssue => "Permission Issue",
        }
    }

    /// `lower` must already be lower-cased
    fn matches(self, lower: &str) -> bool {
        match self {
            Self::FailedOperation => lower.contains("failed"),
            Self::ErrorCode => lower.contains("error"),
            Self::DownloadFailure => {
                lower.contains("download") && (lower.contains("failed") || lower.contains("error"))
            }
            Self::CacheIssue => lower.contains("cache"),
            Self::NetworkIssue => lower.contains("network") || lower.contains("url"),
            Self::PermissionIssue => lower.contains("permission"),
        }
    }
}

/// Counts above this are rated [`SeverityBand::High`]
pub const HIGH_SEVERITY_THRESHOLD: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SeverityBand {
    High,
    Medium,
}

impl SeverityBand {
    pub const fn for_count(count: usize) -> Self {
        if count > HIGH_SEVERITY_THRESHOLD {
            Self::High
        } else {
            Self::Medium
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorPattern {
    pub kind: PatternKind,
    pub label: &'static str,
    pub count: usize,
    pub severity: SeverityBand,
}

/// Errors reported by one raw source application
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppErrorCount {
    pub source_app: String,
    pub display_name: String,
    pub errors: usize,
}

/// Records logged during one hour of the day
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HourBucket {
    /// `"HH:00"`
    pub hour: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Analytics {
    pub patterns: Vec<ErrorPattern>,
    pub app_errors: Vec<AppErrorCount>,
    pub timeline: Vec<HourBucket>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub errors: usize,
    pub warnings: usize,
}

impl Summary {
    /// Share of error records in percent, 0 for an empty set
    pub fn error_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.errors as f64 / self.total as f64 * 100.0
    }
}

/// Record and error counts of one application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AppBreakdown {
    pub app: AppTag,
    pub total: usize,
    pub errors: usize,
}

/// Count problem categories among error and warning records.
///
/// A record can count towards several categories. Only categories that
/// occurred are returned, most frequent first, ties by label.
pub fn detect_patterns(records: &[LogRecord]) -> Vec<ErrorPattern> {
    profiling::scope!("detect_patterns");
    let mut counts = [0usize; PatternKind::ALL.len()];

    for record in records.iter().filter(|r| r.is_error() || r.is_warning()) {
        let lower = record.message.to_lowercase();
        for (count, kind) in counts.iter_mut().zip(PatternKind::ALL) {
            if kind.matches(&lower) {
                *count += 1;
            }
        }
    }

    let mut patterns: Vec<ErrorPattern> = PatternKind::ALL
        .into_iter()
        .zip(counts)
        .filter(|&(_, count)| count > 0)
        .map(|(kind, count)| ErrorPattern {
            kind,
            label: kind.label(),
            count,
            severity: SeverityBand::for_count(count),
        })
        .collect();
    patterns.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(b.label)));
    patterns
}

/// Error records per raw source application, most errors first, ties by name
pub fn app_error_summary(records: &[LogRecord]) -> Vec<AppErrorCount> {
    profiling::scope!("app_error_summary");
    let mut by_app: BTreeMap<&str, usize> = BTreeMap::new();
    for record in records.iter().filter(|r| r.is_error()) {
        *by_app.entry(record.source_app.as_str()).or_default() += 1;
    }

    let mut summary: Vec<AppErrorCount> = by_app
        .into_iter()
        .map(|(source_app, errors)| AppErrorCount {
            source_app: source_app.to_string(),
            display_name: display_name_for(source_app),
            errors,
        })
        .collect();
    // Stable: equal counts stay in name order
    summary.sort_by(|a, b| b.errors.cmp(&a.errors));
    summary
}

/// All records bucketed by local hour of day, in hour order
pub fn hourly_timeline(records: &[LogRecord]) -> Vec<HourBucket> {
    profiling::scope!("hourly_timeline");
    let mut by_hour: BTreeMap<u32, usize> = BTreeMap::new();
    for record in records {
        *by_hour.entry(record.timestamp.hour()).or_default() += 1;
    }

    by_hour
        .into_iter()
        .map(|(hour, count)| HourBucket {
            hour: format!("{hour:02}:00"),
            count,
        })
        .collect()
}

pub fn compute_analytics(records: &[LogRecord]) -> Analytics {
    profiling::scope!("compute_analytics");
    Analytics {
        patterns: detect_patterns(records),
        app_errors: app_error_summary(records),
        timeline: hourly_timeline(records),
    }
}

pub fn summarize(records: &[LogRecord]) -> Summary {
    records.iter().fold(
        Summary {
            total: records.len(),
            ..Summary::default()
        },
        |mut summary, record| {
            summary.errors += usize::from(record.is_error());
            summary.warnings += usize::from(record.is_warning());
            summary
        },
    )
}

/// Per-application counts in table order, leaving out applications with no
/// records
pub fn app_breakdown(records: &[LogRecord]) -> Vec<AppBreakdown> {
    profiling::scope!("app_breakdown");
    let mut totals: BTreeMap<AppTag, (usize, usize)> = BTreeMap::new();
    for record in records {
        let entry = totals.entry(record.classified_app()).or_default();
        entry.0 += 1;
        entry.1 += usize::from(record.is_error());
    }

    AppTag::ALL
        .into_iter()
        .filter_map(|app| {
            totals
                .get(&app)
                .map(|&(total, errors)| AppBreakdown { app, total, errors })
        })
        .collect()
}

/// Summary, per-application breakdown and analytics of one record set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub summary: Summary,
    /// Percent, see [`Summary::error_rate`]
    pub error_rate: f64,
    pub applications: Vec<AppBreakdown>,
    #[serde(flatten)]
    pub analytics: Analytics,
}

pub fn report(records: &[LogRecord]) -> Report {
    let summary = summarize(records);
    Report {
        summary,
        error_rate: summary.error_rate(),
        applications: app_breakdown(records),
        analytics: compute_analytics(records),
    }
}
