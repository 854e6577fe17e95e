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

//! MAU log line parsing.
//!
//! Every useful line has the shape
//! `YYYY-MM-DD HH:MM:SS [SOURCE_APP] <SEVERITY> LOG_TYPE: PAYLOAD`.
//! Anything else (blank lines, continuation lines, banners) is dropped
//! without complaint.

pub mod payload;
pub mod record;

use crate::explain::explain;
use chrono::{DateTime, Local, NaiveDateTime};
use fancy_regex::Regex;
use payload::Payload;
use rayon::prelude::*;
use record::LogRecord;
use std::sync::LazyLock;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// timestamp, [source app], <severity>, log type, payload
static LINE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2})\s+\[([^\]]+)\]\s+<([^>]+)>\s+([^:]+):\s+(.+)$",
    )
    .expect("valid regex literal")
});

/// Parse one line into a record, or `None` if the line does not have the
/// MAU shape
pub fn parse_line(raw: &str) -> Option<LogRecord> {
    if raw.is_empty() {
        return None;
    }

    let caps = LINE_PATTERN.captures(raw).ok().flatten()?;
    let timestamp_raw = caps.get(1)?.as_str();
    let source_app = caps.get(2)?.as_str();
    let severity = caps.get(3)?.as_str();
    let log_type = caps.get(4)?.as_str();
    let payload = caps.get(5)?.as_str();

    let timestamp = parse_timestamp(timestamp_raw).unwrap_or_else(|| {
        tracing::trace!("Unparsable timestamp '{timestamp_raw}', using ingestion time");
        Local::now()
    });

    let mut message = match Payload::decode(log_type, payload) {
        Ok(decoded) => decoded.message(),
        Err(e) => {
            tracing::trace!("Payload of type '{log_type}' not decoded: {e}");
            String::new()
        }
    };
    if message.is_empty() {
        message = payload.to_string();
    }

    let explanation = explain(&message, source_app, severity);

    Some(LogRecord {
        timestamp,
        timestamp_raw: timestamp_raw.to_string(),
        source_app: source_app.to_string(),
        severity: severity.to_string(),
        log_type: log_type.to_string(),
        message,
        explanation,
        raw_line: raw.to_string(),
    })
}

/// Parse every line of a file body, keeping file order and dropping lines
/// that do not parse
pub fn parse_content(content: &str) -> Vec<LogRecord> {
    profiling::scope!("parse_content");
    let lines: Vec<&str> = content.lines().collect();
    lines.par_iter().filter_map(|line| parse_line(line)).collect()
}

fn parse_timestamp(s: &str) -> Option<DateTime<Local>> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .ok()?
        .and_local_timezone(Local)
        .earliest()
}
