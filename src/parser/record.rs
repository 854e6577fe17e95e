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

use crate::apps::{classify_record, AppTag};
use chrono::{DateTime, Local};
use serde::Serialize;

/// One parsed log line.
///
/// Records are never mutated after parsing; newer data arrives as new records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogRecord {
    /// Parsed time, or the ingestion time when the source string did not parse
    pub timestamp: DateTime<Local>,
    /// Timestamp exactly as written in the line
    pub timestamp_raw: String,
    /// Bracketed application token, e.g. `MSau04.0`
    pub source_app: String,
    /// Angle-bracketed level token as written, e.g. `Error`
    pub severity: String,
    /// Tag in front of the payload, decides how the payload is decoded
    pub log_type: String,
    /// Flattened payload, never empty
    pub message: String,
    /// Plain-language reading of `message`
    pub explanation: String,
    /// The complete source line. Unique within a store.
    pub raw_line: String,
}

impl LogRecord {
    /// Lower-cased severity contains an `e`, or is exactly `error`.
    ///
    /// This matches "Error" but also "Debug", "Verbose" or "Trace". The rule
    /// is kept as MAU log readers have always applied it.
    pub fn is_error(&self) -> bool {
        let level = self.severity.to_lowercase();
        level.contains('e') || level == "error"
    }

    pub fn is_warning(&self) -> bool {
        self.severity.to_lowercase().contains("warning")
    }

    /// Application this record belongs to, from its message and source token
    pub fn classified_app(&self) -> AppTag {
        classify_record(&self.message, &self.source_app)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(severity: &str, source_app: &str, message: &str) -> LogRecord {
        LogRecord {
            timestamp: Local::now(),
            timestamp_raw: "2024-01-15 10:30:00".to_string(),
            source_app: source_app.to_string(),
            severity: severity.to_string(),
            log_type: "Test".to_string(),
            message: message.to_string(),
            explanation: message.to_string(),
            raw_line: format!("{severity} {source_app} {message}"),
        }
    }

    #[test]
    fn test_is_error_broad_rule() {
        assert!(record("Error", "X", "m").is_error());
        assert!(record("ERROR", "X", "m").is_error());
        assert!(record("Debug", "X", "m").is_error());
        assert!(!record("Info", "X", "m").is_error());
        assert!(!record("Warning", "X", "m").is_error());
    }

    #[test]
    fn test_is_warning() {
        assert!(record("Warning", "X", "m").is_warning());
        assert!(record("WARNING", "X", "m").is_warning());
        assert!(!record("Warn", "X", "m").is_warning());
        assert!(!record("Error", "X", "m").is_warning());
    }

    #[test]
    fn test_classified_app_uses_message_and_source() {
        assert_eq!(record("Info", "MSau04.0", "hello").classified_app(), AppTag::Mau);
        assert_eq!(
            record("Info", "Daemon", "Fetching XCEL2019 package").classified_app(),
            AppTag::Excel
        );
        assert_eq!(record("Info", "Daemon", "hello").classified_app(), AppTag::Other);
    }

    #[test]
    fn test_serializes_every_field() {
        let value = serde_json::to_value(record("Error", "MSau04.0", "boom")).expect("serialize");
        assert_eq!(value["timestamp_raw"], "2024-01-15 10:30:00");
        assert_eq!(value["source_app"], "MSau04.0");
        assert_eq!(value["severity"], "Error");
        assert_eq!(value["message"], "boom");
        assert_eq!(value["raw_line"], "Error MSau04.0 boom");
        assert!(value["timestamp"].is_string());
    }
}
