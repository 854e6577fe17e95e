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

//! Payload decoding.
//!
//! The text after `LOG_TYPE:` is JSON whose shape is decided by the log type
//! tag alone. Two tags have a fixed shape; everything else is treated as a
//! flat key/value object.

use serde::Deserialize;
use serde_json::{Map, Value};

const NOT_COLLECTED_TAG: &str = "NOT.COLLECTED";
const ERRORS_AND_WARNINGS_TAG: &str = "ErrorsAndWarnings";

/// Separator between flattened payload parts
pub const PART_SEPARATOR: &str = " | ";

#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error("payload is not valid JSON for its log type: {0}")]
    Json(#[from] serde_json::Error),

    #[error("payload is JSON but not an object")]
    NotAnObject,
}

/// `{"Payload": "..."}` as written for `NOT.COLLECTED` types
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CollectedText {
    #[serde(rename = "Payload")]
    pub payload: Option<String>,
}

/// Error report written under `ErrorsAndWarnings` types
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ErrorReport {
    pub error: Option<String>,
    pub operation: Option<String>,
    #[serde(rename = "AppID")]
    pub app_id: Option<String>,
    #[serde(rename = "UpdateID")]
    pub update_id: Option<String>,
    pub error_code: Option<String>,
}

/// A decoded payload
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    NotCollected(CollectedText),
    ErrorsAndWarnings(ErrorReport),
    /// Any other log type, keys in source order
    Fields(Map<String, Value>),
}

impl Payload {
    /// Decode `raw` according to `log_type`
    pub fn decode(log_type: &str, raw: &str) -> Result<Self, PayloadError> {
        if log_type.contains(NOT_COLLECTED_TAG) {
            Ok(Self::NotCollected(serde_json::from_str(raw)?))
        } else if log_type.contains(ERRORS_AND_WARNINGS_TAG) {
            Ok(Self::ErrorsAndWarnings(serde_json::from_str(raw)?))
        } else {
            match serde_json::from_str::<Value>(raw)? {
                Value::Object(fields) => Ok(Self::Fields(fields)),
                Value::Null
                | Value::Bool(_)
                | Value::Number(_)
                | Value::String(_)
                | Value::Array(_) => Err(PayloadError::NotAnObject),
            }
        }
    }

    /// Flatten into a single display line. May be empty.
    pub fn message(&self) -> String {
        match self {
            Self::NotCollected(text) => text.payload.clone().unwrap_or_default(),
            Self::ErrorsAndWarnings(report) => {
                let mut parts = Vec::with_capacity(4);
                if let Some(error) = &report.error {
                    parts.push(error.clone());
                }
                if let Some(operation) = &report.operation {
                    parts.push(format!("[{operation}]"));
                }
                if let Some(app_id) = &report.app_id {
                    parts.push(format!("App: {app_id}"));
                }
                if let Some(code) = &report.error_code {
                    parts.push(format!("Code: {code}"));
                }
                parts.join(PART_SEPARATOR)
            }
            Self::Fields(fields) => fields
                .iter()
                .map(|(key, value)| {
                    format!("{}: {}", title_case(&key.replace('_', " ")), value_text(value))
                })
                .collect::<Vec<_>>()
                .join(PART_SEPARATOR),
        }
    }
}

/// Strings without quotes, everything else as compact JSON
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Upper-case the first letter of every word and lower-case the rest
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if c.is_alphanumeric() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}
