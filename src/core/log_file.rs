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

//! Reading log files from disk and locating the newest one.

use crate::core::MonitorError;
use crate::parser::{parse_content, record::LogRecord};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Instant, SystemTime};

/// Read a log file and parse every complete line of it.
///
/// Bytes that are not valid UTF-8 are replaced rather than failing the read.
/// Text after the last newline is a line still being written and is left
/// for the next read.
pub fn read_log_file(path: &Path) -> Result<Vec<LogRecord>, MonitorError> {
    let start_time = Instant::now();

    let buffer = fs::read(path).map_err(|source| MonitorError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(
        "File I/O took {:?} to read {} bytes from {}",
        start_time.elapsed(),
        buffer.len(),
        path.display()
    );

    let content = String::from_utf8_lossy(&buffer);
    let complete = complete_lines(&content);
    if complete.len() < content.len() {
        tracing::trace!(
            "Holding back {} bytes of unterminated line in {}",
            content.len() - complete.len(),
            path.display()
        );
    }

    let parse_start = Instant::now();
    let records = parse_content(complete);
    tracing::debug!(
        "Parsing took {:?} for {} records from {}",
        parse_start.elapsed(),
        records.len(),
        path.display()
    );

    Ok(records)
}

/// `content` up to and including its last newline
fn complete_lines(content: &str) -> &str {
    content.rfind('\n').map_or("", |end| &content[..=end])
}

/// Find the most recently modified file in `directory` whose name ends with
/// `suffix`.
///
/// Files with the same modification time are ordered by name, and the
/// greatest name wins, so the choice does not depend on directory order.
pub fn find_latest_log(directory: &Path, suffix: &str) -> Result<PathBuf, MonitorError> {
    if !directory.is_dir() {
        return Err(MonitorError::LogDirectoryMissing(directory.to_path_buf()));
    }

    let entries = fs::read_dir(directory).map_err(|source| MonitorError::ReadDirectory {
        path: directory.to_path_buf(),
        source,
    })?;

    let mut latest: Option<(SystemTime, PathBuf)> = None;
    for entry in entries.flatten() {
        let path = entry.path();
        let matches_suffix = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.ends_with(suffix));
        if !matches_suffix {
            continue;
        }

        let Ok(metadata) = entry.metadata() else {
            tracing::debug!("Skipping {}: metadata unavailable", path.display());
            continue;
        };
        if !metadata.is_file() {
            continue;
        }
        let Ok(modified) = metadata.modified() else {
            continue;
        };

        let candidate = (modified, path);
        if latest.as_ref().is_none_or(|best| candidate > *best) {
            latest = Some(candidate);
        }
    }

    latest
        .map(|(_, path)| path)
        .ok_or_else(|| MonitorError::NoLogFiles {
            directory: directory.to_path_buf(),
            suffix: suffix.to_string(),
        })
}
