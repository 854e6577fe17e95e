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

use std::path::PathBuf;

/// Failures while locating, reading or watching a log file.
///
/// None of these are fatal: the monitor turns them into a status string and
/// accepts the next load request.
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    #[error("log folder not found: {}", .0.display())]
    LogDirectoryMissing(PathBuf),

    #[error("no '*{suffix}' log files found in {}", .directory.display())]
    NoLogFiles { directory: PathBuf, suffix: String },

    #[error("cannot read log folder {}: {source}", .path.display())]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read file {}: {source}", .path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot watch file: {0}")]
    Watch(#[from] notify::Error),
}

impl MonitorError {
    /// Short headline for status displays; `Display` carries the details.
    pub const fn headline(&self) -> &'static str {
        match self {
            Self::LogDirectoryMissing(_) => "Log folder not found",
            Self::NoLogFiles { .. } => "No log files found",
            Self::ReadDirectory { .. } => "Cannot read log folder",
            Self::ReadFile { .. } => "Cannot read file",
            Self::Watch(_) => "Cannot watch file",
        }
    }
}
