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

//! Record filtering by level, application and free text.

use crate::apps::AppTag;
use crate::parser::record::LogRecord;
use rayon::prelude::*;

/// Which severities pass the filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LevelFilter {
    #[default]
    All,
    Errors,
    Warnings,
    /// Neither error nor warning
    Info,
}

impl LevelFilter {
    pub fn matches(self, record: &LogRecord) -> bool {
        match self {
            Self::All => true,
            Self::Errors => record.is_error(),
            Self::Warnings => record.is_warning(),
            Self::Info => !record.is_error() && !record.is_warning(),
        }
    }
}

/// Conjunction of a level, an optional application and a search text.
///
/// The search is case-insensitive and looks at the message and the raw
/// source application token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    level: LevelFilter,
    app: Option<AppTag>,
    /// Lower-cased; empty matches everything
    needle: String,
}

impl RecordFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    #[must_use]
    pub const fn with_app(mut self, app: Option<AppTag>) -> Self {
        self.app = app;
        self
    }

    #[must_use]
    pub fn with_search(mut self, text: &str) -> Self {
        self.needle = text.trim().to_lowercase();
        self
    }

    pub const fn level(&self) -> LevelFilter {
        self.level
    }

    pub const fn app(&self) -> Option<AppTag> {
        self.app
    }

    /// True if every record passes
    pub fn is_empty(&self) -> bool {
        self.level == LevelFilter::All && self.app.is_none() && self.needle.is_empty()
    }

    pub fn matches(&self, record: &LogRecord) -> bool {
        if !self.level.matches(record) {
            return false;
        }
        if self.app.is_some_and(|app| record.classified_app() != app) {
            return false;
        }
        self.needle.is_empty()
            || record.message.to_lowercase().contains(&self.needle)
            || record.source_app.to_lowercase().contains(&self.needle)
    }

    /// Matching records, in their original order
    pub fn apply<'a>(&self, records: &'a [LogRecord]) -> Vec<&'a LogRecord> {
        profiling::scope!("RecordFilter::apply");
        if self.is_empty() {
            return records.iter().collect();
        }
        records.par_iter().filter(|record| self.matches(record)).collect()
    }
}
