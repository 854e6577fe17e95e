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

//! Ordered, deduplicated record storage.
//!
//! Readers take an immutable [`StoreSnapshot`]; writers build the next
//! snapshot and swap it in. Writers are serialized by the lock around the
//! set of known lines.

use crate::parser::record::LogRecord;
use arc_swap::ArcSwap;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Immutable view of the store at one point in time
#[derive(Debug, Default)]
pub struct StoreSnapshot {
    records: Vec<LogRecord>,
    version: u64,
}

impl StoreSnapshot {
    /// Records in ascending timestamp order
    pub fn records(&self) -> &[LogRecord] {
        &self.records
    }

    /// Bumped on every change
    pub const fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Records of one log file, sorted by timestamp, unique by `raw_line`
#[derive(Debug, Default)]
pub struct RecordStore {
    current: ArcSwap<StoreSnapshot>,
    /// Every `raw_line` in `current`. Held for the whole of each write.
    known_lines: Mutex<HashSet<String>>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Arc<StoreSnapshot> {
        self.current.load_full()
    }

    pub fn version(&self) -> u64 {
        self.current.load().version
    }

    pub fn len(&self) -> usize {
        self.current.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.load().is_empty()
    }

    fn lock_known(&self) -> MutexGuard<'_, HashSet<String>> {
        self.known_lines.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the whole content. Repeated lines are kept once.
    ///
    /// Returns the number of records stored.
    pub fn replace(&self, records: Vec<LogRecord>) -> usize {
        profiling::scope!("RecordStore::replace");
        let mut known = self.lock_known();
        known.clear();

        let mut records: Vec<LogRecord> = records
            .into_iter()
            .filter(|record| known.insert(record.raw_line.clone()))
            .collect();
        records.sort_by_key(|record| record.timestamp);

        let stored = records.len();
        self.publish(records);
        stored
    }

    /// Add the records whose `raw_line` is not stored yet.
    ///
    /// Merging the same batch twice is a no-op. Returns the number of
    /// records added.
    pub fn merge(&self, records: Vec<LogRecord>) -> usize {
        profiling::scope!("RecordStore::merge");
        let mut known = self.lock_known();

        let mut fresh: Vec<LogRecord> = records
            .into_iter()
            .filter(|record| known.insert(record.raw_line.clone()))
            .collect();
        if fresh.is_empty() {
            return 0;
        }
        fresh.sort_by_key(|record| record.timestamp);

        let added = fresh.len();
        let existing = self.current.load();
        let merged = merge_sorted(existing.records(), fresh);
        self.publish(merged);
        added
    }

    /// Drop all records
    pub fn clear(&self) {
        let mut known = self.lock_known();
        known.clear();
        self.publish(Vec::new());
    }

    fn publish(&self, records: Vec<LogRecord>) {
        let version = self.current.load().version + 1;
        self.current.store(Arc::new(StoreSnapshot { records, version }));
    }
}

/// Merge two timestamp-sorted runs. On equal timestamps `existing` comes
/// first, so older lines keep their place ahead of newly appended ones.
fn merge_sorted(existing: &[LogRecord], fresh: Vec<LogRecord>) -> Vec<LogRecord> {
    profiling::scope!("merge_sorted");
    let mut merged = Vec::with_capacity(existing.len() + fresh.len());
    let mut old = existing.iter().peekable();
    let mut new = fresh.into_iter().peekable();

    while let (Some(o), Some(n)) = (old.peek(), new.peek()) {
        if o.timestamp <= n.timestamp {
            merged.extend(old.next().cloned());
        } else {
            merged.extend(new.next());
        }
    }
    merged.extend(old.cloned());
    merged.extend(new);
    merged
}
