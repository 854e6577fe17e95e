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

//! File growth notifications.
//!
//! A [`FileWatch`] polls one file and calls back whenever it was written.
//! Dropping the watch cancels it. What happens on a change is up to the
//! callback; the monitor uses it to queue a reload.

use crate::core::MonitorError;
use notify::{Event, EventKind, PollWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Active watch on a single file. Cancelled on drop.
pub struct FileWatch {
    _watcher: PollWatcher,
    path: PathBuf,
}

impl std::fmt::Debug for FileWatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWatch").field("path", &self.path).finish()
    }
}

impl FileWatch {
    /// Start polling `path` every `poll_interval`, calling `on_change` from
    /// the watcher thread each time the file is written or recreated.
    pub fn start<F>(path: &Path, poll_interval: Duration, on_change: F) -> Result<Self, MonitorError>
    where
        F: Fn() + Send + 'static,
    {
        let config = notify::Config::default().with_poll_interval(poll_interval);

        let mut watcher = PollWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if is_growth(&event.kind) => on_change(),
                Ok(event) => tracing::trace!("Ignoring file event {:?}", event.kind),
                Err(e) => tracing::warn!("File watch error: {e}"),
            },
            config,
        )?;
        watcher.watch(path, RecursiveMode::NonRecursive)?;

        tracing::debug!(
            "Watching {} every {}ms",
            path.display(),
            poll_interval.as_millis()
        );
        Ok(Self {
            _watcher: watcher,
            path: path.to_path_buf(),
        })
    }
}

impl Drop for FileWatch {
    fn drop(&mut self) {
        tracing::debug!("Stopped watching {}", self.path.display());
    }
}

/// Writes and re-creations; removals and access events are not growth
const fn is_growth(kind: &EventKind) -> bool {
    matches!(kind, EventKind::Modify(_) | EventKind::Create(_))
}
