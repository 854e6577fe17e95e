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

//! Load-and-follow lifecycle for one log file.
//!
//! A [`TailMonitor`] loads a file on its background worker, watches it for
//! growth and merges newly appended lines into its [`RecordStore`]. Callers
//! never block on I/O: they read snapshots, poll [`MonitorStatus`] or wait on
//! the change channel from [`TailMonitor::subscribe`].
//!
//! Every load and every stop starts a new session. Work queued for an older
//! session is dropped when it reaches the worker, so a stopped or replaced
//! watch can never touch the store again.

use crate::config::MonitorConfig;
use crate::core::file_watch::FileWatch;
use crate::core::log_file::{find_latest_log, read_log_file};
use crate::core::record_store::{RecordStore, StoreSnapshot};
use crate::core::task_worker::{TaskWorker, TaskWorkerHandle};
use crate::core::MonitorError;
use crate::parser::record::LogRecord;
use arc_swap::ArcSwap;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tokio::sync::watch;

/// Lifecycle of a monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MonitorState {
    /// Nothing loaded, or the last load failed
    Idle,
    Loading,
    /// Loaded, but the file could not be watched
    Loaded,
    Monitoring,
    Reloading,
    Stopped,
}

impl MonitorState {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Loaded => "loaded",
            Self::Monitoring => "monitoring",
            Self::Reloading => "reloading",
            Self::Stopped => "stopped",
        }
    }
}

impl std::fmt::Display for MonitorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// What the monitor is doing and how the last operation went
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorStatus {
    pub state: MonitorState,
    /// File being loaded or followed
    pub file: Option<PathBuf>,
    /// One-line human readable summary
    pub message: String,
    /// Details of the last failure, cleared by the next success
    pub error: Option<String>,
    /// When records were last loaded or added
    pub last_update: Option<DateTime<Local>>,
}

impl Default for MonitorStatus {
    fn default() -> Self {
        Self {
            state: MonitorState::Idle,
            file: None,
            message: "No file loaded".to_string(),
            error: None,
            last_update: None,
        }
    }
}

impl MonitorStatus {
    /// True while the file is watched for growth
    pub const fn is_monitoring(&self) -> bool {
        matches!(
            self.state,
            MonitorState::Monitoring | MonitorState::Reloading
        )
    }
}

/// Worker keys. A pending load runs before a pending reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Job {
    Load,
    Reload,
}

#[derive(Debug)]
enum LoadTarget {
    MostRecent,
    File(PathBuf),
}

/// The current session: which file is live and its watch
#[derive(Debug, Default)]
struct Session {
    generation: u64,
    /// Set once a load succeeded
    path: Option<PathBuf>,
    watch: Option<FileWatch>,
}

struct Shared {
    config: MonitorConfig,
    store: RecordStore,
    status: ArcSwap<MonitorStatus>,
    /// Held by every status or store write
    session: Mutex<Session>,
    changes: watch::Sender<u64>,
}

impl Shared {
    fn lock_session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Cancel the current watch and invalidate all queued work
    fn begin_session(session: &mut Session) -> u64 {
        session.watch = None;
        session.path = None;
        session.generation += 1;
        session.generation
    }

    /// Callers hold the session lock
    fn update_status(&self, update: impl FnOnce(&mut MonitorStatus)) {
        let mut next = MonitorStatus::clone(&self.status.load());
        update(&mut next);
        self.status.store(Arc::new(next));
    }

    fn notify(&self) {
        self.changes.send_modify(|version| *version = version.wrapping_add(1));
    }

    fn run_load(self: &Arc<Self>, worker: &TaskWorkerHandle<Job>, generation: u64, target: LoadTarget) {
        profiling::scope!("TailMonitor::load");
        if self.lock_session().generation != generation {
            tracing::debug!("Skipping superseded load of {target:?}");
            return;
        }

        let path = match target {
            LoadTarget::File(path) => path,
            LoadTarget::MostRecent => {
                match find_latest_log(&self.config.log_directory, &self.config.log_suffix) {
                    Ok(path) => path,
                    Err(e) => {
                        self.fail_load(generation, None, &e);
                        return;
                    }
                }
            }
        };

        // Watch before reading so growth during the read still queues a reload
        let watch = self.start_watch(worker, generation, &path);

        match read_log_file(&path) {
            Ok(records) => self.finish_load(generation, path, records, watch),
            Err(e) => self.fail_load(generation, Some(path), &e),
        }
    }

    fn start_watch(
        self: &Arc<Self>,
        worker: &TaskWorkerHandle<Job>,
        generation: u64,
        path: &Path,
    ) -> Result<FileWatch, MonitorError> {
        let shared = Arc::downgrade(self);
        let worker = worker.clone();
        FileWatch::start(path, self.config.poll_interval(), move || {
            queue_reload(&shared, &worker, generation);
        })
    }

    fn finish_load(
        &self,
        generation: u64,
        path: PathBuf,
        records: Vec<LogRecord>,
        watch: Result<FileWatch, MonitorError>,
    ) {
        let mut session = self.lock_session();
        if session.generation != generation {
            tracing::debug!("Discarding superseded load of {}", path.display());
            return;
        }

        let stored = self.store.replace(records);
        tracing::info!("Loaded {stored} entries from {}", path.display());

        let state = match watch {
            Ok(watch) => {
                session.watch = Some(watch);
                MonitorState::Monitoring
            }
            Err(e) => {
                tracing::warn!("Live updates unavailable for {}: {e}", path.display());
                MonitorState::Loaded
            }
        };
        session.path = Some(path.clone());

        let message = format!("Loaded: {}", file_name(&path));
        self.update_status(|status| {
            status.state = state;
            status.file = Some(path);
            status.message = message;
            status.error = None;
            status.last_update = Some(Local::now());
        });
        drop(session);
        self.notify();
    }

    fn fail_load(&self, generation: u64, path: Option<PathBuf>, error: &MonitorError) {
        let session = self.lock_session();
        if session.generation != generation {
            return;
        }

        tracing::error!("Load failed: {error}");
        self.store.clear();
        self.update_status(|status| {
            status.state = MonitorState::Idle;
            status.file = path;
            status.message = error.headline().to_string();
            status.error = Some(error.to_string());
        });
        drop(session);
        self.notify();
    }

    fn run_reload(&self, generation: u64) {
        profiling::scope!("TailMonitor::reload");
        let path = {
            let session = self.lock_session();
            let Some(path) = session.path.clone() else {
                return;
            };
            if session.generation != generation {
                tracing::debug!("Skipping reload for stale session {generation}");
                return;
            }
            self.update_status(|status| {
                if status.state == MonitorState::Monitoring {
                    status.state = MonitorState::Reloading;
                }
            });
            path
        };

        let result = read_log_file(&path);

        let session = self.lock_session();
        if session.generation != generation {
            return;
        }
        let settled = if session.watch.is_some() {
            MonitorState::Monitoring
        } else {
            MonitorState::Loaded
        };

        match result {
            Ok(records) => {
                let added = self.store.merge(records);
                if added > 0 {
                    tracing::info!("Detected {added} new entries in {}", path.display());
                }
                let message = format!("Loaded: {}", file_name(&path));
                self.update_status(|status| {
                    status.state = settled;
                    status.message = message;
                    status.error = None;
                    if added > 0 {
                        status.last_update = Some(Local::now());
                    }
                });
            }
            Err(e) => {
                tracing::warn!("Reload failed, keeping watch: {e}");
                self.update_status(|status| {
                    status.state = settled;
                    status.message = e.headline().to_string();
                    status.error = Some(e.to_string());
                });
            }
        }
        drop(session);
        self.notify();
    }
}

/// Queue a reload for `generation`. Repeated requests coalesce.
fn queue_reload(shared: &Weak<Shared>, worker: &TaskWorkerHandle<Job>, generation: u64) -> bool {
    let shared = shared.clone();
    worker.submit(Job::Reload, move || {
        if let Some(shared) = shared.upgrade() {
            shared.run_reload(generation);
        }
    })
}

fn file_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}

/// Loads a MAU log file and follows it as it grows.
///
/// All file work happens on one background thread, which is the only writer
/// of the store. Dropping the monitor stops it.
pub struct TailMonitor {
    shared: Arc<Shared>,
    worker: TaskWorker<Job>,
}

impl TailMonitor {
    #[must_use]
    pub fn new(config: MonitorConfig) -> Self {
        let (changes, _) = watch::channel(0);
        Self {
            shared: Arc::new(Shared {
                config,
                store: RecordStore::new(),
                status: ArcSwap::from_pointee(MonitorStatus::default()),
                session: Mutex::new(Session::default()),
                changes,
            }),
            worker: TaskWorker::new(),
        }
    }

    /// Load the newest matching file from the configured log directory
    pub fn load_most_recent(&self) {
        self.request_load(LoadTarget::MostRecent);
    }

    /// Load `path` and follow it, replacing whatever was loaded before
    pub fn load_explicit(&self, path: impl Into<PathBuf>) {
        self.request_load(LoadTarget::File(path.into()));
    }

    fn request_load(&self, target: LoadTarget) {
        let generation = {
            let mut session = self.shared.lock_session();
            let generation = Shared::begin_session(&mut session);
            let file = match &target {
                LoadTarget::File(path) => Some(path.clone()),
                LoadTarget::MostRecent => None,
            };
            self.shared.update_status(|status| {
                status.state = MonitorState::Loading;
                status.message = file.as_deref().map_or_else(
                    || "Looking for the latest log...".to_string(),
                    |path| format!("Loading {}...", file_name(path)),
                );
                status.file = file;
                status.error = None;
            });
            generation
        };
        self.shared.notify();
        tracing::info!("Loading {target:?}");

        let shared = Arc::downgrade(&self.shared);
        let worker = self.worker.handle();
        let submitted = self.worker.handle().submit(Job::Load, move || {
            if let Some(shared) = shared.upgrade() {
                shared.run_load(&worker, generation, target);
            }
        });
        if !submitted {
            tracing::error!("Monitor worker is gone, load dropped");
        }
    }

    /// Re-read the current file and add lines not seen yet.
    ///
    /// Returns `false` when there is no loaded file to reload.
    pub fn reload(&self) -> bool {
        let generation = {
            let session = self.shared.lock_session();
            if session.path.is_none() {
                return false;
            }
            session.generation
        };
        queue_reload(&Arc::downgrade(&self.shared), &self.worker.handle(), generation)
    }

    /// Cancel the watch and any queued work. Records stay readable.
    pub fn stop_monitoring(&self) {
        {
            let mut session = self.shared.lock_session();
            if self.shared.status.load().state == MonitorState::Stopped {
                return;
            }
            Shared::begin_session(&mut session);
            self.shared.update_status(|status| {
                status.state = MonitorState::Stopped;
                status.message = "Monitoring stopped".to_string();
            });
        }
        self.shared.notify();
        tracing::info!("Monitoring stopped");
    }

    /// Current records in timestamp order
    pub fn records(&self) -> Arc<StoreSnapshot> {
        self.shared.store.snapshot()
    }

    pub fn status(&self) -> Arc<MonitorStatus> {
        self.shared.status.load_full()
    }

    pub fn state(&self) -> MonitorState {
        self.shared.status.load().state
    }

    pub fn is_monitoring(&self) -> bool {
        self.shared.status.load().is_monitoring()
    }

    pub fn last_update(&self) -> Option<DateTime<Local>> {
        self.shared.status.load().last_update
    }

    /// Receiver that changes whenever records or status are published
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.shared.changes.subscribe()
    }

    /// Block until all work queued so far has been applied
    pub fn wait_idle(&self) {
        self.worker.handle().wait_idle();
    }
}

impl Drop for TailMonitor {
    fn drop(&mut self) {
        self.stop_monitoring();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filetime::{set_file_mtime, FileTime};
    use std::fs::{self, OpenOptions};
    use std::io::Write;
    use std::time::{Duration, Instant};

    fn line(time: &str, severity: &str, text: &str) -> String {
        format!("2024-01-15 {time} [MSau04.0] <{severity}> Activity: {text}\n")
    }

    fn config_for(dir: &Path) -> MonitorConfig {
        MonitorConfig {
            log_directory: dir.to_path_buf(),
            log_suffix: ".log".to_string(),
            poll_interval_ms: 20,
        }
    }

    fn append(path: &Path, text: &str) {
        let mut file = OpenOptions::new()
            .append(true)
            .open(path)
            .expect("open for append");
        file.write_all(text.as_bytes()).expect("append");
    }

    #[test]
    fn test_load_explicit_then_monitoring() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("install.log");
        fs::write(
            &path,
            format!(
                "{}garbage\n{}",
                line("10:05:00", "Info", "second"),
                line("10:00:00", "Error", "first")
            ),
        )
        .expect("write log");

        let monitor = TailMonitor::new(config_for(dir.path()));
        monitor.load_explicit(&path);
        monitor.wait_idle();

        let records = monitor.records();
        let messages: Vec<_> = records.records().iter().map(|r| r.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second"]);

        let status = monitor.status();
        assert_eq!(status.state, MonitorState::Monitoring);
        assert_eq!(status.message, "Loaded: install.log");
        assert_eq!(status.file.as_deref(), Some(path.as_path()));
        assert!(status.error.is_none());
        assert!(monitor.is_monitoring());
        assert!(monitor.last_update().is_some());
    }

    #[test]
    fn test_reload_adds_only_new_lines() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("install.log");
        fs::write(&path, line("10:00:00", "Info", "a")).expect("write log");

        let monitor = TailMonitor::new(config_for(dir.path()));
        monitor.load_explicit(&path);
        monitor.wait_idle();
        assert_eq!(monitor.records().len(), 1);

        append(
            &path,
            &format!(
                "{}{}",
                line("10:01:00", "Warning", "b"),
                line("10:00:00", "Info", "a")
            ),
        );
        assert!(monitor.reload());
        monitor.wait_idle();
        assert_eq!(monitor.records().len(), 2);

        // Unchanged content adds nothing
        let version = monitor.records().version();
        assert!(monitor.reload());
        monitor.wait_idle();
        assert_eq!(monitor.records().version(), version);
        assert_eq!(monitor.state(), MonitorState::Monitoring);
    }

    #[test]
    fn test_partial_last_line_waits_for_newline() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("install.log");
        fs::write(
            &path,
            format!(
                "{}2024-01-15 10:01:00 [MSau04.0] <Info> Activity: Download in prog",
                line("10:00:00", "Info", "a")
            ),
        )
        .expect("write log");

        let monitor = TailMonitor::new(config_for(dir.path()));
        monitor.load_explicit(&path);
        monitor.wait_idle();
        assert_eq!(monitor.records().len(), 1);

        append(&path, "ress for MSWD2019\n");
        assert!(monitor.reload());
        monitor.wait_idle();

        let records = monitor.records();
        let messages: Vec<_> = records.records().iter().map(|r| r.message.as_str()).collect();
        assert_eq!(messages, vec!["a", "Download in progress for MSWD2019"]);
    }

    #[test]
    fn test_reload_failure_keeps_watch_and_records() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("install.log");
        fs::write(&path, line("10:00:00", "Info", "a")).expect("write log");

        let monitor = TailMonitor::new(config_for(dir.path()));
        monitor.load_explicit(&path);
        monitor.wait_idle();

        fs::remove_file(&path).expect("remove log");
        assert!(monitor.reload());
        monitor.wait_idle();

        let status = monitor.status();
        assert_eq!(status.state, MonitorState::Monitoring);
        assert_eq!(status.message, "Cannot read file");
        assert!(status.error.is_some());
        assert!(monitor.is_monitoring());
        assert_eq!(monitor.records().len(), 1);

        // The file comes back with more lines: reloading recovers
        fs::write(
            &path,
            format!(
                "{}{}",
                line("10:00:00", "Info", "a"),
                line("10:01:00", "Info", "b")
            ),
        )
        .expect("write log");
        assert!(monitor.reload());
        monitor.wait_idle();

        let status = monitor.status();
        assert_eq!(status.state, MonitorState::Monitoring);
        assert_eq!(status.message, "Loaded: install.log");
        assert!(status.error.is_none());
        assert_eq!(monitor.records().len(), 2);
    }

    #[test]
    fn test_unwatchable_file_degrades_to_loaded() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("install.log");
        fs::write(&path, line("10:00:00", "Info", "a")).expect("write log");

        let monitor = TailMonitor::new(config_for(dir.path()));
        let generation = Shared::begin_session(&mut monitor.shared.lock_session());
        let records = read_log_file(&path).expect("read log");
        let watch = Err(MonitorError::Watch(notify::Error::generic(
            "too many watched files",
        )));
        monitor
            .shared
            .finish_load(generation, path.clone(), records, watch);

        let status = monitor.status();
        assert_eq!(status.state, MonitorState::Loaded);
        assert_eq!(status.message, "Loaded: install.log");
        assert!(status.error.is_none());
        assert!(!monitor.is_monitoring());
        assert_eq!(monitor.records().len(), 1);

        // Manual reloads still work without a watch
        append(&path, &line("10:01:00", "Info", "b"));
        assert!(monitor.reload());
        monitor.wait_idle();
        assert_eq!(monitor.records().len(), 2);
        assert_eq!(monitor.state(), MonitorState::Loaded);
    }

    #[test]
    fn test_missing_file_fails_load() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let monitor = TailMonitor::new(config_for(dir.path()));
        monitor.load_explicit(dir.path().join("missing.log"));
        monitor.wait_idle();

        let status = monitor.status();
        assert_eq!(status.state, MonitorState::Idle);
        assert_eq!(status.message, "Cannot read file");
        assert!(status.error.is_some());
        assert!(monitor.records().is_empty());
        assert!(!monitor.is_monitoring());
        assert!(!monitor.reload());
    }

    #[test]
    fn test_failed_load_clears_previous_records() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("install.log");
        fs::write(&path, line("10:00:00", "Info", "a")).expect("write log");

        let monitor = TailMonitor::new(config_for(dir.path()));
        monitor.load_explicit(&path);
        monitor.wait_idle();
        assert_eq!(monitor.records().len(), 1);

        monitor.load_explicit(dir.path().join("missing.log"));
        monitor.wait_idle();
        assert!(monitor.records().is_empty());
        assert_eq!(monitor.state(), MonitorState::Idle);
    }

    #[test]
    fn test_stop_is_idempotent_and_final() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("install.log");
        fs::write(&path, line("10:00:00", "Info", "a")).expect("write log");

        let monitor = TailMonitor::new(config_for(dir.path()));
        monitor.load_explicit(&path);
        monitor.wait_idle();

        let mut changes = monitor.subscribe();
        monitor.stop_monitoring();
        monitor.stop_monitoring();
        assert_eq!(monitor.state(), MonitorState::Stopped);
        assert!(!monitor.is_monitoring());
        assert!(changes.has_changed().expect("sender alive"));
        let _ = changes.borrow_and_update();

        // Growth after the stop is never applied
        append(&path, &line("10:01:00", "Info", "b"));
        assert!(!monitor.reload());
        std::thread::sleep(Duration::from_millis(100));
        monitor.wait_idle();
        assert_eq!(monitor.records().len(), 1);
        assert!(!changes.has_changed().expect("sender alive"));
    }

    #[test]
    fn test_stop_before_anything_loaded() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let monitor = TailMonitor::new(config_for(dir.path()));
        monitor.stop_monitoring();
        assert_eq!(monitor.state(), MonitorState::Stopped);
        assert!(monitor.records().is_empty());
    }

    #[test]
    fn test_switching_files_replaces_records() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let first = dir.path().join("first.log");
        let second = dir.path().join("second.log");
        fs::write(&first, line("10:00:00", "Info", "from first")).expect("write log");
        fs::write(
            &second,
            format!(
                "{}{}",
                line("11:00:00", "Info", "from second"),
                line("11:00:01", "Error", "also second")
            ),
        )
        .expect("write log");

        let monitor = TailMonitor::new(config_for(dir.path()));
        monitor.load_explicit(&first);
        monitor.load_explicit(&second);
        monitor.wait_idle();

        let records = monitor.records();
        assert_eq!(records.len(), 2);
        assert!(records.records().iter().all(|r| r.message.contains("second")));
        assert_eq!(
            monitor.status().file.as_deref(),
            Some(second.as_path())
        );
    }

    #[test]
    fn test_load_most_recent() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let old = dir.path().join("old.log");
        let new = dir.path().join("new.log");
        fs::write(&old, line("09:00:00", "Info", "old")).expect("write log");
        fs::write(&new, line("10:00:00", "Info", "new")).expect("write log");
        set_file_mtime(&old, FileTime::from_unix_time(1_000, 0)).expect("set mtime");
        set_file_mtime(&new, FileTime::from_unix_time(2_000, 0)).expect("set mtime");

        let monitor = TailMonitor::new(config_for(dir.path()));
        monitor.load_most_recent();
        monitor.wait_idle();

        assert_eq!(monitor.status().message, "Loaded: new.log");
        assert_eq!(monitor.records().records()[0].message, "new");
    }

    #[test]
    fn test_load_most_recent_without_logs() {
        let dir = tempfile::tempdir().expect("create temp dir");
        fs::write(dir.path().join("notes.txt"), "").expect("write file");

        let monitor = TailMonitor::new(config_for(dir.path()));
        monitor.load_most_recent();
        monitor.wait_idle();

        let status = monitor.status();
        assert_eq!(status.state, MonitorState::Idle);
        assert_eq!(status.message, "No log files found");
        assert!(status.file.is_none());
    }

    #[test]
    fn test_watch_picks_up_appended_lines() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("install.log");
        fs::write(&path, line("10:00:00", "Info", "a")).expect("write log");
        set_file_mtime(&path, FileTime::from_unix_time(1_000, 0)).expect("set mtime");

        let monitor = TailMonitor::new(config_for(dir.path()));
        monitor.load_explicit(&path);
        monitor.wait_idle();
        assert!(monitor.is_monitoring());

        append(&path, &line("10:01:00", "Error", "b"));
        set_file_mtime(&path, FileTime::from_unix_time(2_000, 0)).expect("set mtime");

        let deadline = Instant::now() + Duration::from_secs(5);
        while monitor.records().len() < 2 && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(20));
        }
        assert_eq!(monitor.records().len(), 2);
    }

    #[test]
    fn test_subscribe_sees_load() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("install.log");
        fs::write(&path, line("10:00:00", "Info", "a")).expect("write log");

        let monitor = TailMonitor::new(config_for(dir.path()));
        let mut changes = monitor.subscribe();
        let _ = changes.borrow_and_update();

        monitor.load_explicit(&path);
        monitor.wait_idle();
        assert!(changes.has_changed().expect("sender alive"));
    }
}
