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

//! Log ingestion engine: reading, storing, filtering and following files.

pub mod error;
pub mod file_watch;
pub mod filter;
pub mod log_file;
pub mod record_store;
pub mod tail_monitor;
pub mod task_worker;

pub use error::MonitorError;
pub use filter::{LevelFilter, RecordFilter};
pub use record_store::{RecordStore, StoreSnapshot};
pub use tail_monitor::{MonitorState, MonitorStatus, TailMonitor};
