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

//! Reader for Microsoft AutoUpdate logs.
//!
//! [`core::TailMonitor`] loads a log file and follows it as it grows,
//! [`parser`] turns lines into [`parser::record::LogRecord`]s, [`explain`]
//! adds a plain-language reading of each message and [`analytics`]
//! summarizes a set of records.

pub mod analytics;
pub mod apps;
pub mod config;
pub mod core;
pub mod explain;
pub mod parser;
