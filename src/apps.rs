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

//! Application identifier classification.
//!
//! MAU refers to every managed application by a short identifier such as
//! `MSWD2019` or `TEAMS21`. Identifiers show up in the bracketed source
//! token, inside payloads and in free text, always with varying case and
//! surrounding noise, so classification is a case-insensitive substring
//! lookup against an ordered table.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A known application, or [`AppTag::Other`] for anything unrecognized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AppTag {
    Teams,
    Outlook,
    OneDrive,
    CompanyPortal,
    Word,
    Excel,
    PowerPoint,
    OneNote,
    Copilot,
    Defender,
    QuickAssist,
    RemoteHelp,
    Skype,
    WindowsApp,
    Mau,
    Other,
}

/// Identifier substrings, lower-case, in match order. First hit wins.
///
/// Entries for the same tag must stay adjacent: `classify_record` relies on
/// it to give the same answer as checking tag by tag.
const APP_TABLE: &[(&str, AppTag)] = &[
    ("teams21", AppTag::Teams),
    ("teams10", AppTag::Teams),
    ("opim2019", AppTag::Outlook),
    ("ondr18", AppTag::OneDrive),
    ("imcp01", AppTag::CompanyPortal),
    ("mswd2019", AppTag::Word),
    ("xcel2019", AppTag::Excel),
    ("ppt32019", AppTag::PowerPoint),
    ("onmc2019", AppTag::OneNote),
    ("mscp10", AppTag::Copilot),
    ("wdavconsumer", AppTag::Defender),
    ("wdav00", AppTag::Defender),
    ("wdavshim", AppTag::Defender),
    ("msqa01", AppTag::QuickAssist),
    ("msrh01", AppTag::RemoteHelp),
    ("msfb16", AppTag::Skype),
    ("msrd10", AppTag::WindowsApp),
    ("msau04", AppTag::Mau),
];

impl AppTag {
    /// All tags in table order, `Other` last
    pub const ALL: [Self; 16] = [
        Self::Teams,
        Self::Outlook,
        Self::OneDrive,
        Self::CompanyPortal,
        Self::Word,
        Self::Excel,
        Self::PowerPoint,
        Self::OneNote,
        Self::Copilot,
        Self::Defender,
        Self::QuickAssist,
        Self::RemoteHelp,
        Self::Skype,
        Self::WindowsApp,
        Self::Mau,
        Self::Other,
    ];

    /// Human readable application name
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Teams => "Teams",
            Self::Outlook => "Outlook",
            Self::OneDrive => "OneDrive",
            Self::CompanyPortal => "Company Portal",
            Self::Word => "Word",
            Self::Excel => "Excel",
            Self::PowerPoint => "PowerPoint",
            Self::OneNote => "OneNote",
            Self::Copilot => "Microsoft Copilot",
            Self::Defender => "Microsoft Defender",
            Self::QuickAssist => "Quick Assist",
            Self::RemoteHelp => "Remote Help",
            Self::Skype => "Skype for Business",
            Self::WindowsApp => "Windows App",
            Self::Mau => "MAU",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for AppTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Error returned when a string names no known [`AppTag`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown application '{0}'")]
pub struct UnknownAppTag(String);

impl FromStr for AppTag {
    type Err = UnknownAppTag;

    /// Accepts the display name or the variant name, ignoring case and spaces
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();
        Self::ALL
            .into_iter()
            .find(|tag| {
                let display: String = tag
                    .display_name()
                    .chars()
                    .filter(|c| !c.is_whitespace())
                    .collect::<String>()
                    .to_lowercase();
                display == wanted || format!("{tag:?}").to_lowercase() == wanted
            })
            .ok_or_else(|| UnknownAppTag(s.to_string()))
    }
}

/// Classify an identifier (or any text containing one)
pub fn classify(identifier: &str) -> AppTag {
    let lower = identifier.to_lowercase();
    APP_TABLE
        .iter()
        .find(|(needle, _)| lower.contains(needle))
        .map_or(AppTag::Other, |&(_, tag)| tag)
}

/// Classify a record from its decoded message and its source token.
///
/// Each table entry is tried against both strings before moving on, so an
/// earlier entry found in the source token beats a later one in the message.
pub fn classify_record(message: &str, source_app: &str) -> AppTag {
    let message = message.to_lowercase();
    let source_app = source_app.to_lowercase();
    APP_TABLE
        .iter()
        .find(|(needle, _)| message.contains(needle) || source_app.contains(needle))
        .map_or(AppTag::Other, |&(_, tag)| tag)
}

/// Name used in explanations: the known application name, or the identifier
/// itself when it is not in the table
pub fn display_name_for(identifier: &str) -> String {
    match classify(identifier) {
        AppTag::Other => identifier.to_string(),
        tag => tag.display_name().to_string(),
    }
}
