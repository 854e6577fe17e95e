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

//! Built-in explanation rules for MAU messages.
//!
//! Triggers are plain substrings of the lower-cased message. Once a trigger
//! matches, regexes pull out identifiers, versions and dates for the
//! template; a rule that triggers but cannot extract its values still
//! answers with a less specific sentence.

use super::{ExplanationRule, MessageContext};
use crate::apps::display_name_for;
use fancy_regex::Regex;
use std::sync::LazyLock;

// AppId: MSWD2019 = { (( "16.78.1"
static BASE_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)AppId:\s*(\w+)\s*=\s*\{\s*\(\(\s*"([^"]+)"#).expect("valid regex literal")
});

// { XCEL2019 = ...
static SCHEDULED_APP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\s*(\w+)\s*=").expect("valid regex literal"));

// Each `ID = {` entry in an app state dump
static APP_STATE_ENTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\w+)\s*=\s*\{").expect("valid regex literal"));

// App: MSWD2019 to: 4
static STATE_TRANSITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)App:\s*(\w+)\s*to:\s*(\d+)").expect("valid regex literal")
});

// Quoted values of `key = "value"` or `"key": "value"`
static APP_ID_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)"?AppID"?\s*[:=]\s*"([^",}]+)""#).expect("valid regex literal")
});
static FORCED_UPDATE_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)"?ForcedUpdateDate"?\s*[:=]\s*"([^",}]+)""#).expect("valid regex literal")
});

pub const DOWNLOAD_ATTEMPT: &str =
    "MAU is attempting to download a file from their servers as part of the update process.";
pub const DOWNLOAD_SUCCESS: &str =
    "MAU successfully downloaded an update file. The process is progressing normally.";
pub const DOWNLOAD_FAILED: &str = "MAU failed to download a required file. This could be due to \
     network issues or server problems.";
pub const DOWNLOAD_PROGRESS: &str = "MAU is currently downloading an update.";
pub const INSTALL_SUCCESS: &str =
    "MAU successfully installed an update. The application is now up to date.";
pub const INSTALL_FAILED: &str = "MAU failed to install an update. This could be due to \
     permission issues or file conflicts.";
pub const INSTALL_PROGRESS: &str =
    "MAU is currently installing an update. Please do not close the application.";

/// The built-in rules, in matching order
pub fn default_rules() -> Vec<Box<dyn ExplanationRule>> {
    vec![
        Box::new(BaseVersionsRule),
        Box::new(ForcedUpdateScheduleRule),
        Box::new(CloningTaskRule),
        Box::new(AppStatesRule),
        Box::new(StateTransitionRule),
        Box::new(DownloadRule),
        Box::new(InstallRule),
    ]
}

/// First capture group of `regex` in `text`, trimmed
fn capture(regex: &Regex, text: &str, group: usize) -> Option<String> {
    regex
        .captures(text)
        .ok()
        .flatten()
        .and_then(|caps| caps.get(group))
        .map(|m| m.as_str().trim().to_string())
}

/// Installed version announcements
pub struct BaseVersionsRule;

impl ExplanationRule for BaseVersionsRule {
    fn name(&self) -> &'static str {
        "base-versions"
    }

    fn explain(&self, ctx: &MessageContext<'_>) -> Option<String> {
        if !ctx.lower.contains("update baseversions found") {
            return None;
        }
        let found = BASE_VERSION.captures(ctx.message).ok().flatten().and_then(|caps| {
            Some((caps.get(1)?.as_str().to_string(), caps.get(2)?.as_str().to_string()))
        });
        Some(match found {
            Some((app_id, version)) => format!(
                "MAU has identified that {} (version {version}) is installed. This is a step \
                 in checking for updates.",
                display_name_for(&app_id)
            ),
            None => "MAU is checking the version of an installed application to see if an \
                     update is available."
                .to_string(),
        })
    }
}

/// Forced (deadline) update announcements
pub struct ForcedUpdateScheduleRule;

impl ExplanationRule for ForcedUpdateScheduleRule {
    fn name(&self) -> &'static str {
        "forced-update-schedule"
    }

    fn explain(&self, ctx: &MessageContext<'_>) -> Option<String> {
        if !ctx.lower.contains("application forced update schedule") {
            return None;
        }
        let Some(app_id) = capture(&SCHEDULED_APP, ctx.message, 1) else {
            return Some(
                "MAU is planning to force updates for an Office application to ensure all \
                 users have the latest security patches and features."
                    .to_string(),
            );
        };
        let app = display_name_for(&app_id);
        Some(match capture(&FORCED_UPDATE_DATE, ctx.message, 1) {
            Some(date) => format!("A mandatory update for {app} has been scheduled by MAU for {date}."),
            None => format!("A mandatory update for {app} has been scheduled by MAU."),
        })
    }
}

/// Update file preparation (begin, success, failure)
pub struct CloningTaskRule;

impl ExplanationRule for CloningTaskRule {
    fn name(&self) -> &'static str {
        "cloning-task"
    }

    fn explain(&self, ctx: &MessageContext<'_>) -> Option<String> {
        if !ctx.lower.contains("cloningtask") {
            return None;
        }
        if let Some(app_id) = capture(&APP_ID_VALUE, ctx.message, 1) {
            let app = display_name_for(&app_id);
            if ctx.lower.contains("begin") {
                return Some(format!("Starting to prepare update files for {app}."));
            }
            if ctx.lower.contains("appnamechanged") {
                return Some(if ctx.message.contains("Success: YES") {
                    format!("Successfully prepared update files for {app}.")
                } else {
                    format!("Failed to prepare update files for {app}.")
                });
            }
        }
        Some("MAU is preparing update files for an application.".to_string())
    }
}

/// Status dumps listing every registered application.
///
/// Known ids are shown by display name, unknown ids as written (not as
/// "Other").
pub struct AppStatesRule;

impl ExplanationRule for AppStatesRule {
    fn name(&self) -> &'static str {
        "app-states"
    }

    fn explain(&self, ctx: &MessageContext<'_>) -> Option<String> {
        if !ctx
            .lower
            .contains("calling remoteobjectproxy with current app states")
        {
            return None;
        }
        let names: Vec<String> = APP_STATE_ENTRY
            .captures_iter(ctx.message)
            .filter_map(Result::ok)
            .filter_map(|caps| caps.get(1).map(|m| display_name_for(m.as_str())))
            .collect();
        Some(if names.is_empty() {
            "MAU is checking the status of currently installed applications.".to_string()
        } else {
            format!(
                "MAU is checking the current status of installed applications, including: {}.",
                names.join(", ")
            )
        })
    }
}

/// Update state machine transitions
pub struct StateTransitionRule;

impl ExplanationRule for StateTransitionRule {
    fn name(&self) -> &'static str {
        "state-transition"
    }

    fn explain(&self, ctx: &MessageContext<'_>) -> Option<String> {
        if !ctx.lower.contains("updating application state for app") {
            return None;
        }
        let transition = STATE_TRANSITION
            .captures(ctx.message)
            .ok()
            .flatten()
            .and_then(|caps| Some((caps.get(1)?.as_str().to_string(), caps.get(2)?.as_str().to_string())));
        Some(match transition {
            Some((app_id, state)) => format!(
                "The update process for {} has moved to a new state (State: {state}).",
                display_name_for(&app_id)
            ),
            None => "The update process for an application has moved to a new state.".to_string(),
        })
    }
}

/// Download outcomes. Messages about downloads with no recognizable
/// outcome are left to later rules.
pub struct DownloadRule;

impl ExplanationRule for DownloadRule {
    fn name(&self) -> &'static str {
        "download"
    }

    fn explain(&self, ctx: &MessageContext<'_>) -> Option<String> {
        let lower = ctx.lower;
        if !(lower.contains("fetching file") || lower.contains("download")) {
            return None;
        }
        let sentence = if lower.contains("attempt") {
            DOWNLOAD_ATTEMPT
        } else if lower.contains("success") {
            DOWNLOAD_SUCCESS
        } else if lower.contains("failed") {
            DOWNLOAD_FAILED
        } else if lower.contains("progress") {
            DOWNLOAD_PROGRESS
        } else {
            return None;
        };
        Some(sentence.to_string())
    }
}

/// Install outcomes
pub struct InstallRule;

impl ExplanationRule for InstallRule {
    fn name(&self) -> &'static str {
        "install"
    }

    fn explain(&self, ctx: &MessageContext<'_>) -> Option<String> {
        let lower = ctx.lower;
        if !lower.contains("install") {
            return None;
        }
        let sentence = if lower.contains("success") || lower.contains("completed") {
            INSTALL_SUCCESS
        } else if lower.contains("failed") {
            INSTALL_FAILED
        } else if lower.contains("progress") {
            INSTALL_PROGRESS
        } else {
            return None;
        };
        Some(sentence.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(rule: &dyn ExplanationRule, message: &str) -> Option<String> {
        let lower = message.to_lowercase();
        rule.explain(&MessageContext {
            message,
            lower: &lower,
            source_app: "MSau04.0",
            severity: "Info",
        })
    }

    #[test]
    fn test_base_versions_with_version() {
        let msg = r#"Update BaseVersions found: { AppId: MSWD2019 = { (( "16.78.1", "16.78.23100802" )) } }"#;
        assert_eq!(
            run(&BaseVersionsRule, msg).as_deref(),
            Some(
                "MAU has identified that Word (version 16.78.1) is installed. \
                 This is a step in checking for updates."
            )
        );
    }

    #[test]
    fn test_base_versions_unknown_app_keeps_identifier() {
        let msg = r#"Update BaseVersions found: AppId: ABCD01 = { (( "1.0""#;
        let text = run(&BaseVersionsRule, msg).expect("rule should trigger");
        assert!(text.contains("ABCD01 (version 1.0)"));
    }

    #[test]
    fn test_base_versions_without_details() {
        let text = run(&BaseVersionsRule, "Update BaseVersions found").expect("rule should trigger");
        assert!(text.starts_with("MAU is checking the version"));
    }

    #[test]
    fn test_forced_update_with_date() {
        let msg = r#"Application Forced Update Schedule: { XCEL2019 = { ForcedUpdateDate = "2024-02-01 09:00:00" } }"#;
        assert_eq!(
            run(&ForcedUpdateScheduleRule, msg).as_deref(),
            Some("A mandatory update for Excel has been scheduled by MAU for 2024-02-01 09:00:00.")
        );
    }

    #[test]
    fn test_forced_update_without_date() {
        let msg = "Application Forced Update Schedule: { TEAMS21 = {} }";
        assert_eq!(
            run(&ForcedUpdateScheduleRule, msg).as_deref(),
            Some("A mandatory update for Teams has been scheduled by MAU.")
        );
    }

    #[test]
    fn test_forced_update_without_app() {
        let text = run(&ForcedUpdateScheduleRule, "Application forced update schedule: none")
            .expect("rule should trigger");
        assert!(text.starts_with("MAU is planning to force updates"));
    }

    #[test]
    fn test_cloning_task_outcomes() {
        assert_eq!(
            run(&CloningTaskRule, r#"CloningTask begin for AppID = "OPIM2019""#).as_deref(),
            Some("Starting to prepare update files for Outlook.")
        );
        assert_eq!(
            run(
                &CloningTaskRule,
                r#"CloningTask AppNameChanged AppID = "ONDR18" Success: YES"#
            )
            .as_deref(),
            Some("Successfully prepared update files for OneDrive.")
        );
        assert_eq!(
            run(
                &CloningTaskRule,
                r#"CloningTask AppNameChanged AppID = "ONDR18" Success: NO"#
            )
            .as_deref(),
            Some("Failed to prepare update files for OneDrive.")
        );
        assert_eq!(
            run(&CloningTaskRule, "CloningTask started").as_deref(),
            Some("MAU is preparing update files for an application.")
        );
    }

    #[test]
    fn test_app_states_lists_every_app() {
        let msg = "Calling remoteObjectProxy with Current App States: { MSWD2019 = { state = 1 }; \
                   XCEL2019 = { state = 2 }; ZZZZ99 = { } }";
        assert_eq!(
            run(&AppStatesRule, msg).as_deref(),
            Some(
                "MAU is checking the current status of installed applications, including: \
                 Word, Excel, ZZZZ99."
            )
        );
    }

    #[test]
    fn test_app_states_without_entries() {
        assert_eq!(
            run(&AppStatesRule, "Calling remoteObjectProxy with current app states").as_deref(),
            Some("MAU is checking the status of currently installed applications.")
        );
    }

    #[test]
    fn test_state_transition() {
        assert_eq!(
            run(&StateTransitionRule, "Updating application state for App: MSWD2019 to: 4").as_deref(),
            Some("The update process for Word has moved to a new state (State: 4).")
        );
        assert_eq!(
            run(&StateTransitionRule, "Updating application state for app").as_deref(),
            Some("The update process for an application has moved to a new state.")
        );
    }

    #[test]
    fn test_download_outcomes() {
        assert_eq!(run(&DownloadRule, "Download attempt 2").as_deref(), Some(DOWNLOAD_ATTEMPT));
        assert_eq!(run(&DownloadRule, "Fetching file: success").as_deref(), Some(DOWNLOAD_SUCCESS));
        assert_eq!(run(&DownloadRule, "download failed").as_deref(), Some(DOWNLOAD_FAILED));
        assert_eq!(run(&DownloadRule, "Download progress 40%").as_deref(), Some(DOWNLOAD_PROGRESS));
        assert_eq!(run(&DownloadRule, "Download queued"), None);
        assert_eq!(run(&DownloadRule, "Nothing to see"), None);
    }

    #[test]
    fn test_install_outcomes() {
        assert_eq!(run(&InstallRule, "Install completed").as_deref(), Some(INSTALL_SUCCESS));
        assert_eq!(run(&InstallRule, "Installer failed").as_deref(), Some(INSTALL_FAILED));
        assert_eq!(run(&InstallRule, "Install in progress").as_deref(), Some(INSTALL_PROGRESS));
        assert_eq!(run(&InstallRule, "Install queued"), None);
    }

    #[test]
    fn test_download_wins_over_install() {
        let engine = crate::explain::ExplanationEngine::with_default_rules();
        assert_eq!(
            engine.explain("Download and install failed", "MSau04", "Error"),
            DOWNLOAD_FAILED
        );
        // No download outcome, so the install rule gets its turn
        assert_eq!(
            engine.explain("Download finished, install completed", "MSau04", "Info"),
            INSTALL_SUCCESS
        );
    }
}
