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

//! Plain-language explanations for log messages.
//!
//! An [`ExplanationEngine`] holds an ordered list of [`ExplanationRule`]s.
//! The first rule that recognizes a message writes the explanation. Short
//! unrecognized messages are returned as they are; long ones get a generic
//! sentence.

pub mod rules;

use std::sync::LazyLock;

/// Unrecognized messages shorter than this (in characters) are shown verbatim
pub const SELF_EXPLANATORY_LIMIT: usize = 100;

/// Explanation for long messages no rule recognizes
pub const GENERIC_EXPLANATION: &str = "MAU performed a system operation. This is normal background \
     activity to keep your applications updated and secure.";

static DEFAULT_ENGINE: LazyLock<ExplanationEngine> =
    LazyLock::new(ExplanationEngine::with_default_rules);

/// The message being explained, with its lower-cased form computed once
#[derive(Debug, Clone, Copy)]
pub struct MessageContext<'a> {
    pub message: &'a str,
    pub lower: &'a str,
    pub source_app: &'a str,
    pub severity: &'a str,
}

/// One recognizer/template pair
pub trait ExplanationRule: Send + Sync {
    /// Short identifier, used in logs and tests
    fn name(&self) -> &'static str;

    /// Explain the message, or `None` to let the next rule try
    fn explain(&self, ctx: &MessageContext<'_>) -> Option<String>;
}

/// Ordered set of explanation rules
pub struct ExplanationEngine {
    rules: Vec<Box<dyn ExplanationRule>>,
}

impl ExplanationEngine {
    /// Engine without rules: every message takes the fallback path
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Engine with the built-in MAU rules
    pub fn with_default_rules() -> Self {
        rules::default_rules()
            .into_iter()
            .fold(Self::new(), Self::with_rule)
    }

    /// Append a rule. It is tried after all rules already present.
    #[must_use]
    pub fn with_rule(mut self, rule: Box<dyn ExplanationRule>) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    /// Explain `message`. Never fails.
    pub fn explain(&self, message: &str, source_app: &str, severity: &str) -> String {
        profiling::scope!("ExplanationEngine::explain");
        let lower = message.to_lowercase();
        let ctx = MessageContext {
            message,
            lower: &lower,
            source_app,
            severity,
        };

        for rule in &self.rules {
            if let Some(explanation) = rule.explain(&ctx) {
                tracing::trace!("Rule '{}' explained message", rule.name());
                return explanation;
            }
        }

        if message.chars().count() < SELF_EXPLANATORY_LIMIT {
            message.to_string()
        } else {
            GENERIC_EXPLANATION.to_string()
        }
    }
}

impl Default for ExplanationEngine {
    fn default() -> Self {
        Self::with_default_rules()
    }
}

/// Explain a message with the built-in rules
pub fn explain(message: &str, source_app: &str, severity: &str) -> String {
    DEFAULT_ENGINE.explain(message, source_app, severity)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ShoutRule;

    impl ExplanationRule for ShoutRule {
        fn name(&self) -> &'static str {
            "shout"
        }

        fn explain(&self, ctx: &MessageContext<'_>) -> Option<String> {
            ctx.lower
                .contains("shout")
                .then(|| format!("{} shouted", ctx.source_app))
        }
    }

    #[test]
    fn test_short_unmatched_message_is_verbatim() {
        assert_eq!(explain("Daemon started", "MSau04", "Info"), "Daemon started");
    }

    #[test]
    fn test_long_unmatched_message_is_generic() {
        let message = "x".repeat(SELF_EXPLANATORY_LIMIT);
        assert_eq!(explain(&message, "MSau04", "Info"), GENERIC_EXPLANATION);

        let just_under = "y".repeat(SELF_EXPLANATORY_LIMIT - 1);
        assert_eq!(explain(&just_under, "MSau04", "Info"), just_under);
    }

    #[test]
    fn test_custom_rule_is_appended_after_defaults() {
        let engine = ExplanationEngine::with_default_rules().with_rule(Box::new(ShoutRule));
        assert_eq!(engine.rule_names().last(), Some(&"shout"));
        assert_eq!(engine.explain("SHOUT now", "Agent", "Info"), "Agent shouted");
        // An earlier rule still wins
        assert_eq!(
            engine.explain("shout: download attempt", "Agent", "Info"),
            rules::DOWNLOAD_ATTEMPT
        );
    }

    #[test]
    fn test_empty_engine_only_falls_back() {
        let engine = ExplanationEngine::new();
        assert_eq!(
            engine.explain("Download attempt 1", "MSau04", "Info"),
            "Download attempt 1"
        );
    }

    #[test]
    fn test_default_rule_order() {
        assert_eq!(
            ExplanationEngine::with_default_rules().rule_names(),
            vec![
                "base-versions",
                "forced-update-schedule",
                "cloning-task",
                "app-states",
                "state-transition",
                "download",
                "install",
            ]
        );
    }
}
