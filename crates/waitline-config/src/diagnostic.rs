// SPDX-FileCopyrightText: 2026 Waitline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Figment-to-miette error bridge with fuzzy match suggestions.
//!
//! Converts Figment deserialization errors into miette diagnostics with
//! "did you mean?" suggestions using Jaro-Winkler string similarity.

use miette::Diagnostic;
use thiserror::Error;

/// Minimum Jaro-Winkler similarity score to suggest a correction.
/// 0.75 catches common typos like `retention_hrs` -> `retention_hours`
/// while filtering noise.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// Every key valid somewhere in the configuration tree, used for
/// typo suggestions on unknown-key errors.
const KNOWN_KEYS: &[&str] = &[
    "storage",
    "policy",
    "auth",
    "messages",
    "database_path",
    "wal_mode",
    "retention_hours",
    "default_wait_time_minutes",
    "default_max_queue_length",
    "retry_budget",
    "admins",
    "superusers",
    "wait_time_template",
    "front_message",
];

/// A configuration error with diagnostic information.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// The configuration failed to parse or deserialize.
    #[error("{message}")]
    #[diagnostic(code(waitline::config::parse), help("{}", suggestion_help(suggestion.as_deref())))]
    Parse {
        /// Figment's rendered error message.
        message: String,
        /// Suggested correction via fuzzy matching, if any.
        suggestion: Option<String>,
    },

    /// A semantic constraint on a config value was violated.
    #[error("validation error: {message}")]
    #[diagnostic(code(waitline::config::validation))]
    Validation { message: String },
}

fn suggestion_help(suggestion: Option<&str>) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`?"),
        None => "check waitline.toml against the documented keys".to_string(),
    }
}

/// Convert a Figment error into diagnostics, one per underlying error.
pub fn figment_to_config_errors(err: figment::Error) -> Vec<ConfigError> {
    err.into_iter()
        .map(|e| {
            let message = e.to_string();
            let suggestion = unknown_key_of(&e).and_then(suggest);
            ConfigError::Parse {
                message,
                suggestion,
            }
        })
        .collect()
}

/// Extract the offending key from an unknown-field figment error, if that
/// is what this error is.
fn unknown_key_of(err: &figment::Error) -> Option<String> {
    match &err.kind {
        figment::error::Kind::UnknownField(field, _) => Some(field.clone()),
        _ => None,
    }
}

/// Find the closest known key by Jaro-Winkler similarity.
fn suggest(key: String) -> Option<String> {
    KNOWN_KEYS
        .iter()
        .map(|candidate| (candidate, strsim::jaro_winkler(&key, candidate)))
        .filter(|(_, score)| *score >= SUGGESTION_THRESHOLD)
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(candidate, _)| candidate.to_string())
}

/// Render collected errors to stderr via miette's report formatting.
pub fn render_errors(errors: &[ConfigError]) {
    for error in errors {
        let report = miette::Report::msg(error.to_string());
        eprintln!("{report:?}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_typo_gets_a_suggestion() {
        assert_eq!(
            suggest("retention_hrs".to_string()),
            Some("retention_hours".to_string())
        );
    }

    #[test]
    fn unrelated_key_gets_no_suggestion() {
        assert_eq!(suggest("zzzzqqqq".to_string()), None);
    }

    #[test]
    fn figment_unknown_field_maps_to_parse_error() {
        let err = crate::loader::load_config_from_str("[policy]\nretension_hours = 1")
            .expect_err("unknown key must fail");
        let errors = figment_to_config_errors(err);
        assert!(!errors.is_empty());
        assert!(matches!(errors[0], ConfigError::Parse { .. }));
    }
}
