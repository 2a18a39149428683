#![forbid(unsafe_code)]

//! Context configuration.
//!
//! [`ModalsConfig`] is plain data with builder-style setters. It can be
//! detected from the environment with [`ModalsConfig::from_env`], and with the
//! `serde` feature it can be embedded in application configuration files.

use std::env;

/// Default prefix of generated modal ids.
pub const DEFAULT_ID_PREFIX: &str = "modal";

/// Environment variable overriding [`ModalsConfig::id_prefix`].
pub const ENV_ID_PREFIX: &str = "MODAL_SYNC_ID_PREFIX";

/// Environment variable overriding [`ModalsConfig::log_transitions`].
pub const ENV_LOG_TRANSITIONS: &str = "MODAL_SYNC_LOG_TRANSITIONS";

/// Settings for a [`ModalsContext`](crate::ModalsContext).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ModalsConfig {
    /// Prefix of ids allocated by `create`.
    pub id_prefix: String,
    /// Emit a `debug` event for every state transition.
    pub log_transitions: bool,
}

impl Default for ModalsConfig {
    fn default() -> Self {
        Self {
            id_prefix: DEFAULT_ID_PREFIX.to_string(),
            log_transitions: true,
        }
    }
}

impl ModalsConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the id prefix. Blank prefixes fall back to the default.
    #[must_use]
    pub fn id_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.id_prefix = normalize_prefix(&prefix.into()).unwrap_or_else(|| DEFAULT_ID_PREFIX.to_string());
        self
    }

    #[must_use]
    pub fn log_transitions(mut self, enabled: bool) -> Self {
        self.log_transitions = enabled;
        self
    }

    /// Defaults overridden by `MODAL_SYNC_ID_PREFIX` and
    /// `MODAL_SYNC_LOG_TRANSITIONS`. Unparseable values are ignored.
    #[must_use]
    pub fn from_env() -> Self {
        let prefix = env::var(ENV_ID_PREFIX).ok();
        let log = env::var(ENV_LOG_TRANSITIONS).ok();
        Self::from_vars(prefix.as_deref(), log.as_deref())
    }

    fn from_vars(prefix: Option<&str>, log_transitions: Option<&str>) -> Self {
        let defaults = Self::default();
        Self {
            id_prefix: prefix
                .and_then(normalize_prefix)
                .unwrap_or(defaults.id_prefix),
            log_transitions: log_transitions
                .and_then(parse_flag)
                .unwrap_or(defaults.log_transitions),
        }
    }
}

fn normalize_prefix(raw: &str) -> Option<String> {
    let raw = raw.trim().trim_end_matches(':');
    if raw.is_empty() {
        None
    } else {
        Some(raw.to_string())
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
