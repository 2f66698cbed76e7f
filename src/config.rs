//! Process configuration, read from the environment once at startup.
//!
//! The only signal the reflection core consumes is whether an external
//! provider credential is present. The key value itself never leaves the
//! external strategy; the rest of the service only sees presence/absence.

use std::time::Duration;

/// Environment variable holding the external provider credential.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
/// Environment variable overriding the outbound request timeout (seconds).
pub const EXTERNAL_TIMEOUT_ENV: &str = "REFLECTD_EXTERNAL_TIMEOUT_SECS";

/// Default total timeout for one outbound provider call.
pub const DEFAULT_EXTERNAL_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    /// External provider credential. `None` disables the external strategy.
    pub openai_api_key: Option<String>,
    /// Total timeout enforced on each outbound provider call.
    pub external_timeout: Duration,
}

impl Config {
    /// Read configuration from the process environment. Never fails: a
    /// missing or blank credential simply disables the external strategy.
    pub fn from_env() -> Self {
        let openai_api_key = std::env::var(API_KEY_ENV).ok().and_then(|key| {
            let key = key.trim();
            (!key.is_empty()).then(|| key.to_owned())
        });

        let external_timeout = std::env::var(EXTERNAL_TIMEOUT_ENV)
            .ok()
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map_or(
                Duration::from_secs(DEFAULT_EXTERNAL_TIMEOUT_SECS),
                Duration::from_secs,
            );

        Self {
            openai_api_key,
            external_timeout,
        }
    }

    /// Configuration with no external provider; heuristic-only.
    pub fn heuristic_only() -> Self {
        Self {
            openai_api_key: None,
            external_timeout: Duration::from_secs(DEFAULT_EXTERNAL_TIMEOUT_SECS),
        }
    }

    pub fn external_strategy_enabled(&self) -> bool {
        self.openai_api_key.is_some()
    }
}
