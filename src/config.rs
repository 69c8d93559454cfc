use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use dotenvy::dotenv;

use crate::model::role::Role;
use crate::model::user::User;
use crate::report::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::storage::record_store::DEFAULT_STORAGE_KEY;

#[derive(Debug, Clone)]
pub struct Config {
    pub storage_dir: PathBuf,
    pub storage_key: String,

    // Submission flow
    pub submit_delay: Duration,
    pub success_display: Duration,
    pub location_timeout: Duration,

    // Report
    pub report_history_limit: usize,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub gemini_timeout: Duration,

    // Logging
    pub log_dir: PathBuf,
    pub log_level: tracing::Level,

    pub user: User,
}

struct Vars<F>(F);

impl<F: Fn(&str) -> Option<String>> Vars<F> {
    fn or(&self, key: &str, default: &str) -> String {
        (self.0)(key).unwrap_or_else(|| default.to_string())
    }

    fn parse_or<T: FromStr>(&self, key: &str, default: T) -> T {
        (self.0)(key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    fn millis_or(&self, key: &str, default: u64) -> Duration {
        Duration::from_millis(self.parse_or(key, default))
    }

    fn non_empty(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }
}

impl Config {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Self {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; unset or unparseable keys take defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let vars = Vars(lookup);

        Self {
            storage_dir: PathBuf::from(vars.or("STORAGE_DIR", "data")),
            storage_key: vars.or("STORAGE_KEY", DEFAULT_STORAGE_KEY),

            submit_delay: vars.millis_or("SUBMIT_DELAY_MS", 1500),
            success_display: vars.millis_or("SUCCESS_DISPLAY_MS", 2000),
            location_timeout: vars.millis_or("LOCATION_TIMEOUT_MS", 10_000),

            report_history_limit: vars.parse_or("REPORT_HISTORY_LIMIT", 10),
            gemini_api_key: vars
                .non_empty("GEMINI_API_KEY")
                .or_else(|| vars.non_empty("API_KEY")),
            gemini_model: vars.or("GEMINI_MODEL", DEFAULT_MODEL),
            gemini_base_url: vars.or("GEMINI_BASE_URL", DEFAULT_BASE_URL),
            gemini_timeout: vars.millis_or("GEMINI_TIMEOUT_MS", 30_000),

            log_dir: PathBuf::from(vars.or("LOG_DIR", "logs")),
            log_level: vars.parse_or("LOG_LEVEL", tracing::Level::DEBUG),

            user: User {
                id: vars.or("USER_ID", "NV-2024-001"),
                name: vars.or("USER_NAME", "Nguyen Van A"),
                avatar: vars.or(
                    "USER_AVATAR",
                    "https://api.dicebear.com/7.x/avataaars/svg?seed=Felix",
                ),
                department: vars.or("USER_DEPARTMENT", "Engineering"),
                shift_start: vars.or("USER_SHIFT_START", "08:00"),
                shift_end: vars.or("USER_SHIFT_END", "17:30"),
                role: Role::from_flag(&vars.or("USER_ROLE", "EMPLOYEE")),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn overrides_and_fallbacks() {
        let config = config_from(&[
            ("SUBMIT_DELAY_MS", "250"),
            ("REPORT_HISTORY_LIMIT", "not-a-number"),
            ("USER_ROLE", "admin"),
            ("GEMINI_API_KEY", "   "),
            ("API_KEY", "fallback-key"),
            ("LOG_LEVEL", "warn"),
        ]);

        assert_eq!(config.submit_delay, Duration::from_millis(250));
        assert_eq!(config.report_history_limit, 10);
        assert_eq!(config.user.role, Role::Admin);
        assert_eq!(config.gemini_api_key.as_deref(), Some("fallback-key"));
        assert_eq!(config.log_level, tracing::Level::WARN);
        assert_eq!(config.location_timeout, Duration::from_secs(10));
        assert_eq!(config.user.shift_window(), "08:00 - 17:30");
    }

    #[test]
    fn empty_lookup_gives_defaults() {
        let config = config_from(&[]);

        assert_eq!(config.storage_dir, PathBuf::from("data"));
        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
        assert_eq!(config.submit_delay, Duration::from_millis(1500));
        assert_eq!(config.success_display, Duration::from_millis(2000));
        assert_eq!(config.gemini_api_key, None);
        assert_eq!(config.gemini_model, DEFAULT_MODEL);
        assert_eq!(config.log_level, tracing::Level::DEBUG);
        assert_eq!(config.user.role, Role::Employee);
    }
}
