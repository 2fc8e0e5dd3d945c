//! Configuration management for the CLI.
//!
//! Loads configuration from environment variables (and `.env`) with sensible
//! defaults. Command-line flags override the environment.

use showmaster_client::DEFAULT_API_URL;
use showmaster_session::FileTokenStorage;
use std::path::PathBuf;
use std::time::Duration;

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Backend base URL
    pub api_url: String,
    /// File holding the session token
    pub token_file: PathBuf,
    /// How often the session file is re-read
    pub poll_interval: Duration,
    /// Retries for catalog reads
    pub catalog_retries: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token_file: FileTokenStorage::default_path(),
            poll_interval: Duration::from_millis(1000),
            catalog_retries: 2,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key/value source. Unset, blank or
    /// unparseable values fall back to the defaults.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            api_url: get("SHOWMASTER_API_URL").unwrap_or(defaults.api_url),
            token_file: get("SHOWMASTER_TOKEN_FILE").map_or(defaults.token_file, PathBuf::from),
            poll_interval: get("SHOWMASTER_POLL_INTERVAL_MS")
                .and_then(|s| s.trim().parse().ok())
                .filter(|ms| *ms > 0)
                .map_or(defaults.poll_interval, Duration::from_millis),
            catalog_retries: get("SHOWMASTER_CATALOG_RETRIES")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(defaults.catalog_retries),
        }
    }

    /// Apply command-line overrides.
    #[must_use]
    pub fn with_overrides(mut self, api_url: Option<String>, token_file: Option<PathBuf>) -> Self {
        if let Some(url) = api_url {
            self.api_url = url;
        }
        if let Some(path) = token_file {
            self.token_file = path;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[]));
        assert_eq!(config.api_url, "http://localhost:8080");
        assert_eq!(config.poll_interval, Duration::from_secs(1));
        assert_eq!(config.catalog_retries, 2);
        assert!(config.token_file.ends_with(".showmaster/session.json"));
    }

    #[test]
    fn reads_every_variable() {
        let config = Config::from_lookup(lookup(&[
            ("SHOWMASTER_API_URL", "https://api.example.com"),
            ("SHOWMASTER_TOKEN_FILE", "/tmp/tok.json"),
            ("SHOWMASTER_POLL_INTERVAL_MS", "250"),
            ("SHOWMASTER_CATALOG_RETRIES", "5"),
        ]));
        assert_eq!(config.api_url, "https://api.example.com");
        assert_eq!(config.token_file, PathBuf::from("/tmp/tok.json"));
        assert_eq!(config.poll_interval, Duration::from_millis(250));
        assert_eq!(config.catalog_retries, 5);
    }

    #[test]
    fn bad_values_fall_back() {
        let config = Config::from_lookup(lookup(&[
            ("SHOWMASTER_API_URL", "  "),
            ("SHOWMASTER_POLL_INTERVAL_MS", "0"),
            ("SHOWMASTER_CATALOG_RETRIES", "many"),
        ]));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn flags_override_environment() {
        let config = Config::from_lookup(lookup(&[("SHOWMASTER_API_URL", "http://env")]))
            .with_overrides(Some("http://flag".into()), None);
        assert_eq!(config.api_url, "http://flag");
        assert_eq!(config.token_file, Config::default().token_file);
    }
}
