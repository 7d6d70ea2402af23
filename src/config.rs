use crate::storage::NameComparison;
use anyhow::{Context, anyhow};
use std::time::Duration;

const URL_SCHEME: &str = "tagstore://";

/// Tag store configuration
///
/// Built with the builder methods, parsed from a URL of the form
/// `tagstore://memory?names=case-sensitive&lock_timeout_ms=500&history=16`,
/// or read from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    /// How names are compared for uniqueness
    pub name_comparison: NameComparison,

    /// Maximum wait for the writer lock when a transaction begins.
    /// `None` waits indefinitely.
    pub lock_timeout: Option<Duration>,

    /// Number of commit records kept in the history
    pub history_capacity: usize,
}

impl StoreConfig {
    pub fn new() -> Self {
        Self {
            name_comparison: NameComparison::CaseInsensitive,
            lock_timeout: Some(Duration::from_secs(30)),
            history_capacity: 64,
        }
    }

    pub fn name_comparison(mut self, comparison: NameComparison) -> Self {
        self.name_comparison = comparison;
        self
    }

    pub fn lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = Some(timeout);
        self
    }

    pub fn no_lock_timeout(mut self) -> Self {
        self.lock_timeout = None;
        self
    }

    pub fn history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    /// Parse from a store URL
    ///
    /// Only the `memory` backend exists. Unknown query keys are rejected.
    pub fn from_url(url: &str) -> Result<Self, String> {
        let rest = url
            .strip_prefix(URL_SCHEME)
            .ok_or_else(|| format!("URL must start with '{}'", URL_SCHEME))?;

        let (backend, query) = match rest.split_once('?') {
            Some((backend, query)) => (backend, Some(query)),
            None => (rest, None),
        };
        if backend != "memory" {
            return Err(format!("Unsupported backend '{}'", backend));
        }

        let mut config = Self::new();
        for pair in query.unwrap_or_default().split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| format!("Invalid query parameter '{}'", pair))?;
            match key {
                "names" => {
                    config.name_comparison = NameComparison::parse(value)
                        .ok_or_else(|| format!("Invalid name comparison '{}'", value))?;
                }
                "lock_timeout_ms" => {
                    let millis: u64 = value
                        .parse()
                        .map_err(|_| format!("Invalid lock_timeout_ms '{}'", value))?;
                    config.lock_timeout = (millis > 0).then(|| Duration::from_millis(millis));
                }
                "history" => {
                    config.history_capacity = value
                        .parse()
                        .map_err(|_| format!("Invalid history '{}'", value))?;
                }
                other => return Err(format!("Unknown parameter '{}'", other)),
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Convert to store URL
    pub fn to_url(&self) -> String {
        let lock_timeout_ms = self.lock_timeout.map(|t| t.as_millis()).unwrap_or(0);
        format!(
            "{}memory?names={}&lock_timeout_ms={}&history={}",
            URL_SCHEME, self.name_comparison, lock_timeout_ms, self.history_capacity
        )
    }

    /// Read `TAGSTORE_URL`, then apply the individual overrides
    /// `TAGSTORE_NAME_COMPARISON`, `TAGSTORE_LOCK_TIMEOUT_MS`, `TAGSTORE_HISTORY`.
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = match std::env::var("TAGSTORE_URL") {
            Ok(url) => Self::from_url(&url)
                .map_err(|e| anyhow!(e))
                .context("TAGSTORE_URL must be a valid tagstore:// URL")?,
            Err(_) => Self::new(),
        };

        if let Ok(raw) = std::env::var("TAGSTORE_NAME_COMPARISON") {
            config.name_comparison = NameComparison::parse(&raw).with_context(|| {
                format!("TAGSTORE_NAME_COMPARISON must be case-sensitive or case-insensitive, got '{raw}'")
            })?;
        }

        if let Ok(raw) = std::env::var("TAGSTORE_LOCK_TIMEOUT_MS") {
            let millis = raw
                .parse::<u64>()
                .context("TAGSTORE_LOCK_TIMEOUT_MS must be u64")?;
            config.lock_timeout = (millis > 0).then(|| Duration::from_millis(millis));
        }

        if let Ok(raw) = std::env::var("TAGSTORE_HISTORY") {
            config.history_capacity = raw
                .parse::<usize>()
                .context("TAGSTORE_HISTORY must be usize")?;
        }

        config.validate().map_err(|e| anyhow!(e))?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if matches!(self.lock_timeout, Some(t) if t.is_zero()) {
            return Err("lock_timeout must be > 0 (use no_lock_timeout to wait forever)".to_string());
        }
        Ok(())
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StoreConfig::default();
        assert_eq!(config.name_comparison, NameComparison::CaseInsensitive);
        assert_eq!(config.lock_timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.history_capacity, 64);
    }

    #[test]
    fn test_builder_pattern() {
        let config = StoreConfig::new()
            .name_comparison(NameComparison::CaseSensitive)
            .lock_timeout(Duration::from_millis(250))
            .history_capacity(4);

        assert_eq!(config.name_comparison, NameComparison::CaseSensitive);
        assert_eq!(config.lock_timeout, Some(Duration::from_millis(250)));
        assert_eq!(config.history_capacity, 4);
        assert_eq!(config.no_lock_timeout().lock_timeout, None);
    }

    #[test]
    fn test_from_url() {
        let config = StoreConfig::from_url(
            "tagstore://memory?names=case-sensitive&lock_timeout_ms=500&history=16",
        )
        .unwrap();

        assert_eq!(config.name_comparison, NameComparison::CaseSensitive);
        assert_eq!(config.lock_timeout, Some(Duration::from_millis(500)));
        assert_eq!(config.history_capacity, 16);
    }

    #[test]
    fn test_from_url_defaults() {
        let config = StoreConfig::from_url("tagstore://memory").unwrap();
        assert_eq!(config, StoreConfig::default());

        let no_timeout = StoreConfig::from_url("tagstore://memory?lock_timeout_ms=0").unwrap();
        assert_eq!(no_timeout.lock_timeout, None);
    }

    #[test]
    fn test_invalid_url() {
        assert!(StoreConfig::from_url("postgres://memory").is_err());
        assert!(StoreConfig::from_url("tagstore://sqlite").is_err());
        assert!(StoreConfig::from_url("tagstore://memory?names=fuzzy").is_err());
        assert!(StoreConfig::from_url("tagstore://memory?history").is_err());
        assert!(StoreConfig::from_url("tagstore://memory?colour=blue").is_err());
    }

    #[test]
    fn test_url_round_trip() {
        let config = StoreConfig::new()
            .name_comparison(NameComparison::CaseSensitive)
            .history_capacity(3);
        assert_eq!(StoreConfig::from_url(&config.to_url()).unwrap(), config);
    }

    #[test]
    fn test_validate() {
        assert!(StoreConfig::new().validate().is_ok());
        assert!(StoreConfig::new().lock_timeout(Duration::ZERO).validate().is_err());
    }
}
