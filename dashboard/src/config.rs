use catalog_client::pending::PendingConfig;
use catalog_client::{ClientConfig, DEFAULT_BASE_URL};
use figment::providers::{Format, Yaml};
use figment::Figment;
use getset::Getters;
use log::LevelFilter;
use serde::Deserialize;
use serde_inline_default::serde_inline_default;
use std::path::Path;
use std::time::Duration;

const DEFAULT_RETENTION_MS: u64 = 100;
const DEFAULT_DEBOUNCE_MS: u64 = 500;
const DEFAULT_LOG_LEVEL: &str = "info";

#[serde_inline_default]
#[derive(Debug, Clone, Deserialize, Getters)]
#[get = "pub"]
pub struct Config {
    #[serde_inline_default(DEFAULT_BASE_URL.to_string())]
    base_url: String,
    /// How long a settled listing keeps absorbing identical requests
    #[serde_inline_default(DEFAULT_RETENTION_MS)]
    retention_ms: u64,
    #[serde_inline_default(true)]
    coalescing: bool,
    /// Quiet period before typed search text is submitted
    #[serde_inline_default(DEFAULT_DEBOUNCE_MS)]
    debounce_ms: u64,
    #[serde_inline_default(DEFAULT_LOG_LEVEL.to_string())]
    log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            retention_ms: DEFAULT_RETENTION_MS,
            coalescing: true,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Config {
    /// Read the YAML file at `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, figment::Error> {
        Figment::new().merge(Yaml::file(path)).extract()
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url.clone(),
            pending: PendingConfig {
                retention: Duration::from_millis(self.retention_ms),
                enabled: self.coalescing,
            },
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn level_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempdir::TempDir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = TempDir::new("dashboard-config").unwrap();
        let config = Config::load(&dir.path().join("absent.yaml")).unwrap();

        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(*config.retention_ms(), 100);
        assert_eq!(config.debounce(), Duration::from_millis(500));
        assert_eq!(config.level_filter(), LevelFilter::Info);
    }

    #[test]
    fn test_file_overrides_selected_fields() {
        let dir = TempDir::new("dashboard-config").unwrap();
        let path = dir.path().join("dashboard.yaml");
        fs::write(
            &path,
            "base_url: http://localhost:8080/api\nretention_ms: 250\ncoalescing: false\nlog_level: debug\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        let client_config = config.client_config();

        assert_eq!(client_config.base_url, "http://localhost:8080/api");
        assert_eq!(client_config.pending.retention, Duration::from_millis(250));
        assert!(!client_config.pending.enabled);
        assert_eq!(*config.debounce_ms(), 500);
        assert_eq!(config.level_filter(), LevelFilter::Debug);
    }

    #[test]
    fn test_unknown_log_level_falls_back_to_info() {
        let config = Config {
            log_level: "chatty".to_string(),
            ..Config::default()
        };
        assert_eq!(config.level_filter(), LevelFilter::Info);
    }
}
