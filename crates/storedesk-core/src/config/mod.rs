//! Configuration management with file persistence

use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Upper bound for `search.max_results`
pub const MAX_RESULTS_CEILING: usize = 100;

/// Storedesk configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseSettings,
    pub search: SearchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub listen: SocketAddr,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// Database file; `None` means the default location under the config dir
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Maximum number of entries a single search returns
    pub max_results: usize,
    /// Wall-clock budget for fetching candidates from all sources
    pub request_deadline_ms: u64,
    /// How many sources are queried at the same time
    pub max_concurrent_sources: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                listen: SocketAddr::from(([127, 0, 0, 1], 8080)),
            },
            database: DatabaseSettings { path: None },
            search: SearchConfig::default(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: 20,
            request_deadline_ms: 5_000,
            max_concurrent_sources: 4,
        }
    }
}

impl SearchConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(1..=MAX_RESULTS_CEILING).contains(&self.max_results) {
            return Err(anyhow!(
                "search.max_results must be between 1 and {}",
                MAX_RESULTS_CEILING
            ));
        }
        if self.request_deadline_ms == 0 {
            return Err(anyhow!("search.request_deadline_ms must be greater than 0"));
        }
        if self.max_concurrent_sources == 0 {
            return Err(anyhow!("search.max_concurrent_sources must be at least 1"));
        }
        Ok(())
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        let dir = if let Ok(custom_dir) = env::var("STOREDESK_CONFIG_DIR") {
            PathBuf::from(custom_dir)
        } else {
            dirs::config_dir()
                .ok_or_else(|| anyhow!("Could not determine config directory"))?
                .join("storedesk")
        };
        Ok(dir)
    }

    /// Get the config file path
    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from file, or return defaults if it doesn't exist
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let config: Config = toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> anyhow::Result<()> {
        self.validate()?;

        let dir = Self::config_dir()?;
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;

        let path = Self::config_path()?;
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        self.search.validate()
    }

    /// Database path, falling back to the default location
    pub fn database_path(&self) -> anyhow::Result<PathBuf> {
        match &self.database.path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::config_dir()?.join("storedesk.db")),
        }
    }

    /// Get a configuration value by key
    pub fn get(&self, key: &str) -> anyhow::Result<String> {
        match key {
            "server.listen" => Ok(self.server.listen.to_string()),
            "database.path" => Ok(self.database_path()?.display().to_string()),
            "search.max_results" => Ok(self.search.max_results.to_string()),
            "search.request_deadline_ms" => Ok(self.search.request_deadline_ms.to_string()),
            "search.max_concurrent_sources" => {
                Ok(self.search.max_concurrent_sources.to_string())
            }
            _ => Err(anyhow!(
                "Unknown configuration key: {}. Use `storedesk config list` to see available keys.",
                key
            )),
        }
    }

    /// Set a configuration value by key
    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "server.listen" => {
                self.server.listen = value
                    .parse()
                    .with_context(|| format!("Invalid listen address: {}", value))?;
            }
            "database.path" => {
                let value = value.trim();
                self.database.path = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
            }
            "search.max_results" => {
                let max: usize = value
                    .parse()
                    .with_context(|| format!("Invalid max_results value: {}", value))?;
                if !(1..=MAX_RESULTS_CEILING).contains(&max) {
                    return Err(anyhow!(
                        "max_results must be between 1 and {}",
                        MAX_RESULTS_CEILING
                    ));
                }
                self.search.max_results = max;
            }
            "search.request_deadline_ms" => {
                let deadline: u64 = value
                    .parse()
                    .with_context(|| format!("Invalid request_deadline_ms value: {}", value))?;
                if deadline == 0 {
                    return Err(anyhow!("request_deadline_ms must be greater than 0"));
                }
                self.search.request_deadline_ms = deadline;
            }
            "search.max_concurrent_sources" => {
                let limit: usize = value
                    .parse()
                    .with_context(|| format!("Invalid max_concurrent_sources value: {}", value))?;
                if limit == 0 {
                    return Err(anyhow!("max_concurrent_sources must be at least 1"));
                }
                self.search.max_concurrent_sources = limit;
            }
            _ => {
                return Err(anyhow!(
                    "Unknown configuration key: {}. Use `storedesk config list` to see available keys.",
                    key
                ));
            }
        }
        Ok(())
    }

    /// List all configuration keys and their values
    pub fn list(&self) -> anyhow::Result<Vec<(String, String)>> {
        let keys = [
            "server.listen",
            "database.path",
            "search.max_results",
            "search.request_deadline_ms",
            "search.max_concurrent_sources",
        ];

        keys.into_iter()
            .map(|key| {
                let value = self.get(key)?;
                Ok((key.to_string(), value))
            })
            .collect()
    }

    /// Reset configuration to defaults
    pub fn reset() -> anyhow::Result<()> {
        let path = Self::config_path()?;
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove config file: {}", path.display()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();

        assert_eq!(config.server.listen.to_string(), "127.0.0.1:8080");
        assert!(config.database.path.is_none());
        assert_eq!(config.search.max_results, 20);
        assert_eq!(config.search.request_deadline_ms, 5_000);
        assert_eq!(config.search.max_concurrent_sources, 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_set_and_get_search_keys() {
        let mut config = Config::default();

        config.set("search.max_results", "50").unwrap();
        config.set("search.request_deadline_ms", "750").unwrap();
        config.set("search.max_concurrent_sources", "8").unwrap();

        assert_eq!(config.get("search.max_results").unwrap(), "50");
        assert_eq!(config.get("search.request_deadline_ms").unwrap(), "750");
        assert_eq!(config.get("search.max_concurrent_sources").unwrap(), "8");
    }

    #[test]
    fn test_set_rejects_out_of_range_values() {
        let mut config = Config::default();

        assert!(config.set("search.max_results", "0").is_err());
        assert!(config.set("search.max_results", "101").is_err());
        assert!(config.set("search.request_deadline_ms", "0").is_err());
        assert!(config.set("search.max_concurrent_sources", "0").is_err());
        assert!(config.set("server.listen", "not-an-address").is_err());
        assert_eq!(config.search.max_results, 20);
    }

    #[test]
    fn test_unknown_key() {
        let mut config = Config::default();
        assert!(config.get("llm.model").is_err());
        assert!(config.set("llm.model", "x").is_err());
    }

    #[test]
    fn test_database_path_override() {
        let mut config = Config::default();
        config.set("database.path", "/tmp/shop.db").unwrap();
        assert_eq!(config.database_path().unwrap(), PathBuf::from("/tmp/shop.db"));

        config.set("database.path", "").unwrap();
        assert!(config.database.path.is_none());
    }

    #[test]
    fn test_toml_roundtrip_keeps_values() {
        let mut config = Config::default();
        config.set("server.listen", "0.0.0.0:9000").unwrap();

        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();

        assert_eq!(parsed.server.listen.to_string(), "0.0.0.0:9000");
        assert_eq!(parsed.search.max_results, config.search.max_results);
    }

    #[test]
    fn test_list_contains_every_key() {
        let config = Config::default();
        let keys: Vec<String> = config.list().unwrap().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys.len(), 5);
        assert!(keys.contains(&"search.max_results".to_string()));
    }
}
