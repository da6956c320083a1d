use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

pub const DEFAULT_CITY: &str = "Jakarta";
pub const DEFAULT_OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org";

pub const ENV_API_KEY: &str = "MOODCAST_API_KEY";
pub const ENV_DATABASE_URL: &str = "MOODCAST_DATABASE_URL";
pub const ENV_DATABASE_AUTH: &str = "MOODCAST_DATABASE_AUTH";

/// OpenWeather credentials and request options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenWeatherConfig {
    pub api_key: Option<String>,
    pub units: String,
    pub lang: String,
    pub base_url: String,
    /// Per-request timeout. Unset means requests may wait indefinitely.
    pub timeout_secs: Option<u64>,
}

impl Default for OpenWeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            units: "metric".to_string(),
            lang: "id".to_string(),
            base_url: DEFAULT_OPENWEATHER_BASE_URL.to_string(),
            timeout_secs: None,
        }
    }
}

/// Realtime database that receives the mirror writes.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StoreConfig {
    /// e.g. "https://my-project-default-rtdb.firebaseio.com"
    pub database_url: Option<String>,
    pub auth_token: Option<String>,
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// default_city = "Jakarta"
///
/// [openweather]
/// api_key = "..."
///
/// [store]
/// database_url = "https://my-project-default-rtdb.firebaseio.com"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub default_city: String,
    pub openweather: OpenWeatherConfig,
    pub store: StoreConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_city: DEFAULT_CITY.to_string(),
            openweather: OpenWeatherConfig::default(),
            store: StoreConfig::default(),
        }
    }
}

impl Config {
    /// Load config from the platform config dir and apply environment overrides.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        let mut cfg = Self::load_from(&path)?;
        cfg.apply_env(|name| std::env::var(name).ok());
        Ok(cfg)
    }

    /// Load config from `path`, or return defaults if it doesn't exist yet.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to the platform config dir.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "moodcast", "moodcast")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Overlay values from the environment. Non-empty variables win over the file.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = get(ENV_API_KEY) {
            self.openweather.api_key = Some(key);
        }
        if let Some(url) = get(ENV_DATABASE_URL) {
            self.store.database_url = Some(url);
        }
        if let Some(token) = get(ENV_DATABASE_AUTH) {
            self.store.auth_token = Some(token);
        }
    }

    pub fn api_key(&self) -> Option<&str> {
        self.openweather.api_key.as_deref().filter(|k| !k.is_empty())
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.openweather.api_key = Some(api_key);
    }

    pub fn is_store_configured(&self) -> bool {
        self.store.database_url.as_deref().is_some_and(|u| !u.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_match_dashboard_behaviour() {
        let cfg = Config::default();

        assert_eq!(cfg.default_city, "Jakarta");
        assert_eq!(cfg.openweather.units, "metric");
        assert_eq!(cfg.openweather.lang, "id");
        assert!(cfg.openweather.timeout_secs.is_none());
        assert!(cfg.api_key().is_none());
        assert!(!cfg.is_store_configured());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("nope.toml")).unwrap();

        assert_eq!(cfg.default_city, DEFAULT_CITY);
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.default_city = "Bandung".to_string();
        cfg.set_api_key("KEY".to_string());
        cfg.store.database_url = Some("https://example.firebaseio.com".to_string());
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.default_city, "Bandung");
        assert_eq!(loaded.api_key(), Some("KEY"));
        assert!(loaded.is_store_configured());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[openweather]\napi_key = \"abc\"\n").unwrap();

        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.api_key(), Some("abc"));
        assert_eq!(cfg.openweather.lang, "id");
        assert_eq!(cfg.default_city, DEFAULT_CITY);
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "default_city = [").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn env_overrides_file_values() {
        let mut cfg = Config::default();
        cfg.set_api_key("FILE_KEY".to_string());

        let env: HashMap<&str, &str> = [
            (ENV_API_KEY, "ENV_KEY"),
            (ENV_DATABASE_URL, "https://env.firebaseio.com"),
            (ENV_DATABASE_AUTH, "  "),
        ]
        .into_iter()
        .collect();
        cfg.apply_env(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(cfg.api_key(), Some("ENV_KEY"));
        assert_eq!(cfg.store.database_url.as_deref(), Some("https://env.firebaseio.com"));
        assert!(cfg.store.auth_token.is_none());
    }
}
