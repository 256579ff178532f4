use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

use crate::{error::ConfigError, units::UnitsMode};

pub const DEFAULT_CURRENT_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
pub const DEFAULT_FORECAST_URL: &str = "https://api.openweathermap.org/data/2.5/forecast";
pub const DEFAULT_GEOLOCATION_URL: &str = "https://ipapi.co/json/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// units = "metric"
/// timeout_secs = 10
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// OpenWeather API key. The only setting without a built-in default.
    pub api_key: Option<String>,
    pub current_url: String,
    pub forecast_url: String,
    pub geolocation_url: String,
    pub timeout_secs: u64,
    pub units: UnitsMode,
    /// Overrides the platform data directory location of the search history.
    pub history_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            current_url: DEFAULT_CURRENT_URL.to_string(),
            forecast_url: DEFAULT_FORECAST_URL.to_string(),
            geolocation_url: DEFAULT_GEOLOCATION_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            units: UnitsMode::default(),
            history_file: None,
        }
    }
}

impl Config {
    /// Load config from disk (or defaults on first run), then apply environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut cfg = Self::load_file()?;
        cfg.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(cfg)
    }

    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load_file() -> Result<Self, ConfigError> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents =
            fs::read_to_string(&path).map_err(|source| ConfigError::Read { path: path.clone(), source })?;

        toml::from_str(&contents).map_err(|source| ConfigError::Parse { path, source })
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|source| ConfigError::Write { path: parent.to_path_buf(), source })?;
        }

        let toml = toml::to_string_pretty(self)?;

        fs::write(&path, toml).map_err(|source| ConfigError::Write { path: path.clone(), source })?;

        Ok(path)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf, ConfigError> {
        let dirs = ProjectDirs::from("dev", "weather-lab", "weather").ok_or(ConfigError::NoConfigDir)?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Apply `OPENWEATHER_*` / `WEATHER_*` overrides read through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(key) = get("OPENWEATHER_API_KEY") {
            self.api_key = Some(key);
        }
        if let Some(url) = get("OPENWEATHER_BASE_URL") {
            self.current_url = url;
        }
        if let Some(url) = get("OPENWEATHER_FORECAST_URL") {
            self.forecast_url = url;
        }
        if let Some(url) = get("WEATHER_IP_API_URL") {
            self.geolocation_url = url;
        }
        if let Some(raw) = get("WEATHER_TIMEOUT_SECS") {
            self.timeout_secs = raw.parse().map_err(|_| ConfigError::InvalidTimeout(raw.clone()))?;
        }
        if let Some(raw) = get("WEATHER_UNITS") {
            self.units = UnitsMode::try_from(raw.as_str())
                .map_err(|err| ConfigError::InvalidUnits(err.to_string()))?;
        }

        Ok(())
    }

    /// Check that everything a client needs is present and well-formed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.api_key()?;

        for (field, value) in [
            ("current_url", &self.current_url),
            ("forecast_url", &self.forecast_url),
            ("geolocation_url", &self.geolocation_url),
        ] {
            if reqwest::Url::parse(value).is_err() {
                return Err(ConfigError::InvalidUrl { field, value: value.clone() });
            }
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout(self.timeout_secs.to_string()));
        }

        Ok(())
    }

    /// Returns the API key, rejecting a missing or blank one.
    pub fn api_key(&self) -> Result<&str, ConfigError> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn history_path(&self) -> Option<PathBuf> {
        self.history_file.clone().or_else(crate::history::HistoryStore::default_path)
    }

    /// Convenience helper used by `weather configure`.
    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key.trim().to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn valid() -> Config {
        Config { api_key: Some("KEY".into()), ..Config::default() }
    }

    #[test]
    fn missing_api_key_is_rejected() {
        let err = Config::default().validate().unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey));
        assert!(err.to_string().contains("OPENWEATHER_API_KEY not found"));
    }

    #[test]
    fn blank_api_key_is_rejected() {
        let cfg = Config { api_key: Some("   ".into()), ..Config::default() };
        assert!(matches!(cfg.validate(), Err(ConfigError::MissingApiKey)));
    }

    #[test]
    fn defaults_validate_once_key_is_set() {
        let cfg = valid();
        cfg.validate().expect("defaults plus key must be valid");
        assert_eq!(cfg.timeout(), Duration::from_secs(10));
        assert_eq!(cfg.units, UnitsMode::Metric);
    }

    #[test]
    fn bad_url_is_rejected() {
        let cfg = Config { forecast_url: "not a url".into(), ..valid() };
        match cfg.validate() {
            Err(ConfigError::InvalidUrl { field, .. }) => assert_eq!(field, "forecast_url"),
            other => panic!("expected InvalidUrl, got {other:?}"),
        }
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let cfg = Config { timeout_secs: 0, ..valid() };
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidTimeout(_))));
    }

    #[test]
    fn environment_overrides_file_values() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("OPENWEATHER_API_KEY", "ENV_KEY"),
            ("OPENWEATHER_BASE_URL", "http://localhost:9000/weather"),
            ("WEATHER_TIMEOUT_SECS", "3"),
            ("WEATHER_UNITS", "imperial"),
        ]);

        let mut cfg = Config::default();
        cfg.apply_overrides(|k| env.get(k).map(|v| v.to_string())).unwrap();

        assert_eq!(cfg.api_key().unwrap(), "ENV_KEY");
        assert_eq!(cfg.current_url, "http://localhost:9000/weather");
        assert_eq!(cfg.forecast_url, DEFAULT_FORECAST_URL);
        assert_eq!(cfg.timeout_secs, 3);
        assert_eq!(cfg.units, UnitsMode::Imperial);
    }

    #[test]
    fn invalid_units_override_is_an_error() {
        let mut cfg = Config::default();
        let err = cfg
            .apply_overrides(|k| (k == "WEATHER_UNITS").then(|| "furlongs".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUnits(_)));
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let cfg: Config = toml::from_str("api_key = \"abc\"\nunits = \"standard\"\n").unwrap();
        assert_eq!(cfg.api_key().unwrap(), "abc");
        assert_eq!(cfg.units, UnitsMode::Standard);
        assert_eq!(cfg.current_url, DEFAULT_CURRENT_URL);
        assert_eq!(cfg.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn toml_roundtrip_keeps_settings() {
        let mut cfg = valid();
        cfg.history_file = Some(PathBuf::from("/tmp/history.json"));
        let text = toml::to_string_pretty(&cfg).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back, cfg);
    }
}
