//! Typed errors surfaced by the weather client and configuration layer.
//!
//! `WeatherError` is per-request and recoverable: the caller shows its message
//! and lets the user retry. `ConfigError` is startup-fatal.

use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

/// Failure of a single weather lookup. `Display` is the user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WeatherError {
    #[error("{message}")]
    NotFound { message: String },

    #[error("Invalid API key. Please check your configuration.")]
    Unauthorized,

    #[error("Weather service is currently unavailable. Please try again later.")]
    ServiceUnavailable,

    #[error("Error: {0}")]
    UnexpectedStatus(u16),

    #[error("Request timed out. Please check your internet connection.")]
    Timeout,

    #[error("Network error. Please check your internet connection.")]
    Network(String),

    #[error("{0}")]
    InvalidQuery(String),

    #[error("Location failed: {0}")]
    Location(String),

    #[error("An unexpected error occurred: {0}")]
    Other(String),
}

impl WeatherError {
    /// 404 message, naming the queried place when it is known.
    pub fn not_found(place: Option<&str>) -> Self {
        let message = match place {
            Some(place) => format!("City '{place}' not found. Please check the spelling."),
            None => "Location not found.".to_string(),
        };
        WeatherError::NotFound { message }
    }

    /// Classify a non-200 status. Returns `None` for 200 OK.
    pub fn from_status(status: StatusCode, place: Option<&str>) -> Option<Self> {
        match status.as_u16() {
            200 => None,
            404 => Some(Self::not_found(place)),
            401 => Some(WeatherError::Unauthorized),
            code if code >= 500 => Some(WeatherError::ServiceUnavailable),
            code => Some(WeatherError::UnexpectedStatus(code)),
        }
    }
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            WeatherError::Timeout
        } else if err.is_connect() || err.is_request() {
            WeatherError::Network(err.to_string())
        } else if let Some(status) = err.status() {
            WeatherError::from_status(status, None)
                .unwrap_or_else(|| WeatherError::Other(err.to_string()))
        } else {
            WeatherError::Other(err.to_string())
        }
    }
}

impl From<serde_json::Error> for WeatherError {
    fn from(err: serde_json::Error) -> Self {
        WeatherError::Other(format!("malformed response: {err}"))
    }
}

/// Missing or invalid configuration. The application must not start with one of these.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "OPENWEATHER_API_KEY not found.\n\
         Hint: run `weather configure` or set the OPENWEATHER_API_KEY environment variable."
    )]
    MissingApiKey,

    #[error("Invalid URL for `{field}`: '{value}'")]
    InvalidUrl { field: &'static str, value: String },

    #[error("Request timeout must be a whole number of seconds, at least 1 (got '{0}')")]
    InvalidTimeout(String),

    #[error("{0}")]
    InvalidUnits(String),

    #[error("Failed to initialise HTTP client: {0}")]
    HttpClient(String),

    #[error("Could not determine platform config directory")]
    NoConfigDir,

    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to write config file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize configuration to TOML: {0}")]
    Serialize(#[from] toml::ser::Error),
}
