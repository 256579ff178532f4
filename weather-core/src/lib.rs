//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather provider and its typed error set
//! - Forecast aggregation, unit conversion and search history
//! - Immutable view snapshots and the session that drives them
//!
//! It is used by `weather-cli`, but can also be reused by other front ends.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod history;
pub mod model;
pub mod provider;
pub mod session;
pub mod units;
pub mod view;

pub use aggregate::{summarize_forecast, summarize_local};
pub use config::Config;
pub use error::{ConfigError, WeatherError};
pub use history::HistoryStore;
pub use model::{
    Condition, Coordinates, DailySummary, ForecastOverview, ForecastSample, Query, TodayRange,
    WeatherReport, WeatherSnapshot,
};
pub use provider::{WeatherProvider, fetch_report, provider_from_config};
pub use session::{Outcome, Session};
pub use units::{TemperatureUnit, UnitsMode, to_display_unit};
pub use view::{DayCard, WeatherView};
