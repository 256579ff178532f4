use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::units::UnitsMode;

/// What to look up: a free-text place name or a coordinate pair.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    Place(String),
    Coordinates { latitude: f64, longitude: f64 },
}

impl Query {
    pub fn place(name: impl Into<String>) -> Self {
        Query::Place(name.into())
    }

    /// Place name used in "not found" messages, if this is a place lookup.
    pub fn place_name(&self) -> Option<&str> {
        match self {
            Query::Place(name) => Some(name.as_str()),
            Query::Coordinates { .. } => None,
        }
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Query::Place(name) => f.write_str(name),
            Query::Coordinates { latitude, longitude } => write!(f, "{latitude:.4},{longitude:.4}"),
        }
    }
}

/// Condition category reported by the API in `weather[0].main`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Condition {
    #[default]
    Clear,
    Clouds,
    Rain,
    Snow,
    Thunderstorm,
    Drizzle,
    Mist,
    Haze,
}

impl Condition {
    /// Map the API category onto the fixed set. Atmosphere groups the API
    /// reports separately are folded into their nearest member.
    pub fn from_main(main: &str) -> Self {
        match main {
            "Clear" => Condition::Clear,
            "Clouds" => Condition::Clouds,
            "Rain" => Condition::Rain,
            "Snow" => Condition::Snow,
            "Thunderstorm" | "Squall" | "Tornado" => Condition::Thunderstorm,
            "Drizzle" => Condition::Drizzle,
            "Mist" | "Fog" => Condition::Mist,
            "Haze" | "Smoke" | "Dust" | "Sand" | "Ash" => Condition::Haze,
            _ => Condition::Clear,
        }
    }
}

/// Current conditions at one place. Temperatures are in °C regardless of the
/// units mode they were fetched with; wind speed stays in `units`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub place: String,
    pub country: String,
    pub observed_at: DateTime<Utc>,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub pressure_hpa: u32,
    pub cloudiness_pct: u8,
    pub wind_speed: f64,
    pub units: UnitsMode,
    pub condition: Condition,
    pub description: String,
    pub icon: String,
}

/// One 3-hourly forecast entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    pub timestamp: DateTime<Utc>,
    pub temperature_c: f64,
    pub icon: String,
}

/// Aggregated forecast for one local calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub high_c: f64,
    pub low_c: f64,
    pub icon: String,
    pub weekday: String,
}

/// Today's high/low, folding in the live reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TodayRange {
    pub high_c: f64,
    pub low_c: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastOverview {
    pub today: Option<TodayRange>,
    pub days: Vec<DailySummary>,
}

/// Result of one composite fetch: both halves or nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub current: WeatherSnapshot,
    pub forecast: Vec<ForecastSample>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<Coordinates> for Query {
    fn from(c: Coordinates) -> Self {
        Query::Coordinates { latitude: c.latitude, longitude: c.longitude }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn condition_from_main_known_categories() {
        assert_eq!(Condition::from_main("Clouds"), Condition::Clouds);
        assert_eq!(Condition::from_main("Drizzle"), Condition::Drizzle);
        assert_eq!(Condition::from_main("Haze"), Condition::Haze);
    }

    #[test]
    fn condition_folds_atmosphere_groups() {
        assert_eq!(Condition::from_main("Fog"), Condition::Mist);
        assert_eq!(Condition::from_main("Smoke"), Condition::Haze);
        assert_eq!(Condition::from_main("Tornado"), Condition::Thunderstorm);
        assert_eq!(Condition::from_main("Volcano"), Condition::Clear);
    }

    #[test]
    fn query_place_name() {
        assert_eq!(Query::place("Manila").place_name(), Some("Manila"));
        let q = Query::Coordinates { latitude: 14.6, longitude: 121.0 };
        assert_eq!(q.place_name(), None);
        assert_eq!(q.to_string(), "14.6000,121.0000");
    }
}
