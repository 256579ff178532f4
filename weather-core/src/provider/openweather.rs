use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use std::time::Duration;

use crate::{
    Config, ConfigError, Coordinates, ForecastSample, Query, UnitsMode, WeatherError,
    WeatherSnapshot, model::Condition,
};

use super::{WeatherProvider, normalize};

const DEFAULT_ICON: &str = "01d";
const GEOLOCATION_TIMEOUT: Duration = Duration::from_secs(5);

/// OpenWeatherMap current-weather and 5-day/3-hour forecast endpoints.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    current_url: String,
    forecast_url: String,
    geolocation_url: String,
    units: UnitsMode,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;

        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|err| ConfigError::HttpClient(err.to_string()))?;

        Ok(Self {
            api_key: config.api_key()?.to_string(),
            current_url: config.current_url.clone(),
            forecast_url: config.forecast_url.clone(),
            geolocation_url: config.geolocation_url.clone(),
            units: config.units,
            http,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, query: &Query) -> Result<T, WeatherError> {
        let query = normalize(query)?;

        let mut params: Vec<(&str, String)> = match &query {
            Query::Place(name) => vec![("q", name.clone())],
            Query::Coordinates { latitude, longitude } => {
                vec![("lat", latitude.to_string()), ("lon", longitude.to_string())]
            }
        };
        params.push(("appid", self.api_key.clone()));
        params.push(("units", self.units.as_str().to_string()));

        tracing::debug!(url, %query, units = %self.units, "sending weather request");

        let res = self.http.get(url).query(&params).send().await?;

        let status = res.status();
        if let Some(err) = WeatherError::from_status(status, query.place_name()) {
            tracing::debug!(url, %status, "weather request rejected");
            return Err(err);
        }

        let body = res.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    #[serde(default)]
    humidity: u8,
    #[serde(default)]
    pressure: u32,
}

#[derive(Debug, Default, Deserialize)]
struct OwWeather {
    #[serde(default)]
    main: String,
    #[serde(default)]
    description: String,
    icon: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct OwWind {
    #[serde(default)]
    speed: f64,
}

#[derive(Debug, Default, Deserialize)]
struct OwClouds {
    #[serde(default)]
    all: u8,
}

#[derive(Debug, Default, Deserialize)]
struct OwSys {
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    #[serde(default)]
    name: String,
    #[serde(default)]
    dt: i64,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    #[serde(default)]
    wind: OwWind,
    #[serde(default)]
    clouds: OwClouds,
    #[serde(default)]
    sys: OwSys,
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwForecastMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    #[serde(default)]
    list: Vec<OwForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct IpLocation {
    latitude: Option<f64>,
    longitude: Option<f64>,
}

fn into_snapshot(raw: OwCurrentResponse, units: UnitsMode) -> WeatherSnapshot {
    let weather = raw.weather.into_iter().next().unwrap_or_default();

    WeatherSnapshot {
        place: raw.name,
        country: raw.sys.country,
        observed_at: unix_to_utc(raw.dt).unwrap_or_else(Utc::now),
        temperature_c: units.to_celsius(raw.main.temp),
        feels_like_c: units.to_celsius(raw.main.feels_like),
        humidity_pct: raw.main.humidity,
        pressure_hpa: raw.main.pressure,
        cloudiness_pct: raw.clouds.all,
        wind_speed: raw.wind.speed,
        units,
        condition: Condition::from_main(&weather.main),
        description: weather.description,
        icon: weather.icon.unwrap_or_else(|| DEFAULT_ICON.to_string()),
    }
}

fn into_samples(raw: OwForecastResponse, units: UnitsMode) -> Vec<ForecastSample> {
    raw.list
        .into_iter()
        .filter_map(|entry| {
            let timestamp = unix_to_utc(entry.dt)?;
            let icon = entry
                .weather
                .into_iter()
                .next()
                .and_then(|w| w.icon)
                .unwrap_or_else(|| DEFAULT_ICON.to_string());

            Some(ForecastSample { timestamp, temperature_c: units.to_celsius(entry.main.temp), icon })
        })
        .collect()
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current(&self, query: &Query) -> Result<WeatherSnapshot, WeatherError> {
        let raw: OwCurrentResponse = self.get_json(&self.current_url, query).await?;
        Ok(into_snapshot(raw, self.units))
    }

    async fn forecast(&self, query: &Query) -> Result<Vec<ForecastSample>, WeatherError> {
        let raw: OwForecastResponse = self.get_json(&self.forecast_url, query).await?;
        Ok(into_samples(raw, self.units))
    }

    async fn locate(&self) -> Result<Coordinates, WeatherError> {
        let res = self
            .http
            .get(&self.geolocation_url)
            .timeout(GEOLOCATION_TIMEOUT)
            .send()
            .await
            .map_err(|err| WeatherError::Location(WeatherError::from(err).to_string()))?;

        if res.status() != reqwest::StatusCode::OK {
            tracing::debug!(status = %res.status(), "geolocation lookup rejected");
            return Err(WeatherError::Location("Could not determine location".to_string()));
        }

        let body: IpLocation = res
            .json()
            .await
            .map_err(|_| WeatherError::Location("Invalid location data".to_string()))?;

        // A zero coordinate is how the lookup service reports "unknown".
        match (body.latitude, body.longitude) {
            (Some(latitude), Some(longitude)) if latitude != 0.0 && longitude != 0.0 => {
                tracing::info!(latitude, longitude, "located via IP");
                Ok(Coordinates { latitude, longitude })
            }
            _ => Err(WeatherError::Location("Invalid location data".to_string())),
        }
    }
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURRENT_BODY: &str = r#"{
        "name": "Manila",
        "dt": 1772431200,
        "main": {"temp": 30.5, "feels_like": 35.1, "humidity": 74, "pressure": 1009},
        "weather": [{"main": "Clouds", "description": "broken clouds", "icon": "04d"}],
        "wind": {"speed": 4.12},
        "clouds": {"all": 75},
        "sys": {"country": "PH"}
    }"#;

    #[test]
    fn parses_current_payload() {
        let raw: OwCurrentResponse = serde_json::from_str(CURRENT_BODY).unwrap();
        let snap = into_snapshot(raw, UnitsMode::Metric);

        assert_eq!(snap.place, "Manila");
        assert_eq!(snap.country, "PH");
        assert_eq!(snap.temperature_c, 30.5);
        assert_eq!(snap.feels_like_c, 35.1);
        assert_eq!(snap.humidity_pct, 74);
        assert_eq!(snap.pressure_hpa, 1009);
        assert_eq!(snap.cloudiness_pct, 75);
        assert_eq!(snap.condition, Condition::Clouds);
        assert_eq!(snap.description, "broken clouds");
        assert_eq!(snap.icon, "04d");
        assert_eq!(snap.observed_at.timestamp(), 1772431200);
    }

    #[test]
    fn sparse_current_payload_uses_defaults() {
        let raw: OwCurrentResponse =
            serde_json::from_str(r#"{"main": {"temp": 12.0, "feels_like": 10.0}}"#).unwrap();
        let snap = into_snapshot(raw, UnitsMode::Metric);

        assert_eq!(snap.place, "");
        assert_eq!(snap.icon, DEFAULT_ICON);
        assert_eq!(snap.condition, Condition::Clear);
        assert_eq!(snap.humidity_pct, 0);
    }

    #[test]
    fn imperial_temperatures_are_normalised() {
        let raw: OwCurrentResponse =
            serde_json::from_str(r#"{"main": {"temp": 212.0, "feels_like": 32.0}}"#).unwrap();
        let snap = into_snapshot(raw, UnitsMode::Imperial);

        assert!((snap.temperature_c - 100.0).abs() < 1e-9);
        assert!(snap.feels_like_c.abs() < 1e-9);
        assert_eq!(snap.units, UnitsMode::Imperial);
    }

    #[test]
    fn forecast_entries_keep_input_order() {
        let raw: OwForecastResponse = serde_json::from_str(
            r#"{"list": [
                {"dt": 1772442000, "main": {"temp": 28.0}, "weather": [{"icon": "10d"}]},
                {"dt": 1772431200, "main": {"temp": 31.0}, "weather": []}
            ]}"#,
        )
        .unwrap();

        let samples = into_samples(raw, UnitsMode::Metric);
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].icon, "10d");
        assert_eq!(samples[0].temperature_c, 28.0);
        assert_eq!(samples[1].icon, DEFAULT_ICON);
    }

    #[test]
    fn empty_forecast_list_is_not_an_error() {
        let raw: OwForecastResponse = serde_json::from_str("{}").unwrap();
        assert!(into_samples(raw, UnitsMode::Metric).is_empty());
    }
}
