use crate::{
    Config, ConfigError, Coordinates, ForecastSample, Query, WeatherError, WeatherReport,
    WeatherSnapshot, provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Source of current conditions and forecasts.
///
/// Every method is one independent request. Callers that need both halves go
/// through [`fetch_report`].
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(&self, query: &Query) -> Result<WeatherSnapshot, WeatherError>;

    async fn forecast(&self, query: &Query) -> Result<Vec<ForecastSample>, WeatherError>;

    /// Approximate coordinates of this machine, used when no place is given.
    async fn locate(&self) -> Result<Coordinates, WeatherError>;
}

/// Fetch current weather and forecast concurrently.
///
/// Succeeds only if both requests succeed; the first failure is returned and
/// the other half is discarded.
pub async fn fetch_report(
    provider: &dyn WeatherProvider,
    query: &Query,
) -> Result<WeatherReport, WeatherError> {
    let query = normalize(query)?;

    let (current, forecast) =
        tokio::try_join!(provider.current(&query), provider.forecast(&query))?;

    tracing::debug!(%query, samples = forecast.len(), "weather report fetched");
    Ok(WeatherReport { current, forecast })
}

/// Trim place names and reject empty ones before any request goes out.
pub fn normalize(query: &Query) -> Result<Query, WeatherError> {
    match query {
        Query::Place(name) => {
            let name = name.trim();
            if name.is_empty() {
                return Err(WeatherError::InvalidQuery("Please enter a city name".to_string()));
            }
            Ok(Query::Place(name.to_string()))
        }
        coords @ Query::Coordinates { .. } => Ok(coords.clone()),
    }
}

/// Construct the OpenWeather provider from a validated config.
pub fn provider_from_config(config: &Config) -> Result<Box<dyn WeatherProvider>, ConfigError> {
    let provider = OpenWeatherProvider::from_config(config)?;
    Ok(Box::new(provider))
}
