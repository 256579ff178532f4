//! Immutable display snapshots built from a fetched report.
//!
//! Nothing here mutates; a unit toggle or a new fetch builds a fresh
//! [`WeatherView`] from the stored report.

use chrono::{Local, NaiveDate, TimeZone};
use serde::Serialize;

use crate::{
    aggregate::summarize_forecast,
    model::{Condition, DailySummary, WeatherReport},
    units::{TemperatureUnit, format_high_low, format_temperature},
};

/// Icon image for an OpenWeather icon code.
pub fn icon_url(icon: &str) -> String {
    format!("https://openweathermap.org/img/wn/{icon}@2x.png")
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayCard {
    pub date: NaiveDate,
    pub weekday: String,
    pub icon: String,
    pub icon_url: String,
    /// e.g. `25°/19°`
    pub temperatures: String,
}

impl DayCard {
    fn from_summary(day: &DailySummary, unit: TemperatureUnit) -> Self {
        Self {
            date: day.date,
            weekday: day.weekday.clone(),
            icon: day.icon.clone(),
            icon_url: icon_url(&day.icon),
            temperatures: format_high_low(day.high_c, day.low_c, unit),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherView {
    pub location: String,
    pub condition: Condition,
    pub description: String,
    pub icon_url: String,
    pub temperature: String,
    pub feels_like: String,
    /// Empty when there is no range for today.
    pub high_low: String,
    pub humidity: String,
    pub wind: String,
    pub pressure: String,
    pub cloudiness: String,
    pub days: Vec<DayCard>,
}

impl WeatherView {
    pub fn build<Tz: TimeZone>(
        report: &WeatherReport,
        unit: TemperatureUnit,
        today: NaiveDate,
        tz: &Tz,
    ) -> Self {
        let current = &report.current;
        let overview = summarize_forecast(&report.forecast, Some(current.temperature_c), today, tz);

        let place = if current.place.is_empty() { "Unknown" } else { current.place.as_str() };
        let location = if current.country.is_empty() {
            place.to_string()
        } else {
            format!("{place}, {}", current.country)
        };

        let high_low = overview
            .today
            .map(|range| {
                format!(
                    "↑ {}   ↓ {}",
                    format_temperature(range.high_c, unit),
                    format_temperature(range.low_c, unit)
                )
            })
            .unwrap_or_default();

        Self {
            location,
            condition: current.condition,
            description: title_case(&current.description),
            icon_url: icon_url(&current.icon),
            temperature: format_temperature(current.temperature_c, unit),
            feels_like: format!("Feels like {}", format_temperature(current.feels_like_c, unit)),
            high_low,
            humidity: format!("{}%", current.humidity_pct),
            wind: format!("{} {}", current.wind_speed, current.units.wind_speed_suffix()),
            pressure: format!("{} hPa", current.pressure_hpa),
            cloudiness: format!("{}%", current.cloudiness_pct),
            days: overview.days.iter().map(|d| DayCard::from_summary(d, unit)).collect(),
        }
    }

    /// [`WeatherView::build`] for the local time zone and today's local date.
    pub fn build_local(report: &WeatherReport, unit: TemperatureUnit) -> Self {
        Self::build(report, unit, Local::now().date_naive(), &Local)
    }
}

fn title_case(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
