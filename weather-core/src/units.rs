use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

/// Units mode sent to the weather API as the `units` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitsMode {
    #[default]
    Metric,
    Imperial,
    Standard,
}

impl UnitsMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitsMode::Metric => "metric",
            UnitsMode::Imperial => "imperial",
            UnitsMode::Standard => "standard",
        }
    }

    pub const fn all() -> &'static [UnitsMode] {
        &[UnitsMode::Metric, UnitsMode::Imperial, UnitsMode::Standard]
    }

    /// Normalise a temperature reported in this mode back to degrees Celsius.
    pub fn to_celsius(&self, value: f64) -> f64 {
        match self {
            UnitsMode::Metric => value,
            UnitsMode::Imperial => (value - 32.0) * 5.0 / 9.0,
            UnitsMode::Standard => value - 273.15,
        }
    }

    pub fn wind_speed_suffix(&self) -> &'static str {
        match self {
            UnitsMode::Imperial => "mph",
            UnitsMode::Metric | UnitsMode::Standard => "m/s",
        }
    }
}

impl std::fmt::Display for UnitsMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for UnitsMode {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.trim().to_lowercase();

        match lower.as_str() {
            "metric" => Ok(UnitsMode::Metric),
            "imperial" => Ok(UnitsMode::Imperial),
            "standard" => Ok(UnitsMode::Standard),
            _ => Err(anyhow::anyhow!(
                "Unknown units mode '{value}'. Supported modes: metric, imperial, standard."
            )),
        }
    }
}

/// Unit temperatures are displayed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn is_celsius(&self) -> bool {
        matches!(self, TemperatureUnit::Celsius)
    }

    pub fn toggle(self) -> Self {
        match self {
            TemperatureUnit::Celsius => TemperatureUnit::Fahrenheit,
            TemperatureUnit::Fahrenheit => TemperatureUnit::Celsius,
        }
    }

    pub fn suffix(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
        }
    }

    pub fn convert(&self, temp_c: f64) -> f64 {
        to_display_unit(temp_c, self.is_celsius())
    }
}

/// Convert a Celsius temperature to the display unit. No rounding happens here.
pub fn to_display_unit(temp_c: f64, use_celsius: bool) -> f64 {
    if use_celsius {
        temp_c
    } else {
        temp_c * 9.0 / 5.0 + 32.0
    }
}

/// One decimal place plus unit suffix, e.g. `23.4°C`.
pub fn format_temperature(temp_c: f64, unit: TemperatureUnit) -> String {
    format!("{:.1}{}", unit.convert(temp_c), unit.suffix())
}

/// Rounded integers with a bare degree mark, e.g. `25°/19°`.
pub fn format_high_low(high_c: f64, low_c: f64, unit: TemperatureUnit) -> String {
    let high = unit.convert(high_c).round() as i64;
    let low = unit.convert(low_c).round() as i64;
    format!("{high}°/{low}°")
}
