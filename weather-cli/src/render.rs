use std::fmt::Write;
use weather_core::WeatherView;

/// Plain-text rendering of a weather view.
pub fn render_view(view: &WeatherView) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", view.location);
    let _ = writeln!(out, "{}", view.description);
    let _ = writeln!(out, "{}  ({})", view.temperature, view.feels_like);
    if !view.high_low.is_empty() {
        let _ = writeln!(out, "{}", view.high_low);
    }
    out.push('\n');

    let _ = writeln!(out, "{:<10}{:<12}{:<10}{}", "Humidity", view.humidity, "Wind", view.wind);
    let _ = writeln!(out, "{:<10}{:<12}{:<10}{}", "Pressure", view.pressure, "Clouds", view.cloudiness);

    if !view.days.is_empty() {
        out.push('\n');
        for day in &view.days {
            let _ = writeln!(out, "{:<5}{:<10}{}", day.weekday, day.temperatures, day.icon);
        }
    }

    out
}

pub fn print_history(entries: &[String]) {
    if entries.is_empty() {
        println!("No recent searches");
        return;
    }

    for (i, place) in entries.iter().enumerate() {
        println!("{:>2}. {place}", i + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weather_core::{Condition, DayCard};

    fn sample_view(with_days: bool) -> WeatherView {
        let days = if with_days {
            vec![DayCard {
                date: "2026-03-02".parse().unwrap(),
                weekday: "Mon".into(),
                icon: "10d".into(),
                icon_url: "https://openweathermap.org/img/wn/10d@2x.png".into(),
                temperatures: "30°/26°".into(),
            }]
        } else {
            Vec::new()
        };

        WeatherView {
            location: "Manila, PH".into(),
            condition: Condition::Rain,
            description: "Light Rain".into(),
            icon_url: "https://openweathermap.org/img/wn/10d@2x.png".into(),
            temperature: "28.4°C".into(),
            feels_like: "Feels like 29.4°C".into(),
            high_low: "↑ 30.0°C   ↓ 26.0°C".into(),
            humidity: "80%".into(),
            wind: "2.6 m/s".into(),
            pressure: "1012 hPa".into(),
            cloudiness: "90%".into(),
            days,
        }
    }

    #[test]
    fn renders_header_metrics_and_cards() {
        let text = render_view(&sample_view(true));
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Manila, PH");
        assert_eq!(lines[1], "Light Rain");
        assert_eq!(lines[2], "28.4°C  (Feels like 29.4°C)");
        assert_eq!(lines[3], "↑ 30.0°C   ↓ 26.0°C");
        assert!(lines[5].starts_with("Humidity  80%"));
        assert!(text.contains("Mon  30°/26°"));
    }

    #[test]
    fn omits_forecast_block_when_empty() {
        let text = render_view(&sample_view(false));
        assert!(!text.contains("°/"));
    }
}
