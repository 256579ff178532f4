//! Folding 3-hourly forecast samples into per-day summaries.

use chrono::{DateTime, Datelike, Local, NaiveDate, TimeZone, Utc};
use std::collections::BTreeMap;

use crate::model::{DailySummary, ForecastOverview, ForecastSample, TodayRange};

/// Number of day cards the forecast strip shows.
pub const MAX_FORECAST_DAYS: usize = 5;

#[derive(Debug)]
struct DayBucket<'a> {
    temps: Vec<f64>,
    icons: Vec<&'a str>,
    last_seen: DateTime<Utc>,
}

impl DayBucket<'_> {
    fn high_low(&self, extra: Option<f64>) -> Option<(f64, f64)> {
        self.temps.iter().copied().chain(extra).fold(None, |acc, t| match acc {
            None => Some((t, t)),
            Some((hi, lo)) => Some((hi.max(t), lo.min(t))),
        })
    }

    /// Icon of the middle sample in arrival order.
    fn representative_icon(&self) -> &str {
        self.icons.get(self.icons.len() / 2).copied().unwrap_or_default()
    }
}

/// Aggregate `samples` into at most [`MAX_FORECAST_DAYS`] daily summaries.
///
/// Samples are bucketed by their calendar date in `tz`. The bucket whose date
/// equals `today` also folds `current_temp_c` into its high/low, since the
/// 3-hour feed can miss the live reading. The returned `today` range falls
/// back to the live temperature alone when no sample lands on `today`.
pub fn summarize_forecast<Tz: TimeZone>(
    samples: &[ForecastSample],
    current_temp_c: Option<f64>,
    today: NaiveDate,
    tz: &Tz,
) -> ForecastOverview {
    let mut buckets: BTreeMap<NaiveDate, DayBucket<'_>> = BTreeMap::new();

    for sample in samples {
        let date = sample.timestamp.with_timezone(tz).date_naive();
        let bucket = buckets.entry(date).or_insert_with(|| DayBucket {
            temps: Vec::new(),
            icons: Vec::new(),
            last_seen: sample.timestamp,
        });
        bucket.temps.push(sample.temperature_c);
        bucket.icons.push(sample.icon.as_str());
        bucket.last_seen = sample.timestamp;
    }

    let today_range = match (buckets.get(&today), current_temp_c) {
        (Some(bucket), live) => bucket.high_low(live),
        (None, Some(live)) => Some((live, live)),
        (None, None) => None,
    }
    .map(|(high_c, low_c)| TodayRange { high_c, low_c });

    let days = buckets
        .iter()
        .take(MAX_FORECAST_DAYS)
        .filter_map(|(date, bucket)| {
            let live = if *date == today { current_temp_c } else { None };
            let (high_c, low_c) = bucket.high_low(live)?;
            Some(DailySummary {
                date: *date,
                high_c,
                low_c,
                icon: bucket.representative_icon().to_string(),
                weekday: bucket.last_seen.with_timezone(tz).weekday().to_string(),
            })
        })
        .collect();

    ForecastOverview { today: today_range, days }
}

/// [`summarize_forecast`] in the machine's local time zone, relative to now.
pub fn summarize_local(samples: &[ForecastSample], current_temp_c: Option<f64>) -> ForecastOverview {
    let today = Local::now().date_naive();
    summarize_forecast(samples, current_temp_c, today, &Local)
}
