//! Application controller: one place that owns the provider, the search
//! history and the currently displayed view.
//!
//! Fetches may overlap. Every fetch takes a generation ticket when it starts
//! and its result is only applied if no newer fetch has started since.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::{
    history::HistoryStore,
    model::{Query, WeatherReport},
    provider::{WeatherProvider, fetch_report, normalize},
    units::TemperatureUnit,
    view::WeatherView,
    WeatherError,
};

/// What happened to a fetch that completed without error.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The result is now on display.
    Applied(WeatherView),
    /// A newer fetch started while this one was in flight; its result was dropped.
    Superseded,
}

#[derive(Debug, Default)]
struct DisplayState {
    unit: TemperatureUnit,
    report: Option<WeatherReport>,
    view: Option<WeatherView>,
    error: Option<String>,
}

#[derive(Debug)]
pub struct Session {
    provider: Box<dyn WeatherProvider>,
    history: Mutex<HistoryStore>,
    generation: AtomicU64,
    display: Mutex<DisplayState>,
}

impl Session {
    pub fn new(provider: Box<dyn WeatherProvider>, history: HistoryStore, unit: TemperatureUnit) -> Self {
        Self {
            provider,
            history: Mutex::new(history),
            generation: AtomicU64::new(0),
            display: Mutex::new(DisplayState { unit, ..DisplayState::default() }),
        }
    }

    /// Look up `place`, display it and record it in the history.
    pub async fn search(&self, place: &str) -> Result<Outcome, WeatherError> {
        let query = normalize(&Query::place(place))?;
        let ticket = self.next_ticket();

        let result = fetch_report(self.provider.as_ref(), &query).await;
        let outcome = self.apply(ticket, result)?;

        if let (Outcome::Applied(_), Query::Place(name)) = (&outcome, &query) {
            self.history.lock().add(name);
        }
        Ok(outcome)
    }

    /// Look up the weather at this machine's IP-derived location.
    ///
    /// The place name the API reports back is recorded in the history.
    pub async fn search_here(&self) -> Result<Outcome, WeatherError> {
        let ticket = self.next_ticket();

        let result = match self.provider.locate().await {
            Ok(coords) => fetch_report(self.provider.as_ref(), &Query::from(coords)).await,
            Err(err) => Err(err),
        };
        let detected = result.as_ref().ok().map(|report| report.current.place.clone());
        let outcome = self.apply(ticket, result)?;

        if let (Outcome::Applied(_), Some(place)) = (&outcome, detected) {
            self.history.lock().add(&place);
        }
        Ok(outcome)
    }

    /// Switch between °C and °F and re-render the current report, if any.
    pub fn toggle_unit(&self) -> Option<WeatherView> {
        let mut display = self.display.lock();
        display.unit = display.unit.toggle();
        let view = display.report.as_ref().map(|r| WeatherView::build_local(r, display.unit));
        display.view = view.clone();
        view
    }

    pub fn unit(&self) -> TemperatureUnit {
        self.display.lock().unit
    }

    pub fn view(&self) -> Option<WeatherView> {
        self.display.lock().view.clone()
    }

    /// User-facing message of the latest failed fetch, cleared by the next success.
    pub fn last_error(&self) -> Option<String> {
        self.display.lock().error.clone()
    }

    pub fn history(&self) -> Vec<String> {
        self.history.lock().entries().to_vec()
    }

    fn next_ticket(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn apply(
        &self,
        ticket: u64,
        result: Result<WeatherReport, WeatherError>,
    ) -> Result<Outcome, WeatherError> {
        let mut display = self.display.lock();

        if self.generation.load(Ordering::SeqCst) != ticket {
            tracing::debug!(ticket, "dropping superseded weather result");
            return Ok(Outcome::Superseded);
        }

        match result {
            Ok(report) => {
                let view = WeatherView::build_local(&report, display.unit);
                tracing::info!(location = %view.location, "weather updated");
                display.report = Some(report);
                display.view = Some(view.clone());
                display.error = None;
                Ok(Outcome::Applied(view))
            }
            Err(err) => {
                tracing::info!(error = %err, "weather lookup failed");
                display.report = None;
                display.view = None;
                display.error = Some(err.to_string());
                Err(err)
            }
        }
    }
}
