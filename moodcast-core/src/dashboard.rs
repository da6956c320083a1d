//! Dashboard state and the reducer that drives it.
//!
//! All transitions go through [`reduce`], a pure `(state, event) -> state`
//! function. Every fetch is tagged with the city it was issued for and a
//! sequence number; events carrying a tag other than the active one belong to
//! a superseded fetch and are dropped. Switching city drops the data, error
//! and in-flight fetch of the previous city.

use serde::Serialize;
use tracing::warn;

use crate::model::{ForecastSeries, WeatherSnapshot};

/// Identifies one run of the fetch pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FetchTag {
    pub seq: u64,
    pub city: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    CitySelected(String),
    FetchStarted(FetchTag),
    CurrentLoaded(FetchTag, WeatherSnapshot),
    ForecastLoaded(FetchTag, ForecastSeries),
    FetchFailed(FetchTag, String),
    FetchSettled(FetchTag),
}

impl Event {
    pub fn tag(&self) -> Option<&FetchTag> {
        match self {
            Event::CitySelected(_) => None,
            Event::FetchStarted(tag)
            | Event::CurrentLoaded(tag, _)
            | Event::ForecastLoaded(tag, _)
            | Event::FetchFailed(tag, _)
            | Event::FetchSettled(tag) => Some(tag),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Loading,
    Success,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashboardState {
    pub city: String,
    pub weather: Option<WeatherSnapshot>,
    pub forecast: ForecastSeries,
    pub loading: bool,
    pub error: Option<String>,
    /// Fetch whose results are currently accepted.
    pub active: Option<FetchTag>,
    /// Highest sequence number seen so far.
    last_seq: u64,
    settled_once: bool,
}

impl DashboardState {
    pub fn new(city: &str) -> Self {
        Self { city: city.to_string(), ..Self::default() }
    }

    pub fn category(&self) -> Option<&str> {
        self.weather.as_ref().map(|w| w.category.as_str())
    }

    pub fn phase(&self) -> Phase {
        if self.loading {
            Phase::Loading
        } else if self.error.is_some() {
            Phase::Failed
        } else if self.settled_once {
            Phase::Success
        } else {
            Phase::Idle
        }
    }

    fn accepts(&self, tag: &FetchTag) -> bool {
        self.active.as_ref() == Some(tag)
    }
}

pub fn reduce(mut state: DashboardState, event: Event) -> DashboardState {
    if let Some(tag) = event.tag() {
        let starting = matches!(event, Event::FetchStarted(_));
        if !starting && !state.accepts(tag) {
            warn!(seq = tag.seq, city = %tag.city, "discarding event from superseded fetch");
            return state;
        }
        if starting && (tag.city != state.city || tag.seq < state.last_seq) {
            warn!(seq = tag.seq, city = %tag.city, "ignoring start of a superseded fetch");
            return state;
        }
    }

    match event {
        Event::CitySelected(city) => {
            let city = city.trim();
            if !city.is_empty() && city != state.city {
                state.city = city.to_string();
                state.weather = None;
                state.forecast.clear();
                state.error = None;
                state.loading = false;
                state.active = None;
            }
        }
        Event::FetchStarted(tag) => {
            state.loading = true;
            state.error = None;
            state.last_seq = tag.seq;
            state.active = Some(tag);
        }
        Event::CurrentLoaded(_, snapshot) => {
            // The old forecast is not shown next to new current conditions.
            state.weather = Some(snapshot);
            state.forecast.clear();
        }
        Event::ForecastLoaded(_, series) => state.forecast = series,
        Event::FetchFailed(_, message) => state.error = Some(message),
        Event::FetchSettled(_) => {
            state.loading = false;
            state.active = None;
            state.settled_once = true;
        }
    }

    state
}
