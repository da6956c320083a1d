//! Pure mapping from dashboard state to what gets rendered.

use chrono::{Locale, NaiveDateTime, TimeZone, Utc};
use serde::Serialize;

use crate::{
    catalog::{self, Track},
    dashboard::{DashboardState, Phase},
    model::{ForecastEntry, WeatherSnapshot},
};

const ICON_BASE: &str = "https://openweathermap.org/img/wn";
const LABEL_LOCALE: Locale = Locale::id_ID;

pub fn icon_url(icon_code: &str) -> String {
    format!("{ICON_BASE}/{icon_code}@4x.png")
}

/// "1 Mei"
pub fn short_date_label(timestamp: &NaiveDateTime) -> String {
    Utc.from_utc_datetime(timestamp).format_localized("%-d %b", LABEL_LOCALE).to_string()
}

/// "Kamis, 1 Mei"
pub fn long_date_label(timestamp: &NaiveDateTime) -> String {
    Utc.from_utc_datetime(timestamp).format_localized("%A, %-d %B", LABEL_LOCALE).to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub temperature: f64,
}

pub fn to_chart_series(forecast: &[ForecastEntry]) -> Vec<ChartPoint> {
    forecast
        .iter()
        .map(|entry| ChartPoint {
            label: short_date_label(&entry.timestamp),
            temperature: entry.temperature_c,
        })
        .collect()
}

/// One slide of the forecast carousel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastCard {
    pub label: String,
    pub icon_url: String,
    pub description: String,
    pub temperature: f64,
}

pub fn to_carousel(forecast: &[ForecastEntry]) -> Vec<ForecastCard> {
    forecast
        .iter()
        .map(|entry| ForecastCard {
            label: long_date_label(&entry.timestamp),
            icon_url: icon_url(&entry.icon),
            description: entry.description.clone(),
            temperature: entry.temperature_c,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentPanel {
    pub icon_url: String,
    pub description: String,
    pub temperature: f64,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    pub location_name: String,
}

impl From<&WeatherSnapshot> for CurrentPanel {
    fn from(snapshot: &WeatherSnapshot) -> Self {
        Self {
            icon_url: icon_url(&snapshot.icon),
            description: snapshot.description.clone(),
            temperature: snapshot.temperature_c,
            humidity_pct: snapshot.humidity_pct,
            wind_speed_mps: snapshot.wind_speed_mps,
            location_name: snapshot.location_name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaylistItem {
    pub title: String,
    pub embed_url: String,
}

impl From<&Track> for PlaylistItem {
    fn from(track: &Track) -> Self {
        Self { title: track.title.to_string(), embed_url: track.embed_url() }
    }
}

/// Everything a front end needs to draw the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub city: String,
    pub phase: Phase,
    pub loading: bool,
    pub error: Option<String>,
    pub current: Option<CurrentPanel>,
    pub playlist: Vec<PlaylistItem>,
    pub activity: String,
    pub chart: Vec<ChartPoint>,
    pub carousel: Vec<ForecastCard>,
}

impl DashboardView {
    pub fn from_state(state: &DashboardState) -> Self {
        let category = state.category();

        Self {
            city: state.city.clone(),
            phase: state.phase(),
            loading: state.loading,
            error: state.error.clone(),
            current: state.weather.as_ref().map(CurrentPanel::from),
            playlist: catalog::select_playlist(category).iter().map(PlaylistItem::from).collect(),
            activity: catalog::select_activity(category).to_string(),
            chart: to_chart_series(&state.forecast),
            carousel: to_carousel(&state.forecast),
        }
    }
}
