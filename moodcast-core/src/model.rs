use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Time of day used to pick one forecast entry per day from the 3-hour series.
pub const MIDDAY_MARKER: &str = "12:00:00";

/// Format of the provider's `dt_txt` field.
pub const FORECAST_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current conditions for one city, as rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// Coarse provider category, e.g. "Clear" or "Rain".
    pub category: String,
    pub description: String,
    pub icon: String,
    pub temperature_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    pub location_name: String,
}

/// Current conditions plus the untouched provider payload that gets mirrored.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentConditions {
    pub raw: serde_json::Value,
    pub snapshot: WeatherSnapshot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub timestamp: NaiveDateTime,
    pub temperature_c: f64,
    pub category: String,
    pub description: String,
    pub icon: String,
}

impl ForecastEntry {
    pub fn is_midday(&self) -> bool {
        self.timestamp.hour() == 12 && self.timestamp.minute() == 0 && self.timestamp.second() == 0
    }
}

/// One entry per day, provider order.
pub type ForecastSeries = Vec<ForecastEntry>;

/// Keep only the midday entries, preserving relative order.
pub fn filter_midday(entries: Vec<ForecastEntry>) -> ForecastSeries {
    entries.into_iter().filter(ForecastEntry::is_midday).collect()
}
