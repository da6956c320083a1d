//! Core library for the `moodcast` weather dashboard.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather provider and the realtime-database mirror
//! - The fetch pipeline, dashboard state and its reducer
//! - Mood tables and pure presentation mapping
//!
//! It is used by `moodcast-cli`, but can also back other front ends.

pub mod catalog;
pub mod config;
pub mod controller;
pub mod dashboard;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod present;
pub mod provider;
pub mod store;

pub use config::{Config, OpenWeatherConfig, StoreConfig};
pub use controller::Dashboard;
pub use dashboard::{DashboardState, Event, FetchTag, Phase, reduce};
pub use error::{DashboardError, FETCH_FAILED_MESSAGE, StoreError};
pub use model::{CurrentConditions, ForecastEntry, ForecastSeries, WeatherSnapshot};
pub use pipeline::Pipeline;
pub use present::DashboardView;
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider, provider_from_config};
pub use store::{DisabledStore, FirebaseStore, MemoryStore, MirrorStore, store_from_config};
