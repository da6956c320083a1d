use crate::{
    Config, CurrentConditions, DashboardError, ForecastEntry,
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Source of current conditions and the 3-hour forecast for a city.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(&self, city: &str) -> Result<CurrentConditions, DashboardError>;

    /// Full 3-hour series as returned by the provider, unfiltered.
    async fn forecast(&self, city: &str) -> Result<Vec<ForecastEntry>, DashboardError>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No OpenWeather API key configured.\n\
                 Hint: run `moodcast configure` or set MOODCAST_API_KEY."
        )
    })?;

    let provider = OpenWeatherProvider::from_config(api_key.to_owned(), &config.openweather)?;
    Ok(Box::new(provider))
}
