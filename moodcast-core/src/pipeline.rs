use std::sync::Arc;
use tracing::{info, warn};

use crate::{
    DashboardError, MirrorStore, WeatherProvider,
    dashboard::{Event, FetchTag},
    model::{ForecastSeries, WeatherSnapshot, filter_midday},
};

/// Sequential fetch-and-mirror pipeline for one city.
#[derive(Debug, Clone)]
pub struct Pipeline {
    provider: Arc<dyn WeatherProvider>,
    store: Arc<dyn MirrorStore>,
}

impl Pipeline {
    pub fn new(provider: Arc<dyn WeatherProvider>, store: Arc<dyn MirrorStore>) -> Self {
        Self { provider, store }
    }

    /// Current conditions, then the mirror write, then the midday forecast.
    ///
    /// Each step starts only after the previous one succeeded.
    pub async fn load_weather(
        &self,
        city: &str,
    ) -> Result<(WeatherSnapshot, ForecastSeries), DashboardError> {
        let mut snapshot = None;
        let forecast = self.steps(city, |s| snapshot = Some(s.clone())).await?;
        let snapshot = snapshot.ok_or(DashboardError::MissingField("current conditions"))?;
        Ok((snapshot, forecast))
    }

    /// Run the pipeline for `tag`, reporting progress through `emit`.
    ///
    /// `CurrentLoaded` is emitted as soon as the first request succeeds, so a
    /// later failure leaves current conditions visible next to the error.
    /// `FetchSettled` is always the last event.
    pub async fn run<F>(&self, tag: FetchTag, mut emit: F)
    where
        F: FnMut(Event),
    {
        emit(Event::FetchStarted(tag.clone()));

        let result = self
            .steps(&tag.city, |snapshot| emit(Event::CurrentLoaded(tag.clone(), snapshot.clone())))
            .await;

        match result {
            Ok(series) => {
                info!(seq = tag.seq, city = %tag.city, days = series.len(), "weather loaded");
                emit(Event::ForecastLoaded(tag.clone(), series));
            }
            Err(err) => {
                warn!(seq = tag.seq, city = %tag.city, error = ?err, "weather load failed");
                emit(Event::FetchFailed(tag.clone(), err.user_message()));
            }
        }

        emit(Event::FetchSettled(tag));
    }

    async fn steps<F>(&self, city: &str, on_current: F) -> Result<ForecastSeries, DashboardError>
    where
        F: FnOnce(&WeatherSnapshot),
    {
        let current = self.provider.current(city).await?;
        on_current(&current.snapshot);

        self.store.persist(city, &current.raw).await?;

        let entries = self.provider.forecast(city).await?;
        Ok(filter_midday(entries))
    }
}
