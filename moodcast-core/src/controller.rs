use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

use crate::{
    dashboard::{DashboardState, Event, FetchTag, reduce},
    pipeline::Pipeline,
    present::DashboardView,
};

/// Owns the dashboard state and applies pipeline events to it.
///
/// Fetches run as spawned tasks and report back over a channel. Selecting a
/// new city never cancels an in-flight fetch; the reducer drops its events.
#[derive(Debug)]
pub struct Dashboard {
    state: DashboardState,
    pipeline: Arc<Pipeline>,
    tx: mpsc::UnboundedSender<Event>,
    rx: mpsc::UnboundedReceiver<Event>,
    next_seq: u64,
}

impl Dashboard {
    pub fn new(pipeline: Pipeline, initial_city: &str) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            state: DashboardState::new(initial_city),
            pipeline: Arc::new(pipeline),
            tx,
            rx,
            next_seq: 1,
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn view(&self) -> DashboardView {
        DashboardView::from_state(&self.state)
    }

    /// Fetch the city the dashboard was created with.
    pub fn start(&mut self) -> Option<FetchTag> {
        let city = self.state.city.clone();
        self.select_city(&city)
    }

    /// Switch to `city` and start fetching it. Blank input is ignored.
    ///
    /// Must be called from within a tokio runtime.
    pub fn select_city(&mut self, city: &str) -> Option<FetchTag> {
        if city.trim().is_empty() {
            return None;
        }
        self.apply(Event::CitySelected(city.to_string()));

        let tag = FetchTag { seq: self.next_seq, city: self.state.city.clone() };
        self.next_seq += 1;

        // Mark the fetch active before the task runs so stale events from
        // earlier fetches are rejected straight away.
        self.apply(Event::FetchStarted(tag.clone()));

        let pipeline = Arc::clone(&self.pipeline);
        let tx = self.tx.clone();
        let spawned = tag.clone();
        tokio::spawn(async move {
            pipeline
                .run(spawned, |event| {
                    // Receiver gone means the dashboard was dropped.
                    let _ = tx.send(event);
                })
                .await;
        });

        Some(tag)
    }

    /// Wait for the next pipeline event and apply it.
    pub async fn next_event(&mut self) -> bool {
        match self.rx.recv().await {
            Some(event) => {
                self.apply(event);
                true
            }
            None => false,
        }
    }

    /// Apply events until no fetch is in flight.
    pub async fn settle(&mut self) -> &DashboardState {
        while self.state.loading {
            if !self.next_event().await {
                break;
            }
        }
        &self.state
    }

    fn apply(&mut self, event: Event) {
        debug!(?event, "dashboard event");
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        CurrentConditions, DashboardError, ForecastEntry, MemoryStore, WeatherProvider,
        WeatherSnapshot, dashboard::Phase,
    };
    use async_trait::async_trait;
    use serde_json::json;
    use std::time::Duration;

    /// Answers slowly for "Slowtown" so a later selection can overtake it.
    #[derive(Debug)]
    struct DelayProvider;

    #[async_trait]
    impl WeatherProvider for DelayProvider {
        async fn current(&self, city: &str) -> Result<CurrentConditions, DashboardError> {
            if city == "Slowtown" {
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
            let category = if city == "Slowtown" { "Snow" } else { "Clear" };
            Ok(CurrentConditions {
                raw: json!({"name": city}),
                snapshot: WeatherSnapshot {
                    category: category.to_string(),
                    description: String::new(),
                    icon: "01d".to_string(),
                    temperature_c: 20.0,
                    humidity_pct: 50,
                    wind_speed_mps: 1.0,
                    location_name: city.to_string(),
                },
            })
        }

        async fn forecast(&self, _city: &str) -> Result<Vec<ForecastEntry>, DashboardError> {
            Ok(Vec::new())
        }
    }

    fn dashboard(store: Arc<MemoryStore>) -> Dashboard {
        Dashboard::new(Pipeline::new(Arc::new(DelayProvider), store), "Jakarta")
    }

    #[tokio::test]
    async fn start_loads_initial_city() {
        let mut dash = dashboard(Arc::new(MemoryStore::new()));

        let tag = dash.start().unwrap();
        assert_eq!(tag.city, "Jakarta");
        assert_eq!(dash.state().phase(), Phase::Loading);

        let state = dash.settle().await;
        assert_eq!(state.phase(), Phase::Success);
        assert_eq!(state.category(), Some("Clear"));
    }

    #[tokio::test]
    async fn newer_selection_wins_over_slow_fetch() {
        let store = Arc::new(MemoryStore::new());
        let mut dash = dashboard(store.clone());

        let slow = dash.select_city("Slowtown").unwrap();
        let fast = dash.select_city("Bandung").unwrap();
        assert!(fast.seq > slow.seq);

        dash.settle().await;
        assert_eq!(dash.state().city, "Bandung");
        assert_eq!(dash.state().category(), Some("Clear"));

        // Let the slow fetch finish and deliver its events.
        tokio::time::sleep(Duration::from_millis(200)).await;
        while let Ok(event) = dash.rx.try_recv() {
            dash.apply(event);
        }

        assert_eq!(dash.state().city, "Bandung");
        assert_eq!(dash.state().category(), Some("Clear"));
        assert!(!dash.state().loading);
        // The stale fetch still wrote its mirror copy; only the UI state is guarded.
        assert!(store.get("Slowtown").is_some());
    }

    #[tokio::test]
    async fn blank_selection_does_not_fetch() {
        let mut dash = dashboard(Arc::new(MemoryStore::new()));

        assert!(dash.select_city("  ").is_none());
        assert_eq!(dash.state().phase(), Phase::Idle);
    }
}
