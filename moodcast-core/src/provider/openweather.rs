use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::{
    DashboardError,
    config::{DEFAULT_OPENWEATHER_BASE_URL, OpenWeatherConfig},
    model::{CurrentConditions, FORECAST_TIMESTAMP_FORMAT, ForecastEntry, WeatherSnapshot},
};

use super::WeatherProvider;

const CURRENT_PATH: &str = "/data/2.5/weather";
const FORECAST_PATH: &str = "/data/2.5/forecast";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    units: String,
    lang: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    /// Provider against the public API with metric units and Indonesian text.
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            units: "metric".to_string(),
            lang: "id".to_string(),
            base_url: DEFAULT_OPENWEATHER_BASE_URL.to_string(),
            http: Client::new(),
        }
    }

    pub fn from_config(api_key: String, config: &OpenWeatherConfig) -> reqwest::Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            api_key,
            units: config.units.clone(),
            lang: config.lang.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http: builder.build()?,
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Issue a GET for `city` and return the body of a successful response.
    async fn get(&self, path: &'static str, city: &str) -> Result<String, DashboardError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, city, "requesting OpenWeather");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", self.units.as_str()),
                ("lang", self.lang.as_str()),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(DashboardError::Status {
                endpoint: path,
                status,
                body: truncate_body(&body),
            });
        }

        Ok(body)
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    #[serde(default)]
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt_txt: String,
    main: OwMain,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

fn snapshot_from_raw(raw: &serde_json::Value) -> Result<WeatherSnapshot, DashboardError> {
    let parsed = OwCurrentResponse::deserialize(raw)?;

    let weather = parsed
        .weather
        .into_iter()
        .next()
        .ok_or(DashboardError::MissingField("a weather category entry"))?;

    Ok(WeatherSnapshot {
        category: weather.main,
        description: weather.description,
        icon: weather.icon,
        temperature_c: parsed.main.temp,
        humidity_pct: parsed.main.humidity,
        wind_speed_mps: parsed.wind.speed,
        location_name: parsed.name,
    })
}

fn forecast_from_body(body: &str) -> Result<Vec<ForecastEntry>, DashboardError> {
    let parsed: OwForecastResponse = serde_json::from_str(body)?;

    parsed
        .list
        .into_iter()
        .map(|entry| {
            let timestamp = NaiveDateTime::parse_from_str(&entry.dt_txt, FORECAST_TIMESTAMP_FORMAT)
                .map_err(|_| DashboardError::Timestamp(entry.dt_txt.clone()))?;
            let weather = entry
                .weather
                .into_iter()
                .next()
                .ok_or(DashboardError::MissingField("a forecast weather entry"))?;

            Ok(ForecastEntry {
                timestamp,
                temperature_c: entry.main.temp,
                category: weather.main,
                description: weather.description,
                icon: weather.icon,
            })
        })
        .collect()
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current(&self, city: &str) -> Result<CurrentConditions, DashboardError> {
        let body = self.get(CURRENT_PATH, city).await?;
        let raw: serde_json::Value = serde_json::from_str(&body)?;
        let snapshot = snapshot_from_raw(&raw)?;

        Ok(CurrentConditions { raw, snapshot })
    }

    async fn forecast(&self, city: &str) -> Result<Vec<ForecastEntry>, DashboardError> {
        let body = self.get(FORECAST_PATH, city).await?;
        forecast_from_body(&body)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let cut = (0..=MAX).rev().find(|i| body.is_char_boundary(*i)).unwrap_or(0);
        format!("{}...", &body[..cut])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn current_body() -> serde_json::Value {
        json!({
            "weather": [{"id": 500, "main": "Rain", "description": "hujan ringan", "icon": "10d"}],
            "main": {"temp": 27.4, "feels_like": 30.1, "humidity": 84},
            "wind": {"speed": 3.1, "deg": 240},
            "name": "Jakarta",
            "cod": 200
        })
    }

    #[tokio::test]
    async fn current_sends_expected_query_and_parses_snapshot() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(CURRENT_PATH))
            .and(query_param("q", "Jakarta"))
            .and(query_param("appid", "KEY"))
            .and(query_param("units", "metric"))
            .and(query_param("lang", "id"))
            .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
            .expect(1)
            .mount(&server)
            .await;

        let provider = OpenWeatherProvider::new("KEY".to_string()).with_base_url(&server.uri());
        let current = provider.current("Jakarta").await.unwrap();

        assert_eq!(current.raw, current_body());
        assert_eq!(current.snapshot.category, "Rain");
        assert_eq!(current.snapshot.description, "hujan ringan");
        assert_eq!(current.snapshot.icon, "10d");
        assert_eq!(current.snapshot.humidity_pct, 84);
        assert_eq!(current.snapshot.location_name, "Jakarta");
    }

    #[tokio::test]
    async fn current_maps_non_success_to_status_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(CURRENT_PATH))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(json!({"cod": "404", "message": "city not found"})),
            )
            .mount(&server)
            .await;

        let provider = OpenWeatherProvider::new("KEY".to_string()).with_base_url(&server.uri());
        let err = provider.current("Atlantis").await.unwrap_err();

        match err {
            DashboardError::Status { status, body, .. } => {
                assert_eq!(status.as_u16(), 404);
                assert!(body.contains("city not found"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn current_without_weather_entry_is_rejected() {
        let server = MockServer::start().await;

        let mut body = current_body();
        body["weather"] = json!([]);
        Mock::given(method("GET"))
            .and(path(CURRENT_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let provider = OpenWeatherProvider::new("KEY".to_string()).with_base_url(&server.uri());
        let err = provider.current("Jakarta").await.unwrap_err();

        assert!(matches!(err, DashboardError::MissingField(_)));
    }

    #[tokio::test]
    async fn forecast_returns_full_series_in_order() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(FORECAST_PATH))
            .and(query_param("q", "Jakarta"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "cod": "200",
                "list": [
                    {"dt": 1, "dt_txt": "2025-05-01 09:00:00", "main": {"temp": 28.0, "humidity": 70},
                     "weather": [{"main": "Clouds", "description": "awan pecah", "icon": "04d"}]},
                    {"dt": 2, "dt_txt": "2025-05-01 12:00:00", "main": {"temp": 31.0, "humidity": 60},
                     "weather": [{"main": "Clear", "description": "langit cerah", "icon": "01d"}]}
                ]
            })))
            .mount(&server)
            .await;

        let provider = OpenWeatherProvider::new("KEY".to_string()).with_base_url(&server.uri());
        let entries = provider.forecast("Jakarta").await.unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].category, "Clouds");
        assert_eq!(entries[1].temperature_c, 31.0);
        assert!(entries[1].is_midday());
    }

    #[test]
    fn forecast_rejects_bad_timestamp() {
        let body = json!({
            "list": [{"dt_txt": "tomorrow", "main": {"temp": 1.0}, "weather": [{"main": "Snow"}]}]
        })
        .to_string();

        let err = forecast_from_body(&body).unwrap_err();
        assert!(matches!(err, DashboardError::Timestamp(ref t) if t == "tomorrow"));
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "é".repeat(150);
        let out = truncate_body(&long);

        assert!(out.ends_with("..."));
        assert!(out.len() <= 203);
    }
}
