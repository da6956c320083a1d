use reqwest::StatusCode;
use thiserror::Error;

/// Message shown when a provider endpoint answers with a non-success status.
pub const FETCH_FAILED_MESSAGE: &str = "Gagal mengambil data cuaca.";

/// Errors raised while writing the mirror copy of a snapshot.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("store rejected write to '{path}' with status {status}")]
    Rejected { path: String, status: StatusCode },

    #[error("invalid store url: {0}")]
    InvalidUrl(String),
}

/// Everything that can go wrong between a city being selected and its data
/// being ready to render.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Provider answered with a non-2xx status.
    #[error("{}", FETCH_FAILED_MESSAGE)]
    Status {
        endpoint: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("invalid weather payload: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("weather payload is missing {0}")]
    MissingField(&'static str),

    #[error("invalid forecast timestamp '{0}'")]
    Timestamp(String),

    #[error("failed to mirror weather: {0}")]
    Store(#[from] StoreError),
}

impl DashboardError {
    /// The single string surfaced to the user for any failure.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}
