//! Mirror writes of the current-conditions payload into a shared key-value
//! store.
//!
//! Every write overwrites the value at `weather/<city>`. There is no
//! versioning, no read-before-write and no retry.

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::{Client, Url};
use std::{collections::HashMap, fmt::Debug};
use tracing::debug;

use crate::{StoreError, config::StoreConfig};

const ROOT: &str = "weather";

/// Key under which a city's snapshot is stored.
pub fn store_path(city: &str) -> String {
    format!("{ROOT}/{city}")
}

#[async_trait]
pub trait MirrorStore: Send + Sync + Debug {
    async fn persist(&self, city: &str, payload: &serde_json::Value) -> Result<(), StoreError>;
}

/// Firebase Realtime Database, written through its REST API.
#[derive(Debug, Clone)]
pub struct FirebaseStore {
    database_url: Url,
    auth_token: Option<String>,
    http: Client,
}

impl FirebaseStore {
    pub fn new(database_url: &str, auth_token: Option<String>) -> Result<Self, StoreError> {
        let database_url =
            Url::parse(database_url).map_err(|e| StoreError::InvalidUrl(e.to_string()))?;
        if database_url.cannot_be_a_base() {
            return Err(StoreError::InvalidUrl(database_url.to_string()));
        }

        Ok(Self { database_url, auth_token, http: Client::new() })
    }

    /// `<database_url>/weather/<city>.json`, with the city as one encoded segment.
    pub fn url_for(&self, city: &str) -> Result<Url, StoreError> {
        let mut url = self.database_url.clone();
        url.path_segments_mut()
            .map_err(|_| StoreError::InvalidUrl(self.database_url.to_string()))?
            .pop_if_empty()
            .push(ROOT)
            .push(&format!("{city}.json"));

        if let Some(token) = &self.auth_token {
            url.query_pairs_mut().append_pair("auth", token);
        }

        Ok(url)
    }
}

#[async_trait]
impl MirrorStore for FirebaseStore {
    async fn persist(&self, city: &str, payload: &serde_json::Value) -> Result<(), StoreError> {
        let url = self.url_for(city)?;
        debug!(path = %store_path(city), "writing mirror copy");

        let res = self.http.put(url).json(payload).send().await?;
        let status = res.status();
        if !status.is_success() {
            return Err(StoreError::Rejected { path: store_path(city), status });
        }

        Ok(())
    }
}

/// In-process store; keeps the latest payload per path.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, serde_json::Value>>,
    writes: Mutex<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, city: &str) -> Option<serde_json::Value> {
        self.entries.lock().get(&store_path(city)).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Number of writes accepted, including overwrites.
    pub fn write_count(&self) -> usize {
        *self.writes.lock()
    }
}

#[async_trait]
impl MirrorStore for MemoryStore {
    async fn persist(&self, city: &str, payload: &serde_json::Value) -> Result<(), StoreError> {
        self.entries.lock().insert(store_path(city), payload.clone());
        *self.writes.lock() += 1;
        Ok(())
    }
}

/// Drops every write. Used when no database is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledStore;

#[async_trait]
impl MirrorStore for DisabledStore {
    async fn persist(&self, city: &str, _payload: &serde_json::Value) -> Result<(), StoreError> {
        debug!(path = %store_path(city), "mirror store disabled, skipping write");
        Ok(())
    }
}

/// Firebase when a database URL is configured, otherwise a disabled store.
pub fn store_from_config(config: &StoreConfig) -> Result<Box<dyn MirrorStore>, StoreError> {
    match config.database_url.as_deref().filter(|u| !u.is_empty()) {
        Some(url) => Ok(Box::new(FirebaseStore::new(url, config.auth_token.clone())?)),
        None => Ok(Box::new(DisabledStore)),
    }
}
