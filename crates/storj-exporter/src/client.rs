//! Client for the storage node operator API.
//!
//! The collector only needs one capability from the node: "GET this path and
//! give me JSON if you can". [`NodeApi`] is that seam; [`NodeApiClient`] is
//! the HTTP implementation and tests provide in-memory ones.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{FetchError, Result};

/// Summary endpoint, relative to the API base URL.
pub const NODE_PATH: &str = "sno/";

/// Payout estimate endpoint.
pub const PAYOUT_PATH: &str = "sno/estimated-payout";

/// Per-satellite detail endpoint for `id`.
#[must_use]
pub fn satellite_path(id: &str) -> String {
    format!("sno/satellite/{id}")
}

/// Source of node operator API responses.
#[async_trait]
pub trait NodeApi: Send + Sync {
    /// Fetch `path` relative to the API base URL.
    ///
    /// Returns `None` on any failure; callers treat that as "no data" for
    /// the section that needed it.
    async fn fetch(&self, path: &str) -> Option<Value>;
}

/// HTTP client for a node's `/api/` endpoints.
#[derive(Debug, Clone)]
pub struct NodeApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl NodeApiClient {
    /// Create a client for `base_url` (e.g. `http://127.0.0.1:14002/api/`).
    ///
    /// Every request is bounded by `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn try_fetch(&self, url: &str) -> std::result::Result<Value, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(FetchError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        response.json::<Value>().await.map_err(FetchError::Decode)
    }
}

#[async_trait]
impl NodeApi for NodeApiClient {
    async fn fetch(&self, path: &str) -> Option<Value> {
        let url = format!("{}{}", self.base_url, path);
        match self.try_fetch(&url).await {
            Ok(value) => {
                debug!(%url, "Fetched node API response");
                Some(value)
            }
            Err(e) => {
                warn!(%url, kind = e.kind(), "Node API request failed: {}", e);
                None
            }
        }
    }
}
