//! REST implementation of [`ClusterClient`].
//!
//! Talks to the cluster manager's application report endpoint,
//! `GET {base}/ws/v1/cluster/apps/{app_id}`, which answers with
//! `{"app": {"trackingUrl": "..."}}`.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::cluster::ClusterClient;
use crate::{MuninnError, Result};

/// Application report fields we consume from the manager.
#[derive(Debug, Deserialize)]
struct AppReport {
    /// Missing on finished/unknown applications; the resolver rejects
    /// the resulting blank URL.
    #[serde(default, rename = "trackingUrl")]
    tracking_url: String,
}

#[derive(Debug, Deserialize)]
struct AppReportEnvelope {
    app: AppReport,
}

/// [`ClusterClient`] backed by the cluster manager's REST API.
#[derive(Debug, Clone)]
pub struct RestClusterClient {
    base_url: String,
    client: reqwest::Client,
}

impl RestClusterClient {
    /// Create a client against a manager base URL (e.g. `http://rm:8088`).
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to build HTTP client");
        Self::with_http_client(base_url, client)
    }

    /// Create a client reusing an existing `reqwest::Client`.
    pub fn with_http_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url, client }
    }
}

#[async_trait]
impl ClusterClient for RestClusterClient {
    fn name(&self) -> &str {
        "rest"
    }

    async fn tracking_url(&self, app_id: &str) -> Result<String> {
        let url = format!("{}/ws/v1/cluster/apps/{app_id}", self.base_url);
        debug!(url = %url, "fetching application report");

        let response = self.client.get(&url).send().await.map_err(|e| {
            MuninnError::Http(format!("application report request to {url} failed: {e}"))
        })?;

        if !response.status().is_success() {
            return Err(MuninnError::Http(format!(
                "application report for {app_id} returned HTTP {}",
                response.status()
            )));
        }

        let body = response.text().await.map_err(|e| {
            MuninnError::Http(format!("failed to read application report for {app_id}: {e}"))
        })?;
        let report: AppReportEnvelope = serde_json::from_str(&body)?;

        Ok(report.app.tracking_url)
    }
}
