//! [`ServiceClient`]: HTTP access to application web services through a
//! filter chain.
//!
//! The client wraps a shared [`reqwest::Client`] and an ordered list of
//! [`RequestFilter`]s. Every request is built, passed through the chain
//! (which may rewrite its URL and headers), and then executed. Clones
//! share the chain, so a filter attached through any clone is seen by
//! all of them.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::client::filter::RequestFilter;
use crate::{MuninnError, Result};

/// Filtered HTTP client for application web services.
///
/// ```
/// use std::sync::Arc;
/// use muninn::{SECURITY_FILTER_ID, SecurityHeaderFilter, ServiceClient};
///
/// # fn main() -> muninn::Result<()> {
/// let client = ServiceClient::new();
/// client.ensure_filter(Arc::new(SecurityHeaderFilter::new("tok")?))?;
/// client.ensure_filter(Arc::new(SecurityHeaderFilter::new("tok")?))?;
/// assert!(client.has_filter(SECURITY_FILTER_ID)?);
/// assert_eq!(client.filter_count()?, 1);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ServiceClient {
    http: reqwest::Client,
    filters: Arc<Mutex<Vec<Arc<dyn RequestFilter>>>>,
}

impl ServiceClient {
    /// Create a client with a default transport (30 s request timeout).
    pub fn new() -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("failed to build HTTP client");
        Self::with_http_client(http)
    }

    /// Create a client over an existing `reqwest::Client`.
    pub fn with_http_client(http: reqwest::Client) -> Self {
        Self {
            http,
            filters: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn locked(&self) -> Result<MutexGuard<'_, Vec<Arc<dyn RequestFilter>>>> {
        self.filters
            .lock()
            .map_err(|e| MuninnError::Configuration(format!("failed to acquire filter lock: {e}")))
    }

    /// Attach a filter, keeping at most one filter per id.
    ///
    /// If the chain already holds a filter with the same id it is
    /// replaced in place (a refreshed security token displaces the
    /// stale one); otherwise the filter is appended. Check and
    /// attach happen under one lock, so concurrent callers cannot
    /// stack duplicates.
    pub fn ensure_filter(&self, filter: Arc<dyn RequestFilter>) -> Result<()> {
        let mut filters = self.locked()?;
        if let Some(existing) = filters.iter_mut().find(|f| f.id() == filter.id()) {
            *existing = filter;
        } else {
            filters.push(filter);
        }
        Ok(())
    }

    /// Whether the chain holds a filter with this id.
    pub fn has_filter(&self, id: &str) -> Result<bool> {
        Ok(self.locked()?.iter().any(|f| f.id() == id))
    }

    /// Number of filters in the chain.
    pub fn filter_count(&self) -> Result<usize> {
        Ok(self.locked()?.len())
    }

    fn apply_filters(&self, request: &mut reqwest::Request) -> Result<()> {
        // Snapshot the chain so filters run outside the lock.
        let filters: Vec<_> = self.locked()?.iter().cloned().collect();
        for filter in filters {
            filter.apply(request);
        }
        Ok(())
    }

    /// Filtered GET returning the raw response.
    ///
    /// No status check: probe callers need the headers of non-2xx
    /// intermediate responses.
    pub async fn get(&self, url: impl reqwest::IntoUrl) -> Result<reqwest::Response> {
        let mut request = self
            .http
            .get(url)
            .build()
            .map_err(|e| MuninnError::Http(format!("invalid request: {e}")))?;
        self.apply_filters(&mut request)?;

        let url = request.url().clone();
        self.http
            .execute(request)
            .await
            .map_err(|e| MuninnError::Http(format!("GET {url} failed: {e}")))
    }

    /// Filtered GET expecting a 2xx JSON response.
    pub async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: impl reqwest::IntoUrl,
    ) -> Result<T> {
        let response = self.get(url).await?;
        let url = response.url().clone();
        let status = response.status();
        if !status.is_success() {
            return Err(MuninnError::Http(format!(
                "GET {url} returned HTTP {status}"
            )));
        }
        response
            .json::<T>()
            .await
            .map_err(|e| MuninnError::Protocol(format!("malformed response from {url}: {e}")))
    }
}

impl Default for ServiceClient {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Application resources
// ============================================================================

/// A handle on one node of an application's web service tree.
///
/// Cheap to clone and to derive sub-resources from; all requests go
/// through the owning [`ServiceClient`]'s filter chain, so version
/// conversion and security travel with the handle.
#[derive(Clone)]
pub struct AppResource {
    client: ServiceClient,
    url: reqwest::Url,
}

impl AppResource {
    /// Create a resource rooted at `url`.
    pub fn new(client: ServiceClient, url: reqwest::Url) -> Self {
        Self { client, url }
    }

    /// The resource URL.
    pub fn url(&self) -> &reqwest::Url {
        &self.url
    }

    /// Derive the sub-resource one path segment below this one.
    pub fn path(&self, segment: &str) -> Result<AppResource> {
        let mut url = self.url.clone();
        url.path_segments_mut()
            .map_err(|_| MuninnError::Configuration("resource URL cannot be a base".into()))?
            .push(segment);
        Ok(AppResource {
            client: self.client.clone(),
            url,
        })
    }

    /// Filtered GET of this resource, returning the raw response.
    pub async fn get(&self) -> Result<reqwest::Response> {
        self.client.get(self.url.clone()).await
    }

    /// Filtered GET of this resource, decoded from JSON.
    pub async fn get_json<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        self.client.get_json(self.url.clone()).await
    }
}
