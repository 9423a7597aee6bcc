//! Location hierarchy source and its session cache.
//!
//! The hierarchy is fetched once per session and shared read-only across
//! every form; only the cache may replace it, wholesale, on refresh.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Url};
use tokio::sync::Mutex;

use crumb_core::{AppConfig, LocationHierarchy};

use crate::error::ApiError;
use crate::retry::retry_with_backoff;
use crate::RetryPolicy;

const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = "crumb/0.1 (storefront-client)";

/// Client for the location data source.
///
/// Use [`LocationsClient::from_config`] in production or
/// [`LocationsClient::new`] to point at a mock server in tests.
pub struct LocationsClient {
    client: Client,
    hierarchy_url: Url,
    retry: RetryPolicy,
}

impl LocationsClient {
    /// Creates a client with default connect timeout and retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed, or [`ApiError::InvalidBaseUrl`] for an unparseable
    /// `base_url`.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, ApiError> {
        Self::with_timeouts(
            base_url,
            timeout_secs,
            DEFAULT_CONNECT_TIMEOUT_SECS,
            RetryPolicy::default(),
        )
    }

    /// # Errors
    ///
    /// See [`LocationsClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, ApiError> {
        Self::with_timeouts(
            &config.api_base_url,
            config.request_timeout_secs,
            config.connect_timeout_secs,
            RetryPolicy {
                max_retries: config.max_retries,
                backoff_base_ms: config.retry_backoff_base_ms,
            },
        )
    }

    /// # Errors
    ///
    /// See [`LocationsClient::new`].
    pub fn with_timeouts(
        base_url: &str,
        timeout_secs: u64,
        connect_timeout_secs: u64,
        retry: RetryPolicy,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .user_agent(USER_AGENT)
            .build()?;

        let hierarchy_url = endpoint(base_url, "api/v1/locations")?;
        Ok(Self {
            client,
            hierarchy_url,
            retry,
        })
    }

    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Fetch the full hierarchy. Transient failures retry per the client's
    /// [`RetryPolicy`].
    ///
    /// # Errors
    ///
    /// - [`ApiError::Http`] on network failure or non-2xx status.
    /// - [`ApiError::Deserialize`] if the body does not match the expected
    ///   `{ country: { states: { state: { cities: [...] } } } }` shape.
    pub async fn fetch_hierarchy(&self) -> Result<LocationHierarchy, ApiError> {
        retry_with_backoff(self.retry.max_retries, self.retry.backoff_base_ms, || {
            self.fetch_hierarchy_once()
        })
        .await
    }

    async fn fetch_hierarchy_once(&self) -> Result<LocationHierarchy, ApiError> {
        let response = self.client.get(self.hierarchy_url.clone()).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Deserialize {
            context: self.hierarchy_url.to_string(),
            source: e,
        })
    }
}

/// Resolve `path` against a base URL, normalising the trailing slash so the
/// path is appended rather than replacing the last segment.
pub(crate) fn endpoint(base_url: &str, path: &str) -> Result<Url, ApiError> {
    let normalized = format!("{}/", base_url.trim_end_matches('/'));
    let invalid = |e: &dyn std::fmt::Display| ApiError::InvalidBaseUrl {
        url: base_url.to_string(),
        reason: e.to_string(),
    };
    let base = Url::parse(&normalized).map_err(|e| invalid(&e))?;
    base.join(path).map_err(|e| invalid(&e))
}

#[derive(Default)]
struct CacheInner {
    committed: Option<Arc<LocationHierarchy>>,
    committed_ticket: u64,
    next_ticket: u64,
}

/// Commit a fetched hierarchy unless a newer fetch already committed.
///
/// Last-committed-wins: a result carrying a ticket at or below the committed
/// one is discarded and the caller gets the fresher committed snapshot.
fn commit(
    inner: &mut CacheInner,
    ticket: u64,
    fetched: LocationHierarchy,
) -> Arc<LocationHierarchy> {
    if ticket <= inner.committed_ticket {
        if let Some(existing) = &inner.committed {
            tracing::debug!(
                ticket,
                committed_ticket = inner.committed_ticket,
                "discarding superseded hierarchy fetch"
            );
            return Arc::clone(existing);
        }
    }
    let arc = Arc::new(fetched);
    inner.committed = Some(Arc::clone(&arc));
    inner.committed_ticket = ticket;
    arc
}

/// Fetch-once, read-many cache over [`LocationsClient`].
///
/// Concurrent [`HierarchyCache::load`] callers share one in-flight fetch:
/// later callers queue behind it and observe the committed result instead of
/// issuing duplicate requests. A failed fetch leaves the cache empty — a
/// failure is never cached as valid empty data.
pub struct HierarchyCache {
    client: LocationsClient,
    inner: Mutex<CacheInner>,
}

impl HierarchyCache {
    #[must_use]
    pub fn new(client: LocationsClient) -> Self {
        Self {
            client,
            inner: Mutex::new(CacheInner::default()),
        }
    }

    /// The committed hierarchy, fetching it on first use.
    ///
    /// # Errors
    ///
    /// Returns the fetch error when no hierarchy has been committed and the
    /// fetch fails; the next call fetches again.
    pub async fn load(&self) -> Result<Arc<LocationHierarchy>, ApiError> {
        // Holding the lock across the fetch is what serializes duplicate
        // callers onto a single in-flight request.
        let mut inner = self.inner.lock().await;
        if let Some(committed) = &inner.committed {
            return Ok(Arc::clone(committed));
        }
        inner.next_ticket += 1;
        let ticket = inner.next_ticket;
        let fetched = self.client.fetch_hierarchy().await?;
        Ok(commit(&mut inner, ticket, fetched))
    }

    /// Force a fresh fetch and replace the committed hierarchy wholesale.
    ///
    /// Refreshes do not hold the cache lock while in flight, so an older
    /// refresh can resolve after a newer one; its result is then discarded
    /// (last-committed-wins) and the newer snapshot is returned.
    ///
    /// # Errors
    ///
    /// Returns the fetch error; the previously committed hierarchy, if any,
    /// stays in place.
    pub async fn refresh(&self) -> Result<Arc<LocationHierarchy>, ApiError> {
        let ticket = {
            let mut inner = self.inner.lock().await;
            inner.next_ticket += 1;
            inner.next_ticket
        };
        let fetched = self.client.fetch_hierarchy().await?;
        let mut inner = self.inner.lock().await;
        Ok(commit(&mut inner, ticket, fetched))
    }

    /// The committed hierarchy without fetching, if one exists.
    pub async fn cached(&self) -> Option<Arc<LocationHierarchy>> {
        self.inner.lock().await.committed.as_ref().map(Arc::clone)
    }
}
