//! Single-attempt endpoint fetch and payload classification.
//!
//! [`FetchNormalizer`] GETs a URL, reads the body as text, and classifies it
//! with [`WidgetData::from_body`]. Any transport failure becomes an in-band
//! error marker; nothing is retried and nothing is raised past this module.
//! HTTP status codes are not inspected: an error page body is classified like
//! any other body.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use widgetdash_core::error::CoreError;
use widgetdash_core::types::display_time_now;
use widgetdash_core::widget::{WidgetData, CONNECT_ERROR_MESSAGE, FETCH_ERROR_MESSAGE};

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Why a body could not be obtained.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The HTTP request itself failed (network, DNS, TLS, body read).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The configured per-call timeout elapsed.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// A non-HTTP transport reported failure.
    #[error("Transport failed: {0}")]
    Transport(String),
}

// ---------------------------------------------------------------------------
// Transport seam
// ---------------------------------------------------------------------------

/// Obtains a response body as text.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn get_text(&self, url: &str) -> Result<String, FetchError>;
}

/// [`Fetch`] over a shared [`reqwest::Client`]. Plain GET, no headers.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reuse an existing client (connection pooling across callers).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await?;
        tracing::debug!(url, status = response.status().as_u16(), "Endpoint responded");
        Ok(response.text().await?)
    }
}

/// Serves canned bodies by URL; unknown URLs fail like an unreachable host.
#[derive(Debug, Clone, Default)]
pub struct StaticFetcher {
    bodies: HashMap<String, String>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.bodies.insert(url.into(), body.into());
        self
    }
}

#[async_trait]
impl Fetch for StaticFetcher {
    async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        self.bodies
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Transport(format!("no route to {url}")))
    }
}

// ---------------------------------------------------------------------------
// FetchNormalizer
// ---------------------------------------------------------------------------

/// A classified payload plus the time the attempt finished.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome {
    pub data: WidgetData,
    pub last_updated: String,
}

/// Result of the editor's manual "test endpoint" action.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointTest {
    /// Whether a body was obtained at all.
    pub reachable: bool,
    pub data: WidgetData,
}

/// Fetches and classifies widget payloads.
#[derive(Clone)]
pub struct FetchNormalizer {
    fetcher: Arc<dyn Fetch>,
    timeout: Option<Duration>,
}

impl FetchNormalizer {
    pub fn new(fetcher: Arc<dyn Fetch>) -> Self {
        Self {
            fetcher,
            timeout: None,
        }
    }

    /// Bound each attempt; an elapsed timeout counts as a transport failure.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    async fn fetch_body(&self, url: &str) -> Result<String, FetchError> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.fetcher.get_text(url))
                .await
                .map_err(|_| FetchError::Timeout(limit))?,
            None => self.fetcher.get_text(url).await,
        }
    }

    /// Fetch, classify, and stamp one widget payload. Never fails.
    pub async fn fetch_widget_data(&self, url: &str) -> FetchOutcome {
        let data = match self.fetch_body(url).await {
            Ok(body) => WidgetData::from_body(&body),
            Err(e) => {
                tracing::warn!(url, error = %e, "Widget fetch failed");
                WidgetData::error(FETCH_ERROR_MESSAGE)
            }
        };
        FetchOutcome {
            data,
            last_updated: display_time_now(),
        }
    }

    /// Try an endpoint from the editor before saving.
    ///
    /// A blank URL is rejected without any request.
    pub async fn test_endpoint(&self, url: &str) -> Result<EndpointTest, CoreError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(CoreError::Validation("Please enter an API URL".to_string()));
        }

        match self.fetch_body(url).await {
            Ok(body) => Ok(EndpointTest {
                reachable: true,
                data: WidgetData::from_body(&body),
            }),
            Err(e) => {
                tracing::warn!(url, error = %e, "Endpoint test failed");
                Ok(EndpointTest {
                    reachable: false,
                    data: WidgetData::error(CONNECT_ERROR_MESSAGE),
                })
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    struct Hang;

    #[async_trait]
    impl Fetch for Hang {
        async fn get_text(&self, _url: &str) -> Result<String, FetchError> {
            std::future::pending().await
        }
    }

    fn normalizer(fetcher: StaticFetcher) -> FetchNormalizer {
        FetchNormalizer::new(Arc::new(fetcher))
    }

    #[tokio::test]
    async fn json_scalar_body_is_stored_as_number() {
        let n = normalizer(StaticFetcher::new().with_body("u", "42"));
        let outcome = n.fetch_widget_data("u").await;
        assert_eq!(outcome.data, WidgetData::Json(json!(42)));
        assert!(!outcome.last_updated.is_empty());
    }

    #[tokio::test]
    async fn non_json_body_is_kept_verbatim() {
        let n = normalizer(StaticFetcher::new().with_body("u", "not json"));
        assert_eq!(
            n.fetch_widget_data("u").await.data,
            WidgetData::Text("not json".to_string())
        );
    }

    #[tokio::test]
    async fn transport_failure_becomes_error_marker() {
        let n = normalizer(StaticFetcher::new());
        let outcome = n.fetch_widget_data("https://unreachable.invalid").await;
        assert_eq!(outcome.data, WidgetData::error("Couldn't fetch data"));
        assert!(!outcome.last_updated.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_becomes_error_marker() {
        let n = FetchNormalizer::new(Arc::new(Hang)).with_timeout(Some(Duration::from_secs(5)));
        let outcome = n.fetch_widget_data("u").await;
        assert_eq!(outcome.data, WidgetData::error(FETCH_ERROR_MESSAGE));
    }

    #[tokio::test]
    async fn endpoint_test_paths() {
        let n = normalizer(StaticFetcher::new().with_body("ok", r#"{"a":1}"#));

        assert_matches!(n.test_endpoint("  ").await, Err(CoreError::Validation(_)));

        let ok = n.test_endpoint(" ok ").await.unwrap();
        assert!(ok.reachable);
        assert_eq!(ok.data, WidgetData::Json(json!({"a": 1})));

        let failed = n.test_endpoint("down").await.unwrap();
        assert!(!failed.reachable);
        assert_eq!(failed.data, WidgetData::error("Failed to connect"));
    }

    #[test]
    fn fetch_error_display() {
        assert_eq!(
            FetchError::Timeout(Duration::from_secs(3)).to_string(),
            "Request timed out after 3s"
        );
        let req_err = reqwest::Client::new().get("://bad").build().unwrap_err();
        assert!(FetchError::Request(req_err)
            .to_string()
            .contains("HTTP request failed"));
    }
}
