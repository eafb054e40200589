//! HTTP access for article pages and lead images.
//!
//! A single [`Fetcher`] is shared by every worker. It owns one
//! `reqwest::Client` configured with a fixed timeout, so the page fetch and
//! the lead image download are bounded by the same limit. There is no retry:
//! a failure is reported once and that URL is skipped.

use crate::error::ScrapeError;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Timeout applied to every request when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Shared HTTP client with a fixed per-request timeout.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Build a fetcher whose every request gives up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Client`] if the TLS backend cannot be initialized.
    pub fn new(timeout: Duration) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ScrapeError::Client)?;
        Ok(Self { client })
    }

    /// GET an article page and return its body as text.
    ///
    /// Network errors, timeouts and 4xx/5xx statuses all become
    /// [`ScrapeError::Fetch`] carrying the URL. Redirects follow the client
    /// default policy.
    #[instrument(level = "info", skip(self))]
    pub async fn fetch_html(&self, url: &str) -> Result<String, ScrapeError> {
        let to_err = |source| ScrapeError::Fetch {
            url: url.to_string(),
            source,
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                warn!(error = %e, "Page request failed");
                to_err(e)
            })?;
        let html = response.text().await.map_err(to_err)?;

        debug!(bytes = html.len(), "Fetched page");
        Ok(html)
    }

    /// GET a lead image and return the raw bytes.
    #[instrument(level = "info", skip(self))]
    pub async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, ScrapeError> {
        let to_err = |source| ScrapeError::ImageDownload {
            url: url.to_string(),
            source,
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(to_err)?;
        let bytes = response.bytes().await.map_err(to_err)?;

        debug!(bytes = bytes.len(), "Fetched image");
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_html_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/story"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<h1>Hi</h1>"))
            .mount(&server)
            .await;

        let fetcher = Fetcher::new(DEFAULT_TIMEOUT).unwrap();
        let html = fetcher
            .fetch_html(&format!("{}/story", server.uri()))
            .await
            .unwrap();
        assert_eq!(html, "<h1>Hi</h1>");
    }

    #[tokio::test]
    async fn test_fetch_html_error_status_is_fetch_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = Fetcher::new(DEFAULT_TIMEOUT).unwrap();
        let url = format!("{}/missing", server.uri());
        let err = fetcher.fetch_html(&url).await.unwrap_err();

        assert!(err.is_fetch());
        assert!(err.to_string().starts_with(&format!("Error fetching {url}: ")));
    }

    #[tokio::test]
    async fn test_fetch_html_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("late")
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let fetcher = Fetcher::new(Duration::from_millis(200)).unwrap();
        let err = fetcher
            .fetch_html(&format!("{}/slow", server.uri()))
            .await
            .unwrap_err();
        assert!(err.is_fetch());
    }

    #[tokio::test]
    async fn test_fetch_html_rejects_garbage_url() {
        let fetcher = Fetcher::new(DEFAULT_TIMEOUT).unwrap();
        let err = fetcher.fetch_html("not a url").await.unwrap_err();
        assert!(err.is_fetch());
    }

    #[tokio::test]
    async fn test_fetch_image_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/lead.png"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let fetcher = Fetcher::new(DEFAULT_TIMEOUT).unwrap();
        let err = fetcher
            .fetch_image(&format!("{}/lead.png", server.uri()))
            .await
            .unwrap_err();
        assert!(matches!(err, ScrapeError::ImageDownload { .. }));
    }
}
