use crate::challenge::ChallengeDetector;
use crate::fetchers::traits::{FetchError, Fetcher};
use crate::fetchers::types::{FetchOptions, FetchedPage};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::{Client, StatusCode};
use tracing::{debug, info, warn};

/// Plain HTTP fetcher with browser-like headers and a single retry
pub struct HttpFetcher {
    client: Client,
    options: FetchOptions,
    detector: ChallengeDetector,
}

impl HttpFetcher {
    /// Create a new HTTP fetcher with custom options
    pub fn with_options(options: FetchOptions) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));

        let client = Client::builder()
            .timeout(options.timeout)
            .user_agent(options.user_agent.clone())
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            options,
            detector: ChallengeDetector::default(),
        })
    }

    async fn get(&self, url: &str) -> Result<(StatusCode, String), FetchError> {
        debug!("Fetching URL: {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(status = status.as_u16(), bytes = body.len(), "response received");
        Ok((status, body))
    }

    fn is_blocking(&self, status: StatusCode, body: &str) -> bool {
        status == StatusCode::FORBIDDEN || self.detector.detect(body).is_some()
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let (mut status, mut body) = self.get(url).await?;

        if self.is_blocking(status, &body) {
            warn!(
                status = status.as_u16(),
                "Blocking response detected, retrying once in {:?}",
                self.options.retry_delay
            );
            tokio::time::sleep(self.options.retry_delay).await;
            (status, body) = self.get(url).await?;
        }

        if status == StatusCode::FORBIDDEN {
            return Err(FetchError::Blocked {
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            warn!("Site returned status: {}", status);
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        info!("Downloaded {} bytes of HTML", body.len());
        Ok(FetchedPage {
            html: body,
            rendered: false,
        })
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
