use crate::fetchers::types::FetchedPage;
use async_trait::async_trait;
use thiserror::Error;

/// Ways a fetch can fail before any HTML reaches the extractor
#[derive(Error, Debug)]
pub enum FetchError {
    /// Reachable but refused, still refused after the retry
    #[error("blocked by the site (HTTP {status})")]
    Blocked { status: u16 },

    #[error("unexpected HTTP status {status}")]
    Status { status: u16 },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("browser error: {0:#}")]
    Browser(anyhow::Error),

    #[error("failed to read fixture {path}: {source}")]
    Fixture {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    /// Whether the failure means "reachable but refused" rather than "unreachable"
    pub fn is_blocked(&self) -> bool {
        matches!(self, FetchError::Blocked { .. })
    }
}

/// Common trait for every way of getting the listings page.
/// Implementations are swapped by configuration; the extractor only sees the text.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch the document at `url`
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError>;

    /// Short name used in logs
    fn name(&self) -> &'static str;
}
