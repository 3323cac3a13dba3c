use crate::fetchers::traits::{FetchError, Fetcher};
use crate::fetchers::types::FetchedPage;
use async_trait::async_trait;
use tracing::warn;

/// Tries `primary`, and on any failure hands the same url to `secondary`.
/// The secondary's error is the one reported.
pub struct FallbackFetcher {
    primary: Box<dyn Fetcher>,
    secondary: Box<dyn Fetcher>,
}

impl FallbackFetcher {
    pub fn new(primary: Box<dyn Fetcher>, secondary: Box<dyn Fetcher>) -> Self {
        Self { primary, secondary }
    }
}

#[async_trait]
impl Fetcher for FallbackFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        match self.primary.fetch(url).await {
            Ok(page) => Ok(page),
            Err(err) => {
                warn!(
                    "{} fetcher failed ({}), trying {}",
                    self.primary.name(),
                    err,
                    self.secondary.name()
                );
                self.secondary.fetch(url).await
            }
        }
    }

    fn name(&self) -> &'static str {
        "auto"
    }
}
