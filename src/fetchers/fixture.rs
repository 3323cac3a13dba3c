use crate::fetchers::traits::{FetchError, Fetcher};
use crate::fetchers::types::FetchedPage;
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{debug, info};

/// Serves a saved HTML file instead of touching the network
pub struct FixtureFetcher {
    path: PathBuf,
}

impl FixtureFetcher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl Fetcher for FixtureFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        debug!("Ignoring {} and reading {}", url, self.path.display());

        let html = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| FetchError::Fixture {
                path: self.path.display().to_string(),
                source,
            })?;

        info!("Loaded {} bytes from {}", html.len(), self.path.display());
        Ok(FetchedPage {
            html,
            rendered: false,
        })
    }

    fn name(&self) -> &'static str {
        "fixture"
    }
}
