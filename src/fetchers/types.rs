use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// The site being scraped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    /// Scheme and host, prepended to root-relative links
    pub origin: String,
    /// Page holding the listings; also the default url of a record
    pub listings_url: String,
    /// Path prefix of links that point at individual listings
    pub link_prefix: String,
}

impl Default for Site {
    fn default() -> Self {
        Self {
            origin: "https://rhizome.org".to_string(),
            listings_url: "https://rhizome.org/community/".to_string(),
            link_prefix: "/community/".to_string(),
        }
    }
}

/// Knobs shared by the network-backed fetchers
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Flat per-request timeout
    pub timeout: Duration,
    /// Pause before the single retry after a blocking response
    pub retry_delay: Duration,
    /// Time given to a browser page to finish scripts after navigation
    pub settle_delay: Duration,
    pub user_agent: String,
    /// Where the browser fetcher drops page HTML and a screenshot
    pub debug_dir: Option<PathBuf>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            retry_delay: Duration::from_secs(5),
            settle_delay: Duration::from_secs(3),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            debug_dir: None,
        }
    }
}

/// Raw document handed back by a fetcher
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub html: String,
    /// True when scripts ran before the HTML was captured
    pub rendered: bool,
}
