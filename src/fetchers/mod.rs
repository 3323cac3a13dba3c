pub mod browser;
pub mod fallback;
pub mod fixture;
pub mod http;
pub mod traits;
pub mod types;

pub use browser::BrowserFetcher;
pub use fallback::FallbackFetcher;
pub use fixture::FixtureFetcher;
pub use http::HttpFetcher;
pub use traits::{FetchError, Fetcher};
pub use types::{FetchOptions, FetchedPage, Site};
