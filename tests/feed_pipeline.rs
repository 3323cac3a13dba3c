use async_trait::async_trait;
use rhizome_feed::cli::ChallengePolicy;
use rhizome_feed::feed::{write_envelope, Feed};
use rhizome_feed::fetchers::{FetchError, FetchedPage, Fetcher, FixtureFetcher, Site};
use rhizome_feed::models::{ListingType, ResultEnvelope, Status};

fn fixture(name: &str) -> FixtureFetcher {
    FixtureFetcher::new(format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR")))
}

/// Returns canned HTML or a canned error
struct Canned {
    html: Option<&'static str>,
    rendered: bool,
    error: fn() -> FetchError,
}

impl Canned {
    fn page(html: &'static str, rendered: bool) -> Self {
        Self {
            html: Some(html),
            rendered,
            error: || FetchError::Status { status: 500 },
        }
    }

    fn failing(error: fn() -> FetchError) -> Self {
        Self {
            html: None,
            rendered: false,
            error,
        }
    }
}

#[async_trait]
impl Fetcher for Canned {
    async fn fetch(&self, _url: &str) -> Result<FetchedPage, FetchError> {
        match self.html {
            Some(html) => Ok(FetchedPage {
                html: html.to_string(),
                rendered: self.rendered,
            }),
            None => Err((self.error)()),
        }
    }

    fn name(&self) -> &'static str {
        "canned"
    }
}

fn feed(policy: ChallengePolicy) -> Feed {
    Feed::new(Site::default(), policy)
}

#[tokio::test]
async fn community_page_is_a_success() {
    let outcome = feed(ChallengePolicy::Fail)
        .collect(&fixture("community.html"))
        .await;

    assert!(!outcome.failed);
    assert_eq!(outcome.envelope.status, Status::Success);
    assert_eq!(outcome.envelope.community_listings.len(), 5);
    assert!(outcome
        .envelope
        .community_listings
        .iter()
        .all(|r| r.kind == ListingType::CommunityListing));
}

#[tokio::test]
async fn challenge_page_fails_by_default() {
    let outcome = feed(ChallengePolicy::Fail)
        .collect(&fixture("challenge.html"))
        .await;

    assert!(outcome.failed);
    let envelope = outcome.envelope;
    assert_eq!(envelope.status, Status::CloudflareProtected);
    assert_eq!(envelope.community_listings.len(), 1);
    assert_eq!(envelope.community_listings[0].kind, ListingType::SystemMessage);
    assert!(envelope.error.is_some());
}

#[tokio::test]
async fn challenge_page_can_exit_softly() {
    let outcome = feed(ChallengePolicy::Soft)
        .collect(&fixture("challenge.html"))
        .await;

    assert!(!outcome.failed);
    assert_eq!(outcome.envelope.status, Status::CloudflareProtected);
}

#[tokio::test]
async fn blocked_fetch_is_reported_as_challenge() {
    let outcome = feed(ChallengePolicy::Fail)
        .collect(&Canned::failing(|| FetchError::Blocked { status: 403 }))
        .await;

    assert!(outcome.failed);
    assert_eq!(outcome.envelope.status, Status::CloudflareProtected);
    assert!(outcome.envelope.error.unwrap().contains("403"));
}

#[tokio::test]
async fn transport_failure_is_an_error_envelope() {
    let outcome = feed(ChallengePolicy::Soft)
        .collect(&Canned::failing(|| FetchError::Status { status: 502 }))
        .await;

    assert!(outcome.failed);
    let envelope = outcome.envelope;
    assert_eq!(envelope.status, Status::Error);
    assert_eq!(envelope.community_listings.len(), 1);
    assert_eq!(envelope.community_listings[0].title, "Rhizome Community Access Error");
}

#[tokio::test]
async fn missing_fixture_is_an_error_envelope() {
    let outcome = feed(ChallengePolicy::Fail)
        .collect(&fixture("does-not-exist.html"))
        .await;

    assert!(outcome.failed);
    assert_eq!(outcome.envelope.status, Status::Error);
}

#[tokio::test]
async fn page_without_listings_gets_a_placeholder() {
    let html = "<html><head><title>Rhizome</title></head><body><p>Nothing yet</p></body></html>";

    let plain = feed(ChallengePolicy::Fail)
        .collect(&Canned::page(html, false))
        .await;
    assert!(!plain.failed);
    assert_eq!(plain.envelope.status, Status::NoListingsFound);
    assert_eq!(plain.envelope.community_listings[0].kind, ListingType::SystemMessage);

    let rendered = feed(ChallengePolicy::Fail)
        .collect(&Canned::page(html, true))
        .await;
    assert!(!rendered.failed);
    assert_eq!(rendered.envelope.status, Status::PartialSuccess);
    assert_eq!(rendered.envelope.community_listings[0].kind, ListingType::Placeholder);
}

#[tokio::test]
async fn envelope_is_written_as_pretty_json() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;
    let out = temp.path().join("data").join("rhizome.json");

    let outcome = feed(ChallengePolicy::Fail)
        .collect(&fixture("community.html"))
        .await;
    write_envelope(&outcome.envelope, &out)?;

    let raw = std::fs::read_to_string(&out)?;
    assert!(raw.contains("\n  \"community_listings\""));
    let parsed: ResultEnvelope = serde_json::from_str(&raw)?;
    assert_eq!(parsed.status, Status::Success);
    assert_eq!(
        parsed.community_listings,
        outcome.envelope.community_listings
    );

    Ok(())
}
