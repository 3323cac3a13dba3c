//! One run of the listings feed: fetch, screen for challenge pages, extract,
//! and wrap the result in an envelope.

use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{error, info, warn};

use crate::challenge::ChallengeDetector;
use crate::cli::{ChallengePolicy, FetchArgs, FetcherKind};
use crate::extract::{page_title, Extractor};
use crate::fetchers::{
    BrowserFetcher, FallbackFetcher, FetchOptions, Fetcher, FixtureFetcher, HttpFetcher, Site,
};
use crate::models::ResultEnvelope;

/// Envelope plus whether the process should report failure
#[derive(Debug)]
pub struct Outcome {
    pub envelope: ResultEnvelope,
    pub failed: bool,
}

pub struct Feed {
    site: Site,
    extractor: Extractor,
    detector: ChallengeDetector,
    policy: ChallengePolicy,
}

impl Feed {
    pub fn new(site: Site, policy: ChallengePolicy) -> Self {
        Self {
            extractor: Extractor::new(site.clone()),
            detector: ChallengeDetector::default(),
            site,
            policy,
        }
    }

    /// Produce an envelope for the listings page. Never fails: every error
    /// is folded into the envelope status.
    pub async fn collect(&self, fetcher: &dyn Fetcher) -> Outcome {
        let now = Utc::now();
        let url = &self.site.listings_url;
        info!("Fetching {} with the {} fetcher", url, fetcher.name());

        let page = match fetcher.fetch(url).await {
            Ok(page) => page,
            Err(err) if err.is_blocked() => {
                warn!("Cloudflare protection detected: {}", err);
                return self.challenged(ResultEnvelope::challenged(
                    format!("{err} - Cloudflare JavaScript challenge required"),
                    &self.site,
                    now,
                ));
            }
            Err(err) => {
                error!("Error fetching page: {}", err);
                return Outcome {
                    envelope: ResultEnvelope::failed(err.to_string(), &self.site, now),
                    failed: true,
                };
            }
        };

        if let Some(marker) = self.detector.detect(&page.html) {
            warn!("Challenge page received (matched {:?})", marker);
            return self.challenged(ResultEnvelope::challenged(
                "Cloudflare JavaScript challenge page received",
                &self.site,
                now,
            ));
        }

        info!("Parsing community listings...");
        let extracted = panic::catch_unwind(AssertUnwindSafe(|| {
            self.extractor.extract_at(&page.html, now)
        }));
        let listings = extracted.unwrap_or_else(|_| {
            warn!("Extraction panicked, treating the page as empty");
            Vec::new()
        });

        if listings.is_empty() {
            warn!("No listings found. Page structure may have changed.");
            info!(
                "Page title: {}",
                page_title(&page.html).unwrap_or_else(|| "No title".to_string())
            );
        } else {
            info!("✅ Found {} community listings", listings.len());
        }

        Outcome {
            envelope: ResultEnvelope::from_listings(listings, page.rendered, &self.site, now),
            failed: false,
        }
    }

    fn challenged(&self, envelope: ResultEnvelope) -> Outcome {
        Outcome {
            envelope,
            failed: self.policy == ChallengePolicy::Fail,
        }
    }
}

/// Choose the fetcher named by the arguments
pub fn build_fetcher(args: &FetchArgs) -> Result<Box<dyn Fetcher>> {
    let options = FetchOptions {
        timeout: Duration::from_secs(args.timeout_secs),
        retry_delay: Duration::from_secs(args.retry_delay_secs),
        settle_delay: Duration::from_secs(args.settle_secs),
        debug_dir: args.debug_dir.clone(),
        ..FetchOptions::default()
    };

    let fetcher: Box<dyn Fetcher> = match args.fetcher {
        FetcherKind::Auto => Box::new(FallbackFetcher::new(
            Box::new(BrowserFetcher::new(options.clone())),
            Box::new(HttpFetcher::with_options(options)?),
        )),
        FetcherKind::Browser => Box::new(BrowserFetcher::new(options)),
        FetcherKind::Http => Box::new(HttpFetcher::with_options(options)?),
        FetcherKind::Fixture => {
            let path = args
                .fixture
                .clone()
                .context("--fixture is required with --fetcher fixture")?;
            Box::new(FixtureFetcher::new(path))
        }
    };

    Ok(fetcher)
}

/// Write the envelope as pretty JSON; `-` means stdout
pub fn write_envelope(envelope: &ResultEnvelope, out: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(envelope).context("serialize envelope")?;

    if out == Path::new("-") {
        println!("{json}");
        return Ok(());
    }

    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir: {}", parent.display()))?;
    }
    std::fs::write(out, format!("{json}\n"))
        .with_context(|| format!("write envelope: {}", out.display()))?;

    Ok(())
}

pub async fn run(args: FetchArgs) -> Result<ExitCode> {
    let site = Site {
        origin: args.origin.trim_end_matches('/').to_string(),
        listings_url: args.url.clone(),
        link_prefix: args.link_prefix.clone(),
    };

    let fetcher = build_fetcher(&args).context("build fetcher")?;
    let feed = Feed::new(site, args.on_challenge);
    let outcome = feed.collect(fetcher.as_ref()).await;

    write_envelope(&outcome.envelope, &args.out)?;
    if args.out != Path::new("-") {
        info!(
            "💾 Saved {} - Status: {}",
            args.out.display(),
            outcome.envelope.status.as_str()
        );
    }
    info!(
        "Found {} listing(s)",
        outcome.envelope.community_listings.len()
    );

    Ok(if outcome.failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
