use crate::fetchers::traits::{FetchError, Fetcher};
use crate::fetchers::types::{FetchOptions, FetchedPage};
use anyhow::{Context, Result};
use async_trait::async_trait;
use headless_chrome::protocol::cdp::Page::CaptureScreenshotFormatOption;
use headless_chrome::{Browser, LaunchOptions};
use std::path::Path;
use std::thread;
use tracing::{info, warn};

/// Browser-based fetcher using headless Chrome.
///
/// Launches one browser with one tab per fetch and lets page scripts (and
/// any interstitial) run for `settle_delay` before capturing the DOM.
pub struct BrowserFetcher {
    options: FetchOptions,
}

impl BrowserFetcher {
    pub fn new(options: FetchOptions) -> Self {
        Self { options }
    }
}

fn render_page(url: &str, options: &FetchOptions) -> Result<String> {
    info!("Launching headless Chrome...");

    let launch = LaunchOptions::default_builder()
        .headless(true)
        .sandbox(false)
        .build()
        .context("Failed to build launch options")?;

    let browser = Browser::new(launch).context("Failed to launch Chrome browser")?;
    let tab = browser.new_tab().context("Failed to open tab")?;
    tab.set_default_timeout(options.timeout);
    tab.set_user_agent(&options.user_agent, None, None)
        .context("Failed to set user agent")?;

    info!("Opening {}...", url);
    tab.navigate_to(url)?;
    tab.wait_until_navigated()?;

    info!("Waiting {:?} for page scripts to settle...", options.settle_delay);
    thread::sleep(options.settle_delay);

    let html_result = tab.evaluate("document.documentElement.outerHTML", false)?;
    let html = match html_result.value {
        Some(value) => value.as_str().unwrap_or("").to_string(),
        None => {
            warn!("Could not get HTML from page");
            String::new()
        }
    };

    if let Some(dir) = &options.debug_dir {
        if let Err(err) = capture_debug(dir, &html, &tab) {
            warn!("Failed to write debug capture: {:#}", err);
        }
    }

    if let Err(err) = tab.close(true) {
        warn!("Failed to close tab: {:#}", err);
    }

    Ok(html)
}

fn capture_debug(dir: &Path, html: &str, tab: &headless_chrome::Tab) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    let html_path = dir.join("rhizome_page.html");
    std::fs::write(&html_path, html)?;
    info!("Saved page HTML to {} ({} bytes)", html_path.display(), html.len());

    let screenshot = tab.capture_screenshot(CaptureScreenshotFormatOption::Png, None, None, true)?;
    let png_path = dir.join("rhizome_screenshot.png");
    std::fs::write(&png_path, screenshot)?;
    info!("Saved screenshot to {}", png_path.display());

    Ok(())
}

#[async_trait]
impl Fetcher for BrowserFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let url = url.to_string();
        let options = self.options.clone();

        // CDP calls block; keep them off the async workers.
        let html = tokio::task::spawn_blocking(move || render_page(&url, &options))
            .await
            .map_err(|err| FetchError::Browser(anyhow::anyhow!("browser task failed: {err}")))?
            .map_err(FetchError::Browser)?;

        info!("Captured {} bytes of rendered HTML", html.len());
        Ok(FetchedPage {
            html,
            rendered: true,
        })
    }

    fn name(&self) -> &'static str {
        "browser"
    }
}
