//! Changelog generation: fill a prompt template with diff text, send it to
//! the Messages API and write back whatever text comes out.

pub mod client;
pub mod prompt;

use std::time::Duration;

use anyhow::Context as _;
use tracing::info;

use crate::cli::ChangelogArgs;
use prompt::PromptInput;

pub async fn run(args: ChangelogArgs) -> anyhow::Result<()> {
    let diff = std::fs::read_to_string(&args.diff)
        .with_context(|| format!("read diff: {}", args.diff.display()))?;
    let commits = match &args.commits {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("read commits: {}", path.display()))?,
        None => String::new(),
    };

    let api_key = args
        .api_key
        .as_deref()
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .context("ANTHROPIC_API_KEY environment variable not set")?;

    let prompt = prompt::build(
        args.mode,
        &PromptInput {
            diff: &diff,
            commits: &commits,
            repo_url: args.repo_url.as_deref(),
        },
    );
    tracing::debug!(mode = ?args.mode, chars = prompt.len(), "built changelog prompt");

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(300))
        .build()
        .context("build HTTP client")?;
    let endpoint = client::messages_endpoint(&args.base_url);

    info!("Requesting changelog from {}", args.model);
    let changelog = client::messages_text(
        &http,
        &endpoint,
        api_key,
        &args.model,
        args.max_tokens,
        &prompt,
    )
    .await
    .context("call Messages API")?;

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir: {}", parent.display()))?;
    }
    std::fs::write(&args.out, changelog)
        .with_context(|| format!("write changelog: {}", args.out.display()))?;

    info!("✓ Changelog written to {}", args.out.display());
    Ok(())
}
