use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch the community page and write the listings envelope.
    Fetch(FetchArgs),
    /// Turn a diff into a changelog with a hosted language model.
    Changelog(ChangelogArgs),
}

/// How the listings page is retrieved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FetcherKind {
    /// Headless browser first, plain HTTP if the browser fails.
    Auto,
    Browser,
    Http,
    /// Read a saved HTML file (requires --fixture).
    Fixture,
}

/// Exit status when the site answers with a challenge page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ChallengePolicy {
    /// Write the envelope and exit non-zero.
    Fail,
    /// Write the envelope and exit zero.
    Soft,
}

#[derive(Debug, Args)]
pub struct FetchArgs {
    #[arg(long, value_enum, env = "RHIZOME_FETCHER", default_value_t = FetcherKind::Auto)]
    pub fetcher: FetcherKind,

    /// HTML file served by the fixture fetcher.
    #[arg(long, env = "RHIZOME_FIXTURE", required_if_eq("fetcher", "fixture"))]
    pub fixture: Option<PathBuf>,

    /// Listings page URL.
    #[arg(long, env = "RHIZOME_URL", default_value = "https://rhizome.org/community/")]
    pub url: String,

    /// Origin prepended to root-relative links.
    #[arg(long, env = "RHIZOME_ORIGIN", default_value = "https://rhizome.org")]
    pub origin: String,

    /// Path prefix of links that point at listings.
    #[arg(long, env = "RHIZOME_LINK_PREFIX", default_value = "/community/")]
    pub link_prefix: String,

    /// Output file for the JSON envelope (`-` for stdout).
    #[arg(long, env = "RHIZOME_OUT", default_value = "data/rhizome.json")]
    pub out: PathBuf,

    #[arg(long, value_enum, env = "RHIZOME_ON_CHALLENGE", default_value_t = ChallengePolicy::Fail)]
    pub on_challenge: ChallengePolicy,

    /// Per-request timeout.
    #[arg(long, env = "RHIZOME_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    /// Delay before the single retry after a blocking response.
    #[arg(long, env = "RHIZOME_RETRY_DELAY_SECS", default_value_t = 5)]
    pub retry_delay_secs: u64,

    /// Time given to page scripts after browser navigation.
    #[arg(long, env = "RHIZOME_SETTLE_SECS", default_value_t = 3)]
    pub settle_secs: u64,

    /// Directory for browser HTML/screenshot captures.
    #[arg(long, env = "RHIZOME_DEBUG_DIR")]
    pub debug_dir: Option<PathBuf>,
}

/// Shape of the changelog prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ChangelogMode {
    /// One entry per commit.
    ByCommit,
    /// One summary of the net change.
    Unified,
}

#[derive(Debug, Args)]
pub struct ChangelogArgs {
    #[arg(long, value_enum)]
    pub mode: ChangelogMode,

    /// File holding the diff text.
    #[arg(long)]
    pub diff: PathBuf,

    /// Output file for the generated changelog.
    #[arg(long)]
    pub out: PathBuf,

    /// Commit list embedded in unified mode.
    #[arg(long)]
    pub commits: Option<PathBuf>,

    /// Repository URL used for commit links.
    #[arg(long, env = "CHANGELOG_REPO_URL")]
    pub repo_url: Option<String>,

    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, env = "ANTHROPIC_BASE_URL", default_value = "https://api.anthropic.com")]
    pub base_url: String,

    #[arg(long, env = "CHANGELOG_MODEL", default_value = "claude-sonnet-4-20250514")]
    pub model: String,

    #[arg(long, default_value_t = 4096)]
    pub max_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_defaults() {
        let cli = Cli::try_parse_from(["rhizome-feed", "fetch"]).unwrap();
        let Command::Fetch(args) = cli.command else {
            panic!("expected fetch");
        };
        assert_eq!(args.fetcher, FetcherKind::Auto);
        assert_eq!(args.on_challenge, ChallengePolicy::Fail);
        assert_eq!(args.out, PathBuf::from("data/rhizome.json"));
        assert_eq!(args.timeout_secs, 30);
    }

    #[test]
    fn fixture_fetcher_requires_a_path() {
        assert!(Cli::try_parse_from(["rhizome-feed", "fetch", "--fetcher", "fixture"]).is_err());
        assert!(Cli::try_parse_from([
            "rhizome-feed",
            "fetch",
            "--fetcher",
            "fixture",
            "--fixture",
            "page.html"
        ])
        .is_ok());
    }

    #[test]
    fn changelog_modes_use_kebab_case() {
        let cli = Cli::try_parse_from([
            "rhizome-feed",
            "changelog",
            "--mode",
            "by-commit",
            "--diff",
            "d.txt",
            "--out",
            "c.md",
        ])
        .unwrap();
        let Command::Changelog(args) = cli.command else {
            panic!("expected changelog");
        };
        assert_eq!(args.mode, ChangelogMode::ByCommit);
    }
}
