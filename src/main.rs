use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;
use rhizome_feed::cli::{Cli, Command};
use tracing::info;

#[tokio::main]
async fn main() -> ExitCode {
    match try_main().await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("ERROR: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn try_main() -> anyhow::Result<ExitCode> {
    rhizome_feed::logging::init().context("init logging")?;

    let cli = Cli::parse();

    match cli.command {
        Command::Fetch(args) => {
            tracing::debug!(?args, "parsed cli");
            info!("🎨 Rhizome community feed");
            rhizome_feed::feed::run(args).await.context("fetch")
        }
        Command::Changelog(args) => {
            rhizome_feed::changelog::run(args)
                .await
                .context("changelog")?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
