//! sprint-closer CLI - close out the current DevEx sprint.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sprint_closer::profile::Profile;
use sprint_closer::trello::TrelloClient;
use sprint_closer::workflow;

/// Archive the Done list and reset the Current Sprint board.
#[derive(Parser)]
#[command(name = "sprint-closer")]
#[command(about = "Archive the Done list and reset the Current Sprint board")]
#[command(version)]
struct Cli {
    /// Logging level (error, warn, info, debug, trace). Case-insensitive.
    #[arg(short, long, default_value = "info")]
    log: String,

    /// Path to the JSON credentials profile. Defaults to ~/.trello.json.
    #[arg(short, long)]
    profile: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = EnvFilter::try_new(cli.log.to_lowercase())
        .with_context(|| format!("Unrecognized log level: {}", cli.log))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let profile_path = cli.profile.unwrap_or_else(Profile::default_path);
    let profile = Profile::load(&profile_path)?;

    let client = TrelloClient::new(profile).context("Failed to create Trello client")?;

    let report = workflow::close_sprint(&client).await?;

    info!(
        board_id = %report.archive_board_id,
        board_name = %report.archive_board_name,
        members_granted = report.members_granted,
        "Sprint closed"
    );

    Ok(())
}
