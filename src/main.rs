mod adf;
mod api;
mod config;
mod detail;
mod grouping;
mod jira;
mod releases;

use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Release Board — serves Jira issues grouped by fix version, with an
/// issue-detail view and an attachment proxy, for the dashboard frontend.
#[derive(Parser, Debug)]
#[command(name = "release-board", version, about)]
struct Cli {
    /// Address to bind the HTTP server to
    #[arg(long, default_value = "127.0.0.1:3001")]
    bind: String,

    /// Path to a config file (defaults to .release-board.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    info!("loading configuration");
    let config = match &cli.config {
        Some(path) => config::Config::load_from(path)?,
        None => config::Config::load()?,
    };
    let credentials = config.jira_credentials()?;

    let jira = jira::JiraClient::new(&credentials)?;
    let app = api::router(api::AppState { jira });

    let listener = tokio::net::TcpListener::bind(&cli.bind).await?;
    info!(addr = %cli.bind, jira = %credentials.base_url, "release board listening");
    axum::serve(listener, app).await?;

    Ok(())
}
