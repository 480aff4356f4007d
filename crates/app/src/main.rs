//! Taskboard client - Main Entry Point

use clap::Parser;
use taskboard::{Cli, Client, run};
use taskboard_infrastructure::ClientConfig;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = ClientConfig::from_env()?;
    if let Some(url) = &cli.api_url {
        config = config.with_api_url(url)?;
    }
    if let Some(path) = &cli.session_file {
        config = config.with_session_file(path);
    }
    tracing::debug!(
        api = %config.endpoints.base(),
        session_file = %config.session_file.display(),
        "configuration loaded"
    );

    let client = Client::from_config(&config)?;
    let output = run(&client, cli.command).await?;
    println!("{output}");

    Ok(())
}
