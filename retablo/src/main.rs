use anyhow::{Context as _, Result};
use clap::Parser as _;
use tracing_subscriber::{
    EnvFilter, Layer as _, layer::SubscriberExt as _, util::SubscriberInitExt as _,
};

use retablo::{ExampleStore, config::Args, controller::Controller, terminal};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so they stay out of the session on stdout
    let fmt_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_target(false)
        .with_writer(std::io::stderr)
        .boxed();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(fmt_layer)
        .init();

    let config = Args::parse().into_config()?;

    let store = ExampleStore::load(config.record_store())
        .await
        .with_context(|| format!("Failed to load {}", config.history_file().display()))?;
    tracing::info!(
        records = store.len(),
        history_file = %config.history_file().display(),
        "Loaded history"
    );

    let mut controller = Controller::new(config.describer()?, store);

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    terminal::run(&mut controller, stdin, std::io::stdout()).await?;

    Ok(())
}
