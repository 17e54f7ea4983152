use anyhow::Result;
use prover_relay::config::Settings;
use prover_relay::infrastructure::log_messages::configuration;
use prover_relay::Application;
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
#[instrument]
async fn main() -> Result<()> {
    let settings = Settings::new()?;

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.logging.level))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!(
        environment = %settings.application.environment,
        store = %settings.store.path.display(),
        "{}",
        configuration::CONFIG_LOADED
    );

    let app = Application::new(settings)?;
    app.run().await?;

    Ok(())
}
