use snafu::ResultExt;
use tokio_util::sync::CancellationToken;
use tracing::error;
use tracing_subscriber::EnvFilter;
use vessel_registry::{
    error::{Result, error::ConfigSnafu},
    settings::Settings,
    startup::App,
};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::new().context(ConfigSnafu)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| settings.log_level.as_directive().into()),
        )
        .init();

    let app = App::build(&settings);

    let shutdown = CancellationToken::new();
    let signal = shutdown.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to listen for shutdown signal: {e:?}");
        }
        signal.cancel();
    });

    app.run(shutdown).await;
    Ok(())
}
