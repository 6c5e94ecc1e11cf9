use ais_relay::{
    Relay, Settings,
    error::{Result, error::ConfigSnafu},
};
use snafu::ResultExt;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::new().context(ConfigSnafu)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| settings.log_level.as_directive().into()),
        )
        .init();

    let relay = Relay::bind(&settings).await?;
    info!(
        environment = %settings.environment,
        address = %relay.local_addr()?,
        upstream = settings.upstream_url,
        "relay listening"
    );

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to listen for shutdown signal: {e:?}");
        }
        shutdown.cancel();
    });

    relay.run(cancel).await;
    Ok(())
}
