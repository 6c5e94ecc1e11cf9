use ais_stream::models::ApiKey;
use tokio_util::sync::CancellationToken;
use vessel_core::{ConnectionState, Environment, FeedStatus};
use vessel_registry::{settings::Settings, startup::App};

use crate::helper::ScriptedTransport;

fn settings(api_key: Option<ApiKey>) -> Settings {
    let mut settings = Settings::load(Environment::Test).unwrap();
    settings.api_key = api_key;
    settings
}

#[tokio::test(start_paused = true)]
async fn test_app_without_api_key_runs_simulation() {
    let transport = ScriptedTransport::hanging();
    let app = App::with_transport(&settings(None), transport.clone());
    let mut snapshots = app.snapshots();

    let shutdown = CancellationToken::new();
    let handle = tokio::spawn(app.run(shutdown.clone()));

    snapshots.wait_for(|m| !m.is_empty()).await.unwrap();
    assert_eq!(transport.attempts(), 0);

    shutdown.cancel();
    handle.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_app_with_api_key_runs_live_and_stops_on_shutdown() {
    let transport = ScriptedTransport::hanging();
    let app = App::with_transport(&settings(ApiKey::new("test-key")), transport.clone());
    let mut status = app.status();

    let shutdown = CancellationToken::new();
    let handle = tokio::spawn(app.run(shutdown.clone()));

    status
        .wait_for(|s| s.state == ConnectionState::Connecting)
        .await
        .unwrap();
    assert_eq!(transport.attempts(), 1);

    shutdown.cancel();
    handle.await.unwrap();
    assert_eq!(*status.borrow(), FeedStatus::default());
}
