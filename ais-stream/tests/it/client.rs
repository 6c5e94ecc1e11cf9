use std::time::Duration;

use ais_stream::{
    backoff::TERMINAL_FAILURE_MESSAGE,
    models::{AisStreamMessage, MetaData, PositionReport, ShipStaticData},
};
use vessel_core::{ConnectionState, NavigationStatus, UNKNOWN_HEADING};

use crate::helper::test;

#[tokio::test(start_paused = true)]
async fn test_subscription_is_sent_on_connect() {
    test(|mut helper| async move {
        let mut server = helper.next_attempt().await.accept();
        let request = server.sent.recv().await.unwrap();
        let request: serde_json::Value = serde_json::from_str(&request).unwrap();

        assert_eq!(request["APIKey"], "test-key");
        assert_eq!(
            request["BoundingBoxes"],
            serde_json::json!([[[-90.0, -180.0], [90.0, 180.0]]])
        );
        assert_eq!(
            request["FilterMessageTypes"],
            serde_json::json!([
                "PositionReport",
                "ShipStaticData",
                "StandardClassBPositionReport"
            ])
        );

        helper.status.wait_for(|s| s.is_connected()).await.unwrap();
        assert_eq!(helper.status().error, None);
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn test_position_report_is_published_on_next_flush() {
    test(|mut helper| async move {
        let server = helper.accept_subscribed().await;
        server.send(&AisStreamMessage::test_position(
            257_000_001,
            PositionReport::test_default(),
        ));

        let vessel = helper.wait_for_vessel(257_000_001).await;
        assert_eq!(vessel.latitude, 60.3913);
        assert_eq!(vessel.longitude, 5.3221);
        assert_eq!(vessel.name, "META NAME");
        assert_eq!(vessel.navigation_status, NavigationStatus::UnderWayUsingEngine);
        assert_eq!(vessel.ship_type, 0);
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn test_class_b_position_report_is_published() {
    test(|mut helper| async move {
        let server = helper.accept_subscribed().await;
        let report = PositionReport {
            navigation_status: None,
            ..PositionReport::test_default()
        };
        server.send(&AisStreamMessage::test_class_b_position(257_000_002, report));

        let vessel = helper.wait_for_vessel(257_000_002).await;
        assert_eq!(vessel.navigation_status, NavigationStatus::NotDefined);
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn test_static_report_for_unseen_vessel_uses_metadata_position() {
    test(|mut helper| async move {
        let server = helper.accept_subscribed().await;
        server.send(&AisStreamMessage::test_static(
            257_000_003,
            ShipStaticData::test_default(),
        ));

        let vessel = helper.wait_for_vessel(257_000_003).await;
        assert_eq!(vessel.latitude, 59.9);
        assert_eq!(vessel.longitude, 10.7);
        assert_eq!(vessel.name, "SJARKEN");
        assert_eq!(vessel.eta, "03/07 14:05");
        assert_eq!(vessel.true_heading, UNKNOWN_HEADING);
        assert_eq!(vessel.navigation_status, NavigationStatus::NotDefined);
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn test_static_report_without_usable_position_is_withheld() {
    test(|mut helper| async move {
        let server = helper.accept_subscribed().await;

        let mut message = AisStreamMessage::test_static(257_000_004, ShipStaticData::test_default());
        message.meta_data = Some(MetaData {
            latitude: Some(0.0),
            longitude: Some(0.0),
            ..MetaData::test_default(257_000_004)
        });
        server.send(&message);
        server.send(&AisStreamMessage::test_position(
            257_000_005,
            PositionReport::test_default(),
        ));

        helper.wait_for_vessel(257_000_005).await;
        assert!(helper.vessel(257_000_004).is_none());
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn test_invalid_fix_never_moves_or_creates_vessels() {
    test(|mut helper| async move {
        let server = helper.accept_subscribed().await;
        server.send(&AisStreamMessage::test_position(
            257_000_006,
            PositionReport::test_default(),
        ));
        helper.wait_for_vessel(257_000_006).await;

        for (lat, lon) in [(91.0, 5.0), (60.0, 181.0), (0.0, 0.0)] {
            let report = PositionReport {
                latitude: Some(lat),
                longitude: Some(lon),
                ..PositionReport::test_default()
            };
            server.send(&AisStreamMessage::test_position(257_000_006, report.clone()));
            server.send(&AisStreamMessage::test_position(257_000_007, report));
        }
        server.send(&AisStreamMessage::test_position(
            257_000_008,
            PositionReport::test_default(),
        ));

        helper.wait_for_vessel(257_000_008).await;
        assert_eq!(helper.vessel(257_000_006).unwrap().latitude, 60.3913);
        assert!(helper.vessel(257_000_007).is_none());
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn test_later_position_overrides_only_its_own_fields() {
    test(|mut helper| async move {
        let server = helper.accept_subscribed().await;
        server.send(&AisStreamMessage::test_static(
            257_000_009,
            ShipStaticData::test_default(),
        ));
        helper.wait_for_vessel(257_000_009).await;

        let report = PositionReport {
            latitude: Some(61.0),
            longitude: Some(4.0),
            ..PositionReport::test_default()
        };
        server.send(&AisStreamMessage::test_position(257_000_009, report));

        let vessel = helper
            .snapshots
            .wait_for(|m| m.values().any(|v| v.latitude == 61.0))
            .await
            .unwrap()
            .values()
            .next()
            .cloned()
            .unwrap();

        assert_eq!(vessel.longitude, 4.0);
        assert_eq!(vessel.true_heading, 120);
        assert_eq!(vessel.name, "SJARKEN");
        assert_eq!(vessel.destination, "BERGEN");
        assert_eq!(vessel.draught, 4.2);
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn test_malformed_messages_are_dropped_without_affecting_connection() {
    test(|mut helper| async move {
        let server = helper.accept_subscribed().await;
        server.send_text("not json");
        server.send_text(r#"{"MetaData": {"MMSI": 0}, "Message": {}}"#);
        server.send_text(r#"{"Message": {"PositionReport": {"Latitude": 1.0}}}"#);
        server.send(&AisStreamMessage::test_position(
            257_000_010,
            PositionReport::test_default(),
        ));

        helper.wait_for_vessel(257_000_010).await;
        helper
            .status
            .wait_for(|s| s.processed_messages == 1)
            .await
            .unwrap();
        assert!(helper.status().is_connected());
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn test_processed_counter_counts_accepted_messages() {
    test(|mut helper| async move {
        let server = helper.accept_subscribed().await;
        let invalid = PositionReport {
            latitude: Some(91.0),
            ..PositionReport::test_default()
        };
        server.send(&AisStreamMessage::test_position(
            257_000_011,
            PositionReport::test_default(),
        ));
        server.send(&AisStreamMessage::test_position(257_000_011, invalid));
        server.send(&AisStreamMessage::test_static(
            257_000_012,
            ShipStaticData::test_default(),
        ));

        helper
            .status
            .wait_for(|s| s.processed_messages == 2)
            .await
            .unwrap();
        assert_eq!(helper.snapshots.borrow().len(), 2);
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn test_unknown_message_body_is_neither_counted_nor_published() {
    test(|mut helper| async move {
        let server = helper.accept_subscribed().await;
        server.send_text(
            r#"{"MessageType":"AidsToNavigationReport","MetaData":{"MMSI":257000013,"ShipName":"BUOY","latitude":59.9,"longitude":10.7},"Message":{"AidsToNavigationReport":{"Name":"BUOY"}}}"#,
        );
        server.send(&AisStreamMessage::test_position(
            257_000_014,
            PositionReport::test_default(),
        ));

        helper.wait_for_vessel(257_000_014).await;
        assert_eq!(helper.status().processed_messages, 1);
        assert!(helper.vessel(257_000_013).is_none());

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(helper.status().processed_messages, 1);
        assert!(helper.vessel(257_000_013).is_none());
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn test_normal_close_does_not_reconnect() {
    test(|mut helper| async move {
        let server = helper.accept_subscribed().await;
        server.close_normal();

        helper.finished().await;

        let status = helper.status();
        assert_eq!(status.state, ConnectionState::Closed);
        assert_eq!(status.error, None);

        tokio::time::sleep(Duration::from_secs(120)).await;
        assert!(helper.attempts.try_recv().is_err());
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn test_reconnect_backoff_doubles_until_terminal_failure() {
    test(|mut helper| async move {
        let mut attempts = vec![];
        for _ in 0..6 {
            let attempt = helper.next_attempt().await;
            attempts.push(attempt.at);
            attempt.refuse();
        }

        helper.finished().await;

        let gaps: Vec<u64> = attempts
            .windows(2)
            .map(|w| w[1].duration_since(w[0]).as_secs())
            .collect();
        assert_eq!(gaps, vec![2, 4, 8, 16, 32]);
        assert_eq!(attempts[0].duration_since(helper.started).as_secs(), 0);

        let status = helper.status();
        assert_eq!(status.state, ConnectionState::Failed);
        assert_eq!(status.error.as_deref(), Some(TERMINAL_FAILURE_MESSAGE));

        tokio::time::sleep(Duration::from_secs(600)).await;
        assert!(helper.attempts.try_recv().is_err());
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn test_abnormal_close_surfaces_countdown_and_resets_after_subscribe() {
    test(|mut helper| async move {
        let server = helper.accept_subscribed().await;
        drop(server);

        helper
            .status
            .wait_for(|s| s.state == ConnectionState::Closed || s.state == ConnectionState::Connecting)
            .await
            .unwrap();
        assert_eq!(
            helper.status().error.as_deref(),
            Some("Connection lost. Reconnecting in 2s... (attempt 1/5)")
        );

        helper.next_attempt().await.refuse();
        helper
            .status
            .wait_for(|s| s.error.as_deref().is_some_and(|e| e.contains("attempt 2/5")))
            .await
            .unwrap();
        assert_eq!(
            helper.status().error.as_deref(),
            Some("Connection lost. Reconnecting in 4s... (attempt 2/5)")
        );

        let server = helper.accept_subscribed().await;
        assert_eq!(helper.status().error, None);
        drop(server);

        helper
            .status
            .wait_for(|s| s.error.is_some())
            .await
            .unwrap();
        assert_eq!(
            helper.status().error.as_deref(),
            Some("Connection lost. Reconnecting in 2s... (attempt 1/5)")
        );
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn test_cancel_stops_publishing_and_closes_connection() {
    test(|mut helper| async move {
        let server = helper.accept_subscribed().await;
        let published = helper.snapshots.borrow_and_update().clone();

        server.send(&AisStreamMessage::test_position(
            257_000_013,
            PositionReport::test_default(),
        ));
        helper.cancel.cancel();
        helper.finished().await;

        assert!(server.is_closed_by_client());
        assert!(!helper.snapshots.has_changed().unwrap());
        assert!(std::sync::Arc::ptr_eq(&published, &helper.snapshots.borrow()));
        assert!(helper.vessel(257_000_013).is_none());
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn test_cancel_during_backoff_prevents_further_attempts() {
    test(|mut helper| async move {
        helper.next_attempt().await.refuse();
        helper
            .status
            .wait_for(|s| s.error.is_some())
            .await
            .unwrap();

        helper.cancel.cancel();
        helper.finished().await;

        tokio::time::sleep(Duration::from_secs(600)).await;
        assert!(helper.attempts.try_recv().is_err());
    })
    .await;
}
