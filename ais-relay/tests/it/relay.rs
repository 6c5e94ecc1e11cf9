use std::time::Duration;

use ais_relay::relay::MAX_PENDING_MESSAGES;
use futures::SinkExt;
use tokio_tungstenite::tungstenite::{
    Message,
    protocol::{CloseFrame, frame::coding::CloseCode},
};

use crate::helper::*;

#[tokio::test]
async fn test_forwards_messages_in_both_directions() {
    test(|mut helper| async move {
        let mut client = helper.connect().await;
        client.send(Message::Text("subscribe".into())).await.unwrap();

        let mut upstream = helper.next_upstream().await;
        assert_eq!(next_text(&mut upstream).await, "subscribe");

        upstream
            .send(Message::Text(r#"{"MessageType":"PositionReport"}"#.into()))
            .await
            .unwrap();
        assert_eq!(
            next_text(&mut client).await,
            r#"{"MessageType":"PositionReport"}"#
        );
    })
    .await;
}

#[tokio::test]
async fn test_binary_messages_are_forwarded_verbatim() {
    test(|mut helper| async move {
        let mut client = helper.connect().await;
        let mut upstream = helper.next_upstream().await;

        upstream
            .send(Message::Binary(vec![0x7b, 0x7d, 0xff]))
            .await
            .unwrap();

        match next_message(&mut client).await {
            Some(Ok(Message::Binary(bytes))) => assert_eq!(bytes, vec![0x7b, 0x7d, 0xff]),
            other => panic!("expected binary message, got {other:?}"),
        }
    })
    .await;
}

#[tokio::test]
async fn test_messages_sent_before_upstream_opens_are_delivered_in_order() {
    test(|mut helper| async move {
        helper.hold_upstream();

        let mut client = helper.connect().await;
        for text in ["first", "second", "third"] {
            client.send(Message::Text(text.into())).await.unwrap();
        }
        tokio::time::sleep(Duration::from_millis(200)).await;

        helper.open_upstream();
        let mut upstream = helper.next_upstream().await;

        assert_eq!(next_text(&mut upstream).await, "first");
        assert_eq!(next_text(&mut upstream).await, "second");
        assert_eq!(next_text(&mut upstream).await, "third");
    })
    .await;
}

#[tokio::test]
async fn test_client_flooding_a_pending_upstream_is_closed() {
    test(|helper| async move {
        helper.hold_upstream();

        let mut client = helper.connect().await;
        for i in 0..=MAX_PENDING_MESSAGES {
            client.feed(Message::Text(i.to_string())).await.unwrap();
        }
        client.flush().await.unwrap();

        match next_message(&mut client).await {
            Some(Ok(Message::Close(Some(frame)))) => assert_eq!(frame.code, CloseCode::Policy),
            other => panic!("expected policy close, got {other:?}"),
        }
    })
    .await;
}

#[tokio::test]
async fn test_each_client_gets_its_own_upstream_connection() {
    test(|mut helper| async move {
        let mut first = helper.connect().await;
        let mut first_upstream = helper.next_upstream().await;
        let mut second = helper.connect().await;
        let mut second_upstream = helper.next_upstream().await;

        first_upstream.send(Message::Text("one".into())).await.unwrap();
        second_upstream.send(Message::Text("two".into())).await.unwrap();

        assert_eq!(next_text(&mut first).await, "one");
        assert_eq!(next_text(&mut second).await, "two");
    })
    .await;
}

#[tokio::test]
async fn test_upstream_close_code_reaches_client() {
    test(|mut helper| async move {
        let mut client = helper.connect().await;
        let mut upstream = helper.next_upstream().await;

        upstream
            .close(Some(CloseFrame {
                code: CloseCode::Normal,
                reason: "done".into(),
            }))
            .await
            .unwrap();

        match next_message(&mut client).await {
            Some(Ok(Message::Close(Some(frame)))) => {
                assert_eq!(frame.code, CloseCode::Normal);
                assert_eq!(frame.reason, "done");
            }
            other => panic!("expected close frame, got {other:?}"),
        }
    })
    .await;
}

#[tokio::test]
async fn test_client_close_closes_upstream() {
    test(|mut helper| async move {
        let mut client = helper.connect().await;
        let mut upstream = helper.next_upstream().await;

        client
            .close(Some(CloseFrame {
                code: CloseCode::Away,
                reason: "".into(),
            }))
            .await
            .unwrap();

        match next_message(&mut upstream).await {
            Some(Ok(Message::Close(Some(frame)))) => assert_eq!(frame.code, CloseCode::Away),
            other => panic!("expected close frame, got {other:?}"),
        }
    })
    .await;
}

#[tokio::test]
async fn test_unreachable_upstream_closes_client() {
    test_unreachable_upstream(|helper| async move {
        let mut client = helper.connect().await;

        let closed = matches!(
            next_message(&mut client).await,
            Some(Ok(Message::Close(_))) | Some(Err(_)) | None
        );
        assert!(closed);
    })
    .await;
}

#[tokio::test]
async fn test_shutdown_closes_open_connections() {
    test(|mut helper| async move {
        let mut client = helper.connect().await;
        let mut upstream = helper.next_upstream().await;

        helper.shutdown().await;

        assert!(matches!(
            next_message(&mut client).await,
            Some(Ok(Message::Close(_))) | Some(Err(_)) | None
        ));
        assert!(matches!(
            next_message(&mut upstream).await,
            Some(Ok(Message::Close(_))) | Some(Err(_)) | None
        ));
    })
    .await;
}

#[tokio::test]
async fn test_relay_stops_accepting_after_shutdown() {
    test(|mut helper| async move {
        helper.shutdown().await;

        let connected = tokio_tungstenite::connect_async(format!("ws://{}", helper.relay_addr)).await;
        assert!(connected.is_err());
    })
    .await;
}
