//! Integration tests for the HTTP listener: health, `POST /api/messages` in both reply modes,
//! and the streaming frame path.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use bot_core::{Activity, BotError, ChannelAdapter, Handler, HandlerResponse, TurnContext};
use bot_server::{build_router, process_frame, ExpectedReplies, ServerState, StreamingChannelAdapter};
use handler_chain::HandlerChain;
use http_body_util::BodyExt;
use mockito::Matcher;
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tower::ServiceExt;

/// Replies `echo: <text>` to every message.
struct EchoHandler;

#[async_trait]
impl Handler for EchoHandler {
    async fn handle(&self, turn: &TurnContext) -> bot_core::Result<HandlerResponse> {
        if !turn.activity().is_message() {
            return Ok(HandlerResponse::Ignore);
        }
        turn.send_text(&format!("echo: {}", turn.activity().text()))
            .await?;
        Ok(HandlerResponse::Stop)
    }
}

fn echo_state() -> Arc<ServerState> {
    let chain = HandlerChain::new().add_handler(Arc::new(EchoHandler));
    Arc::new(ServerState::new(chain))
}

fn inbound(text: &str, service_url: &str) -> Value {
    json!({
        "type": "message",
        "id": "a1",
        "channelId": "emulator",
        "serviceUrl": service_url,
        "from": {"id": "u1", "name": "User"},
        "recipient": {"id": "b1", "name": "Bot"},
        "conversation": {"id": "c1"},
        "text": text
    })
}

fn post_json(body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/messages")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// **Test: /health reports healthy.**
#[tokio::test]
async fn test_health() {
    let app = build_router(echo_state());
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"status": "healthy"}));
}

/// **Test: A body that is not an activity is rejected with 400.**
#[tokio::test]
async fn test_malformed_activity_is_bad_request() {
    let app = build_router(echo_state());
    let request = Request::builder()
        .method("POST")
        .uri("/api/messages")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().starts_with("invalid activity"));
}

/// **Test: expectReplies returns the turn's replies in the response body.**
///
/// Setup: Echo chain; activity with `deliveryMode: expectReplies` and an unreachable serviceUrl.
/// Expected: 200 with one reply addressed back to the user; nothing is posted to the connector.
#[tokio::test]
async fn test_expect_replies_returns_activities() {
    let app = build_router(echo_state());
    let mut activity = inbound("hi", "http://127.0.0.1:9");
    activity["deliveryMode"] = json!("expectReplies");

    let response = app.oneshot(post_json(&activity)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let replies: ExpectedReplies = serde_json::from_value(body_json(response).await).unwrap();
    assert_eq!(replies.activities.len(), 1);
    let reply = &replies.activities[0];
    assert_eq!(reply.text(), "echo: hi");
    assert_eq!(reply.reply_to_id.as_deref(), Some("a1"));
    assert_eq!(reply.recipient.as_ref().map(|r| r.id.as_str()), Some("u1"));
}

/// **Test: Normal delivery posts each reply to the connector.**
///
/// Setup: mockito connector expecting POST /v3/conversations/c1/activities/a1.
/// Expected: 200 with empty body; the connector received the echo reply once.
#[tokio::test]
async fn test_connector_reply_is_posted() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v3/conversations/c1/activities/a1")
        .match_body(Matcher::PartialJson(json!({
            "type": "message",
            "text": "echo: hello",
            "replyToId": "a1",
            "conversation": {"id": "c1"}
        })))
        .with_status(200)
        .with_body(r#"{"id": "r1"}"#)
        .expect(1)
        .create_async()
        .await;

    let app = build_router(echo_state());
    let response = app
        .oneshot(post_json(&inbound("hello", &server.url())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(bytes.is_empty());
    mock.assert_async().await;
}

/// **Test: A connector failure surfaces as a failed turn, not a panic.**
///
/// Setup: connector answers 500 to every post.
/// Expected: the chain's error report also fails to send, so the request returns 500.
#[tokio::test]
async fn test_connector_failure_returns_server_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", Matcher::Any)
        .with_status(500)
        .with_body("down")
        .create_async()
        .await;

    let app = build_router(echo_state());
    let response = app
        .oneshot(post_json(&inbound("hello", &server.url())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

/// **Test: GET without an upgrade request is refused.**
#[tokio::test]
async fn test_get_without_upgrade_is_client_error() {
    let app = build_router(echo_state());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/messages")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(response.status().is_client_error());
}

/// **Test: A streaming frame runs a turn and its replies are queued for the socket.**
#[tokio::test]
async fn test_process_frame_queues_replies() {
    let state = echo_state();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let adapter = Arc::new(StreamingChannelAdapter::new(tx));

    let frame = inbound("over the wire", "").to_string();
    let response = process_frame(&state.chain, adapter, &frame).await.unwrap();
    assert_eq!(response, HandlerResponse::Stop);

    let reply = rx.recv().await.unwrap();
    assert_eq!(reply.text(), "echo: over the wire");
    assert_eq!(reply.conversation_id(), "c1");
}

/// **Test: A frame that is not an activity is a serialization error.**
#[tokio::test]
async fn test_process_frame_rejects_invalid_json() {
    let state = echo_state();
    let (tx, _rx) = mpsc::unbounded_channel();
    let adapter = Arc::new(StreamingChannelAdapter::new(tx));

    let result = process_frame(&state.chain, adapter, "hello?").await;
    assert!(matches!(result, Err(BotError::Serialization(_))));
}

/// **Test: Streaming adapter cannot update or delete, and fails once the socket is gone.**
#[tokio::test]
async fn test_streaming_adapter_limits() {
    let (tx, rx) = mpsc::unbounded_channel();
    let adapter = StreamingChannelAdapter::new(tx);

    let err = adapter
        .update_activity(Activity::message("x"))
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "StreamingChannelAdapter.updateActivity(): not supported."
    );
    let err = adapter
        .delete_activity(Default::default())
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "StreamingChannelAdapter.deleteActivity(): not supported."
    );

    drop(rx);
    let result = adapter.send_activities(vec![Activity::message("late")]).await;
    assert!(matches!(result, Err(BotError::Channel(_))));
}
