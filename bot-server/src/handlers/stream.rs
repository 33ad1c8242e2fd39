//! `GET /api/messages` upgraded to a WebSocket: one activity per text frame.

use crate::state::ServerState;
use crate::streaming_adapter::StreamingChannelAdapter;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::Response;
use bot_core::{Activity, HandlerResponse, Result, TurnContext};
use futures::{SinkExt, StreamExt};
use handler_chain::HandlerChain;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

pub async fn handle_stream(State(state): State<Arc<ServerState>>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| stream_session(socket, state))
}

/// Parses one frame as an activity and runs its turn.
pub async fn process_frame(
    chain: &HandlerChain,
    adapter: Arc<StreamingChannelAdapter>,
    text: &str,
) -> Result<HandlerResponse> {
    let activity: Activity = serde_json::from_str(text)?;
    debug!(
        conversation_id = %activity.conversation_id(),
        activity_type = %activity.activity_type.as_str(),
        "Streaming activity received"
    );
    let turn = TurnContext::new(adapter, activity);
    chain.run_turn(&turn).await
}

async fn stream_session(socket: WebSocket, state: Arc<ServerState>) {
    info!("step: streaming session opened");
    let (mut sink, mut frames) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<Activity>();

    let writer = tokio::spawn(async move {
        while let Some(activity) = rx.recv().await {
            let json = match serde_json::to_string(&activity) {
                Ok(json) => json,
                Err(e) => {
                    error!(error = %e, "Failed to encode outbound activity");
                    continue;
                }
            };
            if sink.send(Message::Text(json)).await.is_err() {
                break;
            }
        }
    });

    let adapter = Arc::new(StreamingChannelAdapter::new(tx));
    while let Some(frame) = frames.next().await {
        match frame {
            Ok(Message::Text(text)) => {
                if let Err(e) = process_frame(&state.chain, adapter.clone(), &text).await {
                    warn!(error = %e, "Streaming frame rejected");
                }
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                warn!(error = %e, "Streaming connection error");
                break;
            }
        }
    }

    drop(adapter);
    if let Err(e) = writer.await {
        error!(error = %e, "Streaming writer task failed");
    }
    info!("step: streaming session closed");
}
