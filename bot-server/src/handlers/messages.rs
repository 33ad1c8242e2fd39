//! `POST /api/messages`.

use super::ExpectedReplies;
use crate::http_adapter::HttpChannelAdapter;
use crate::state::ServerState;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bot_core::{Activity, TurnContext};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

#[instrument(skip(state, body))]
pub async fn handle_messages(State(state): State<Arc<ServerState>>, body: Bytes) -> Response {
    let activity: Activity = match serde_json::from_slice(&body) {
        Ok(activity) => activity,
        Err(e) => {
            warn!(error = %e, body_len = body.len(), "Rejected malformed activity");
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": format!("invalid activity: {}", e) })),
            )
                .into_response();
        }
    };

    let expects_replies = activity.expects_replies();
    info!(
        conversation_id = %activity.conversation_id(),
        channel_id = %activity.channel(),
        activity_type = %activity.activity_type.as_str(),
        expects_replies,
        "step: activity received"
    );

    let adapter = Arc::new(if expects_replies {
        HttpChannelAdapter::buffered(state.http.clone())
    } else {
        HttpChannelAdapter::connector(state.http.clone())
    });
    let turn = TurnContext::new(adapter.clone(), activity);

    if let Err(e) = state.chain.run_turn(&turn).await {
        error!(error = %e, "Turn failed and could not be reported");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        )
            .into_response();
    }

    if expects_replies {
        let replies = ExpectedReplies {
            activities: adapter.take_buffered(),
        };
        info!(count = replies.activities.len(), "step: returning buffered replies");
        return (StatusCode::OK, Json(replies)).into_response();
    }
    StatusCode::OK.into_response()
}
