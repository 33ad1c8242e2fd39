//! Dispatches message activities to the dialog runtime with per-conversation state.

use async_trait::async_trait;
use bot_core::{Handler, HandlerResponse, Result, TurnContext};
use dialogs::{DialogRuntime, DialogStateStore};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Loads the conversation's dialog stack, runs one turn, and saves the stack.
///
/// The stack is only written after a successful turn; a failed turn leaves the last saved state.
/// Non-message activities are ignored.
pub struct DialogBot {
    runtime: DialogRuntime,
    state_store: Arc<dyn DialogStateStore>,
}

impl DialogBot {
    pub fn new(runtime: DialogRuntime, state_store: Arc<dyn DialogStateStore>) -> Self {
        Self {
            runtime,
            state_store,
        }
    }
}

#[async_trait]
impl Handler for DialogBot {
    #[instrument(skip(self, turn))]
    async fn handle(&self, turn: &TurnContext) -> Result<HandlerResponse> {
        let activity = turn.activity();
        if !activity.is_message() {
            debug!(activity_type = %activity.activity_type.as_str(), "Not a message, ignored");
            return Ok(HandlerResponse::Ignore);
        }

        let conversation_id = activity.conversation_id().to_string();
        let mut state = self.state_store.load(&conversation_id).await?;
        info!(
            conversation_id = %conversation_id,
            depth = state.stack.len(),
            "step: running dialogs"
        );

        let result = self.runtime.run_turn(turn, &mut state).await?;

        if state.is_empty() {
            self.state_store.delete(&conversation_id).await?;
        } else {
            self.state_store.save(&conversation_id, &state).await?;
        }
        info!(
            conversation_id = %conversation_id,
            status = ?result.status,
            depth = state.stack.len(),
            "step: dialog turn done"
        );
        Ok(HandlerResponse::Turn(result.status))
    }
}
