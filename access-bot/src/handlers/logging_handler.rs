//! Logs each inbound activity in before() and the chain's response in after(); always continues.

use async_trait::async_trait;
use bot_core::{Handler, HandlerResponse, Result, TurnContext};
use tracing::{debug, info, instrument};

pub struct LoggingHandler;

#[async_trait]
impl Handler for LoggingHandler {
    #[instrument(skip(self, turn))]
    async fn before(&self, turn: &TurnContext) -> Result<bool> {
        let activity = turn.activity();
        info!(
            conversation_id = %activity.conversation_id(),
            channel_id = %activity.channel(),
            user_id = %activity.from.as_ref().map(|u| u.id.as_str()).unwrap_or("unknown"),
            activity_type = %activity.activity_type.as_str(),
            message_content = %activity.text(),
            "Received activity"
        );
        Ok(true)
    }

    #[instrument(skip(self, turn, response))]
    async fn after(&self, turn: &TurnContext, response: &HandlerResponse) -> Result<()> {
        debug!(
            activity_id = ?turn.activity().id,
            responded = turn.responded(),
            response = ?response,
            "Processed activity"
        );
        Ok(())
    }
}
