//! Channel adapter for WebSocket sessions.

use async_trait::async_trait;
use bot_core::{
    Activity, BotError, ChannelAdapter, ConversationReference, ResourceResponse, Result,
};
use tokio::sync::mpsc::UnboundedSender;

/// Queues replies for the session's writer task. Updates and deletes are not supported.
pub struct StreamingChannelAdapter {
    outbound: UnboundedSender<Activity>,
}

impl StreamingChannelAdapter {
    pub fn new(outbound: UnboundedSender<Activity>) -> Self {
        Self { outbound }
    }
}

#[async_trait]
impl ChannelAdapter for StreamingChannelAdapter {
    async fn send_activities(&self, activities: Vec<Activity>) -> Result<Vec<ResourceResponse>> {
        let mut responses = Vec::with_capacity(activities.len());
        for activity in activities {
            self.outbound
                .send(activity)
                .map_err(|_| BotError::Channel("streaming connection closed".to_string()))?;
            responses.push(ResourceResponse::default());
        }
        Ok(responses)
    }

    async fn update_activity(&self, _activity: Activity) -> Result<ResourceResponse> {
        Err(BotError::NotSupported(
            "StreamingChannelAdapter.updateActivity()".to_string(),
        ))
    }

    async fn delete_activity(&self, _reference: ConversationReference) -> Result<()> {
        Err(BotError::NotSupported(
            "StreamingChannelAdapter.deleteActivity()".to_string(),
        ))
    }
}
