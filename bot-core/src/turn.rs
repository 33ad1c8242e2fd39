//! Per-turn context: the inbound activity plus the adapter that replies go through.

use crate::activity::{Activity, ActivityType, ConversationReference, InputHint, ResourceResponse};
use crate::adapter::ChannelAdapter;
use crate::error::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

/// One inbound activity and the means to answer it. Created by a channel adapter for every turn.
pub struct TurnContext {
    adapter: Arc<dyn ChannelAdapter>,
    activity: Activity,
    responded: AtomicBool,
}

impl TurnContext {
    pub fn new(adapter: Arc<dyn ChannelAdapter>, activity: Activity) -> Self {
        Self {
            adapter,
            activity,
            responded: AtomicBool::new(false),
        }
    }

    /// The inbound activity for this turn.
    pub fn activity(&self) -> &Activity {
        &self.activity
    }

    /// True once any activity has been sent during this turn.
    pub fn responded(&self) -> bool {
        self.responded.load(Ordering::SeqCst)
    }

    /// Sends a plain text message.
    pub async fn send_text(&self, text: &str) -> Result<ResourceResponse> {
        self.send_activity(Activity::message(text)).await
    }

    /// Sends a text message with an explicit input hint.
    pub async fn send_text_with_hint(&self, text: &str, hint: InputHint) -> Result<ResourceResponse> {
        self.send_activity(Activity::message_with_hint(text, hint)).await
    }

    /// Sends a single activity, addressed as a reply to the inbound activity.
    pub async fn send_activity(&self, activity: Activity) -> Result<ResourceResponse> {
        let mut responses = self.send_activities(vec![activity]).await?;
        Ok(responses.pop().unwrap_or_default())
    }

    /// Sends activities in order. Messages without an input hint default to `AcceptingInput`.
    pub async fn send_activities(&self, activities: Vec<Activity>) -> Result<Vec<ResourceResponse>> {
        let reference = self.activity.conversation_reference();
        let outbound: Vec<Activity> = activities
            .into_iter()
            .map(|a| {
                let mut a = a.apply_conversation_reference(&reference, false);
                if a.activity_type == ActivityType::Message && a.input_hint.is_none() {
                    a.input_hint = Some(InputHint::AcceptingInput);
                }
                a
            })
            .collect();
        if outbound.is_empty() {
            return Ok(Vec::new());
        }
        debug!(
            conversation_id = %reference.conversation.id,
            count = outbound.len(),
            "Sending activities"
        );
        let sent_visible = outbound.iter().any(|a| a.activity_type != ActivityType::Trace);
        let responses = self.adapter.send_activities(outbound).await?;
        if sent_visible {
            self.responded.store(true, Ordering::SeqCst);
        }
        Ok(responses)
    }

    /// Replaces a previously sent activity through the adapter.
    pub async fn update_activity(&self, activity: Activity) -> Result<ResourceResponse> {
        let reference = self.activity.conversation_reference();
        let id = activity.id.clone();
        let mut activity = activity.apply_conversation_reference(&reference, false);
        activity.id = id;
        self.adapter.update_activity(activity).await
    }

    /// Deletes a previously sent activity through the adapter.
    pub async fn delete_activity(&self, activity_id: &str) -> Result<()> {
        let mut reference: ConversationReference = self.activity.conversation_reference();
        reference.activity_id = Some(activity_id.to_string());
        self.adapter.delete_activity(reference).await
    }
}
