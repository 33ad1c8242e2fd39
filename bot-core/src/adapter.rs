//! Channel abstraction for delivering outbound activities.
//!
//! [`ChannelAdapter`] is transport-agnostic; the console, HTTP connector and streaming socket each implement it.

use crate::activity::{Activity, ConversationReference, ResourceResponse};
use crate::error::Result;
use async_trait::async_trait;

/// Sends, updates and deletes activities on a channel. Outbound activities already carry their conversation reference.
#[async_trait]
pub trait ChannelAdapter: Send + Sync {
    /// Delivers activities in order; returns one response per activity.
    async fn send_activities(&self, activities: Vec<Activity>) -> Result<Vec<ResourceResponse>>;
    /// Replaces a previously sent activity (matched by `activity.id`).
    async fn update_activity(&self, activity: Activity) -> Result<ResourceResponse>;
    /// Deletes a previously sent activity (`reference.activity_id`).
    async fn delete_activity(&self, reference: ConversationReference) -> Result<()>;
}
