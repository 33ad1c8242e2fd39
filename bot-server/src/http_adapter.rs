//! Channel adapter for `POST /api/messages` turns.

use async_trait::async_trait;
use bot_core::{
    Activity, ActivityType, BotError, ChannelAdapter, ConversationReference, ResourceResponse,
    Result,
};
use reqwest::{Client, Method, Url};
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Where replies of a turn go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyMode {
    /// Each reply is posted to the channel's connector at `serviceUrl`.
    Connector,
    /// Replies are collected and returned in the HTTP response.
    ExpectReplies,
}

/// `{serviceUrl}/v3/conversations/{conversationId}/activities[/{activityId}]`, with segments percent-encoded.
pub fn activities_url(
    service_url: &str,
    conversation_id: &str,
    activity_id: Option<&str>,
) -> Result<Url> {
    let mut url = Url::parse(service_url)
        .map_err(|e| BotError::Channel(format!("invalid serviceUrl {:?}: {}", service_url, e)))?;
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| BotError::Channel(format!("serviceUrl {:?} cannot be a base", service_url)))?;
        segments
            .pop_if_empty()
            .extend(["v3", "conversations", conversation_id, "activities"]);
        if let Some(id) = activity_id {
            segments.push(id);
        }
    }
    Ok(url)
}

pub struct HttpChannelAdapter {
    http: Client,
    mode: ReplyMode,
    buffered: Mutex<Vec<Activity>>,
}

impl HttpChannelAdapter {
    pub fn connector(http: Client) -> Self {
        Self::with_mode(http, ReplyMode::Connector)
    }

    pub fn buffered(http: Client) -> Self {
        Self::with_mode(http, ReplyMode::ExpectReplies)
    }

    fn with_mode(http: Client, mode: ReplyMode) -> Self {
        Self {
            http,
            mode,
            buffered: Mutex::new(Vec::new()),
        }
    }

    pub fn mode(&self) -> ReplyMode {
        self.mode
    }

    /// Replies collected so far in `ExpectReplies` mode.
    pub fn take_buffered(&self) -> Vec<Activity> {
        match self.buffered.lock() {
            Ok(mut buffered) => std::mem::take(&mut *buffered),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }

    fn push_buffered(&self, activity: Activity) {
        match self.buffered.lock() {
            Ok(mut buffered) => buffered.push(activity),
            Err(poisoned) => poisoned.into_inner().push(activity),
        }
    }

    #[instrument(skip(self, body))]
    async fn call_connector(
        &self,
        method: Method,
        url: Url,
        body: Option<&Activity>,
    ) -> Result<ResourceResponse> {
        info!(url = %url, "step: connector request");
        let mut request = self.http.request(method, url);
        if let Some(activity) = body {
            request = request.json(activity);
        }
        let response = request
            .send()
            .await
            .map_err(|e| BotError::Channel(e.to_string()))?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(BotError::Channel(format!(
                "Connector error ({}): {}",
                status, text
            )));
        }
        debug!(status = %status, "Connector responded");
        Ok(serde_json::from_str(&text).unwrap_or_default())
    }
}

#[async_trait]
impl ChannelAdapter for HttpChannelAdapter {
    async fn send_activities(&self, activities: Vec<Activity>) -> Result<Vec<ResourceResponse>> {
        let mut responses = Vec::with_capacity(activities.len());
        for activity in activities {
            if activity.activity_type == ActivityType::Delay {
                let ms = activity.value.as_ref().and_then(|v| v.as_u64()).unwrap_or(0);
                tokio::time::sleep(Duration::from_millis(ms)).await;
                responses.push(ResourceResponse::default());
                continue;
            }
            match self.mode {
                ReplyMode::ExpectReplies => {
                    self.push_buffered(activity);
                    responses.push(ResourceResponse::default());
                }
                ReplyMode::Connector => {
                    let url = activities_url(
                        activity.service_url.as_deref().unwrap_or_default(),
                        activity.conversation_id(),
                        activity.reply_to_id.as_deref(),
                    )?;
                    responses.push(self.call_connector(Method::POST, url, Some(&activity)).await?);
                }
            }
        }
        Ok(responses)
    }

    async fn update_activity(&self, activity: Activity) -> Result<ResourceResponse> {
        let id = activity
            .id
            .as_deref()
            .ok_or_else(|| BotError::Channel("updateActivity requires an activity id".to_string()))?;
        let url = activities_url(
            activity.service_url.as_deref().unwrap_or_default(),
            activity.conversation_id(),
            Some(id),
        )?;
        self.call_connector(Method::PUT, url, Some(&activity)).await
    }

    async fn delete_activity(&self, reference: ConversationReference) -> Result<()> {
        let id = reference
            .activity_id
            .as_deref()
            .ok_or_else(|| BotError::Channel("deleteActivity requires an activity id".to_string()))?;
        let url = activities_url(&reference.service_url, &reference.conversation.id, Some(id))?;
        self.call_connector(Method::DELETE, url, None).await?;
        Ok(())
    }
}
