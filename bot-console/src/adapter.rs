//! [`ConsoleAdapter`]: the console implementation of [`bot_core::ChannelAdapter`].

use async_trait::async_trait;
use bot_core::{
    Activity, ActivityType, BotError, ChannelAccount, ChannelAdapter, ConversationAccount,
    ConversationReference, HandlerResponse, ResourceResponse, Result, TurnContext,
};
use handler_chain::HandlerChain;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, error};

/// Reference every console activity is addressed with.
pub fn console_reference() -> ConversationReference {
    ConversationReference {
        activity_id: None,
        user: Some(ChannelAccount::new("user", "User1")),
        bot: Some(ChannelAccount::new("bot", "Bot")),
        conversation: ConversationAccount {
            id: "convo1".to_string(),
            name: Some(String::new()),
            is_group: Some(false),
        },
        channel_id: "console".to_string(),
        service_url: String::new(),
    }
}

type SharedWriter = Mutex<Box<dyn Write + Send>>;

/// Console channel. Inbound ids count up from 0; output goes to the configured writers.
pub struct ConsoleAdapter {
    reference: ConversationReference,
    next_id: AtomicU64,
    out: SharedWriter,
    err: SharedWriter,
}

impl ConsoleAdapter {
    /// Adapter on stdout/stderr with [`console_reference`].
    pub fn new() -> Self {
        Self::with_writers(Box::new(io::stdout()), Box::new(io::stderr()))
    }

    /// Adapter writing to the given sinks (tests capture output this way).
    pub fn with_writers(out: Box<dyn Write + Send>, err: Box<dyn Write + Send>) -> Self {
        Self {
            reference: console_reference(),
            next_id: AtomicU64::new(0),
            out: Mutex::new(out),
            err: Mutex::new(err),
        }
    }

    /// Replaces the conversation reference used for inbound lines.
    pub fn with_reference(mut self, reference: ConversationReference) -> Self {
        self.reference = reference;
        self
    }

    pub fn reference(&self) -> &ConversationReference {
        &self.reference
    }

    /// Turns one input line into an inbound message activity with the next id.
    pub fn activity_from_line(&self, line: &str) -> Activity {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        Activity {
            activity_type: ActivityType::Message,
            id: Some(id.to_string()),
            text: Some(line.to_string()),
            timestamp: Some(chrono::Utc::now()),
            ..Default::default()
        }
        .apply_conversation_reference(&self.reference, true)
    }

    /// Runs one turn for `line` through `chain`.
    pub async fn process_line(
        self: &Arc<Self>,
        line: &str,
        chain: &HandlerChain,
    ) -> Result<HandlerResponse> {
        let activity = self.activity_from_line(line);
        let turn = TurnContext::new(self.clone(), activity);
        chain.run_turn(&turn).await
    }

    /// Runs a proactive turn for `reference` on an otherwise empty activity.
    pub async fn continue_conversation(
        self: &Arc<Self>,
        reference: &ConversationReference,
        chain: &HandlerChain,
    ) -> Result<HandlerResponse> {
        let activity = Activity {
            activity_type: ActivityType::Event,
            name: Some("ContinueConversation".to_string()),
            ..Default::default()
        }
        .apply_conversation_reference(reference, true);
        let turn = TurnContext::new(self.clone(), activity);
        chain.run_turn(&turn).await.map_err(|e| {
            self.print_error(&e.to_string());
            e
        })
    }

    pub fn print(&self, line: &str) {
        Self::write_line(&self.out, line);
    }

    pub fn print_error(&self, line: &str) {
        Self::write_line(&self.err, line);
    }

    fn write_line(writer: &SharedWriter, line: &str) {
        let mut writer = match writer.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(e) = writeln!(writer, "{}", line).and_then(|_| writer.flush()) {
            error!(error = %e, "Console write failed");
        }
    }

    /// Message text with an attachment count suffix when attachments are present.
    fn render_message(activity: &Activity) -> String {
        match activity.attachments.len() {
            0 => activity.text().to_string(),
            1 => format!("{} (1 attachment)", activity.text()),
            n => format!("{} ({} attachments)", activity.text(), n),
        }
    }
}

impl Default for ConsoleAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChannelAdapter for ConsoleAdapter {
    async fn send_activities(&self, activities: Vec<Activity>) -> Result<Vec<ResourceResponse>> {
        let mut responses = Vec::with_capacity(activities.len());
        for activity in activities {
            responses.push(ResourceResponse::default());
            match activity.activity_type {
                ActivityType::Delay => {
                    let ms = activity.value.as_ref().and_then(|v| v.as_u64()).unwrap_or(0);
                    debug!(ms, "Console delay");
                    tokio::time::sleep(Duration::from_millis(ms)).await;
                }
                ActivityType::Message => self.print(&Self::render_message(&activity)),
                other => self.print(&format!("[{}]", other.as_str())),
            }
        }
        Ok(responses)
    }

    async fn update_activity(&self, _activity: Activity) -> Result<ResourceResponse> {
        Err(BotError::NotSupported(
            "ConsoleAdapter.updateActivity()".to_string(),
        ))
    }

    async fn delete_activity(&self, _reference: ConversationReference) -> Result<()> {
        Err(BotError::NotSupported(
            "ConsoleAdapter.deleteActivity()".to_string(),
        ))
    }
}
