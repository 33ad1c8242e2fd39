//! Channel protocol types: [`Activity`] and the accounts and references it carries.
//!
//! Field names follow the messaging channel's JSON (camelCase); unknown fields are ignored on input.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Kind of activity exchanged with a channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum ActivityType {
    #[default]
    Message,
    ConversationUpdate,
    Typing,
    EndOfConversation,
    Event,
    Invoke,
    Trace,
    Delay,
    #[serde(other)]
    Unknown,
}

impl ActivityType {
    /// Wire name, used by channels that print non-message activities as `[type]`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Message => "message",
            ActivityType::ConversationUpdate => "conversationUpdate",
            ActivityType::Typing => "typing",
            ActivityType::EndOfConversation => "endOfConversation",
            ActivityType::Event => "event",
            ActivityType::Invoke => "invoke",
            ActivityType::Trace => "trace",
            ActivityType::Delay => "delay",
            ActivityType::Unknown => "unknown",
        }
    }
}

/// Hint to the channel about whether the bot expects a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InputHint {
    AcceptingInput,
    IgnoringInput,
    ExpectingInput,
}

/// How the channel wants replies delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeliveryMode {
    Normal,
    Notification,
    ExpectReplies,
    Ephemeral,
    #[serde(other)]
    Other,
}

/// A user or bot on a channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ChannelAccount {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ChannelAccount {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: Some(name.into()),
        }
    }
}

/// The conversation an activity belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ConversationAccount {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_group: Option<bool>,
}

/// Everything needed to address a conversation from outside a turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ConversationReference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<ChannelAccount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot: Option<ChannelAccount>,
    pub conversation: ConversationAccount,
    pub channel_id: String,
    #[serde(default)]
    pub service_url: String,
}

/// Media or card attached to a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub content_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A clickable action, e.g. a suggested reply button.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardAction {
    #[serde(rename = "type")]
    pub action_type: String,
    pub title: String,
    pub value: Value,
}

impl CardAction {
    /// An `imBack` action: clicking posts `value` back as if the user typed it.
    pub fn im_back(title: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            action_type: "imBack".to_string(),
            title: title.into(),
            value: Value::String(value.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedActions {
    pub actions: Vec<CardAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Vec<String>>,
}

/// Response from a channel after sending or updating an activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ResourceResponse {
    #[serde(default)]
    pub id: String,
}

/// A single activity (inbound or outbound) on a channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    #[serde(rename = "type", default)]
    pub activity_type: ActivityType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<ChannelAccount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<ChannelAccount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation: Option<ConversationAccount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speak: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_hint: Option<InputHint>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_actions: Option<SuggestedActions>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members_added: Vec<ChannelAccount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_mode: Option<DeliveryMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl Activity {
    /// A plain text message.
    pub fn message(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            activity_type: ActivityType::Message,
            speak: Some(text.clone()),
            text: Some(text),
            ..Default::default()
        }
    }

    /// A text message carrying an input hint (e.g. `ExpectingInput` for prompts).
    pub fn message_with_hint(text: impl Into<String>, hint: InputHint) -> Self {
        let mut activity = Self::message(text);
        activity.input_hint = Some(hint);
        activity
    }

    /// A trace activity; only debugging channels (the emulator) display these.
    pub fn trace(name: &str, value: Value, value_type: &str, label: &str) -> Self {
        Self {
            activity_type: ActivityType::Trace,
            name: Some(name.to_string()),
            value: Some(value),
            value_type: Some(value_type.to_string()),
            label: Some(label.to_string()),
            ..Default::default()
        }
    }

    /// A pause of `milliseconds` between outbound activities.
    pub fn delay(milliseconds: u64) -> Self {
        Self {
            activity_type: ActivityType::Delay,
            value: Some(Value::from(milliseconds)),
            ..Default::default()
        }
    }

    pub fn is_message(&self) -> bool {
        self.activity_type == ActivityType::Message
    }

    /// Text of the activity, or `""` when absent.
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    /// Conversation id, or `""` when the activity has no conversation.
    pub fn conversation_id(&self) -> &str {
        self.conversation.as_ref().map(|c| c.id.as_str()).unwrap_or("")
    }

    /// Channel id, or `""` when absent.
    pub fn channel(&self) -> &str {
        self.channel_id.as_deref().unwrap_or("")
    }

    /// True when the caller asked for replies in the HTTP response body.
    pub fn expects_replies(&self) -> bool {
        self.delivery_mode == Some(DeliveryMode::ExpectReplies)
    }

    /// Reference for replying to this (inbound) activity.
    pub fn conversation_reference(&self) -> ConversationReference {
        ConversationReference {
            activity_id: self.id.clone(),
            user: self.from.clone(),
            bot: self.recipient.clone(),
            conversation: self.conversation.clone().unwrap_or_default(),
            channel_id: self.channel_id.clone().unwrap_or_default(),
            service_url: self.service_url.clone().unwrap_or_default(),
        }
    }

    /// Stamps channel, conversation and accounts from `reference`.
    ///
    /// Incoming: `from` is the user and `recipient` the bot; the reference's activity id (if any) becomes the id.
    /// Outgoing: `from` is the bot, `recipient` the user, and the reference's activity id becomes `reply_to_id`.
    pub fn apply_conversation_reference(
        mut self,
        reference: &ConversationReference,
        is_incoming: bool,
    ) -> Self {
        self.channel_id = Some(reference.channel_id.clone());
        self.service_url = Some(reference.service_url.clone());
        self.conversation = Some(reference.conversation.clone());
        if is_incoming {
            self.from = reference.user.clone();
            self.recipient = reference.bot.clone();
            if let Some(id) = &reference.activity_id {
                self.id = Some(id.clone());
            }
        } else {
            self.from = reference.bot.clone();
            self.recipient = reference.user.clone();
            if let Some(id) = &reference.activity_id {
                self.reply_to_id = Some(id.clone());
            }
        }
        self
    }
}
