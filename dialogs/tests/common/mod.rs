//! Shared test doubles: a recording channel adapter and a scripted intent recognizer.

#![allow(dead_code)]

use async_trait::async_trait;
use bot_core::{
    Activity, ChannelAccount, ChannelAdapter, ConversationAccount, ConversationReference,
    ResourceResponse, TurnContext,
};
use luis_client::{IntentRecognizer, IntentScore, RecognizerResult};
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// Records every activity the bot sends.
#[derive(Default)]
pub struct RecordingAdapter {
    sent: Mutex<Vec<Activity>>,
}

impl RecordingAdapter {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn sent(&self) -> Vec<Activity> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_texts(&self) -> Vec<String> {
        self.sent().iter().map(|a| a.text().to_string()).collect()
    }

    /// Returns and forgets what was sent so far.
    pub fn take(&self) -> Vec<Activity> {
        std::mem::take(&mut *self.sent.lock().unwrap())
    }

    pub fn take_texts(&self) -> Vec<String> {
        self.take().iter().map(|a| a.text().to_string()).collect()
    }
}

#[async_trait]
impl ChannelAdapter for RecordingAdapter {
    async fn send_activities(&self, activities: Vec<Activity>) -> bot_core::Result<Vec<ResourceResponse>> {
        let mut sent = self.sent.lock().unwrap();
        let responses = activities
            .iter()
            .enumerate()
            .map(|(i, _)| ResourceResponse {
                id: (sent.len() + i).to_string(),
            })
            .collect();
        sent.extend(activities);
        Ok(responses)
    }

    async fn update_activity(&self, _activity: Activity) -> bot_core::Result<ResourceResponse> {
        Ok(ResourceResponse::default())
    }

    async fn delete_activity(&self, _reference: ConversationReference) -> bot_core::Result<()> {
        Ok(())
    }
}

/// A message turn from `user` in conversation `convo1`.
pub fn message_turn(adapter: &Arc<RecordingAdapter>, text: &str, channel: &str) -> TurnContext {
    let activity = Activity {
        id: Some("1".to_string()),
        channel_id: Some(channel.to_string()),
        from: Some(ChannelAccount::new("user", "User1")),
        recipient: Some(ChannelAccount::new("bot", "Bot")),
        conversation: Some(ConversationAccount {
            id: "convo1".to_string(),
            ..Default::default()
        }),
        ..Activity::message(text)
    };
    TurnContext::new(adapter.clone(), activity)
}

/// Returns a fixed result (or fails) and records utterances.
pub struct MockRecognizer {
    result: Option<RecognizerResult>,
    calls: Mutex<Vec<String>>,
}

impl MockRecognizer {
    pub fn returning(intent: &str, score: f64, entities: &[(&str, &str)]) -> Arc<Self> {
        let mut result = RecognizerResult::default();
        result
            .intents
            .insert(intent.to_string(), IntentScore { score });
        result
            .intents
            .insert("None".to_string(), IntentScore { score: score / 10.0 });
        for (name, value) in entities {
            result
                .entities
                .insert(name.to_string(), vec![Value::String(value.to_string())]);
        }
        Arc::new(Self {
            result: Some(result),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            result: None,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl IntentRecognizer for MockRecognizer {
    async fn recognize(&self, utterance: &str) -> anyhow::Result<RecognizerResult> {
        self.calls.lock().unwrap().push(utterance.to_string());
        match &self.result {
            Some(result) => {
                let mut result = result.clone();
                result.text = utterance.to_string();
                Ok(result)
            }
            None => anyhow::bail!("LUIS unavailable"),
        }
    }
}
