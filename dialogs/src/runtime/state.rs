//! Persisted dialog stack and the store it lives in between turns.

use crate::prompt::Prompt;
use async_trait::async_trait;
use bot_core::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// One active dialog: its id, waterfall cursor, options and the prompt it is waiting on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogInstance {
    pub id: String,
    pub step_index: usize,
    #[serde(default)]
    pub options: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_prompt: Option<Prompt>,
}

impl DialogInstance {
    pub fn new(id: impl Into<String>, options: Value) -> Self {
        Self {
            id: id.into(),
            step_index: 0,
            options,
            pending_prompt: None,
        }
    }
}

/// Dialog stack of one conversation; the last entry is the active dialog.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DialogState {
    #[serde(default)]
    pub stack: Vec<DialogInstance>,
}

impl DialogState {
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn active(&self) -> Option<&DialogInstance> {
        self.stack.last()
    }
}

/// Per-conversation persistence of [`DialogState`].
#[async_trait]
pub trait DialogStateStore: Send + Sync {
    /// State for the conversation, or an empty state when none was saved.
    async fn load(&self, conversation_id: &str) -> Result<DialogState>;

    async fn save(&self, conversation_id: &str, state: &DialogState) -> Result<()>;

    async fn delete(&self, conversation_id: &str) -> Result<()>;
}

/// Process-local store. State is lost on restart.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDialogStateStore {
    states: Arc<RwLock<HashMap<String, DialogState>>>,
}

impl InMemoryDialogStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of conversations with saved state.
    pub async fn len(&self) -> usize {
        self.states.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl DialogStateStore for InMemoryDialogStateStore {
    async fn load(&self, conversation_id: &str) -> Result<DialogState> {
        let states = self.states.read().await;
        Ok(states.get(conversation_id).cloned().unwrap_or_default())
    }

    async fn save(&self, conversation_id: &str, state: &DialogState) -> Result<()> {
        let mut states = self.states.write().await;
        states.insert(conversation_id.to_string(), state.clone());
        Ok(())
    }

    async fn delete(&self, conversation_id: &str) -> Result<()> {
        let mut states = self.states.write().await;
        states.remove(conversation_id);
        Ok(())
    }
}
