//! Recognizer wrapper used by the dialogs.

use crate::client::{LuisApplication, LuisClient};
use crate::result::RecognizerResult;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

/// Prediction API version the recognizer speaks.
pub const API_VERSION: &str = "v3";

/// Anything that turns an utterance into scored intents and entities.
#[async_trait]
pub trait IntentRecognizer: Send + Sync {
    async fn recognize(&self, utterance: &str) -> anyhow::Result<RecognizerResult>;
}

#[async_trait]
impl IntentRecognizer for LuisClient {
    async fn recognize(&self, utterance: &str) -> anyhow::Result<RecognizerResult> {
        self.predict(utterance).await
    }
}

/// Holds a recognizer only when the LUIS application is fully configured.
#[derive(Clone, Default)]
pub struct Recognizer {
    client: Option<Arc<dyn IntentRecognizer>>,
}

impl Recognizer {
    /// Builds a LUIS-backed recognizer, or an unconfigured one when any credential is blank.
    pub fn new(application: LuisApplication, slot: &str) -> Self {
        Self::from_luis(LuisClient::new(application).with_slot(slot))
    }

    /// Wraps an already tuned client, or returns an unconfigured recognizer when its credentials are incomplete.
    pub fn from_luis(client: LuisClient) -> Self {
        if !client.application().is_complete() {
            warn!("LUIS is not configured; intent recognition disabled");
            return Self::unconfigured();
        }
        info!(
            app_id = %client.application().application_id,
            api_version = API_VERSION,
            slot = %client.slot(),
            "LUIS recognizer configured"
        );
        Self {
            client: Some(Arc::new(client)),
        }
    }

    /// Uses the given recognizer (e.g. a test double).
    pub fn with_client(client: Arc<dyn IntentRecognizer>) -> Self {
        Self {
            client: Some(client),
        }
    }

    pub fn unconfigured() -> Self {
        Self { client: None }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    /// Recognizes `utterance`. Fails when the recognizer is not configured.
    pub async fn execute_luis_query(&self, utterance: &str) -> anyhow::Result<RecognizerResult> {
        match &self.client {
            Some(client) => client.recognize(utterance).await,
            None => anyhow::bail!("LUIS recognizer is not configured"),
        }
    }
}
