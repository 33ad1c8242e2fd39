//! HTTP client for the LUIS v3 prediction endpoint.

use crate::result::{IntentScore, RecognizerResult};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

/// Header carrying the endpoint key. The key never goes into the URL, so request errors cannot expose it.
pub const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Slot queried when none is configured.
pub const DEFAULT_SLOT: &str = "production";

/// Masks a subscription key for logs: `***` plus the last 4 characters, or just `***` for short keys.
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        "***".to_string()
    } else {
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("***{}", tail)
    }
}

/// Accepts a bare host (`westus.api.cognitive.microsoft.com`) or a URL and returns a base URL without trailing slash.
pub fn normalize_endpoint(endpoint: &str) -> String {
    let trimmed = endpoint.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}

/// LUIS application coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LuisApplication {
    pub application_id: String,
    pub endpoint: String,
    pub endpoint_key: String,
}

impl LuisApplication {
    pub fn new(
        application_id: impl Into<String>,
        endpoint_key: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            application_id: application_id.into(),
            endpoint: endpoint.into(),
            endpoint_key: endpoint_key.into(),
        }
    }

    /// True when all three values are non-empty after trimming.
    pub fn is_complete(&self) -> bool {
        !self.application_id.trim().is_empty()
            && !self.endpoint.trim().is_empty()
            && !self.endpoint_key.trim().is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct PredictionResponse {
    #[serde(default)]
    query: String,
    prediction: Prediction,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    #[serde(default)]
    top_intent: Option<String>,
    #[serde(default)]
    intents: BTreeMap<String, IntentScore>,
    #[serde(default)]
    entities: BTreeMap<String, Value>,
}

/// Client for one LUIS application and slot.
#[derive(Debug, Clone)]
pub struct LuisClient {
    http: Client,
    application: LuisApplication,
    slot: String,
    verbose: bool,
    log: bool,
}

impl LuisClient {
    pub fn new(application: LuisApplication) -> Self {
        Self {
            http: Client::new(),
            application,
            slot: DEFAULT_SLOT.to_string(),
            verbose: false,
            log: true,
        }
    }

    /// Queries another slot (e.g. `staging`).
    pub fn with_slot(mut self, slot: impl Into<String>) -> Self {
        self.slot = slot.into();
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Whether LUIS keeps the query in its endpoint log.
    pub fn with_log(mut self, log: bool) -> Self {
        self.log = log;
        self
    }

    pub fn slot(&self) -> &str {
        &self.slot
    }

    pub fn application(&self) -> &LuisApplication {
        &self.application
    }

    /// Prediction URL without query parameters.
    pub fn prediction_url(&self) -> String {
        format!(
            "{}/luis/prediction/v3.0/apps/{}/slots/{}/predict",
            normalize_endpoint(&self.application.endpoint),
            self.application.application_id.trim(),
            self.slot
        )
    }

    /// Sends `utterance` to the prediction endpoint and normalizes the response.
    #[instrument(skip(self, utterance), fields(slot = %self.slot))]
    pub async fn predict(&self, utterance: &str) -> anyhow::Result<RecognizerResult> {
        let url = self.prediction_url();
        info!(
            url = %url,
            app_id = %self.application.application_id,
            subscription_key = %mask_key(&self.application.endpoint_key),
            query_len = utterance.len(),
            "step: LUIS predict request"
        );

        let verbose = self.verbose.to_string();
        let log = self.log.to_string();
        let response = self
            .http
            .get(&url)
            .header(SUBSCRIPTION_KEY_HEADER, self.application.endpoint_key.trim())
            .query(&[
                ("query", utterance),
                ("show-all-intents", "true"),
                ("verbose", verbose.as_str()),
                ("log", log.as_str()),
            ])
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("LUIS request failed: {}", e.without_url()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("LUIS API error ({}): {}", status, error_text));
        }

        let body: PredictionResponse = response
            .json()
            .await
            .map_err(|e| anyhow::anyhow!("LUIS response invalid: {}", e.without_url()))?;
        debug!(top_intent = ?body.prediction.top_intent, "LUIS prediction received");

        let entities = body
            .prediction
            .entities
            .into_iter()
            .filter(|(name, _)| !name.starts_with('$'))
            .map(|(name, value)| {
                let values = match value {
                    Value::Array(items) => items,
                    other => vec![other],
                };
                (name, values)
            })
            .collect();

        let text = if body.query.is_empty() {
            utterance.to_string()
        } else {
            body.query
        };
        let result = RecognizerResult {
            text,
            intents: body.prediction.intents,
            entities,
        };
        info!(
            intent_count = result.intents.len(),
            entity_count = result.entities.len(),
            "step: LUIS predict done"
        );
        Ok(result)
    }
}
