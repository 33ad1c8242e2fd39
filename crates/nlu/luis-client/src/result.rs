//! Normalized recognition result.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Intent name LUIS uses when nothing matched.
pub const NONE_INTENT: &str = "None";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct IntentScore {
    #[serde(default)]
    pub score: f64,
}

/// Outcome of one recognition call: scored intents and extracted entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RecognizerResult {
    pub text: String,
    #[serde(default)]
    pub intents: BTreeMap<String, IntentScore>,
    #[serde(default)]
    pub entities: BTreeMap<String, Vec<Value>>,
}

impl RecognizerResult {
    /// Highest-scoring intent with `score >= min_score`, or `default` when none qualifies.
    ///
    /// Ties go to the intent whose name sorts first.
    pub fn top_intent(&self, default: &str, min_score: f64) -> String {
        let mut top: Option<(&str, f64)> = None;
        for (name, intent) in &self.intents {
            if intent.score < min_score {
                continue;
            }
            match top {
                Some((_, best)) if intent.score <= best => {}
                _ => top = Some((name.as_str(), intent.score)),
            }
        }
        top.map(|(name, _)| name.to_string())
            .unwrap_or_else(|| default.to_string())
    }

    /// First value of the named entity, if any.
    pub fn entity(&self, name: &str) -> Option<&Value> {
        self.entities.get(name).and_then(|values| values.first())
    }

    /// First value of the named entity as text.
    ///
    /// List entities resolve to arrays of canonical forms; the first form is used.
    pub fn entity_text(&self, name: &str) -> Option<String> {
        fn as_text(value: &Value) -> Option<String> {
            match value {
                Value::Null => None,
                Value::String(s) => Some(s.clone()),
                Value::Array(items) => items.first().and_then(as_text),
                other => Some(other.to_string()),
            }
        }
        self.entity(name).and_then(as_text)
    }
}
