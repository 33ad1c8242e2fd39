//! Text and choice prompts: how they render per channel and how they recognize replies.

use bot_core::{Activity, CardAction, InputHint, SuggestedActions};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One selectable option of a choice prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub value: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub synonyms: Vec<String>,
}

impl Choice {
    pub fn new(value: &str, synonyms: &[&str]) -> Self {
        Self {
            value: value.to_string(),
            synonyms: synonyms.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn candidates(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.value.as_str()).chain(self.synonyms.iter().map(String::as_str))
    }
}

/// A recognized choice: its position in the list and canonical value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundChoice {
    pub index: usize,
    pub value: String,
}

/// How a choice list is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListStyle {
    /// `text (1) A, (2) B, or (3) C` in the message text.
    Inline,
    /// One `imBack` suggested action per choice.
    SuggestedAction,
}

impl ListStyle {
    pub fn for_channel(channel_id: &str) -> Self {
        match channel_id {
            "emulator" | "webchat" | "directline" => ListStyle::SuggestedAction,
            _ => ListStyle::Inline,
        }
    }
}

/// A question the active dialog is waiting on. Persisted with the dialog state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Prompt {
    /// Accepts any non-blank text.
    Text { text: String },
    /// Accepts one of `choices`; the result is the canonical choice value.
    Choice {
        text: String,
        choices: Vec<Choice>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        retry_text: Option<String>,
    },
}

impl Prompt {
    pub fn text(text: impl Into<String>) -> Self {
        Prompt::Text { text: text.into() }
    }

    pub fn choice(text: impl Into<String>, choices: Vec<Choice>) -> Self {
        Prompt::Choice {
            text: text.into(),
            choices,
            retry_text: None,
        }
    }

    /// Text sent instead of the prompt when a reply is not recognized. Text prompts ignore it.
    pub fn with_retry(self, retry: impl Into<String>) -> Self {
        match self {
            Prompt::Choice { text, choices, .. } => Prompt::Choice {
                text,
                choices,
                retry_text: Some(retry.into()),
            },
            other => other,
        }
    }

    /// The prompt as an outbound activity for `channel_id`.
    pub fn to_activity(&self, channel_id: &str) -> Activity {
        match self {
            Prompt::Text { text } => Activity::message_with_hint(text.as_str(), InputHint::ExpectingInput),
            Prompt::Choice { text, choices, .. } => render_choices(text, choices, channel_id),
        }
    }

    /// Activity sent after an unrecognized reply.
    pub fn retry_activity(&self, channel_id: &str) -> Activity {
        match self {
            Prompt::Choice {
                choices,
                retry_text: Some(retry),
                ..
            } => render_choices(retry, choices, channel_id),
            _ => self.to_activity(channel_id),
        }
    }

    /// The step result for `input`, or `None` when the reply does not answer the prompt.
    pub fn recognize(&self, input: &str) -> Option<Value> {
        match self {
            Prompt::Text { .. } => {
                if input.trim().is_empty() {
                    None
                } else {
                    Some(Value::String(input.to_string()))
                }
            }
            Prompt::Choice { choices, .. } => {
                recognize_choice(input, choices).map(|found| Value::String(found.value))
            }
        }
    }
}

fn render_choices(text: &str, choices: &[Choice], channel_id: &str) -> Activity {
    match ListStyle::for_channel(channel_id) {
        ListStyle::Inline => {
            Activity::message_with_hint(inline_list(text, choices), InputHint::ExpectingInput)
        }
        ListStyle::SuggestedAction => {
            let mut activity = Activity::message_with_hint(text, InputHint::ExpectingInput);
            activity.suggested_actions = Some(SuggestedActions {
                actions: choices
                    .iter()
                    .map(|c| CardAction::im_back(c.value.as_str(), c.value.as_str()))
                    .collect(),
                to: None,
            });
            activity
        }
    }
}

/// `text (1) A, (2) B, or (3) C`; two choices read `(1) A or (2) B`.
pub fn inline_list(text: &str, choices: &[Choice]) -> String {
    let items: Vec<String> = choices
        .iter()
        .enumerate()
        .map(|(i, c)| format!("({}) {}", i + 1, c.value))
        .collect();
    let list = match items.as_slice() {
        [] => String::new(),
        [only] => only.clone(),
        [first, second] => format!("{} or {}", first, second),
        [init @ .., last] => format!("{}, or {}", init.join(", "), last),
    };
    match (text.is_empty(), list.is_empty()) {
        (_, true) => text.to_string(),
        (true, false) => list,
        (false, false) => format!("{} {}", text, list),
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Matches `input` against `choices`.
///
/// Tried in order: a 1-based index, an exact (case-insensitive) value or synonym, then the value or
/// synonym with the most tokens that all appear in the input. Earlier choices win ties.
pub fn recognize_choice(input: &str, choices: &[Choice]) -> Option<FoundChoice> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    let found = |index: usize| FoundChoice {
        index,
        value: choices[index].value.clone(),
    };

    if let Ok(n) = trimmed.parse::<usize>() {
        if (1..=choices.len()).contains(&n) {
            return Some(found(n - 1));
        }
    }

    let lowered = trimmed.to_lowercase();
    if let Some(index) = choices
        .iter()
        .position(|c| c.candidates().any(|cand| cand.to_lowercase() == lowered))
    {
        return Some(found(index));
    }

    let input_tokens = tokenize(trimmed);
    let mut best: Option<(usize, usize)> = None;
    for (index, choice) in choices.iter().enumerate() {
        for candidate in choice.candidates() {
            let tokens = tokenize(candidate);
            if tokens.is_empty() || !tokens.iter().all(|t| input_tokens.contains(t)) {
                continue;
            }
            match best {
                Some((_, len)) if tokens.len() <= len => {}
                _ => best = Some((index, tokens.len())),
            }
        }
    }
    best.map(|(index, _)| found(index))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_choices() -> Vec<Choice> {
        vec![
            Choice::new("Report", &["report", "access report"]),
            Choice::new("Tracker", &["tracker", "access tracker"]),
            Choice::new("Report Status", &["request report status", "report status"]),
            Choice::new("Tracker Status", &["tracker status", "request tracker status"]),
            Choice::new(
                "Revalidation",
                &["revalidation", "request revalidation", "access revalidation"],
            ),
        ]
    }

    fn value_of(input: &str) -> Option<String> {
        recognize_choice(input, &request_choices()).map(|f| f.value)
    }

    #[test]
    fn test_recognize_by_number() {
        assert_eq!(value_of("2").as_deref(), Some("Tracker"));
        assert_eq!(value_of(" 5 ").as_deref(), Some("Revalidation"));
        assert_eq!(value_of("0"), None);
        assert_eq!(value_of("6"), None);
    }

    #[test]
    fn test_recognize_exact_value_or_synonym() {
        assert_eq!(value_of("tracker").as_deref(), Some("Tracker"));
        assert_eq!(value_of("REPORT STATUS").as_deref(), Some("Report Status"));
        assert_eq!(value_of("access revalidation").as_deref(), Some("Revalidation"));
    }

    #[test]
    fn test_recognize_by_containment_prefers_longest() {
        assert_eq!(
            value_of("I would like the tracker status please").as_deref(),
            Some("Tracker Status")
        );
        assert_eq!(value_of("give me an access report").as_deref(), Some("Report"));
        assert_eq!(value_of("weather tomorrow"), None);
        assert_eq!(value_of("   "), None);
    }

    #[test]
    fn test_recognize_tie_goes_to_earlier_choice() {
        // "report" and "tracker" both match with one token.
        assert_eq!(value_of("report tracker").as_deref(), Some("Report"));
        assert_eq!(value_of("tracker report").as_deref(), Some("Report"));
        // "report status" and "tracker status" both match with two tokens.
        assert_eq!(
            value_of("tracker report status").as_deref(),
            Some("Report Status")
        );
        let found = recognize_choice("tracker report status", &request_choices()).unwrap();
        assert_eq!(found.index, 2);
    }

    #[test]
    fn test_inline_list_format() {
        let text = inline_list("Please enter your type of request.", &request_choices());
        assert_eq!(
            text,
            "Please enter your type of request. (1) Report, (2) Tracker, (3) Report Status, (4) Tracker Status, or (5) Revalidation"
        );
        let two = vec![Choice::new("Yes", &[]), Choice::new("No", &[])];
        assert_eq!(inline_list("Sure?", &two), "Sure? (1) Yes or (2) No");
    }

    #[test]
    fn test_choice_renders_suggested_actions_on_emulator() {
        let prompt = Prompt::choice("Pick one", request_choices());
        let activity = prompt.to_activity("emulator");
        assert_eq!(activity.text(), "Pick one");
        assert_eq!(activity.input_hint, Some(InputHint::ExpectingInput));
        let actions = activity.suggested_actions.unwrap().actions;
        assert_eq!(actions.len(), 5);
        assert_eq!(actions[0].action_type, "imBack");
        assert_eq!(actions[4].title, "Revalidation");
    }

    #[test]
    fn test_text_prompt_rejects_blank() {
        let prompt = Prompt::text("Enter Project ID :");
        assert_eq!(prompt.recognize("  "), None);
        assert_eq!(prompt.recognize("PRJ-42"), Some(Value::String("PRJ-42".into())));
    }

    #[test]
    fn test_retry_text_used_for_choice() {
        let prompt = Prompt::choice("Pick", request_choices()).with_retry("Please pick from the list.");
        assert!(prompt
            .retry_activity("console")
            .text()
            .starts_with("Please pick from the list. (1) Report"));
    }
}
