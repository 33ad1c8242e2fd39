//! Dialog runtime: a stack of waterfall dialogs driven one turn at a time.
//!
//! A [`Waterfall`] is a fixed list of steps over typed options. The runtime stores each active
//! dialog as a [`DialogInstance`] (options as JSON plus a step cursor), so the whole stack can be
//! persisted between turns through a [`DialogStateStore`].

mod state;

pub use state::{DialogInstance, DialogState, DialogStateStore, InMemoryDialogStateStore};

use crate::prompt::Prompt;
use async_trait::async_trait;
use bot_core::{DialogError, DialogTurnStatus, InputHint, Result, TurnContext};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Upper bound on step transitions in a single turn.
pub const MAX_TRANSITIONS_PER_TURN: usize = 64;

/// What a waterfall step asks the runtime to do next.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// Send the prompt and suspend until the user answers.
    Prompt(Prompt),
    /// Run the following step with this value as its result.
    Next(Option<Value>),
    /// Push a child dialog; the current step resumes at `index + 1` with the child's result.
    BeginDialog { dialog_id: String, options: Value },
    /// Pop this dialog, handing the value to the parent.
    End(Option<Value>),
    /// Pop this dialog and start another in its place.
    Replace { dialog_id: String, options: Value },
}

impl StepOutcome {
    pub fn begin(dialog_id: &str, options: &impl Serialize) -> Result<Self> {
        Ok(StepOutcome::BeginDialog {
            dialog_id: dialog_id.to_string(),
            options: serde_json::to_value(options)?,
        })
    }

    pub fn replace(dialog_id: &str, options: &impl Serialize) -> Result<Self> {
        Ok(StepOutcome::Replace {
            dialog_id: dialog_id.to_string(),
            options: serde_json::to_value(options)?,
        })
    }

    pub fn end_with(value: &impl Serialize) -> Result<Self> {
        Ok(StepOutcome::End(Some(serde_json::to_value(value)?)))
    }
}

/// Reaction to a message that arrives while a dialog is waiting on a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interruption {
    /// Send the text and keep waiting on the same prompt.
    Help(String),
    /// Send the text and clear the whole dialog stack.
    Cancel(String),
}

/// Inputs of one waterfall step. `options` is written back to the dialog state after the step.
pub struct StepContext<'a, O> {
    pub index: usize,
    pub options: O,
    pub result: Option<Value>,
    pub turn: &'a TurnContext,
}

impl<O> StepContext<'_, O> {
    /// The previous step's result as text, if it is a string (or a scalar rendered as one).
    pub fn result_text(&self) -> Option<String> {
        match self.result.as_ref()? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// A dialog made of a fixed sequence of steps over typed options.
#[async_trait]
pub trait Waterfall: Send + Sync {
    type Options: Serialize + DeserializeOwned + Default + Send + Sync + 'static;

    fn id(&self) -> &str;

    fn step_count(&self) -> usize;

    async fn step(&self, step: &mut StepContext<'_, Self::Options>) -> Result<StepOutcome>;

    /// Checked before a pending prompt sees the user's text.
    fn interrupt(&self, _text: &str) -> Option<Interruption> {
        None
    }
}

/// Object-safe form of [`Waterfall`] with options carried as JSON.
#[async_trait]
pub trait Dialog: Send + Sync {
    fn id(&self) -> &str;

    fn step_count(&self) -> usize;

    async fn run_step(
        &self,
        turn: &TurnContext,
        instance: &mut DialogInstance,
        result: Option<Value>,
    ) -> Result<StepOutcome>;

    fn interrupt(&self, text: &str) -> Option<Interruption>;
}

#[async_trait]
impl<W: Waterfall> Dialog for W {
    fn id(&self) -> &str {
        Waterfall::id(self)
    }

    fn step_count(&self) -> usize {
        Waterfall::step_count(self)
    }

    async fn run_step(
        &self,
        turn: &TurnContext,
        instance: &mut DialogInstance,
        result: Option<Value>,
    ) -> Result<StepOutcome> {
        let options: W::Options = if instance.options.is_null() {
            W::Options::default()
        } else {
            serde_json::from_value(instance.options.clone()).map_err(|e| {
                DialogError::InvalidOptions {
                    dialog_id: instance.id.clone(),
                    reason: e.to_string(),
                }
            })?
        };
        let mut step = StepContext {
            index: instance.step_index,
            options,
            result,
            turn,
        };
        let outcome = self.step(&mut step).await?;
        instance.options = serde_json::to_value(&step.options)?;
        Ok(outcome)
    }

    fn interrupt(&self, text: &str) -> Option<Interruption> {
        Waterfall::interrupt(self, text)
    }
}

/// Registry of dialogs by id, with the dialog started when a conversation has none active.
#[derive(Clone)]
pub struct DialogSet {
    root: String,
    dialogs: HashMap<String, Arc<dyn Dialog>>,
}

impl DialogSet {
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            dialogs: HashMap::new(),
        }
    }

    /// Registers a dialog. Ids must be unique.
    pub fn add(mut self, dialog: Arc<dyn Dialog>) -> Result<Self> {
        let id = dialog.id().to_string();
        if self.dialogs.contains_key(&id) {
            return Err(DialogError::DuplicateDialog(id).into());
        }
        self.dialogs.insert(id, dialog);
        Ok(self)
    }

    pub fn root_id(&self) -> &str {
        &self.root
    }

    pub fn contains(&self, id: &str) -> bool {
        self.dialogs.contains_key(id)
    }

    pub fn find(&self, id: &str) -> Result<Arc<dyn Dialog>> {
        self.dialogs
            .get(id)
            .cloned()
            .ok_or_else(|| DialogError::UnknownDialog(id.to_string()).into())
    }
}

/// Outcome of one turn through the dialog stack.
#[derive(Debug, Clone, PartialEq)]
pub struct DialogTurnResult {
    pub status: DialogTurnStatus,
    /// Value the root dialog ended with, when status is `Complete`.
    pub result: Option<Value>,
}

impl DialogTurnResult {
    fn with_status(status: DialogTurnStatus) -> Self {
        Self {
            status,
            result: None,
        }
    }
}

/// Drives a [`DialogSet`] against per-conversation [`DialogState`].
#[derive(Clone)]
pub struct DialogRuntime {
    dialogs: DialogSet,
}

impl DialogRuntime {
    /// Fails when the root dialog is not registered.
    pub fn new(dialogs: DialogSet) -> Result<Self> {
        if !dialogs.contains(dialogs.root_id()) {
            return Err(DialogError::UnknownDialog(dialogs.root_id().to_string()).into());
        }
        Ok(Self { dialogs })
    }

    pub fn dialogs(&self) -> &DialogSet {
        &self.dialogs
    }

    /// Runs one turn: continue the active dialog, or begin the root dialog when the stack is empty.
    #[instrument(skip(self, turn, state), fields(conversation_id = %turn.activity().conversation_id()))]
    pub async fn run_turn(
        &self,
        turn: &TurnContext,
        state: &mut DialogState,
    ) -> Result<DialogTurnResult> {
        let activity = turn.activity();
        if !activity.is_message() {
            let status = if state.stack.is_empty() {
                DialogTurnStatus::Empty
            } else {
                DialogTurnStatus::Waiting
            };
            debug!(activity_type = %activity.activity_type.as_str(), "Non-message activity leaves dialogs as is");
            return Ok(DialogTurnResult::with_status(status));
        }

        let text = activity.text();

        let Some(top) = state.stack.last_mut() else {
            info!(dialog_id = %self.dialogs.root_id(), "step: begin root dialog");
            state
                .stack
                .push(DialogInstance::new(self.dialogs.root_id(), Value::Null));
            return self.drive(turn, state, None).await;
        };

        let Some(prompt) = top.pending_prompt.clone() else {
            debug!(dialog_id = %top.id, step_index = top.step_index, "Resuming dialog without pending prompt");
            let input = Some(Value::String(text.to_string()));
            return self.drive(turn, state, input).await;
        };

        if let Some(interruption) = self.find_interruption(state, text)? {
            return match interruption {
                Interruption::Help(message) => {
                    info!("step: help requested, prompt kept");
                    turn.send_text_with_hint(&message, InputHint::IgnoringInput)
                        .await?;
                    Ok(DialogTurnResult::with_status(DialogTurnStatus::Waiting))
                }
                Interruption::Cancel(message) => {
                    info!(depth = state.stack.len(), "step: dialog stack cancelled");
                    turn.send_text_with_hint(&message, InputHint::IgnoringInput)
                        .await?;
                    state.stack.clear();
                    Ok(DialogTurnResult::with_status(DialogTurnStatus::Cancelled))
                }
            };
        }

        match prompt.recognize(text) {
            Some(value) => {
                if let Some(top) = state.stack.last_mut() {
                    debug!(dialog_id = %top.id, step_index = top.step_index, "Prompt answered");
                    top.pending_prompt = None;
                    top.step_index += 1;
                }
                self.drive(turn, state, Some(value)).await
            }
            None => {
                info!("step: prompt input not recognized, re-prompting");
                turn.send_activity(prompt.retry_activity(activity.channel()))
                    .await?;
                Ok(DialogTurnResult::with_status(DialogTurnStatus::Waiting))
            }
        }
    }

    /// First interruption claimed by any dialog on the stack, innermost first.
    fn find_interruption(&self, state: &DialogState, text: &str) -> Result<Option<Interruption>> {
        for instance in state.stack.iter().rev() {
            if let Some(interruption) = self.dialogs.find(&instance.id)?.interrupt(text) {
                return Ok(Some(interruption));
            }
        }
        Ok(None)
    }

    /// Applies step outcomes until a prompt suspends the turn or the stack empties.
    async fn drive(
        &self,
        turn: &TurnContext,
        state: &mut DialogState,
        mut result: Option<Value>,
    ) -> Result<DialogTurnResult> {
        for _ in 0..MAX_TRANSITIONS_PER_TURN {
            let Some(top) = state.stack.last_mut() else {
                return Ok(DialogTurnResult {
                    status: DialogTurnStatus::Complete,
                    result,
                });
            };
            let dialog = self.dialogs.find(&top.id)?;

            let outcome = if top.step_index >= dialog.step_count() {
                StepOutcome::End(result.take())
            } else {
                debug!(dialog_id = %top.id, step_index = top.step_index, "Running step");
                dialog.run_step(turn, top, result.take()).await?
            };

            match outcome {
                StepOutcome::Prompt(prompt) => {
                    turn.send_activity(prompt.to_activity(turn.activity().channel()))
                        .await?;
                    top.pending_prompt = Some(prompt);
                    return Ok(DialogTurnResult::with_status(DialogTurnStatus::Waiting));
                }
                StepOutcome::Next(value) => {
                    top.step_index += 1;
                    result = value;
                }
                StepOutcome::BeginDialog { dialog_id, options } => {
                    self.dialogs.find(&dialog_id)?;
                    debug!(dialog_id = %dialog_id, "Begin child dialog");
                    state.stack.push(DialogInstance::new(&dialog_id, options));
                }
                StepOutcome::End(value) => {
                    if let Some(ended) = state.stack.pop() {
                        debug!(dialog_id = %ended.id, "Dialog ended");
                    }
                    if let Some(parent) = state.stack.last_mut() {
                        parent.step_index += 1;
                    }
                    result = value;
                }
                StepOutcome::Replace { dialog_id, options } => {
                    self.dialogs.find(&dialog_id)?;
                    state.stack.pop();
                    debug!(dialog_id = %dialog_id, "Replace dialog");
                    state.stack.push(DialogInstance::new(&dialog_id, options));
                }
            }
        }
        Err(DialogError::StepLimitExceeded(MAX_TRANSITIONS_PER_TURN).into())
    }
}
