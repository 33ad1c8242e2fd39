//! Top-level dialog: ask what the user wants, classify it, run the access request, confirm, restart.

use crate::access::{AccessRequestDialog, ACCESS_REQUEST_DIALOG_ID};
use crate::prompt::Prompt;
use crate::request::{is_truthy, RequestContext, RequestType};
use crate::runtime::{DialogSet, StepContext, StepOutcome, Waterfall};
use async_trait::async_trait;
use bot_core::{BotError, DialogError, InputHint, Result};
use luis_client::{Recognizer, NONE_INTENT};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};

pub const MAIN_DIALOG_ID: &str = "MainDialog";

/// Entity LUIS extracts the customer project id into.
pub const PROJECT_ID_ENTITY: &str = "cust_project_id";

pub const LUIS_NOT_CONFIGURED_MESSAGE: &str = "NOTE: LUIS is not configured. To enable all capabilities, add `LuisAppId`, `LuisAPIKey` and `LuisAPIHostName` to the .env file.";
pub const DEFAULT_PROMPT: &str = "What can I help you with today?";
pub const RESTART_PROMPT: &str = "What else can I do for you?";
pub const CONFIRMATION_MESSAGE: &str = "Dear User, your service request for revalidation of the security assessment project has been received and is being processed.\nYou will be notified via email once the process is complete.\nYou can also monitor the status of the process at the Project Details Dashboard.\nThank you for your patience.";

/// Fallback text for intents that are not request types.
pub fn unrecognized_intent_message(intent: &str) -> String {
    format!(
        "Sorry, I didn't get that. Please try asking in a different way (intent was {})",
        intent
    )
}

/// Options of [`MainDialog`]; set when the dialog restarts itself.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MainOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restart_msg: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Intro,
    Act,
    Final,
}

const STEPS: [Step; 3] = [Step::Intro, Step::Act, Step::Final];

/// Root dialog. Build it with [`MainDialog::builder`].
#[derive(Clone)]
pub struct MainDialog {
    recognizer: Arc<Recognizer>,
    access_request_dialog: Arc<AccessRequestDialog>,
}

/// Collects the dependencies of [`MainDialog`]; `build` fails when one is missing.
#[derive(Default)]
pub struct MainDialogBuilder {
    recognizer: Option<Arc<Recognizer>>,
    access_request_dialog: Option<AccessRequestDialog>,
}

impl MainDialogBuilder {
    pub fn recognizer(mut self, recognizer: Arc<Recognizer>) -> Self {
        self.recognizer = Some(recognizer);
        self
    }

    pub fn access_request_dialog(mut self, dialog: AccessRequestDialog) -> Self {
        self.access_request_dialog = Some(dialog);
        self
    }

    pub fn build(self) -> Result<MainDialog> {
        let recognizer = self.recognizer.ok_or_else(|| {
            BotError::Config("[MainDialog]: Missing parameter 'recognizer' is required".to_string())
        })?;
        let access_request_dialog = self.access_request_dialog.ok_or_else(|| {
            BotError::Config(
                "[MainDialog]: Missing parameter 'access_request_dialog' is required".to_string(),
            )
        })?;
        if Waterfall::id(&access_request_dialog) != ACCESS_REQUEST_DIALOG_ID {
            return Err(BotError::Config(format!(
                "[MainDialog]: 'access_request_dialog' must have id '{}'",
                ACCESS_REQUEST_DIALOG_ID
            )));
        }
        Ok(MainDialog {
            recognizer,
            access_request_dialog: Arc::new(access_request_dialog),
        })
    }
}

impl MainDialog {
    pub fn builder() -> MainDialogBuilder {
        MainDialogBuilder::default()
    }

    /// Registers this dialog (as root) and its child dialog.
    pub fn into_dialog_set(self) -> Result<DialogSet> {
        let child = self.access_request_dialog.clone();
        DialogSet::new(MAIN_DIALOG_ID).add(child)?.add(Arc::new(self))
    }

    async fn intro(&self, step: &mut StepContext<'_, MainOptions>) -> Result<StepOutcome> {
        if !self.recognizer.is_configured() {
            step.turn
                .send_text_with_hint(LUIS_NOT_CONFIGURED_MESSAGE, InputHint::IgnoringInput)
                .await?;
            return Ok(StepOutcome::Next(None));
        }
        let text = step
            .options
            .restart_msg
            .clone()
            .unwrap_or_else(|| DEFAULT_PROMPT.to_string());
        Ok(StepOutcome::Prompt(Prompt::text(text)))
    }

    #[instrument(skip(self, step))]
    async fn act(&self, step: &mut StepContext<'_, MainOptions>) -> Result<StepOutcome> {
        let mut context = RequestContext::default();

        if !self.recognizer.is_configured() {
            info!("step: LUIS not configured, starting access request dialog");
            return StepOutcome::begin(ACCESS_REQUEST_DIALOG_ID, &context);
        }

        let utterance = step.turn.activity().text();
        let recognized = self
            .recognizer
            .execute_luis_query(utterance)
            .await
            .map_err(|e| BotError::Recognizer(format!("{:#}", e)))?;
        let intent = recognized.top_intent(NONE_INTENT, 0.0);
        info!(intent = %intent, "step: top intent recognized");

        match RequestType::from_intent(&intent) {
            Some(request_type) => {
                context.request_type = Some(request_type);
                context.cust_project_id = recognized.entity_text(PROJECT_ID_ENTITY);
                info!(
                    request_type = ?request_type,
                    cust_project_id = ?context.cust_project_id,
                    "step: starting access request dialog"
                );
                StepOutcome::begin(ACCESS_REQUEST_DIALOG_ID, &context)
            }
            None => {
                warn!(intent = %intent, "Unhandled intent");
                step.turn
                    .send_text_with_hint(&unrecognized_intent_message(&intent), InputHint::IgnoringInput)
                    .await?;
                Ok(StepOutcome::Next(None))
            }
        }
    }

    async fn finish(&self, step: &mut StepContext<'_, MainOptions>) -> Result<StepOutcome> {
        if is_truthy(step.result.as_ref()) {
            info!(result = ?step.result, "step: access request completed");
            step.turn.send_text(CONFIRMATION_MESSAGE).await?;
        }
        StepOutcome::replace(
            MAIN_DIALOG_ID,
            &MainOptions {
                restart_msg: Some(RESTART_PROMPT.to_string()),
            },
        )
    }
}

#[async_trait]
impl Waterfall for MainDialog {
    type Options = MainOptions;

    fn id(&self) -> &str {
        MAIN_DIALOG_ID
    }

    fn step_count(&self) -> usize {
        STEPS.len()
    }

    async fn step(&self, step: &mut StepContext<'_, MainOptions>) -> Result<StepOutcome> {
        match STEPS.get(step.index) {
            Some(Step::Intro) => self.intro(step).await,
            Some(Step::Act) => self.act(step).await,
            Some(Step::Final) => self.finish(step).await,
            None => Err(DialogError::StepOutOfRange {
                dialog_id: MAIN_DIALOG_ID.to_string(),
                index: step.index,
            }
            .into()),
        }
    }
}
