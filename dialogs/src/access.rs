//! Collects the project id and request type of an access request.

use crate::prompt::Prompt;
use crate::request::{is_truthy, request_type_choices, RequestContext, RequestType};
use crate::runtime::{Interruption, StepContext, StepOutcome, Waterfall};
use async_trait::async_trait;
use bot_core::{DialogError, Result};
use tracing::info;

pub const ACCESS_REQUEST_DIALOG_ID: &str = "accessRequestDialog";

pub const PROJECT_ID_PROMPT: &str = "Enter Project ID :";
pub const REQUEST_TYPE_PROMPT: &str = "Please enter your type of request.";
pub const REQUEST_TYPE_RETRY: &str = "Please choose one of the listed request types.";
pub const VERIFYING_MESSAGE: &str = "We are verifying your request... Please be patient.";
pub const HELP_MESSAGE: &str = "Enter your project ID, then choose a request type: Report, Tracker, Report Status, Tracker Status or Revalidation. Type \"cancel\" to start over.";
pub const CANCEL_MESSAGE: &str = "Cancelling...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    CollectProjectId,
    CollectRequestType,
    DispatchRequestType,
    Finalize,
}

const STEPS: [Step; 4] = [
    Step::CollectProjectId,
    Step::CollectRequestType,
    Step::DispatchRequestType,
    Step::Finalize,
];

/// Waterfall over a [`RequestContext`]: prompts only for fields that are still missing.
///
/// Typing `help` or `?` at a prompt shows help; `cancel` or `quit` abandons the conversation's dialogs.
#[derive(Debug, Clone)]
pub struct AccessRequestDialog {
    id: String,
}

impl AccessRequestDialog {
    pub fn new() -> Self {
        Self::with_id(ACCESS_REQUEST_DIALOG_ID)
    }

    pub fn with_id(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    async fn collect_project_id(&self, step: &mut StepContext<'_, RequestContext>) -> Result<StepOutcome> {
        match &step.options.cust_project_id {
            Some(id) => Ok(StepOutcome::Next(Some(id.clone().into()))),
            None => Ok(StepOutcome::Prompt(Prompt::text(PROJECT_ID_PROMPT))),
        }
    }

    async fn collect_request_type(&self, step: &mut StepContext<'_, RequestContext>) -> Result<StepOutcome> {
        step.options.cust_project_id = step.result_text();
        info!(cust_project_id = ?step.options.cust_project_id, "step: project id captured");
        match step.options.request_type {
            Some(request_type) => Ok(StepOutcome::Next(Some(request_type.as_str().into()))),
            None => Ok(StepOutcome::Prompt(
                Prompt::choice(REQUEST_TYPE_PROMPT, request_type_choices()).with_retry(REQUEST_TYPE_RETRY),
            )),
        }
    }

    async fn dispatch_request_type(&self, step: &mut StepContext<'_, RequestContext>) -> Result<StepOutcome> {
        let request_type = step.result_text().as_deref().and_then(RequestType::from_value);
        step.options.request_type = request_type;
        info!(request_type = ?request_type, "step: request type captured");

        if let Some(request_type) = request_type {
            step.turn.send_text(request_type.acknowledgement()).await?;
        }
        step.turn.send_text(VERIFYING_MESSAGE).await?;
        Ok(StepOutcome::Next(step.result.clone()))
    }

    async fn finalize(&self, step: &mut StepContext<'_, RequestContext>) -> Result<StepOutcome> {
        if is_truthy(step.result.as_ref()) {
            StepOutcome::end_with(&step.options)
        } else {
            Ok(StepOutcome::End(None))
        }
    }
}

impl Default for AccessRequestDialog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Waterfall for AccessRequestDialog {
    type Options = RequestContext;

    fn id(&self) -> &str {
        &self.id
    }

    fn step_count(&self) -> usize {
        STEPS.len()
    }

    async fn step(&self, step: &mut StepContext<'_, RequestContext>) -> Result<StepOutcome> {
        match STEPS.get(step.index) {
            Some(Step::CollectProjectId) => self.collect_project_id(step).await,
            Some(Step::CollectRequestType) => self.collect_request_type(step).await,
            Some(Step::DispatchRequestType) => self.dispatch_request_type(step).await,
            Some(Step::Finalize) => self.finalize(step).await,
            None => Err(DialogError::StepOutOfRange {
                dialog_id: self.id.clone(),
                index: step.index,
            }
            .into()),
        }
    }

    fn interrupt(&self, text: &str) -> Option<Interruption> {
        match text.trim().to_lowercase().as_str() {
            "help" | "?" => Some(Interruption::Help(HELP_MESSAGE.to_string())),
            "cancel" | "quit" => Some(Interruption::Cancel(CANCEL_MESSAGE.to_string())),
            _ => None,
        }
    }
}
