//! # dialogs
//!
//! Waterfall dialog runtime plus the bot's dialogs.
//!
//! - [`runtime`]: dialog stack, step outcomes, per-conversation state store.
//! - [`prompt`]: text and choice prompts.
//! - [`AccessRequestDialog`]: collects project id and request type.
//! - [`MainDialog`]: classifies the user's request and restarts after each request.

pub mod access;
pub mod main_dialog;
pub mod prompt;
pub mod request;
pub mod runtime;

pub use access::{AccessRequestDialog, ACCESS_REQUEST_DIALOG_ID};
pub use main_dialog::{MainDialog, MainDialogBuilder, MainOptions, MAIN_DIALOG_ID};
pub use prompt::{Choice, FoundChoice, ListStyle, Prompt};
pub use request::{is_truthy, request_type_choices, RequestContext, RequestType};
pub use runtime::{
    Dialog, DialogInstance, DialogRuntime, DialogSet, DialogState, DialogStateStore,
    DialogTurnResult, InMemoryDialogStateStore, Interruption, StepContext, StepOutcome, Waterfall,
    MAX_TRANSITIONS_PER_TURN,
};
