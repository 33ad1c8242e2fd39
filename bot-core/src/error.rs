//! Error types for the bot core.
//!
//! [`BotError`] is the top-level error; [`DialogError`] is used for dialog runtime failures.

use thiserror::Error;

/// Top-level error for the bot (channel transport, dialog, config, recognizer, IO).
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Channel error: {0}")]
    Channel(String),

    #[error("Dialog error: {0}")]
    Dialog(#[from] DialogError),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Recognizer error: {0}")]
    Recognizer(String),

    #[error("{0}: not supported.")]
    NotSupported(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

/// Errors produced by the dialog runtime (stack, registry, options, step loop).
#[derive(Error, Debug)]
pub enum DialogError {
    #[error("Unknown dialog: {0}")]
    UnknownDialog(String),

    #[error("Dialog already registered: {0}")]
    DuplicateDialog(String),

    #[error("Step {index} out of range for dialog {dialog_id}")]
    StepOutOfRange { dialog_id: String, index: usize },

    #[error("Invalid options for dialog {dialog_id}: {reason}")]
    InvalidOptions { dialog_id: String, reason: String },

    #[error("Turn exceeded {0} dialog transitions")]
    StepLimitExceeded(usize),
}

/// Result type for core operations; uses [`BotError`].
pub type Result<T> = std::result::Result<T, BotError>;
