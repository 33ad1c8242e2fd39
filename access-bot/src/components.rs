//! Component factory: builds the recognizer, dialogs and handler chain from config.

use anyhow::{Context, Result};
use dialogs::{AccessRequestDialog, DialogRuntime, DialogStateStore, InMemoryDialogStateStore, MainDialog};
use handler_chain::HandlerChain;
use luis_client::Recognizer;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::config::BotConfig;
use crate::handlers::{DialogBot, LoggingHandler};

/// Dependencies shared by both channels.
#[derive(Clone)]
pub struct BotComponents {
    pub recognizer: Arc<Recognizer>,
    pub runtime: DialogRuntime,
    pub state_store: Arc<dyn DialogStateStore>,
}

impl BotComponents {
    /// Builds the dialogs around `recognizer` with the given state store.
    pub fn new(recognizer: Recognizer, state_store: Arc<dyn DialogStateStore>) -> Result<Self> {
        let recognizer = Arc::new(recognizer);
        let dialogs = MainDialog::builder()
            .recognizer(recognizer.clone())
            .access_request_dialog(AccessRequestDialog::new())
            .build()
            .and_then(MainDialog::into_dialog_set)
            .context("failed to build dialogs")?;
        let runtime = DialogRuntime::new(dialogs).context("failed to build dialog runtime")?;
        Ok(Self {
            recognizer,
            runtime,
            state_store,
        })
    }
}

/// Builds BotComponents: LUIS recognizer from config and an in-memory state store.
#[instrument(skip(config))]
pub fn build_bot_components(config: &BotConfig) -> Result<BotComponents> {
    let luis = config.luis();
    let recognizer = luis.recognizer();
    info!(
        luis_configured = recognizer.is_configured(),
        slot = %luis.slot,
        verbose = luis.verbose,
        log = luis.log,
        "step: building bot components"
    );
    BotComponents::new(recognizer, Arc::new(InMemoryDialogStateStore::new()))
}

/// Logging first, then dialog dispatch.
pub fn build_handler_chain(components: &BotComponents) -> HandlerChain {
    HandlerChain::new()
        .add_handler(Arc::new(LoggingHandler))
        .add_handler(Arc::new(DialogBot::new(
            components.runtime.clone(),
            components.state_store.clone(),
        )))
}
