//! Entry points: HTTP listener and console.

use anyhow::Result;
use bot_console::{listen, ConsoleAdapter};
use bot_core::{init_tracing, LogOutput};
use bot_server::{serve, ServerState};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::components::{build_bot_components, build_handler_chain};
use crate::config::BotConfig;

/// Validates config, logs to stdout and the log file, then serves until stopped.
#[instrument(skip(config))]
pub async fn run_server(config: BotConfig) -> Result<()> {
    config.validate()?;
    init_tracing(config.log_file(), LogOutput::StdoutAndFile)?;
    let addr = config.socket_addr()?;

    info!(
        addr = %addr,
        luis_configured = config.luis().is_complete(),
        "Initializing bot"
    );

    let components = build_bot_components(&config)?;
    let chain = build_handler_chain(&components);
    let state = Arc::new(ServerState::new(chain));

    info!("Bot started successfully");
    serve(addr, state).await
}

/// Console channel; logs go to the file only so stdout stays the conversation.
#[instrument(skip(config))]
pub async fn run_console(config: BotConfig) -> Result<()> {
    config.validate()?;
    init_tracing(config.log_file(), LogOutput::FileOnly)?;

    info!(
        luis_configured = config.luis().is_complete(),
        "Initializing console bot"
    );

    let components = build_bot_components(&config)?;
    let chain = build_handler_chain(&components);
    let adapter = Arc::new(ConsoleAdapter::new());

    info!("Bot started successfully");
    listen(adapter, chain).await
}
