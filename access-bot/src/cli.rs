//! CLI parser and config loading.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::BotConfig;

#[derive(Parser)]
#[command(name = "access-bot")]
#[command(about = "Access request bot: HTTP listener or console", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve POST /api/messages, the WebSocket stream and /health (port can override PORT).
    Serve {
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Chat on stdin/stdout.
    Console,
}

/// Load BotConfig from environment. If `port` is provided it overrides PORT.
pub fn load_config(port: Option<u16>) -> Result<BotConfig> {
    BotConfig::load(port)
}
