//! # access-bot
//!
//! Wires the access request dialogs to a channel: configuration from the environment, the
//! handler chain (logging + dialog dispatch), and the `serve` / `console` entry points.

pub mod cli;
pub mod components;
pub mod config;
pub mod handlers;
pub mod runner;

pub use cli::{load_config, Cli, Commands};
pub use components::{build_bot_components, build_handler_chain, BotComponents};
pub use config::{BaseConfig, BotConfig, LuisConfig};
pub use handlers::{DialogBot, LoggingHandler};
pub use runner::{run_console, run_server};
