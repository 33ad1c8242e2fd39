//! Handlers of the bot's chain: activity logging and dialog dispatch.

mod dialog_handler;
mod logging_handler;

pub use dialog_handler::DialogBot;
pub use logging_handler::LoggingHandler;
