//! # bot-console
//!
//! Console channel: each stdin line becomes a message activity on a fixed conversation, and
//! outbound activities are printed to stdout. Drives the [`handler_chain::HandlerChain`] one line at a time.

mod adapter;
mod runner;

pub use adapter::{console_reference, ConsoleAdapter};
pub use runner::{listen, listen_on};
