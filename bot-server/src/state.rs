//! Shared state for request handlers.

use handler_chain::HandlerChain;

/// Handler chain plus the HTTP client used for connector replies.
#[derive(Clone)]
pub struct ServerState {
    pub chain: HandlerChain,
    pub http: reqwest::Client,
}

impl ServerState {
    pub fn new(chain: HandlerChain) -> Self {
        Self {
            chain,
            http: reqwest::Client::new(),
        }
    }
}
