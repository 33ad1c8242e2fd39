//! # Handler chain
//!
//! Runs a sequence of handlers (before/handle/after) for each turn. A handler's before can stop
//! the chain; the first handler that returns Stop or Turn ends the handle phase; after callbacks run in reverse order.
//! [`HandlerChain::run_turn`] is the single place where unhandled turn errors are caught and reported.

use bot_core::{Handler, HandlerResponse, Result, TurnContext};
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

mod turn_error;

pub use turn_error::{report_turn_error, TURN_ERROR_MESSAGE, TURN_ERROR_FIX_MESSAGE};

/// Chain of handlers: before runs in order, then handle until one stops the chain, then after in reverse order.
#[derive(Clone, Default)]
pub struct HandlerChain {
    handlers: Vec<Arc<dyn Handler>>,
}

impl HandlerChain {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Appends a handler (runs in order; first Stop/Turn ends handle phase).
    pub fn add_handler(mut self, handler: Arc<dyn Handler>) -> Self {
        self.handlers.push(handler);
        self
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Runs before on every handler, then handle, then after in reverse. Returns the first Stop or Turn, or Continue.
    #[instrument(skip(self, turn))]
    pub async fn handle(&self, turn: &TurnContext) -> Result<HandlerResponse> {
        let activity = turn.activity();
        let mut final_response = HandlerResponse::Continue;

        info!(
            conversation_id = %activity.conversation_id(),
            activity_id = ?activity.id,
            activity_type = %activity.activity_type.as_str(),
            "step: handler_chain started"
        );

        for handler in &self.handlers {
            let handler_name = std::any::type_name_of_val(handler.as_ref());
            let should_continue = handler.before(turn).await?;
            if !should_continue {
                info!(
                    conversation_id = %activity.conversation_id(),
                    handler = %handler_name,
                    "step: handler before returned false, chain stopped"
                );
                return Ok(HandlerResponse::Stop);
            }
        }

        for handler in &self.handlers {
            let handler_name = std::any::type_name_of_val(handler.as_ref());
            debug!(handler = %handler_name, "step: handler processing");
            let response = handler.handle(turn).await?;
            debug!(
                handler = %handler_name,
                response = ?response,
                "Handler processed"
            );

            match response {
                HandlerResponse::Stop | HandlerResponse::Turn(_) => {
                    info!(
                        conversation_id = %activity.conversation_id(),
                        handler = %handler_name,
                        response = ?response,
                        "step: handler chain stopped by handler"
                    );
                    final_response = response;
                    break;
                }
                HandlerResponse::Continue | HandlerResponse::Ignore => continue,
            }
        }

        for handler in self.handlers.iter().rev() {
            handler.after(turn, &final_response).await?;
        }

        info!(
            conversation_id = %activity.conversation_id(),
            activity_id = ?activity.id,
            "step: handler_chain finished"
        );

        Ok(final_response)
    }

    /// Runs the chain and catches any error: logs it and reports it to the user.
    ///
    /// Returns `Stop` after a reported failure. Only a failure while reporting is returned as `Err`.
    pub async fn run_turn(&self, turn: &TurnContext) -> Result<HandlerResponse> {
        match self.handle(turn).await {
            Ok(response) => Ok(response),
            Err(e) => {
                error!(
                    error = %e,
                    conversation_id = %turn.activity().conversation_id(),
                    "[on_turn_error] unhandled error"
                );
                report_turn_error(turn, &e).await?;
                Ok(HandlerResponse::Stop)
            }
        }
    }
}

// Integration tests live in tests/handler_chain_test.rs
