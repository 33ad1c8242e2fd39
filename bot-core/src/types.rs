//! Core types: dialog turn status, handler response, and the Handler trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::turn::TurnContext;

/// Outcome of running the dialog stack for one turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DialogTurnStatus {
    /// No dialog was active and none was started.
    Empty,
    /// A dialog is suspended waiting for the next user input.
    Waiting,
    /// The root dialog ended.
    Complete,
    /// The stack was cancelled (e.g. the user typed "cancel").
    Cancelled,
}

/// Handler result for the chain. `Turn(status)` carries the dialog outcome so later handlers can use it in `after()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerResponse {
    /// Pass to next handler.
    Continue,
    /// Stop the chain; nothing to report.
    Stop,
    /// Skip this handler, try next.
    Ignore,
    /// Stop the chain after running the dialog stack.
    Turn(DialogTurnStatus),
}

/// Single handler concept: optional before / handle / after. Chain runs all before → handle until Stop/Turn → all after (reverse).
#[async_trait]
pub trait Handler: Send + Sync {
    /// Runs before the handle phase. Return false to stop the chain.
    async fn before(&self, _turn: &TurnContext) -> crate::error::Result<bool> {
        Ok(true)
    }
    /// Processes the turn. Return Stop or Turn to end the handle phase. Default: Continue.
    async fn handle(&self, _turn: &TurnContext) -> crate::error::Result<HandlerResponse> {
        Ok(HandlerResponse::Continue)
    }
    /// Runs after the handle phase (reverse order), with the final response.
    async fn after(
        &self,
        _turn: &TurnContext,
        _response: &HandlerResponse,
    ) -> crate::error::Result<()> {
        Ok(())
    }
}
