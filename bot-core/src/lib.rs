//! # bot-core
//!
//! Core types and traits for the access-request bot: [`Activity`], [`TurnContext`], [`ChannelAdapter`],
//! [`Handler`], error types, and tracing initialization. Transport-agnostic; used by every channel and by the dialogs.

pub mod activity;
pub mod adapter;
pub mod error;
pub mod logger;
pub mod turn;
pub mod types;

pub use activity::{
    Activity, ActivityType, Attachment, CardAction, ChannelAccount, ConversationAccount,
    ConversationReference, DeliveryMode, InputHint, ResourceResponse, SuggestedActions,
};
pub use adapter::ChannelAdapter;
pub use error::{BotError, DialogError, Result};
pub use logger::{init_tracing, LogOutput};
pub use turn::TurnContext;
pub use types::{DialogTurnStatus, Handler, HandlerResponse};
