//! # bot-server
//!
//! HTTP listener bridging the messaging channel protocol to the handler chain.
//!
//! - `POST /api/messages`: one activity per request. Replies go to the channel's connector, or back in the
//!   response body when the activity asks for `expectReplies`.
//! - `GET /api/messages` with a WebSocket upgrade: one activity per text frame, replies as text frames.
//! - `GET /health`: liveness.

mod handlers;
mod http_adapter;
mod router;
mod state;
mod streaming_adapter;

pub use handlers::stream::process_frame;
pub use handlers::ExpectedReplies;
pub use http_adapter::{activities_url, HttpChannelAdapter, ReplyMode};
pub use router::{build_router, serve};
pub use state::ServerState;
pub use streaming_adapter::StreamingChannelAdapter;
