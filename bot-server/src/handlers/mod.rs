pub mod health;
pub mod messages;
pub mod stream;

use bot_core::Activity;
use serde::{Deserialize, Serialize};

/// Body returned for `expectReplies` requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ExpectedReplies {
    pub activities: Vec<Activity>,
}
