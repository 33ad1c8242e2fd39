//! # LUIS client
//!
//! Intent recognition against the LUIS v3 prediction REST API.
//!
//! - [`LuisClient`]: HTTP client for `GET .../luis/prediction/v3.0/apps/{app}/slots/{slot}/predict`.
//! - [`IntentRecognizer`]: the seam dialogs depend on; tests swap in their own implementation.
//! - [`Recognizer`]: wrapper that reports "not configured" when credentials are missing.

mod client;
mod recognizer;
mod result;

pub use client::{
    mask_key, normalize_endpoint, LuisApplication, LuisClient, DEFAULT_SLOT,
    SUBSCRIPTION_KEY_HEADER,
};
pub use recognizer::{IntentRecognizer, Recognizer, API_VERSION};
pub use result::{IntentScore, RecognizerResult, NONE_INTENT};
