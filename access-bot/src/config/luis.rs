//! LUIS config: application, key and host. Missing values leave the recognizer unconfigured.

use anyhow::Result;
use luis_client::{normalize_endpoint, LuisApplication, LuisClient, Recognizer, DEFAULT_SLOT};
use std::env;

#[derive(Debug, Clone)]
pub struct LuisConfig {
    /// LuisAppId
    pub app_id: String,
    /// LuisAPIKey
    pub api_key: String,
    /// LuisAPIHostName; a bare host or a URL.
    pub api_host_name: String,
    /// LuisSlot
    pub slot: String,
    /// LuisVerbose; default false.
    pub verbose: bool,
    /// LuisLog: whether LUIS keeps queries in its endpoint log; default true.
    pub log: bool,
}

impl Default for LuisConfig {
    fn default() -> Self {
        Self {
            app_id: String::new(),
            api_key: String::new(),
            api_host_name: String::new(),
            slot: DEFAULT_SLOT.to_string(),
            verbose: false,
            log: true,
        }
    }
}

/// `true/1/yes/on` or `false/0/no/off`, case-insensitive; anything else (or unset) is `default`.
fn env_flag(name: &str, default: bool) -> bool {
    match env::var(name).map(|v| v.trim().to_ascii_lowercase()) {
        Ok(v) if matches!(v.as_str(), "true" | "1" | "yes" | "on") => true,
        Ok(v) if matches!(v.as_str(), "false" | "0" | "no" | "off") => false,
        _ => default,
    }
}

impl LuisConfig {
    pub fn from_env() -> Self {
        let var = |name: &str| env::var(name).unwrap_or_default();
        let slot = env::var("LuisSlot")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SLOT.to_string());
        Self {
            app_id: var("LuisAppId"),
            api_key: var("LuisAPIKey"),
            api_host_name: var("LuisAPIHostName"),
            slot,
            verbose: env_flag("LuisVerbose", false),
            log: env_flag("LuisLog", true),
        }
    }

    /// True when app id, key and host are all set.
    pub fn is_complete(&self) -> bool {
        self.application().is_complete()
    }

    pub fn application(&self) -> LuisApplication {
        LuisApplication::new(
            self.app_id.trim(),
            self.api_key.trim(),
            self.api_host_name.trim(),
        )
    }

    /// Prediction client for the configured slot and query flags.
    pub fn client(&self) -> LuisClient {
        LuisClient::new(self.application())
            .with_slot(self.slot.as_str())
            .with_verbose(self.verbose)
            .with_log(self.log)
    }

    /// Recognizer over [`Self::client`]; unconfigured when credentials are missing.
    pub fn recognizer(&self) -> Recognizer {
        Recognizer::from_luis(self.client())
    }

    /// A set host must form a valid URL.
    pub fn validate(&self) -> Result<()> {
        let host = self.api_host_name.trim();
        if host.is_empty() {
            return Ok(());
        }
        let endpoint = normalize_endpoint(host);
        if reqwest::Url::parse(&endpoint).is_err() {
            anyhow::bail!("LuisAPIHostName is set but not a valid host or URL: {}", host);
        }
        Ok(())
    }
}
