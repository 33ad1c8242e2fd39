//! BotConfig: BaseConfig + LuisConfig. Use load() for env-based loading.

use anyhow::Result;
use std::net::SocketAddr;

use super::{BaseConfig, LuisConfig};

/// Bot config. Call validate() after load() to fail fast before start.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub base: BaseConfig,
    pub luis: LuisConfig,
}

impl BotConfig {
    /// Load full config from environment variables. If `port` is provided it overrides PORT.
    pub fn load(port: Option<u16>) -> Result<Self> {
        let base = BaseConfig::load(port)?;
        let luis = LuisConfig::from_env();
        Ok(Self { base, luis })
    }

    pub fn validate(&self) -> Result<()> {
        self.base.validate()?;
        self.luis.validate()
    }

    pub fn base(&self) -> &BaseConfig {
        &self.base
    }
    pub fn luis(&self) -> &LuisConfig {
        &self.luis
    }

    pub fn port(&self) -> u16 {
        self.base.port
    }
    pub fn log_file(&self) -> &str {
        &self.base.log_file
    }
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.base.socket_addr()
    }
}
