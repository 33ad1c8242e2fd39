//! Base config: HTTP listener and logging. Loaded from env.

use anyhow::{Context, Result};
use std::env;
use std::net::{IpAddr, SocketAddr};

pub const DEFAULT_PORT: u16 = 3978;
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0";
pub const DEFAULT_LOG_FILE: &str = "logs/access-bot.log";

/// Base config: listener address and log file.
#[derive(Debug, Clone)]
pub struct BaseConfig {
    /// PORT or port
    pub port: u16,
    /// BIND_ADDR
    pub bind_addr: String,
    /// LOG_FILE
    pub log_file: String,
}

impl BaseConfig {
    /// Load from environment variables. `port` overrides PORT if provided.
    pub fn load(port: Option<u16>) -> Result<Self> {
        let port = match port {
            Some(port) => port,
            None => match env::var("PORT").or_else(|_| env::var("port")) {
                Ok(raw) => raw
                    .trim()
                    .parse()
                    .with_context(|| format!("PORT is not a valid port number: {}", raw))?,
                Err(_) => DEFAULT_PORT,
            },
        };
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        let log_file = env::var("LOG_FILE").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());

        Ok(Self {
            port,
            bind_addr,
            log_file,
        })
    }

    /// Validate config (bind address must be an IP address).
    pub fn validate(&self) -> Result<()> {
        self.socket_addr().map(|_| ())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .bind_addr
            .trim()
            .parse()
            .with_context(|| format!("BIND_ADDR is not a valid IP address: {}", self.bind_addr))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}
