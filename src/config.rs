//! Configuration for the portfolio backend.
//!
//! Loaded once at startup from `config/default.toml` merged with
//! `PORTFOLIO_`-prefixed environment variables, then passed by reference
//! into the services. Never mutated after load.

use figment::providers::{Env, Format, Toml};
use figment::Figment;
use serde::Deserialize;

/// Top-level application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// HTTP listener configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Mail relay configuration.
    pub smtp: SmtpConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Mail relay configuration.
///
/// `sender` and `password` have no defaults: startup fails fast when the
/// operator address or credential is unset.
#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    /// Relay host.
    #[serde(default = "default_smtp_host")]
    pub host: String,
    /// Relay submission port.
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    /// Operator address, used as both sender and recipient of relayed
    /// contact messages.
    pub sender: String,
    /// Operator credential for relay authentication.
    pub password: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

const fn default_port() -> u16 {
    5000
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}

const fn default_smtp_port() -> u16 {
    587
}

impl AppConfig {
    /// Load configuration from files and environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be read or is missing
    /// the operator address or credential.
    pub fn load() -> anyhow::Result<Self> {
        let figment = Figment::new()
            .merge(Toml::file("config/default.toml"))
            .merge(Env::prefixed("PORTFOLIO_").split("__"));

        let config: Self = figment.extract()?;
        Ok(config)
    }
}
