// src/config.rs
//! Runtime configuration.
//!
//! Settings are layered, later layers winning:
//! 1. Built-in defaults
//! 2. An optional `config/wallet.{toml,yaml,json}` file
//! 3. `WALLET_*` environment variables (e.g. `WALLET_ZENROOM_BIN`), which may
//!    come from a `.env` file loaded at startup

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;

const CONFIG_FILE: &str = "config/wallet";
const ENV_PREFIX: &str = "WALLET";

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Settings {
    /// Address the HTTP API binds to
    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,

    /// `zenroom` executable used as Crypto Engine
    #[serde(default = "default_zenroom_bin")]
    pub zenroom_bin: PathBuf,

    /// Issuer used when an issuance request does not name one
    #[serde(default = "default_issuer_url")]
    pub default_issuer_url: String,

    /// Default `env_logger` filter, overridden by `RUST_LOG`
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 3000))
}

fn default_zenroom_bin() -> PathBuf {
    PathBuf::from("zenroom")
}

fn default_issuer_url() -> String {
    "https://credentials.decodeproject.eu".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            zenroom_bin: default_zenroom_bin(),
            default_issuer_url: default_issuer_url(),
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// Loads settings from the config file (if present) and the environment.
    ///
    /// # Errors
    /// Returns `ConfigError` if a source is malformed or a value has the wrong type
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize()
    }

    /// Parses settings from a TOML document, filling in defaults.
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from_str(source, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}
