// src/main.rs

//! # DDDC Wallet - Main Entry Point
//!
//! Initializes the wallet components and starts the API server.
//!
//! ## Architecture Overview
//! 1. **Crypto Engine**: the Zenroom binary running the protocol scripts
//! 2. **Services Layer**: credential issuer and petition clients, API endpoints
//! 3. **State Layer**: the action/reducer store shared by every request
//!
//! ## Configuration
//! Read from `config/wallet.{toml,yaml,json}` when present, overridden by
//! `WALLET_*` environment variables (a `.env` file is honoured):
//! - `WALLET_LISTEN_ADDR`: (Optional) API bind address (default: 127.0.0.1:3000)
//! - `WALLET_ZENROOM_BIN`: (Optional) Zenroom executable (default: `zenroom`)
//! - `WALLET_DEFAULT_ISSUER_URL`: (Optional) issuer used when a request names none
//! - `WALLET_LOG_LEVEL`: (Optional) default log filter when `RUST_LOG` is unset

use anyhow::Context;
use dddc_wallet::config::Settings;
use dddc_wallet::services::api_server::ApiServer;
use dddc_wallet::services::{HttpIssuerConnector, HttpPetitionSource};
use dddc_wallet::state::Store;
use dddc_wallet::wallet::CredentialOrchestrator;
use dddc_wallet::zkp::ZenroomCli;
use dotenv::dotenv;
use log::info;
use std::sync::Arc;

/// Main application entry point
///
/// # Initialization Sequence
/// 1. Load environment and configuration
/// 2. Initialize logging
/// 3. Wire the Crypto Engine, issuer connector and state store
/// 4. Start API server
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let settings = Settings::load().context("failed to load wallet configuration")?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(settings.log_level.as_str()),
    )
    .init();

    // One HTTP client shared by the issuer and petition clients
    let http = reqwest::Client::builder()
        .build()
        .context("failed to build HTTP client")?;

    let engine = Arc::new(ZenroomCli::new(settings.zenroom_bin.clone()));
    let issuers = Arc::new(HttpIssuerConnector::new(http.clone()));
    let store = Arc::new(Store::new());
    let orchestrator = CredentialOrchestrator::new(engine, issuers, store);

    let petitions = Arc::new(HttpPetitionSource::new(http));

    info!(
        "using zenroom at {} and default issuer {}",
        settings.zenroom_bin.display(),
        settings.default_issuer_url
    );

    // Initialize API Server with all dependencies
    let api_server = ApiServer::new(orchestrator, petitions, settings.default_issuer_url);

    api_server
        .run(settings.listen_addr)
        .await
        .with_context(|| format!("API server on {} stopped", settings.listen_addr))
}
