// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Timesheet-Relay API Server
//!
//! Forwards authenticated requests to the Clockify API and renders daily and
//! monthly timesheet summary lines for the export frontend.

use std::sync::Arc;
use timesheet_relay::{
    config::Config,
    services::{ClockifyService, CredentialCipher, CredentialManager, JsonFileStore},
    AppState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Timesheet-Relay API");

    // Load RSA key material for credential encryption/decryption.
    // Either half may be absent; the affected operations fail per-call.
    let cipher = CredentialCipher::from_config(&config).expect("Failed to load RSA key material");
    tracing::info!(
        can_encrypt = cipher.can_encrypt(),
        can_decrypt = cipher.can_decrypt(),
        "Credential cipher initialized"
    );

    // Open the local credential store and run the one-time
    // plaintext-to-encrypted migration if a legacy record is present.
    let store = JsonFileStore::open(&config.credential_store_path)
        .await
        .expect("Failed to open credential store");
    let credentials = CredentialManager::new(cipher.clone(), Arc::new(store));
    credentials
        .initialize()
        .await
        .expect("Failed to load stored credential");
    tracing::info!(
        configured = credentials.is_configured().await,
        "Credential store initialized"
    );

    // Clockify client with shared response cache
    let clockify = ClockifyService::new(&config.clockify_base_url);
    tracing::info!(base_url = %config.clockify_base_url, "Clockify client initialized");

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        cipher,
        credentials,
        clockify,
    });

    // Build router
    let app = timesheet_relay::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("timesheet_relay=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
