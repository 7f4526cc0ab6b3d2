// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use std::sync::{Arc, OnceLock};
use timesheet_relay::config::Config;
use timesheet_relay::routes::create_router;
use timesheet_relay::services::{
    crypto, ClockifyService, CredentialCipher, CredentialManager, InMemoryStore, KeyValueStore,
};
use timesheet_relay::AppState;

/// One keypair per test binary; RSA key generation is too slow to repeat
/// per test.
static TEST_KEYS: OnceLock<(String, String)> = OnceLock::new();

/// `(public_pem, private_pem)` for tests.
#[allow(dead_code)]
pub fn test_keys() -> &'static (String, String) {
    TEST_KEYS.get_or_init(|| crypto::generate_keypair().expect("Failed to generate test keypair"))
}

/// Cipher with both halves configured.
#[allow(dead_code)]
pub fn test_cipher() -> CredentialCipher {
    let (public_pem, private_pem) = test_keys();
    CredentialCipher::from_pem(Some(public_pem), Some(private_pem))
        .expect("Failed to load test keypair")
}

/// Cipher that can decrypt but not encrypt (no public key).
#[allow(dead_code)]
pub fn decrypt_only_cipher() -> CredentialCipher {
    let (_, private_pem) = test_keys();
    CredentialCipher::from_pem(None, Some(private_pem)).expect("Failed to load test private key")
}

/// Create a test app with offline dependencies (in-memory credential store,
/// Clockify base URL pointing at a non-resolvable host).
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let cipher = test_cipher();
    let store: Arc<dyn KeyValueStore> = Arc::new(InMemoryStore::default());
    let credentials = CredentialManager::new(cipher.clone(), store);
    let clockify = ClockifyService::new(&config.clockify_base_url);

    let state = Arc::new(AppState {
        config,
        cipher,
        credentials,
        clockify,
    });

    (create_router(state.clone()), state)
}
