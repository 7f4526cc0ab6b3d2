// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Clockify API key resolution middleware.

use crate::error::AppError;
use crate::services::crypto;
use crate::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Header the frontend uses to forward its (normally encrypted) API key.
pub const API_KEY_HEADER: &str = "x-clockify-api-key";

/// Resolved credential for one request.
///
/// `api_key` is the decrypted secret; it lives only in this extension for
/// the lifetime of the request. `fingerprint` is the value as transported
/// (ciphertext for migrated users) and keys the response cache.
#[derive(Debug, Clone)]
pub struct ApiCredential {
    pub api_key: String,
    pub fingerprint: String,
}

/// Middleware that requires a usable Clockify API key.
///
/// The header wins when present; otherwise the locally stored credential is
/// used. Values classified as encrypted are decrypted, anything else is
/// forwarded verbatim (the legacy plaintext transport).
pub async fn require_api_key(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header_value = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned);

    let raw = match header_value {
        Some(value) => value,
        None => state
            .credentials
            .encrypted()
            .await
            .ok_or(AppError::MissingApiKey)?,
    };

    let api_key = if crypto::is_encrypted(&raw) {
        state.cipher.decrypt(&raw).map_err(|err| {
            tracing::warn!(error = %err, "Failed to decrypt forwarded API key");
            AppError::InvalidCredential
        })?
    } else {
        raw.clone()
    };

    request.extensions_mut().insert(ApiCredential {
        api_key,
        fingerprint: raw,
    });

    Ok(next.run(request).await)
}
