// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Credential vault routes.
//!
//! Manage the locally stored Clockify API key: report status, activate a
//! freshly entered key (encrypting it on the way in), and clear it. The
//! plaintext key only ever appears in the activation request body.

use crate::error::Result;
use crate::AppState;
use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route(
        "/api/credentials",
        get(get_status).post(activate).delete(clear),
    )
}

/// Credential vault status. `encrypted` lets the frontend keep a copy for
/// header transport; it is ciphertext, never the secret itself.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CredentialStatusResponse {
    pub configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encrypted: Option<String>,
}

async fn status_response(state: &AppState) -> CredentialStatusResponse {
    let encrypted = state.credentials.encrypted().await;
    CredentialStatusResponse {
        configured: encrypted.is_some(),
        encrypted,
    }
}

/// Current vault status.
async fn get_status(State(state): State<Arc<AppState>>) -> Json<CredentialStatusResponse> {
    Json(status_response(&state).await)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActivateCredentialRequest {
    api_key: String,
}

/// Encrypt and store a newly entered API key.
///
/// A blank key (after trimming) is a no-op; the response reports the
/// unchanged status so the frontend can tell nothing was stored.
async fn activate(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ActivateCredentialRequest>,
) -> Result<Json<CredentialStatusResponse>> {
    state.credentials.activate(&request.api_key).await?;
    Ok(Json(status_response(&state).await))
}

/// Delete the stored credential (both legacy and current records).
async fn clear(State(state): State<Arc<AppState>>) -> Result<Json<CredentialStatusResponse>> {
    state.credentials.clear().await?;
    Ok(Json(status_response(&state).await))
}
