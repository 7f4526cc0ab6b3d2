// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::services::crypto::CryptoError;
use crate::services::credentials::StorageError;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Clockify API key required")]
    MissingApiKey,

    #[error("Invalid or corrupted API key")]
    InvalidCredential,

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Clockify rejected the API key")]
    ClockifyUnauthorized(String),

    #[error("Clockify rate limit exceeded")]
    ClockifyRateLimited,

    #[error("Clockify API error: {0}")]
    ClockifyApi(String),

    #[error("Server misconfiguration: {0}")]
    Configuration(String),

    #[error("Credential storage error: {0}")]
    Storage(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// True when the failure means the caller must re-enter or re-activate
    /// their API key (as opposed to a transient upstream or server problem).
    pub fn is_credential_error(&self) -> bool {
        matches!(
            self,
            AppError::MissingApiKey
                | AppError::InvalidCredential
                | AppError::ClockifyUnauthorized(_)
        )
    }
}

impl From<CryptoError> for AppError {
    fn from(err: CryptoError) -> Self {
        match err {
            // Malformed or mismatched ciphertext is an authentication
            // failure, never retried.
            CryptoError::InvalidCiphertext => AppError::InvalidCredential,
            // Oversized plaintext is caller input, not a server fault.
            CryptoError::EncryptionFailed(msg) => {
                AppError::BadRequest(format!("Could not encrypt API key: {}", msg))
            }
            CryptoError::MissingPublicKey
            | CryptoError::MissingPrivateKey
            | CryptoError::InvalidKey(_)
            | CryptoError::KeyGeneration(_) => AppError::Configuration(err.to_string()),
        }
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::Storage(err.to_string())
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::MissingApiKey => (StatusCode::UNAUTHORIZED, "missing_api_key", None),
            AppError::InvalidCredential => {
                (StatusCode::UNAUTHORIZED, "invalid_credential", None)
            }
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::ClockifyUnauthorized(msg) => (
                StatusCode::UNAUTHORIZED,
                "clockify_unauthorized",
                Some(msg.clone()),
            ),
            AppError::ClockifyRateLimited => {
                (StatusCode::TOO_MANY_REQUESTS, "clockify_rate_limited", None)
            }
            AppError::ClockifyApi(msg) => {
                (StatusCode::BAD_GATEWAY, "clockify_error", Some(msg.clone()))
            }
            AppError::Configuration(msg) => {
                tracing::error!(error = %msg, "Configuration error");
                (StatusCode::INTERNAL_SERVER_ERROR, "configuration_error", None)
            }
            AppError::Storage(msg) => {
                tracing::error!(error = %msg, "Credential storage error");
                (StatusCode::INTERNAL_SERVER_ERROR, "storage_error", None)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
