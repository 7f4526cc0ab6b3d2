// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::http::StatusCode;
use axum::response::IntoResponse;
use timesheet_relay::error::AppError;
use timesheet_relay::services::crypto::CryptoError;

#[test]
fn test_is_credential_error_matches() {
    assert!(AppError::MissingApiKey.is_credential_error());
    assert!(AppError::InvalidCredential.is_credential_error());
    assert!(AppError::ClockifyUnauthorized("bad key".to_string()).is_credential_error());
}

#[test]
fn test_is_credential_error_no_match() {
    assert!(!AppError::ClockifyRateLimited.is_credential_error());
    assert!(!AppError::ClockifyApi("HTTP 500".to_string()).is_credential_error());
    assert!(!AppError::BadRequest("bad date".to_string()).is_credential_error());
    assert!(!AppError::Configuration("no key".to_string()).is_credential_error());
}

#[test]
fn test_status_codes() {
    let cases = [
        (AppError::MissingApiKey, StatusCode::UNAUTHORIZED),
        (AppError::InvalidCredential, StatusCode::UNAUTHORIZED),
        (
            AppError::BadRequest("x".to_string()),
            StatusCode::BAD_REQUEST,
        ),
        (
            AppError::ClockifyUnauthorized("x".to_string()),
            StatusCode::UNAUTHORIZED,
        ),
        (AppError::ClockifyRateLimited, StatusCode::TOO_MANY_REQUESTS),
        (
            AppError::ClockifyApi("x".to_string()),
            StatusCode::BAD_GATEWAY,
        ),
        (
            AppError::Configuration("x".to_string()),
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
        (
            AppError::Storage("x".to_string()),
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
    ];

    for (err, expected) in cases {
        assert_eq!(err.into_response().status(), expected);
    }
}

#[test]
fn test_crypto_error_mapping() {
    // Undecryptable ciphertext surfaces as an authentication failure.
    let err: AppError = CryptoError::InvalidCiphertext.into();
    assert!(matches!(err, AppError::InvalidCredential));

    // Missing key material is a server configuration problem.
    let err: AppError = CryptoError::MissingPublicKey.into();
    assert!(matches!(err, AppError::Configuration(_)));

    let err: AppError = CryptoError::MissingPrivateKey.into();
    assert!(matches!(err, AppError::Configuration(_)));

    // An oversized plaintext is the caller's input problem.
    let err: AppError = CryptoError::EncryptionFailed("too long".to_string()).into();
    assert!(matches!(err, AppError::BadRequest(_)));
}
