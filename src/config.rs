//! Application configuration loaded from environment variables.
//!
//! RSA key material arrives as PEM text in env vars. Deployment tooling
//! stores PEM as a single line with literal `\n` sequences, so both keys are
//! unescaped on load.

use std::env;
use std::path::PathBuf;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the Clockify REST API
    pub clockify_base_url: String,
    /// Frontend URL for CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// RSA public key PEM (SPKI) for encrypting stored credentials
    pub rsa_public_key_pem: Option<String>,
    /// RSA private key PEM (PKCS#8) for decrypting forwarded credentials
    pub rsa_private_key_pem: Option<String>,
    /// Path of the local credential store (single JSON document)
    pub credential_store_path: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            clockify_base_url: env::var("CLOCKIFY_API_BASE_URL")
                .unwrap_or_else(|_| "https://api.clockify.me/api/v1".to_string()),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| ConfigError::Invalid("PORT"))?,
            rsa_public_key_pem: env::var("RSA_PUBLIC_KEY").ok().map(|v| unescape_pem(&v)),
            rsa_private_key_pem: env::var("RSA_PRIVATE_KEY").ok().map(|v| unescape_pem(&v)),
            credential_store_path: env::var("CREDENTIAL_STORE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data/credentials.json")),
        })
    }

    /// Default config for testing only. No key material, no store on disk.
    pub fn test_default() -> Self {
        Self {
            clockify_base_url: "https://clockify.invalid/api/v1".to_string(),
            frontend_url: "http://localhost:3000".to_string(),
            port: 8080,
            rsa_public_key_pem: None,
            rsa_private_key_pem: None,
            credential_store_path: PathBuf::from("data/credentials-test.json"),
        }
    }
}

/// Convert literal `\n` sequences into real line breaks.
fn unescape_pem(raw: &str) -> String {
    raw.replace("\\n", "\n")
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
