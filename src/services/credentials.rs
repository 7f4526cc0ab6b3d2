// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Credential lifecycle: storage, activation and the plaintext migration.
//!
//! Two storage records can exist: the legacy plaintext key written by old
//! versions of the frontend, and the current encrypted one. Initialization
//! upgrades a legacy record in place; after any successful startup at most
//! one of the two records remains.

use crate::error::AppError;
use crate::services::crypto::CredentialCipher;
use async_trait::async_trait;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Storage key of the deprecated plaintext record.
pub const LEGACY_STORAGE_KEY: &str = "clockifyApiKey";

/// Storage key of the current encrypted record.
pub const CURRENT_STORAGE_KEY: &str = "clockifySecretKey";

/// Errors from the key-value store.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("storage lock poisoned")]
    Poisoned,
}

/// Minimal async key-value capability the credential manager needs.
/// Implementations decide durability; the record is a single scalar value,
/// so last-write-wins semantics are acceptable.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    async fn delete(&self, key: &str) -> Result<(), StorageError>;
}

/// Volatile store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: std::sync::Mutex<HashMap<String, String>>,
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }
}

/// Durable store backed by a single JSON document on disk.
///
/// Every mutation rewrites the whole file; with one record of a handful of
/// keys that is the simplest correct thing.
pub struct JsonFileStore {
    path: PathBuf,
    entries: RwLock<HashMap<String, String>>,
}

impl JsonFileStore {
    /// Open a store, loading the existing document if one exists.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let entries = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(e) if e.kind() == ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    async fn persist(&self, entries: &HashMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let raw = serde_json::to_string_pretty(entries)?;
        tokio::fs::write(&self.path, raw).await?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries).await
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().await;
        if entries.remove(key).is_some() {
            self.persist(&entries).await?;
        }
        Ok(())
    }
}

/// Current credential state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialState {
    /// No credential configured; the caller must supply one.
    None,
    /// An encrypted credential is active.
    Active { encrypted: String },
}

/// Owns the stored Clockify API key across its two on-disk representations.
pub struct CredentialManager {
    cipher: CredentialCipher,
    store: Arc<dyn KeyValueStore>,
    state: RwLock<CredentialState>,
}

impl CredentialManager {
    pub fn new(cipher: CredentialCipher, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            cipher,
            store,
            state: RwLock::new(CredentialState::None),
        }
    }

    /// Load the stored credential, migrating a legacy plaintext record to
    /// the encrypted format on the way. Run once at startup.
    ///
    /// A failed migration keeps the legacy record so a later attempt can
    /// still succeed; the session simply starts without a credential.
    pub async fn initialize(&self) -> Result<(), AppError> {
        if let Some(encrypted) = self.store.get(CURRENT_STORAGE_KEY).await? {
            *self.state.write().await = CredentialState::Active { encrypted };
            tracing::debug!("Loaded stored credential");
            return Ok(());
        }

        let Some(legacy) = self.store.get(LEGACY_STORAGE_KEY).await? else {
            tracing::debug!("No stored credential");
            return Ok(());
        };

        match self.cipher.encrypt(legacy.trim()) {
            Ok(encrypted) => {
                self.store.set(CURRENT_STORAGE_KEY, &encrypted).await?;
                self.store.delete(LEGACY_STORAGE_KEY).await?;
                *self.state.write().await = CredentialState::Active { encrypted };
                tracing::info!("Migrated stored credential to encrypted format");
            }
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    "Credential migration failed; legacy record kept for a later attempt"
                );
            }
        }

        Ok(())
    }

    /// Encrypt and store a freshly entered API key.
    ///
    /// Input is trimmed first; an empty result is a no-op returning `None`.
    /// On success the plaintext is dropped and the encrypted token returned.
    pub async fn activate(&self, raw_key: &str) -> Result<Option<String>, AppError> {
        let trimmed = raw_key.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        let encrypted = self.cipher.encrypt(trimmed)?;
        self.store.set(CURRENT_STORAGE_KEY, &encrypted).await?;
        self.store.delete(LEGACY_STORAGE_KEY).await?;
        *self.state.write().await = CredentialState::Active {
            encrypted: encrypted.clone(),
        };
        tracing::info!("Credential activated");
        Ok(Some(encrypted))
    }

    /// Delete both records and reset the in-memory state. Idempotent.
    pub async fn clear(&self) -> Result<(), AppError> {
        self.store.delete(CURRENT_STORAGE_KEY).await?;
        self.store.delete(LEGACY_STORAGE_KEY).await?;
        *self.state.write().await = CredentialState::None;
        tracing::info!("Credential cleared");
        Ok(())
    }

    /// The active encrypted credential, suitable for an
    /// `x-clockify-api-key` header.
    pub async fn encrypted(&self) -> Option<String> {
        match &*self.state.read().await {
            CredentialState::Active { encrypted } => Some(encrypted.clone()),
            CredentialState::None => None,
        }
    }

    pub async fn is_configured(&self) -> bool {
        matches!(&*self.state.read().await, CredentialState::Active { .. })
    }
}
