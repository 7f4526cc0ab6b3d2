// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod clockify;
pub mod credentials;
pub mod crypto;
pub mod timesheet;

pub use clockify::{ClockifyClient, ClockifyService, EntriesByDate};
pub use credentials::{
    CredentialManager, CredentialState, InMemoryStore, JsonFileStore, KeyValueStore,
};
pub use crypto::{CredentialCipher, CryptoError};
