// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Timesheet-Relay: turn Clockify time entries into timesheet rows
//!
//! This crate provides the backend for the timesheet export tool: a thin
//! authenticated proxy in front of the Clockify API plus the consolidation
//! engine that reduces a day's time entries to a single tab-delimited
//! start/break/end line.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use services::{ClockifyService, CredentialCipher, CredentialManager};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub cipher: CredentialCipher,
    pub credentials: CredentialManager,
    pub clockify: ClockifyService,
}
