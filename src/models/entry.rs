// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Time entry model shared between the Clockify client and API responses.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// One recorded start/end pair, exactly as Clockify reports it.
///
/// `end` is `None` while a timer is still running; such entries are excluded
/// from consolidation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TimeInterval {
    /// Start timestamp (RFC3339)
    pub start: String,
    /// End timestamp (RFC3339), absent for a running timer
    pub end: Option<String>,
    /// Clockify duration string (informational, not used for consolidation)
    pub duration: Option<String>,
}

/// A Clockify time entry with its project name resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TimeEntry {
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    pub time_interval: TimeInterval,
}
