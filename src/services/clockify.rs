// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Clockify API client for fetching a user's time entries.
//!
//! Handles:
//! - User and workspace resolution
//! - Day and month time-entry queries
//! - Parallel project-name resolution
//! - Short-TTL response caching (one spreadsheet-paste session tends to hit
//!   the same day or month several times in a row)
//!
//! Errors are surfaced once, never retried.

use crate::error::AppError;
use crate::models::{TimeEntry, TimeInterval};
use crate::time_utils::{format_utc_query, local_date_key, local_day_range, local_month_range};
use chrono::{DateTime, NaiveDate, Utc};
use dashmap::DashMap;
use futures_util::future::join_all;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

/// Clockify caps `page-size` at 5000; a single personal workspace month
/// stays far below that, so no pagination is needed.
const PAGE_SIZE: u32 = 5000;

/// How long a fetched day/month payload stays valid.
pub const CACHE_TTL: Duration = Duration::from_secs(120);

/// Month payloads grouped by local `YYYY-MM-DD` date key.
pub type EntriesByDate = HashMap<String, Vec<TimeEntry>>;

/// Low-level Clockify API client.
#[derive(Clone)]
pub struct ClockifyClient {
    http: reqwest::Client,
    base_url: String,
}

impl ClockifyClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Get the authenticated user's profile.
    pub async fn get_user(&self, api_key: &str) -> Result<ClockifyUser, AppError> {
        let url = format!("{}/user", self.base_url);
        self.get_json(&url, api_key).await
    }

    /// List time entries for a user within a UTC range.
    pub async fn list_time_entries(
        &self,
        api_key: &str,
        workspace_id: &str,
        user_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<ClockifyTimeEntry>, AppError> {
        let url = format!(
            "{}/workspaces/{}/user/{}/time-entries?start={}&end={}&page-size={}",
            self.base_url,
            workspace_id,
            user_id,
            urlencoding::encode(&format_utc_query(start)),
            urlencoding::encode(&format_utc_query(end)),
            PAGE_SIZE
        );
        self.get_json(&url, api_key).await
    }

    /// Get a single project (for its display name).
    pub async fn get_project(
        &self,
        api_key: &str,
        workspace_id: &str,
        project_id: &str,
    ) -> Result<ClockifyProject, AppError> {
        let url = format!(
            "{}/workspaces/{}/projects/{}",
            self.base_url, workspace_id, project_id
        );
        self.get_json(&url, api_key).await
    }

    /// Generic GET request with JSON response.
    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        api_key: &str,
    ) -> Result<T, AppError> {
        let response = self
            .http
            .get(url)
            .header("X-Api-Key", api_key)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| AppError::ClockifyApi(e.to_string()))?;

        Self::check_response_json(response).await
    }

    /// Check response status and parse the JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 {
                tracing::warn!("Clockify rate limit hit (429)");
                return Err(AppError::ClockifyRateLimited);
            }

            if status.as_u16() == 401 {
                return Err(AppError::ClockifyUnauthorized(body));
            }

            return Err(AppError::ClockifyApi(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::ClockifyApi(format!("JSON parse error: {}", e)))
    }
}

/// Authenticated Clockify user, as returned by `/user`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClockifyUser {
    pub id: String,
    pub active_workspace: Option<String>,
    pub default_workspace: Option<String>,
    #[serde(default)]
    pub memberships: Vec<ClockifyMembership>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClockifyMembership {
    pub workspace_id: String,
}

impl ClockifyUser {
    /// Workspace to query: active, then default, then first membership.
    pub fn workspace_id(&self) -> Option<&str> {
        self.active_workspace
            .as_deref()
            .or(self.default_workspace.as_deref())
            .or_else(|| self.memberships.first().map(|m| m.workspace_id.as_str()))
    }
}

/// Raw time entry as Clockify returns it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClockifyTimeEntry {
    pub id: String,
    #[serde(default)]
    pub description: String,
    pub project_id: Option<String>,
    pub time_interval: TimeInterval,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClockifyProject {
    pub id: String,
    pub name: String,
}

struct CacheEntry<T> {
    expires_at: Instant,
    payload: T,
}

/// High-level Clockify service with response caching.
///
/// Cache keys carry the caller's raw credential (as transported, i.e. the
/// ciphertext for migrated users) so different keys never share a payload.
pub struct ClockifyService {
    client: ClockifyClient,
    day_cache: DashMap<String, CacheEntry<Vec<TimeEntry>>>,
    month_cache: DashMap<String, CacheEntry<EntriesByDate>>,
}

impl ClockifyService {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: ClockifyClient::new(base_url),
            day_cache: DashMap::new(),
            month_cache: DashMap::new(),
        }
    }

    /// Fetch one local calendar day's entries, with project names resolved.
    pub async fn day_entries(
        &self,
        api_key: &str,
        fingerprint: &str,
        date: NaiveDate,
    ) -> Result<Vec<TimeEntry>, AppError> {
        let cache_key = format!("{}:{}", fingerprint, date);
        if let Some(hit) = self.day_cache.get(&cache_key) {
            if hit.expires_at > Instant::now() {
                return Ok(hit.payload.clone());
            }
        }

        let (start, end) = local_day_range(date).ok_or_else(|| {
            AppError::BadRequest("Date is not representable in local time".to_string())
        })?;
        let entries = self.fetch_entries(api_key, start, end).await?;

        self.day_cache.insert(
            cache_key,
            CacheEntry {
                expires_at: Instant::now() + CACHE_TTL,
                payload: entries.clone(),
            },
        );
        Ok(entries)
    }

    /// Fetch a whole month in one upstream query, grouped by local date.
    ///
    /// A single request for the month avoids tripping Clockify's rate limit
    /// the way thirty-one per-day requests would.
    pub async fn month_entries(
        &self,
        api_key: &str,
        fingerprint: &str,
        year: i32,
        month: u32,
    ) -> Result<EntriesByDate, AppError> {
        let cache_key = format!("{}:{}-{}", fingerprint, year, month);
        if let Some(hit) = self.month_cache.get(&cache_key) {
            if hit.expires_at > Instant::now() {
                return Ok(hit.payload.clone());
            }
        }

        let (start, end) = local_month_range(year, month)
            .ok_or_else(|| AppError::BadRequest("Invalid year/month".to_string()))?;
        let entries = self.fetch_entries(api_key, start, end).await?;

        // Group by the entry's local start date; entries with an unparseable
        // start cannot be placed on a day and are dropped here.
        let mut by_date: EntriesByDate = HashMap::new();
        for entry in entries {
            let Some(date_key) = local_date_key(&entry.time_interval.start) else {
                tracing::debug!(entry_id = %entry.id, "Skipping entry with unparseable start");
                continue;
            };
            by_date.entry(date_key).or_default().push(entry);
        }

        self.month_cache.insert(
            cache_key,
            CacheEntry {
                expires_at: Instant::now() + CACHE_TTL,
                payload: by_date.clone(),
            },
        );
        Ok(by_date)
    }

    /// Resolve user → workspace, fetch entries, attach project names.
    async fn fetch_entries(
        &self,
        api_key: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<TimeEntry>, AppError> {
        let user = self.client.get_user(api_key).await?;
        let workspace_id = user
            .workspace_id()
            .ok_or_else(|| {
                AppError::ClockifyApi("Could not determine the user's workspace".to_string())
            })?
            .to_string();

        let raw = self
            .client
            .list_time_entries(api_key, &workspace_id, &user.id, start, end)
            .await?;

        let project_names = self
            .resolve_project_names(api_key, &workspace_id, &raw)
            .await;

        Ok(raw
            .into_iter()
            .map(|entry| TimeEntry {
                project_name: entry
                    .project_id
                    .as_ref()
                    .and_then(|id| project_names.get(id).cloned()),
                id: entry.id,
                description: entry.description,
                project_id: entry.project_id,
                time_interval: entry.time_interval,
            })
            .collect())
    }

    /// One request per unique project, in parallel. A failed lookup only
    /// loses the display name, never the entry.
    async fn resolve_project_names(
        &self,
        api_key: &str,
        workspace_id: &str,
        entries: &[ClockifyTimeEntry],
    ) -> HashMap<String, String> {
        let mut seen = HashSet::new();
        let project_ids: Vec<&str> = entries
            .iter()
            .filter_map(|e| e.project_id.as_deref())
            .filter(|id| seen.insert(*id))
            .collect();

        let lookups = project_ids
            .iter()
            .map(|id| self.client.get_project(api_key, workspace_id, id));

        join_all(lookups)
            .await
            .into_iter()
            .filter_map(|result| match result {
                Ok(project) => Some((project.id, project.name)),
                Err(err) => {
                    tracing::debug!(error = %err, "Project lookup failed");
                    None
                }
            })
            .collect()
    }
}
