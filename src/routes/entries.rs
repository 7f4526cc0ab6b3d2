// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Time-entry forwarding routes.

use crate::error::{AppError, Result};
use crate::middleware::api_key::ApiCredential;
use crate::models::TimeEntry;
use crate::services::EntriesByDate;
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Extension, Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Forwarding routes (require an API key via the middleware in routes/mod.rs).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/time-entries", get(get_time_entries))
        .route("/api/monthly-time-entries", get(get_monthly_time_entries))
}

/// Parse and validate a `YYYY-MM-DD` query parameter.
pub(crate) fn parse_date_param(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        AppError::BadRequest("Invalid 'date' parameter, expected YYYY-MM-DD".to_string())
    })
}

/// Validate a year/month pair before any upstream call.
pub(crate) fn validate_year_month(year: i32, month: u32) -> Result<()> {
    if !(1..=12).contains(&month) {
        return Err(AppError::BadRequest(
            "Invalid 'month' parameter, expected 1-12".to_string(),
        ));
    }
    if !(1970..=9999).contains(&year) {
        return Err(AppError::BadRequest(
            "Invalid 'year' parameter".to_string(),
        ));
    }
    Ok(())
}

// ─── Day ─────────────────────────────────────────────────────

#[derive(Deserialize)]
struct TimeEntriesQuery {
    /// Local calendar date, `YYYY-MM-DD`
    date: String,
}

/// One day's time entries.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct TimeEntriesResponse {
    pub items: Vec<TimeEntry>,
}

/// Forward one local day's entries from Clockify.
async fn get_time_entries(
    State(state): State<Arc<AppState>>,
    Extension(credential): Extension<ApiCredential>,
    Query(query): Query<TimeEntriesQuery>,
) -> Result<Json<TimeEntriesResponse>> {
    let date = parse_date_param(&query.date)?;

    let items = state
        .clockify
        .day_entries(&credential.api_key, &credential.fingerprint, date)
        .await?;

    Ok(Json(TimeEntriesResponse { items }))
}

// ─── Month ───────────────────────────────────────────────────

#[derive(Deserialize)]
struct MonthlyTimeEntriesQuery {
    year: i32,
    /// 1-based month
    month: u32,
}

/// A month's time entries grouped by local `YYYY-MM-DD` date.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MonthlyTimeEntriesResponse {
    pub by_date: EntriesByDate,
}

/// Forward a whole month's entries from Clockify, grouped by day.
async fn get_monthly_time_entries(
    State(state): State<Arc<AppState>>,
    Extension(credential): Extension<ApiCredential>,
    Query(query): Query<MonthlyTimeEntriesQuery>,
) -> Result<Json<MonthlyTimeEntriesResponse>> {
    validate_year_month(query.year, query.month)?;

    let by_date = state
        .clockify
        .month_entries(
            &credential.api_key,
            &credential.fingerprint,
            query.year,
            query.month,
        )
        .await?;

    Ok(Json(MonthlyTimeEntriesResponse { by_date }))
}
