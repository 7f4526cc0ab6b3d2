// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Rendered timesheet export routes.
//!
//! These return the tab-delimited text the frontend copies to the clipboard:
//! one row for a single day, or one row per calendar day for a month.

use crate::error::Result;
use crate::middleware::api_key::ApiCredential;
use crate::routes::entries::{parse_date_param, validate_year_month};
use crate::services::timesheet;
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Extension, Json, Router,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Export routes (require an API key via the middleware in routes/mod.rs).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/export/day", get(export_day))
        .route("/api/export/month", get(export_month))
}

#[derive(Deserialize)]
struct DayExportQuery {
    /// Local calendar date, `YYYY-MM-DD`
    date: String,
}

/// Rendered export text. `text` is empty when the day has no valid entries.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ExportResponse {
    pub text: String,
}

/// Render one day's consolidated timesheet row.
async fn export_day(
    State(state): State<Arc<AppState>>,
    Extension(credential): Extension<ApiCredential>,
    Query(query): Query<DayExportQuery>,
) -> Result<Json<ExportResponse>> {
    let date = parse_date_param(&query.date)?;

    let entries = state
        .clockify
        .day_entries(&credential.api_key, &credential.fingerprint, date)
        .await?;

    Ok(Json(ExportResponse {
        text: timesheet::summarize_day(&entries),
    }))
}

#[derive(Deserialize)]
struct MonthExportQuery {
    year: i32,
    /// 1-based month
    month: u32,
}

/// Render one row per calendar day of the month.
async fn export_month(
    State(state): State<Arc<AppState>>,
    Extension(credential): Extension<ApiCredential>,
    Query(query): Query<MonthExportQuery>,
) -> Result<Json<ExportResponse>> {
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

    let today = Local::now().date_naive();
    Ok(Json(ExportResponse {
        text: timesheet::summarize_month(&by_date, query.year, query.month, today),
    }))
}
