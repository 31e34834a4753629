//! Summary endpoints
//!
//! Each handler folds a ledger snapshot through one of the pure reducers in
//! `tally_core::summary`. Bucket map ordering is unspecified; clients sort
//! by key.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::{AppError, AppState};
use tally_core::models::Category;
use tally_core::summary::{self, CategoryTotals, PeriodTotals};
use tally_core::time::today_reference;

#[derive(Serialize)]
pub struct SummaryResponse<T> {
    pub summary: T,
}

/// GET /summary/daily - Per-date totals for the current reference-tz month
pub async fn summary_daily(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SummaryResponse<HashMap<String, PeriodTotals>>>, AppError> {
    let transactions = state.ledger.transactions();
    let summary = summary::daily_summary(&transactions, today_reference());
    Ok(Json(SummaryResponse { summary }))
}

/// GET /summary/weekly - Per-ISO-week totals (Monday-start weeks)
pub async fn summary_weekly(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SummaryResponse<HashMap<String, PeriodTotals>>>, AppError> {
    let transactions = state.ledger.transactions();
    let summary = summary::weekly_summary(&transactions);
    Ok(Json(SummaryResponse { summary }))
}

/// GET /summary/monthly - Per-calendar-month totals
pub async fn summary_monthly(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SummaryResponse<HashMap<String, PeriodTotals>>>, AppError> {
    let transactions = state.ledger.transactions();
    let summary = summary::monthly_summary(&transactions);
    Ok(Json(SummaryResponse { summary }))
}

/// GET /summary/category - Per-category totals and counts
pub async fn summary_category(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SummaryResponse<HashMap<Category, CategoryTotals>>>, AppError> {
    let transactions = state.ledger.transactions();
    let summary = summary::category_summary(&transactions);
    Ok(Json(SummaryResponse { summary }))
}
