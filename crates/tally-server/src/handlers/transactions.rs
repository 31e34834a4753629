//! Transaction listing handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{AppError, AppState};
use tally_core::models::Transaction;

/// Query parameters for listing transactions
#[derive(Debug, Deserialize)]
pub struct TransactionQuery {
    /// Inclusive start date (YYYY-MM-DD)
    pub start: Option<NaiveDate>,
    /// Inclusive end date (YYYY-MM-DD)
    pub end: Option<NaiveDate>,
}

#[derive(Serialize)]
pub struct TransactionsResponse {
    pub transactions: Vec<Transaction>,
}

/// GET /transactions - List transactions within an inclusive date range
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TransactionQuery>,
) -> Result<Json<TransactionsResponse>, AppError> {
    let mut transactions = state.ledger.transactions();

    if let Some(start) = params.start {
        transactions.retain(|tx| tx.date >= start);
    }
    if let Some(end) = params.end {
        transactions.retain(|tx| tx.date <= end);
    }

    Ok(Json(TransactionsResponse { transactions }))
}

/// GET /recurring - List transactions flagged as recurring
pub async fn list_recurring(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TransactionsResponse>, AppError> {
    let mut transactions = state.ledger.transactions();
    transactions.retain(|tx| tx.recurring);

    Ok(Json(TransactionsResponse { transactions }))
}
