//! Defines the JSON endpoint for listing transactions.
//!
//! The HTML pages are the primary interface; this endpoint exists for
//! programmatic access to the raw records with the same filters the record
//! store supports.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
};
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error,
    transaction::{
        Transaction, TransactionKind,
        core::{TransactionFilter, get_transactions},
    },
};

/// The state needed to list transactions.
#[derive(Debug, Clone)]
pub struct ListTransactionsState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListTransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Optional filters for the transaction list.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionListQuery {
    /// Only include transactions of this kind.
    pub kind: Option<TransactionKind>,
    /// Only include transactions on or after this date (inclusive).
    pub date_from: Option<Date>,
    /// Only include transactions on or before this date (inclusive).
    pub date_to: Option<Date>,
}

/// A route handler returning transactions as JSON, ordered by date
/// descending. An empty result is an empty array, not an error.
pub async fn get_transactions_endpoint(
    State(state): State<ListTransactionsState>,
    Query(query): Query<TransactionListQuery>,
) -> Result<Json<Vec<Transaction>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let filter = TransactionFilter {
        kind: query.kind,
        date_from: query.date_from,
        date_to: query.date_to,
    };

    let transactions = get_transactions(&filter, &connection)
        .inspect_err(|error| tracing::error!("could not list transactions: {error}"))?;

    Ok(Json(transactions))
}
