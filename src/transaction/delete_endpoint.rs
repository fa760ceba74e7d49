//! Defines the endpoint for deleting a transaction.
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error, ReceiptStore, endpoints,
    transaction::{
        TransactionId,
        core::{delete_transaction, get_transaction},
    },
};

/// The state needed to delete a transaction.
#[derive(Debug, Clone)]
pub struct DeleteTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The store for uploaded receipt images.
    pub receipt_store: ReceiptStore,
}

impl FromRef<AppState> for DeleteTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            receipt_store: state.receipt_store.clone(),
        }
    }
}

/// A route handler for deleting a transaction, redirects to the transactions
/// view on success.
///
/// The stored receipt object, if any, is deleted along with the row.
pub async fn delete_transaction_endpoint(
    Path(transaction_id): Path<TransactionId>,
    State(state): State<DeleteTransactionState>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let receipt_url = match get_transaction(transaction_id, &connection) {
        Ok(transaction) => transaction.receipt_url,
        Err(Error::NotFound) => return Error::DeleteMissingTransaction.into_alert_response(),
        Err(error) => {
            tracing::error!("could not load transaction {transaction_id}: {error}");
            return error.into_alert_response();
        }
    };

    match delete_transaction(transaction_id, &connection) {
        Ok(_) => {}
        Err(Error::DeleteMissingTransaction) => {
            return Error::DeleteMissingTransaction.into_alert_response();
        }
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while deleting transaction {transaction_id}: {error}"
            );
            return error.into_alert_response();
        }
    }

    if let Some(receipt_url) = receipt_url
        && let Err(error) = state.receipt_store.delete_object(&receipt_url)
    {
        tracing::warn!("could not delete receipt {receipt_url}: {error}");
    }

    (
        HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}
