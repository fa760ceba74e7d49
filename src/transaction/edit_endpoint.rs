//! Defines the endpoint for updating an existing transaction.
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error, ReceiptStore, endpoints,
    transaction::{
        Transaction, TransactionId,
        core::{get_transaction, update_transaction},
        form::parse_transaction_form,
    },
};

/// The state needed to update a transaction.
#[derive(Debug, Clone)]
pub struct UpdateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The store for uploaded receipt images.
    pub receipt_store: ReceiptStore,
}

impl FromRef<AppState> for UpdateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            receipt_store: state.receipt_store.clone(),
        }
    }
}

/// A route handler for updating a transaction, redirects to transactions view
/// on success.
///
/// Uploading a new receipt replaces the stored one; submitting the form
/// without a file keeps the existing receipt.
pub async fn update_transaction_endpoint(
    Path(transaction_id): Path<TransactionId>,
    State(state): State<UpdateTransactionState>,
    multipart: Multipart,
) -> Response {
    let form = match parse_transaction_form(multipart).await {
        Ok(form) => form,
        Err(error) => return error.into_alert_response(),
    };

    let new_receipt_url = match form.receipt {
        Some(upload) => {
            match state
                .receipt_store
                .put_object(&upload.content_type, &upload.bytes)
            {
                Ok(url) => Some(url),
                Err(error) => return error.into_alert_response(),
            }
        }
        None => None,
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let existing = match get_transaction(transaction_id, &connection) {
        Ok(transaction) => transaction,
        Err(Error::NotFound) => return Error::UpdateMissingTransaction.into_alert_response(),
        Err(error) => {
            tracing::error!("could not load transaction {transaction_id}: {error}");
            return error.into_alert_response();
        }
    };

    let receipt_url = new_receipt_url.clone().or(existing.receipt_url.clone());

    let builder = Transaction::build(form.kind, form.amount, form.date, &form.description)
        .category_id(form.category_id)
        .receipt_url(receipt_url);

    if let Err(error) = update_transaction(transaction_id, builder, &connection) {
        tracing::error!("could not update transaction {transaction_id}: {error}");
        return error.into_alert_response();
    }

    // The old receipt object is orphaned once a replacement is stored.
    if let (Some(old_url), Some(new_url)) = (&existing.receipt_url, &new_receipt_url)
        && old_url != new_url
        && let Err(error) = state.receipt_store.delete_object(old_url)
    {
        tracing::warn!("could not delete replaced receipt {old_url}: {error}");
    }

    (
        HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}
