//! Defines the endpoint for creating a new transaction.
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error, ReceiptStore, endpoints,
    transaction::{Transaction, core::create_transaction, form::parse_transaction_form},
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The store for uploaded receipt images.
    pub receipt_store: ReceiptStore,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            receipt_store: state.receipt_store.clone(),
        }
    }
}

/// A route handler for creating a new transaction, redirects to transactions
/// view on success.
///
/// The request body is a multipart form so it can carry an optional receipt
/// image, which is stored before the transaction row is written.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    multipart: Multipart,
) -> Response {
    let form = match parse_transaction_form(multipart).await {
        Ok(form) => form,
        Err(error) => return error.into_alert_response(),
    };

    let receipt_url = match form.receipt {
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

    let builder = Transaction::build(form.kind, form.amount, form.date, &form.description)
        .category_id(form.category_id)
        .receipt_url(receipt_url);

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_transaction(builder, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating a transaction: {error}");
            error.into_alert_response()
        }
    }
}
