//! Defines the route handler for the page for editing a transaction.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use time::OffsetDateTime;

use crate::{
    AppState, Error, endpoints,
    html::{FORM_CONTAINER_STYLE, base, dollar_input_styles},
    navigation::NavBar,
    category::get_all_categories,
    timezone::get_local_offset,
    transaction::{
        TransactionId,
        core::get_transaction,
        form::{TransactionFormContext, transaction_form_view},
    },
};

/// The state needed for the edit transaction page.
#[derive(Debug, Clone)]
pub struct EditTransactionPageState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The database connection for accessing transactions and categories.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditTransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Renders the page for editing a transaction.
pub async fn get_edit_transaction_page(
    Path(transaction_id): Path<TransactionId>,
    State(state): State<EditTransactionPageState>,
) -> Result<Response, Error> {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transaction = get_transaction(transaction_id, &connection)?;

    let categories = get_all_categories(&connection).inspect_err(|error| {
        tracing::error!("Failed to retrieve categories for edit transaction page: {error}")
    })?;

    let local_timezone = get_local_offset(&state.local_timezone)
        .ok_or_else(|| Error::InvalidTimezoneError(state.local_timezone.clone()))?;
    let today = OffsetDateTime::now_utc().to_offset(local_timezone).date();

    let form = transaction_form_view(&TransactionFormContext {
        hx_attribute: "hx-put",
        endpoint: &endpoints::format_endpoint(endpoints::TRANSACTION, transaction_id),
        kind: transaction.kind,
        amount: Some(transaction.amount),
        date: transaction.date,
        max_date: today,
        description: &transaction.description,
        category_id: transaction.category_id,
        categories: &categories,
        receipt_url: transaction.receipt_url.as_deref(),
    });

    let content = maud::html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    Ok(base("Edit Transaction", &[dollar_input_styles()], &content).into_response())
}
