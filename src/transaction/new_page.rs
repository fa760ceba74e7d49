//! Defines the route handler for the page for creating a transaction.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
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
        TransactionKind,
        form::{TransactionFormContext, transaction_form_view},
    },
};

/// The state needed for the new transaction page.
#[derive(Debug, Clone)]
pub struct NewTransactionPageState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The database connection for accessing categories.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for NewTransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Renders the page for creating a transaction.
pub async fn get_new_transaction_page(
    State(state): State<NewTransactionPageState>,
) -> Result<Response, Error> {
    let nav_bar = NavBar::new(endpoints::NEW_TRANSACTION_VIEW).into_html();

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let categories = get_all_categories(&connection).inspect_err(|error| {
        tracing::error!("Failed to retrieve categories for new transaction page: {error}")
    })?;

    let local_timezone = get_local_offset(&state.local_timezone)
        .ok_or_else(|| Error::InvalidTimezoneError(state.local_timezone.clone()))?;
    let today = OffsetDateTime::now_utc().to_offset(local_timezone).date();

    let form = transaction_form_view(&TransactionFormContext {
        hx_attribute: "hx-post",
        endpoint: endpoints::TRANSACTIONS_API,
        kind: TransactionKind::Expense,
        amount: None,
        date: today,
        max_date: today,
        description: "",
        category_id: None,
        categories: &categories,
        receipt_url: None,
    });

    let content = maud::html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    Ok(base("New Transaction", &[dollar_input_styles()], &content).into_response())
}
