//! Kakeibo is a web app for tracking your income, expenses, and receipts.
//!
//! This library provides a REST API that directly serves HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod category;
mod dashboard;
mod db;
mod endpoints;
mod html;
mod internal_server_error;
mod navigation;
mod not_found;
mod pagination;
mod receipt;
mod report;
mod routing;
mod timezone;
mod transaction;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use pagination::PaginationConfig;
pub use receipt::ReceiptStore;
pub use routing::build_router;

use crate::{
    alert::Alert,
    category::CategoryId,
    internal_server_error::InternalServerError,
    not_found::NotFoundError,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A month outside 1-12 was requested for a report.
    #[error("month must be between 1 and 12, got {0}")]
    InvalidMonth(u8),

    /// A year outside the supported calendar range was requested for a report.
    #[error("{0} is not a valid calendar year")]
    InvalidYear(i32),

    /// An empty string was used to create a category name.
    #[error("Category name cannot be empty")]
    EmptyCategoryName,

    /// The specified category name already exists in the database.
    #[error("the category \"{0}\" already exists in the database")]
    DuplicateCategoryName(String),

    /// The category ID used to create a transaction did not match a valid category.
    #[error("the category ID does not refer to a valid category")]
    InvalidCategory(Option<CategoryId>),

    /// A negative amount was used to create a transaction.
    ///
    /// Amounts are unsigned; whether money came in or went out is captured by
    /// the transaction kind.
    #[error("{0} is a negative amount, which is not allowed")]
    NegativeAmount(f64),

    /// A transaction kind other than "income" or "expense" was encountered.
    ///
    /// Unknown kinds are rejected outright rather than being lumped in with
    /// expenses, which would silently misclassify data-entry errors.
    #[error("\"{0}\" is not a valid transaction kind")]
    UnknownTransactionKind(String),

    /// A receipt upload had a content type other than the accepted image types.
    #[error("\"{0}\" is not an accepted receipt image type")]
    UnsupportedReceiptType(String),

    /// A receipt upload exceeded the object size limit.
    #[error("receipt of {0} bytes exceeds the size limit")]
    ReceiptTooLarge(usize),

    /// The receipt store could not complete a filesystem operation.
    #[error("receipt storage failed: {0}")]
    StorageError(String),

    /// The multipart form could not be parsed.
    #[error("Could not parse multipart form: {0}")]
    MultipartError(String),

    /// A required form field was missing from the request.
    #[error("the form field \"{0}\" is missing")]
    MissingFormField(&'static str),

    /// A form field could not be parsed as the expected type.
    #[error("the form field \"{0}\" is invalid")]
    InvalidFormField(&'static str),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction,

    /// Tried to update a category that does not exist
    #[error("tried to update a category that is not in the database")]
    UpdateMissingCategory,

    /// Tried to delete a category that does not exist
    #[error("tried to delete a category that is not in the database")]
    DeleteMissingCategory,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => NotFoundError.into_response(),
            Error::InvalidMonth(month) => (
                StatusCode::BAD_REQUEST,
                html::error_view(
                    "Bad Request",
                    "400",
                    "Invalid report month",
                    &format!("The month must be between 1 and 12, but got {month}."),
                ),
            )
                .into_response(),
            Error::InvalidYear(year) => (
                StatusCode::BAD_REQUEST,
                html::error_view(
                    "Bad Request",
                    "400",
                    "Invalid report year",
                    &format!("{year} is not a valid calendar year."),
                ),
            )
                .into_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Convert the error into an HTTP response with an HTML alert.
    pub(crate) fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Invalid Timezone Settings".to_owned(),
                    details: format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                    ),
                },
            ),
            Error::InvalidCategory(category_id) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid category ID".to_owned(),
                    details: format!("Could not find a category with the ID {category_id:?}"),
                },
            ),
            Error::NegativeAmount(amount) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid transaction amount".to_owned(),
                    details: format!(
                        "{amount} is negative. Enter a positive amount and pick \
                        income or expense instead."
                    ),
                },
            ),
            Error::UnknownTransactionKind(kind) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid transaction kind".to_owned(),
                    details: format!(
                        "\"{kind}\" is not a transaction kind. Choose either income or expense."
                    ),
                },
            ),
            Error::UnsupportedReceiptType(content_type) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Unsupported receipt type".to_owned(),
                    details: format!(
                        "\"{content_type}\" is not an accepted receipt image type. \
                        Upload a JPEG, PNG, or WebP image."
                    ),
                },
            ),
            Error::ReceiptTooLarge(size) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Receipt too large".to_owned(),
                    details: format!(
                        "The uploaded receipt is {size} bytes, which exceeds the 3 MB limit."
                    ),
                },
            ),
            Error::MissingFormField(field) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Missing form field".to_owned(),
                    details: format!("The form field \"{field}\" is required."),
                },
            ),
            Error::InvalidFormField(field) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid form field".to_owned(),
                    details: format!("The form field \"{field}\" could not be read."),
                },
            ),
            Error::UpdateMissingTransaction => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not update transaction".to_owned(),
                    details: "The transaction could not be found.".to_owned(),
                },
            ),
            Error::DeleteMissingTransaction => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete transaction".to_owned(),
                    details: "The transaction could not be found. \
                    Try refreshing the page to see if the transaction has already been deleted."
                        .to_owned(),
                },
            ),
            Error::UpdateMissingCategory => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not update category".to_owned(),
                    details: "The category could not be found.".to_owned(),
                },
            ),
            Error::DeleteMissingCategory => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete category".to_owned(),
                    details: "The category could not be found. \
                    Try refreshing the page to see if the category has already been deleted."
                        .to_owned(),
                },
            ),
            Error::DuplicateCategoryName(name) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Duplicate Category Name".to_owned(),
                    details: format!(
                        "The category {name} already exists in the database. \
                        Choose a different category name, or edit or delete the existing category.",
                    ),
                },
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Something went wrong".to_owned(),
                    details:
                        "An unexpected error occurred, check the server logs for more details."
                            .to_owned(),
                },
            ),
        };

        (status_code, alert.into_html()).into_response()
    }
}
