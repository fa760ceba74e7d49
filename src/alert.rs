//! Alert fragments for displaying success and error messages over htmx.
//!
//! Endpoints that respond to htmx requests render these fragments into the
//! page's alert container via `hx-target-error` or out-of-band swaps.

use axum::response::{IntoResponse, Response};
use maud::{Markup, html};

const SUCCESS_ALERT_STYLE: &str = "flex flex-col p-4 mb-4 rounded-lg \
    text-green-800 bg-green-50 dark:bg-gray-800 dark:text-green-400";

const ERROR_ALERT_STYLE: &str = "flex flex-col p-4 mb-4 rounded-lg \
    text-red-800 bg-red-50 dark:bg-gray-800 dark:text-red-400";

/// An alert message to display to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// An operation succeeded.
    Success {
        message: String,
        details: String,
    },
    /// An operation failed.
    Error {
        message: String,
        details: String,
    },
}

impl Alert {
    /// Render the alert as an HTML fragment.
    pub fn into_html(self) -> Markup {
        let (style, message, details) = match self {
            Alert::Success { message, details } => (SUCCESS_ALERT_STYLE, message, details),
            Alert::Error { message, details } => (ERROR_ALERT_STYLE, message, details),
        };

        html! {
            div class=(style) role="alert"
            {
                span class="font-medium" { (message) }

                @if !details.is_empty() {
                    p { (details) }
                }
            }
        }
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        self.into_html().into_response()
    }
}
