//! Dashboard module
//!
//! Provides an overview page showing summary cards for the current month, an
//! annual overview chart, the current month's expense breakdown, and the most
//! recent transactions.

mod cards;
mod handlers;

pub use handlers::get_dashboard_page;

pub(crate) use cards::summary_cards_view;
