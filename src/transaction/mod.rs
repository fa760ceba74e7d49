//! Transaction management for the finance tracker.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - Database functions for storing, querying, and managing transactions
//! - View handlers for transaction-related web pages and the JSON API

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod edit_page;
mod form;
mod list_endpoint;
mod new_page;
mod transactions_page;

pub use core::{
    Transaction, TransactionBuilder, TransactionFilter, TransactionId, TransactionKind,
    TransactionListEntry, count_transactions, create_transaction_table,
    get_transaction_list_entries,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::update_transaction_endpoint;
pub use edit_page::get_edit_transaction_page;
pub use list_endpoint::get_transactions_endpoint;
pub use new_page::get_new_transaction_page;
pub use transactions_page::get_transactions_page;

#[cfg(test)]
pub use core::{
    create_transaction, delete_transaction, get_transaction, get_transactions, update_transaction,
};
