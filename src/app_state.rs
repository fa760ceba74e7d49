//! Implements a struct that holds the state of the server.
//!
//! The state is built once at process start and injected into route handlers,
//! replacing the kind of lazily-initialized global client that makes testing
//! with fakes impossible.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{Error, ReceiptStore, db::initialize, pagination::PaginationConfig};

/// The state of the server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,

    /// The config that controls how to display pages of data.
    pub pagination_config: PaginationConfig,

    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,

    /// The store for receipt images.
    pub receipt_store: ReceiptStore,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection and a
    /// receipt store.
    ///
    /// This function will initialize the database by adding the tables for
    /// the domain models, and will provision the receipt bucket.
    /// `local_timezone` should be a valid, canonical timezone name, e.g.
    /// "Pacific/Auckland".
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized or the receipt
    /// bucket cannot be created.
    pub fn new(
        db_connection: Connection,
        receipt_store: ReceiptStore,
        local_timezone: &str,
        pagination_config: PaginationConfig,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;
        receipt_store.ensure_bucket()?;

        let connection = Arc::new(Mutex::new(db_connection));

        Ok(Self {
            local_timezone: local_timezone.to_owned(),
            pagination_config,
            db_connection: connection,
            receipt_store,
        })
    }
}
