//! Creates the application's database schema.

use rusqlite::Connection;

use crate::{
    Error, category::create_category_table, transaction::create_transaction_table,
};

/// Add the tables for the domain models to the database.
///
/// Table creation is idempotent, so it is safe to call this on an existing
/// database.
///
/// # Errors
/// Returns an error if a table cannot be created or if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    // Must be set outside of a transaction, and per connection.
    connection.pragma_update(None, "foreign_keys", true)?;

    let transaction = connection.unchecked_transaction()?;

    create_category_table(&transaction)?;
    create_transaction_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
