//! Defines the core data models and database queries for transactions.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    Connection, Row,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Error, category::CategoryId};

// ============================================================================
// MODELS
// ============================================================================

/// Alias for the integer type used for transaction database IDs.
pub type TransactionId = i64;

/// Whether a transaction records money coming in or going out.
///
/// Stored as the strings "income" and "expense"; any other stored value is a
/// hard error when mapping rows rather than being treated as expense-like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money coming in, e.g. a salary payment.
    Income,
    /// Money going out, e.g. a grocery run.
    Expense,
}

impl TransactionKind {
    /// The string stored in the database for this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }

    /// The human readable label for this kind.
    pub fn label(self) -> &'static str {
        match self {
            TransactionKind::Income => "Income",
            TransactionKind::Expense => "Expense",
        }
    }
}

impl FromStr for TransactionKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => Err(Error::UnknownTransactionKind(other.to_owned())),
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ToSql for TransactionKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_str().and_then(|text| {
            text.parse::<TransactionKind>()
                .map_err(|_| FromSqlError::Other(format!("unknown transaction kind: {text}").into()))
        })
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// Whether this transaction is income or an expense.
    pub kind: TransactionKind,
    /// The amount of money spent or earned in this transaction.
    ///
    /// Always non-negative; the direction of the money flow is captured by
    /// `kind`.
    pub amount: f64,
    /// When the transaction happened.
    pub date: Date,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The ID of the category the transaction belongs to.
    pub category_id: Option<CategoryId>,
    /// The URL of the stored receipt image, if one was uploaded.
    pub receipt_url: Option<String>,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(
        kind: TransactionKind,
        amount: f64,
        date: Date,
        description: &str,
    ) -> TransactionBuilder {
        TransactionBuilder {
            kind,
            amount,
            date,
            description: description.to_owned(),
            category_id: None,
            receipt_url: None,
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// Provides defaults for the optional fields (category and receipt). Pass the
/// finished builder to [create_transaction] or [update_transaction].
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// Whether the transaction is income or an expense.
    pub kind: TransactionKind,

    /// The monetary amount of the transaction. Must be non-negative.
    pub amount: f64,

    /// The date when the transaction occurred.
    pub date: Date,

    /// A human-readable description of the transaction.
    pub description: String,

    /// The category of the transaction, e.g. "Groceries", "Salary".
    ///
    /// Transactions without a category are reported under the "Other" label.
    pub category_id: Option<CategoryId>,

    /// The URL of the stored receipt image.
    pub receipt_url: Option<String>,
}

impl TransactionBuilder {
    /// Set the category id for the transaction.
    pub fn category_id(mut self, category_id: Option<CategoryId>) -> Self {
        self.category_id = category_id;
        self
    }

    /// Set the receipt URL for the transaction.
    pub fn receipt_url(mut self, receipt_url: Option<String>) -> Self {
        self.receipt_url = receipt_url;
        self
    }
}

/// A filter for listing transactions.
///
/// All fields are optional; an empty filter selects everything. Date bounds
/// are inclusive.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TransactionFilter {
    /// Only include transactions of this kind.
    pub kind: Option<TransactionKind>,
    /// Only include transactions on or after this date.
    pub date_from: Option<Date>,
    /// Only include transactions on or before this date.
    pub date_to: Option<Date>,
}

/// A transaction joined with its category name for list views.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionListEntry {
    /// The transaction itself.
    pub transaction: Transaction,
    /// The name of the transaction's category, if it has one.
    pub category_name: Option<String>,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new transaction in the database from a builder.
///
/// # Errors
/// This function will return a:
/// - [Error::NegativeAmount] if the amount is negative,
/// - [Error::InvalidCategory] if the specified category ID does not refer to a real category,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    if builder.amount < 0.0 {
        return Err(Error::NegativeAmount(builder.amount));
    }

    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" (kind, amount, date, description, category_id, receipt_url)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING id, kind, amount, date, description, category_id, receipt_url",
        )?
        .query_row(
            (
                builder.kind,
                builder.amount,
                builder.date,
                &builder.description,
                builder.category_id,
                &builder.receipt_url,
            ),
            map_transaction_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::InvalidCategory(builder.category_id),
            error => error.into(),
        })?;

    Ok(transaction)
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "SELECT id, kind, amount, date, description, category_id, receipt_url
             FROM \"transaction\" WHERE id = :id",
        )?
        .query_row(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Overwrite the transaction with `id` with the fields from `builder`.
///
/// # Errors
/// This function will return a:
/// - [Error::NegativeAmount] if the amount is negative,
/// - [Error::UpdateMissingTransaction] if `id` does not refer to a valid transaction,
/// - [Error::InvalidCategory] if the specified category ID does not refer to a real category,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_transaction(
    id: TransactionId,
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<(), Error> {
    if builder.amount < 0.0 {
        return Err(Error::NegativeAmount(builder.amount));
    }

    let rows_affected = connection
        .execute(
            "UPDATE \"transaction\"
             SET kind = ?1, amount = ?2, date = ?3, description = ?4, category_id = ?5, receipt_url = ?6
             WHERE id = ?7",
            (
                builder.kind,
                builder.amount,
                builder.date,
                &builder.description,
                builder.category_id,
                &builder.receipt_url,
                id,
            ),
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::InvalidCategory(builder.category_id),
            error => error.into(),
        })?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingTransaction);
    }

    Ok(())
}

/// Delete the transaction with `id` from the database.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingTransaction] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn delete_transaction(id: TransactionId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM \"transaction\" WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingTransaction);
    }

    Ok(())
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn count_transactions(connection: &Connection) -> Result<u64, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM \"transaction\";", [], |row| {
            row.get::<_, i64>(0)
        })
        .map(|count| count as u64)
        .map_err(|error| error.into())
}

/// Retrieve transactions matching `filter`, ordered by date descending.
///
/// An empty result set is not an error.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_transactions(
    filter: &TransactionFilter,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let mut query = String::from(
        "SELECT id, kind, amount, date, description, category_id, receipt_url
         FROM \"transaction\" WHERE 1=1",
    );
    let mut params: Vec<String> = Vec::new();

    if let Some(kind) = filter.kind {
        params.push(kind.as_str().to_owned());
        query.push_str(&format!(" AND kind = ?{}", params.len()));
    }

    if let Some(date_from) = filter.date_from {
        params.push(date_from.to_string());
        query.push_str(&format!(" AND date >= ?{}", params.len()));
    }

    if let Some(date_to) = filter.date_to {
        params.push(date_to.to_string());
        query.push_str(&format!(" AND date <= ?{}", params.len()));
    }

    query.push_str(" ORDER BY date DESC, id DESC");

    connection
        .prepare(&query)?
        .query_map(rusqlite::params_from_iter(params), map_transaction_row)?
        .collect::<Result<Vec<Transaction>, rusqlite::Error>>()
        .map_err(|error| error.into())
}

/// Retrieve one page of transactions with their category names, ordered by
/// date descending.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_transaction_list_entries(
    limit: u64,
    offset: u64,
    connection: &Connection,
) -> Result<Vec<TransactionListEntry>, Error> {
    connection
        .prepare(
            "SELECT t.id, t.kind, t.amount, t.date, t.description, t.category_id, t.receipt_url, c.name
             FROM \"transaction\" t
             LEFT JOIN category c ON c.id = t.category_id
             ORDER BY t.date DESC, t.id DESC
             LIMIT ?1 OFFSET ?2",
        )?
        .query_map((limit as i64, offset as i64), |row| {
            Ok(TransactionListEntry {
                transaction: map_transaction_row(row)?,
                category_name: row.get(7)?,
            })
        })?
        .collect::<Result<Vec<TransactionListEntry>, rusqlite::Error>>()
        .map_err(|error| error.into())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                kind TEXT NOT NULL CHECK (kind IN ('income', 'expense')),
                amount REAL NOT NULL CHECK (amount >= 0),
                date TEXT NOT NULL,
                description TEXT NOT NULL,
                category_id INTEGER,
                receipt_url TEXT,
                FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE SET NULL
                )",
        (),
    )?;

    // Ensure the sequence starts at 1
    connection.execute(
        "INSERT OR IGNORE INTO sqlite_sequence (name, seq) VALUES ('transaction', 0)",
        (),
    )?;

    // Add composite index used by the report queries.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_date_kind ON \"transaction\"(date, kind);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let kind = row.get(1)?;
    let amount = row.get(2)?;
    let date = row.get(3)?;
    let description = row.get(4)?;
    let category_id = row.get(5)?;
    let receipt_url = row.get(6)?;

    Ok(Transaction {
        id,
        kind,
        amount,
        date,
        description,
        category_id,
        receipt_url,
    })
}

// ============================================================================
// TESTS
// ============================================================================


#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        category::{CategoryName, create_category},
        db::initialize,
        transaction::{
            Transaction, TransactionFilter, TransactionKind, count_transactions,
            create_transaction, delete_transaction, get_transaction, get_transactions,
            update_transaction,
        },
    };

    use super::get_transaction_list_entries;

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn create_succeeds() {
        let conn = get_test_connection();
        let amount = 12.3;

        let result = create_transaction(
            Transaction::build(TransactionKind::Expense, amount, date!(2025 - 10 - 05), ""),
            &conn,
        );

        match result {
            Ok(transaction) => {
                assert_eq!(transaction.amount, amount);
                assert_eq!(transaction.kind, TransactionKind::Expense);
            }
            Err(error) => panic!("Unexpected error: {error}"),
        }
    }

    #[test]
    fn create_fails_on_negative_amount() {
        let conn = get_test_connection();

        let result = create_transaction(
            Transaction::build(TransactionKind::Expense, -1.0, date!(2025 - 10 - 05), ""),
            &conn,
        );

        assert_eq!(result, Err(Error::NegativeAmount(-1.0)));
    }

    #[test]
    fn create_fails_on_invalid_category_id() {
        let conn = get_test_connection();
        let category_id = Some(42);
        let today = date!(2025 - 10 - 04);

        let result = create_transaction(
            Transaction::build(TransactionKind::Expense, 123.45, today, "")
                .category_id(category_id),
            &conn,
        );

        assert_eq!(result, Err(Error::InvalidCategory(category_id)));
    }

    #[test]
    fn create_stores_optional_fields() {
        let conn = get_test_connection();
        let category = create_category(
            CategoryName::new("Groceries").unwrap(),
            TransactionKind::Expense,
            &conn,
        )
        .unwrap();

        let transaction = create_transaction(
            Transaction::build(
                TransactionKind::Expense,
                54.32,
                date!(2025 - 09 - 30),
                "weekly shop",
            )
            .category_id(Some(category.id))
            .receipt_url(Some("/receipts/abc123.jpg".to_owned())),
            &conn,
        )
        .unwrap();

        let stored = get_transaction(transaction.id, &conn).unwrap();
        assert_eq!(stored.category_id, Some(category.id));
        assert_eq!(stored.receipt_url, Some("/receipts/abc123.jpg".to_owned()));
    }

    #[test]
    fn unknown_kind_is_rejected_by_the_schema() {
        let conn = get_test_connection();

        // Bypass the typed API to simulate a corrupt writer.
        let result = conn.execute(
            "INSERT INTO \"transaction\" (kind, amount, date, description) \
             VALUES ('transfer', 1.0, '2025-01-01', '')",
            (),
        );

        assert!(result.is_err(), "schema should reject unknown kinds");
    }

    #[test]
    fn get_fails_on_invalid_id() {
        let conn = get_test_connection();

        let result = get_transaction(999, &conn);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn update_succeeds() {
        let conn = get_test_connection();
        let transaction = create_transaction(
            Transaction::build(TransactionKind::Expense, 10.0, date!(2025 - 10 - 01), "before"),
            &conn,
        )
        .unwrap();

        update_transaction(
            transaction.id,
            Transaction::build(TransactionKind::Income, 20.0, date!(2025 - 10 - 02), "after"),
            &conn,
        )
        .unwrap();

        let updated = get_transaction(transaction.id, &conn).unwrap();
        assert_eq!(updated.kind, TransactionKind::Income);
        assert_eq!(updated.amount, 20.0);
        assert_eq!(updated.date, date!(2025 - 10 - 02));
        assert_eq!(updated.description, "after");
    }

    #[test]
    fn update_fails_on_invalid_id() {
        let conn = get_test_connection();

        let result = update_transaction(
            999,
            Transaction::build(TransactionKind::Income, 20.0, date!(2025 - 10 - 02), ""),
            &conn,
        );

        assert_eq!(result, Err(Error::UpdateMissingTransaction));
    }

    #[test]
    fn delete_succeeds() {
        let conn = get_test_connection();
        let transaction = create_transaction(
            Transaction::build(TransactionKind::Expense, 10.0, date!(2025 - 10 - 01), ""),
            &conn,
        )
        .unwrap();

        delete_transaction(transaction.id, &conn).unwrap();

        assert_eq!(get_transaction(transaction.id, &conn), Err(Error::NotFound));
    }

    #[test]
    fn delete_fails_on_invalid_id() {
        let conn = get_test_connection();

        let result = delete_transaction(999, &conn);

        assert_eq!(result, Err(Error::DeleteMissingTransaction));
    }

    #[test]
    fn get_count() {
        let conn = get_test_connection();
        let today = date!(2025 - 10 - 05);
        let want_count = 20;
        for i in 1..=want_count {
            create_transaction(
                Transaction::build(TransactionKind::Expense, i as f64, today, ""),
                &conn,
            )
            .expect("Could not create transaction");
        }

        let got_count = count_transactions(&conn).expect("Could not get count");

        assert_eq!(want_count, got_count);
    }

    #[test]
    fn list_returns_transactions_in_date_descending_order() {
        let conn = get_test_connection();
        create_transaction(
            Transaction::build(TransactionKind::Expense, 1.0, date!(2025 - 01 - 01), "oldest"),
            &conn,
        )
        .unwrap();
        create_transaction(
            Transaction::build(TransactionKind::Income, 2.0, date!(2025 - 03 - 01), "newest"),
            &conn,
        )
        .unwrap();
        create_transaction(
            Transaction::build(TransactionKind::Expense, 3.0, date!(2025 - 02 - 01), "middle"),
            &conn,
        )
        .unwrap();

        let transactions = get_transactions(&TransactionFilter::default(), &conn).unwrap();

        let descriptions: Vec<&str> = transactions
            .iter()
            .map(|transaction| transaction.description.as_str())
            .collect();
        assert_eq!(descriptions, ["newest", "middle", "oldest"]);
    }

    #[test]
    fn list_filters_by_kind_and_date_range() {
        let conn = get_test_connection();
        create_transaction(
            Transaction::build(TransactionKind::Income, 100.0, date!(2025 - 03 - 01), ""),
            &conn,
        )
        .unwrap();
        create_transaction(
            Transaction::build(TransactionKind::Expense, 50.0, date!(2025 - 03 - 15), ""),
            &conn,
        )
        .unwrap();
        create_transaction(
            Transaction::build(TransactionKind::Expense, 25.0, date!(2025 - 04 - 01), ""),
            &conn,
        )
        .unwrap();

        let filter = TransactionFilter {
            kind: Some(TransactionKind::Expense),
            date_from: Some(date!(2025 - 03 - 01)),
            date_to: Some(date!(2025 - 03 - 31)),
        };
        let transactions = get_transactions(&filter, &conn).unwrap();

        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].amount, 50.0);
    }

    #[test]
    fn list_tolerates_empty_result_set() {
        let conn = get_test_connection();

        let transactions = get_transactions(&TransactionFilter::default(), &conn).unwrap();

        assert_eq!(transactions, []);
    }

    #[test]
    fn list_entries_include_category_names() {
        let conn = get_test_connection();
        let category = create_category(
            CategoryName::new("Rent").unwrap(),
            TransactionKind::Expense,
            &conn,
        )
        .unwrap();
        create_transaction(
            Transaction::build(TransactionKind::Expense, 1200.0, date!(2025 - 03 - 01), "rent")
                .category_id(Some(category.id)),
            &conn,
        )
        .unwrap();
        create_transaction(
            Transaction::build(TransactionKind::Expense, 9.5, date!(2025 - 03 - 02), "lunch"),
            &conn,
        )
        .unwrap();

        let entries = get_transaction_list_entries(10, 0, &conn).unwrap();

        assert_eq!(entries.len(), 2);
        // Date descending: the uncategorised lunch comes first.
        assert_eq!(entries[0].category_name, None);
        assert_eq!(entries[1].category_name, Some("Rent".to_owned()));
    }

    #[test]
    fn list_entries_respect_limit_and_offset() {
        let conn = get_test_connection();
        for day in 1..=5 {
            create_transaction(
                Transaction::build(
                    TransactionKind::Expense,
                    day as f64,
                    date!(2025 - 03 - 01).replace_day(day).unwrap(),
                    "",
                ),
                &conn,
            )
            .unwrap();
        }

        let entries = get_transaction_list_entries(2, 2, &conn).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].transaction.amount, 3.0);
        assert_eq!(entries[1].transaction.amount, 2.0);
    }
}
