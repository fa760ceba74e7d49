//! Database queries for retrieving report transaction data.
//!
//! This module provides a simplified transaction view optimized for the
//! aggregation functions, containing only the fields needed for charting
//! (kind, amount, date, category label).

use std::ops::RangeInclusive;

use rusqlite::Connection;
use time::{Date, Month};

use crate::{Error, report::aggregation::UNCATEGORIZED_LABEL, transaction::TransactionKind};

/// A simplified transaction view for report aggregations.
///
/// This is separate from the main Transaction domain model because the
/// reports only need kind, amount, date, and category label for charting.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportTransaction {
    pub kind: TransactionKind,
    pub amount: f64,
    pub date: Date,
    pub category: String,
}

/// Gets transactions and their category labels within a date range.
///
/// Transactions without a category get the [UNCATEGORIZED_LABEL] label.
///
/// # Errors
/// Returns [Error::SqlError] if:
/// - Database connection fails
/// - SQL query preparation or execution fails
pub fn get_transactions_in_date_range(
    date_range: RangeInclusive<Date>,
    connection: &Connection,
) -> Result<Vec<ReportTransaction>, Error> {
    let query = format!(
        "SELECT
            t.kind,
            t.amount,
            t.date,
            COALESCE(c.name, '{UNCATEGORIZED_LABEL}') AS category
        FROM \"transaction\" t
        LEFT JOIN category c ON c.id = t.category_id
        WHERE t.date BETWEEN ?1 AND ?2"
    );

    let mut stmt = connection.prepare(&query)?;
    stmt.query_map(
        [date_range.start().to_string(), date_range.end().to_string()],
        |row| {
            Ok(ReportTransaction {
                kind: row.get(0)?,
                amount: row.get(1)?,
                date: row.get(2)?,
                category: row.get(3)?,
            })
        },
    )?
    .collect::<Result<Vec<ReportTransaction>, rusqlite::Error>>()
    .map_err(|error| error.into())
}

/// Gets transactions and their category labels for a whole calendar year.
///
/// # Errors
/// Returns [Error::InvalidYear] if `year` is outside the supported calendar
/// range, or [Error::SqlError] on a query failure.
pub fn get_transactions_in_year(
    year: i32,
    connection: &Connection,
) -> Result<Vec<ReportTransaction>, Error> {
    let first_day =
        Date::from_calendar_date(year, Month::January, 1).map_err(|_| Error::InvalidYear(year))?;
    let last_day = Date::from_calendar_date(year, Month::December, 31)
        .map_err(|_| Error::InvalidYear(year))?;

    get_transactions_in_date_range(first_day..=last_day, connection)
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        category::{CategoryName, create_category},
        db::initialize,
        transaction::{Transaction, TransactionKind, create_transaction},
    };

    use super::{get_transactions_in_date_range, get_transactions_in_year};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn returns_transactions_in_date_range() {
        let conn = get_test_connection();
        let start_date = date!(2024 - 01 - 01);
        let end_date = date!(2024 - 01 - 31);

        create_transaction(
            Transaction::build(TransactionKind::Income, 100.0, start_date, ""),
            &conn,
        )
        .unwrap();
        create_transaction(
            Transaction::build(TransactionKind::Expense, 50.0, date!(2024 - 01 - 15), ""),
            &conn,
        )
        .unwrap();
        create_transaction(
            Transaction::build(TransactionKind::Income, 75.0, end_date, ""),
            &conn,
        )
        .unwrap();

        let transactions = get_transactions_in_date_range(start_date..=end_date, &conn).unwrap();

        assert_eq!(transactions.len(), 3);

        let total: f64 = transactions.iter().map(|t| t.amount).sum();
        assert_eq!(total, 225.0);
    }

    #[test]
    fn returns_empty_vec_for_no_transactions() {
        let conn = get_test_connection();
        let start_date = date!(2024 - 01 - 01);
        let end_date = date!(2024 - 01 - 31);

        let transactions = get_transactions_in_date_range(start_date..=end_date, &conn).unwrap();

        assert_eq!(transactions.len(), 0);
    }

    #[test]
    fn excludes_transactions_outside_date_range() {
        let conn = get_test_connection();
        let start_date = date!(2024 - 01 - 01);
        let end_date = date!(2024 - 01 - 31);

        // Transactions within range
        create_transaction(
            Transaction::build(TransactionKind::Income, 100.0, start_date, ""),
            &conn,
        )
        .unwrap();
        create_transaction(
            Transaction::build(TransactionKind::Expense, 50.0, end_date, ""),
            &conn,
        )
        .unwrap();

        // Transactions outside range
        create_transaction(
            Transaction::build(TransactionKind::Income, 200.0, date!(2023 - 12 - 31), ""),
            &conn,
        )
        .unwrap();
        create_transaction(
            Transaction::build(TransactionKind::Expense, 100.0, date!(2024 - 02 - 01), ""),
            &conn,
        )
        .unwrap();

        let transactions = get_transactions_in_date_range(start_date..=end_date, &conn).unwrap();

        assert_eq!(transactions.len(), 2);
    }

    #[test]
    fn assigns_other_label_to_uncategorised_transactions() {
        let conn = get_test_connection();
        let start_date = date!(2024 - 01 - 01);
        let end_date = date!(2024 - 01 - 31);

        create_transaction(
            Transaction::build(TransactionKind::Expense, 100.0, start_date, ""),
            &conn,
        )
        .unwrap();

        let transactions = get_transactions_in_date_range(start_date..=end_date, &conn).unwrap();

        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].category, "Other");
    }

    #[test]
    fn uses_category_names_as_labels() {
        let conn = get_test_connection();
        let category = create_category(
            CategoryName::new("Groceries").unwrap(),
            TransactionKind::Expense,
            &conn,
        )
        .unwrap();

        create_transaction(
            Transaction::build(TransactionKind::Expense, 42.0, date!(2024 - 01 - 10), "")
                .category_id(Some(category.id)),
            &conn,
        )
        .unwrap();

        let transactions =
            get_transactions_in_date_range(date!(2024 - 01 - 01)..=date!(2024 - 01 - 31), &conn)
                .unwrap();

        assert_eq!(transactions[0].category, "Groceries");
    }

    #[test]
    fn year_query_spans_the_whole_year() {
        let conn = get_test_connection();

        create_transaction(
            Transaction::build(TransactionKind::Income, 1.0, date!(2024 - 01 - 01), ""),
            &conn,
        )
        .unwrap();
        create_transaction(
            Transaction::build(TransactionKind::Expense, 2.0, date!(2024 - 12 - 31), ""),
            &conn,
        )
        .unwrap();
        create_transaction(
            Transaction::build(TransactionKind::Expense, 4.0, date!(2025 - 01 - 01), ""),
            &conn,
        )
        .unwrap();

        let transactions = get_transactions_in_year(2024, &conn).unwrap();

        assert_eq!(transactions.len(), 2);
    }
}
