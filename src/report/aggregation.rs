//! Transaction data aggregation for the report and dashboard charts.
//!
//! These functions are pure: they read an in-memory slice of transactions and
//! build fresh bucket collections on every call, so they are deterministic
//! for a fixed input and safe to call concurrently.

use std::collections::{BTreeMap, HashMap};
use std::ops::RangeInclusive;

use time::{Date, Month};

use crate::{
    Error,
    report::transaction::ReportTransaction,
    transaction::TransactionKind,
};

/// The label under which transactions without a category are aggregated.
pub const UNCATEGORIZED_LABEL: &str = "Other";

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// A per-category total for one month, with its share of the month's total
/// for the same kind.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBucket {
    /// The category label.
    pub category: String,
    /// The summed amount for the category.
    pub amount: f64,
    /// The category's share of the kind's total, in 0.0..=1.0.
    ///
    /// Zero when the kind's total for the month is zero.
    pub percent: f64,
}

/// Income and expense totals for one day of a month.
#[derive(Debug, Clone, PartialEq)]
pub struct DayBucket {
    /// The day of the month, "1" through "31".
    pub day: String,
    /// The summed income for the day.
    pub income: f64,
    /// The summed expenses for the day.
    pub expenses: f64,
}

/// Income and expense totals for one calendar month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthBucket {
    /// The three-letter month label, e.g. "Jan".
    pub name: &'static str,
    /// The summed income for the month.
    pub income: f64,
    /// The summed expenses for the month.
    pub expenses: f64,
}

/// The derived views for a single month's report.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MonthlyReport {
    /// Per-category income totals, alphabetical with "Other" last.
    pub income: Vec<CategoryBucket>,
    /// Per-category expense totals, alphabetical with "Other" last.
    pub expenses: Vec<CategoryBucket>,
    /// Per-day income and expense totals, sorted by numeric day.
    pub daily_transactions: Vec<DayBucket>,
}

/// Build the monthly report for `year` and `month` (1 = January).
///
/// Transactions outside the month are ignored, so the input may be filtered
/// or unfiltered. A month with no matching transactions produces a report
/// whose three collections are all empty, which callers must render as an
/// explicit "no data" state rather than an error.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidMonth] if `month` is outside 1-12,
/// - or [Error::InvalidYear] if `year` is outside the supported calendar range.
pub fn monthly_report(
    transactions: &[ReportTransaction],
    year: i32,
    month: u8,
) -> Result<MonthlyReport, Error> {
    let date_range = month_date_range(year, month)?;

    let mut income_by_category: HashMap<&str, f64> = HashMap::new();
    let mut expenses_by_category: HashMap<&str, f64> = HashMap::new();
    // Keyed by numeric day so iteration comes out in day order.
    let mut days: BTreeMap<u8, (f64, f64)> = BTreeMap::new();

    for transaction in transactions
        .iter()
        .filter(|transaction| date_range.contains(&transaction.date))
    {
        let amount = coerce_amount(transaction.amount);
        let day_totals = days.entry(transaction.date.day()).or_insert((0.0, 0.0));

        match transaction.kind {
            TransactionKind::Income => {
                *income_by_category
                    .entry(transaction.category.as_str())
                    .or_insert(0.0) += amount;
                day_totals.0 += amount;
            }
            TransactionKind::Expense => {
                *expenses_by_category
                    .entry(transaction.category.as_str())
                    .or_insert(0.0) += amount;
                day_totals.1 += amount;
            }
        }
    }

    let daily_transactions = days
        .into_iter()
        .map(|(day, (income, expenses))| DayBucket {
            day: day.to_string(),
            income,
            expenses,
        })
        .collect();

    Ok(MonthlyReport {
        income: into_category_buckets(income_by_category),
        expenses: into_category_buckets(expenses_by_category),
        daily_transactions,
    })
}

/// Build the twelve-month overview for `year`.
///
/// Always returns exactly 12 entries in calendar order, one per month, even
/// when a month (or the whole year) has no transactions; those months keep
/// zero totals. Non-finite amounts are coerced to zero instead of poisoning
/// the sums.
pub fn annual_overview(transactions: &[ReportTransaction], year: i32) -> [MonthBucket; 12] {
    let mut months = MONTH_LABELS.map(|name| MonthBucket {
        name,
        income: 0.0,
        expenses: 0.0,
    });

    for transaction in transactions
        .iter()
        .filter(|transaction| transaction.date.year() == year)
    {
        let amount = coerce_amount(transaction.amount);
        let month = &mut months[transaction.date.month() as usize - 1];

        match transaction.kind {
            TransactionKind::Income => month.income += amount,
            TransactionKind::Expense => month.expenses += amount,
        }
    }

    months
}

/// Build the per-category totals for a single kind in `year`/`month`.
///
/// Produces the same buckets as the matching half of [monthly_report] for the
/// same input.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidMonth] if `month` is outside 1-12,
/// - or [Error::InvalidYear] if `year` is outside the supported calendar range.
pub fn category_breakdown(
    transactions: &[ReportTransaction],
    year: i32,
    month: u8,
    kind: TransactionKind,
) -> Result<Vec<CategoryBucket>, Error> {
    let date_range = month_date_range(year, month)?;

    let mut totals: HashMap<&str, f64> = HashMap::new();

    for transaction in transactions.iter().filter(|transaction| {
        transaction.kind == kind && date_range.contains(&transaction.date)
    }) {
        *totals.entry(transaction.category.as_str()).or_insert(0.0) +=
            coerce_amount(transaction.amount);
    }

    Ok(into_category_buckets(totals))
}

/// Convert per-category totals into buckets with percentages attached.
///
/// The percentage pass needs the grand total, so the totals must be fully
/// accumulated before any bucket can be emitted. Buckets come out
/// alphabetically with [UNCATEGORIZED_LABEL] last.
fn into_category_buckets(totals: HashMap<&str, f64>) -> Vec<CategoryBucket> {
    let mut labels: Vec<&str> = totals
        .keys()
        .copied()
        .filter(|&label| label != UNCATEGORIZED_LABEL)
        .collect();
    labels.sort_unstable();

    if totals.contains_key(UNCATEGORIZED_LABEL) {
        labels.push(UNCATEGORIZED_LABEL);
    }

    let total: f64 = totals.values().sum();

    labels
        .into_iter()
        .map(|label| {
            let amount = totals[label];
            CategoryBucket {
                category: label.to_owned(),
                amount,
                percent: if total > 0.0 { amount / total } else { 0.0 },
            }
        })
        .collect()
}

/// The inclusive date range covering `year`/`month`.
fn month_date_range(year: i32, month: u8) -> Result<RangeInclusive<Date>, Error> {
    let month = Month::try_from(month).map_err(|_| Error::InvalidMonth(month))?;
    let first_day =
        Date::from_calendar_date(year, month, 1).map_err(|_| Error::InvalidYear(year))?;
    let last_day = first_day
        .replace_day(time::util::days_in_year_month(year, month))
        .unwrap();

    Ok(first_day..=last_day)
}

fn coerce_amount(amount: f64) -> f64 {
    if amount.is_finite() { amount } else { 0.0 }
}

#[cfg(test)]
mod monthly_report_tests {
    use time::{Date, macros::date};

    use crate::{
        Error,
        report::transaction::ReportTransaction,
        transaction::TransactionKind,
    };

    use super::{DayBucket, UNCATEGORIZED_LABEL, monthly_report};

    fn create_test_transaction(
        kind: TransactionKind,
        amount: f64,
        date: Date,
        category: &str,
    ) -> ReportTransaction {
        ReportTransaction {
            kind,
            amount,
            date,
            category: category.to_owned(),
        }
    }

    #[test]
    fn groups_categories_and_days() {
        // The worked example: one salary payment and two food purchases.
        let transactions = vec![
            create_test_transaction(
                TransactionKind::Income,
                1000.0,
                date!(2024 - 03 - 01),
                "Salary",
            ),
            create_test_transaction(
                TransactionKind::Expense,
                200.0,
                date!(2024 - 03 - 05),
                "Food",
            ),
            create_test_transaction(
                TransactionKind::Expense,
                50.0,
                date!(2024 - 03 - 05),
                "Food",
            ),
        ];

        let report = monthly_report(&transactions, 2024, 3).unwrap();

        assert_eq!(report.income.len(), 1);
        assert_eq!(report.income[0].category, "Salary");
        assert_eq!(report.income[0].amount, 1000.0);
        assert_eq!(report.income[0].percent, 1.0);

        assert_eq!(report.expenses.len(), 1);
        assert_eq!(report.expenses[0].category, "Food");
        assert_eq!(report.expenses[0].amount, 250.0);
        assert_eq!(report.expenses[0].percent, 1.0);

        assert_eq!(
            report.daily_transactions,
            vec![
                DayBucket {
                    day: "1".to_owned(),
                    income: 1000.0,
                    expenses: 0.0
                },
                DayBucket {
                    day: "5".to_owned(),
                    income: 0.0,
                    expenses: 250.0
                },
            ]
        );
    }

    #[test]
    fn empty_input_produces_empty_report() {
        let report = monthly_report(&[], 2024, 3).unwrap();

        assert!(report.income.is_empty());
        assert!(report.expenses.is_empty());
        assert!(report.daily_transactions.is_empty());
    }

    #[test]
    fn includes_last_day_and_excludes_first_day_of_next_month() {
        let transactions = vec![
            create_test_transaction(
                TransactionKind::Expense,
                10.0,
                date!(2024 - 02 - 29),
                "Food",
            ),
            create_test_transaction(
                TransactionKind::Expense,
                99.0,
                date!(2024 - 03 - 01),
                "Food",
            ),
        ];

        let report = monthly_report(&transactions, 2024, 2).unwrap();

        assert_eq!(report.expenses.len(), 1);
        assert_eq!(report.expenses[0].amount, 10.0);
    }

    #[test]
    fn conserves_totals() {
        let transactions = vec![
            create_test_transaction(
                TransactionKind::Income,
                1000.0,
                date!(2024 - 03 - 01),
                "Salary",
            ),
            create_test_transaction(
                TransactionKind::Income,
                250.5,
                date!(2024 - 03 - 14),
                "Dividends",
            ),
            create_test_transaction(
                TransactionKind::Income,
                12.25,
                date!(2024 - 03 - 14),
                UNCATEGORIZED_LABEL,
            ),
            // Outside the month, must not count.
            create_test_transaction(
                TransactionKind::Income,
                9999.0,
                date!(2024 - 04 - 01),
                "Salary",
            ),
        ];

        let report = monthly_report(&transactions, 2024, 3).unwrap();

        let bucket_total: f64 = report.income.iter().map(|bucket| bucket.amount).sum();
        assert_eq!(bucket_total, 1000.0 + 250.5 + 12.25);
    }

    #[test]
    fn percentages_sum_to_one() {
        let transactions = vec![
            create_test_transaction(
                TransactionKind::Expense,
                70.0,
                date!(2024 - 03 - 02),
                "Food",
            ),
            create_test_transaction(
                TransactionKind::Expense,
                20.0,
                date!(2024 - 03 - 03),
                "Transport",
            ),
            create_test_transaction(
                TransactionKind::Expense,
                10.0,
                date!(2024 - 03 - 04),
                UNCATEGORIZED_LABEL,
            ),
        ];

        let report = monthly_report(&transactions, 2024, 3).unwrap();

        let percent_total: f64 = report.expenses.iter().map(|bucket| bucket.percent).sum();
        assert!((percent_total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn percentages_are_zero_when_total_is_zero() {
        let transactions = vec![create_test_transaction(
            TransactionKind::Expense,
            0.0,
            date!(2024 - 03 - 02),
            "Food",
        )];

        let report = monthly_report(&transactions, 2024, 3).unwrap();

        assert_eq!(report.expenses.len(), 1);
        assert_eq!(report.expenses[0].percent, 0.0);
    }

    #[test]
    fn sorts_categories_alphabetically_with_other_last() {
        let transactions = vec![
            create_test_transaction(
                TransactionKind::Expense,
                10.0,
                date!(2024 - 03 - 02),
                "Zoo",
            ),
            create_test_transaction(
                TransactionKind::Expense,
                10.0,
                date!(2024 - 03 - 02),
                UNCATEGORIZED_LABEL,
            ),
            create_test_transaction(
                TransactionKind::Expense,
                10.0,
                date!(2024 - 03 - 02),
                "Aquarium",
            ),
        ];

        let report = monthly_report(&transactions, 2024, 3).unwrap();

        let labels: Vec<&str> = report
            .expenses
            .iter()
            .map(|bucket| bucket.category.as_str())
            .collect();
        assert_eq!(labels, ["Aquarium", "Zoo", UNCATEGORIZED_LABEL]);
    }

    #[test]
    fn sorts_days_numerically() {
        // Days 2, 10, and 21: lexicographic ordering would give 10, 2, 21.
        let transactions = vec![
            create_test_transaction(
                TransactionKind::Expense,
                1.0,
                date!(2024 - 03 - 21),
                "Food",
            ),
            create_test_transaction(
                TransactionKind::Expense,
                1.0,
                date!(2024 - 03 - 02),
                "Food",
            ),
            create_test_transaction(
                TransactionKind::Expense,
                1.0,
                date!(2024 - 03 - 10),
                "Food",
            ),
        ];

        let report = monthly_report(&transactions, 2024, 3).unwrap();

        let days: Vec<&str> = report
            .daily_transactions
            .iter()
            .map(|bucket| bucket.day.as_str())
            .collect();
        assert_eq!(days, ["2", "10", "21"]);
    }

    #[test]
    fn rejects_month_out_of_range() {
        assert_eq!(monthly_report(&[], 2024, 0), Err(Error::InvalidMonth(0)));
        assert_eq!(monthly_report(&[], 2024, 13), Err(Error::InvalidMonth(13)));
    }

    #[test]
    fn rejects_year_out_of_range() {
        assert_eq!(
            monthly_report(&[], 100_000, 1),
            Err(Error::InvalidYear(100_000))
        );
    }

    #[test]
    fn is_idempotent() {
        let transactions = vec![
            create_test_transaction(
                TransactionKind::Income,
                1000.0,
                date!(2024 - 03 - 01),
                "Salary",
            ),
            create_test_transaction(
                TransactionKind::Expense,
                200.0,
                date!(2024 - 03 - 05),
                "Food",
            ),
        ];

        let first = monthly_report(&transactions, 2024, 3).unwrap();
        let second = monthly_report(&transactions, 2024, 3).unwrap();

        assert_eq!(first, second);
    }
}
