//! Monthly and annual reporting.
//!
//! Contains the pure aggregation functions that turn transaction rows into
//! chart-ready buckets, the database query that feeds them, the chart
//! definitions, and the monthly report page.

mod aggregation;
mod charts;
mod monthly_page;
mod transaction;

pub use aggregation::{
    CategoryBucket, DayBucket, MonthBucket, MonthlyReport, UNCATEGORIZED_LABEL, annual_overview,
    category_breakdown, monthly_report,
};
pub use monthly_page::get_monthly_report_page;
pub use transaction::{
    ReportTransaction, get_transactions_in_date_range, get_transactions_in_year,
};

pub(crate) use charts::{
    ChartPanel, annual_overview_chart, category_pie_chart, charts_script,
    daily_transactions_chart,
};
