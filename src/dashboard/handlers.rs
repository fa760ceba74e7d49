//! Dashboard HTTP handler and view rendering.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    dashboard::cards::summary_cards_view,
    endpoints,
    html::{
        CATEGORY_BADGE_STYLE, HeadElement, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, format_currency, link,
    },
    navigation::NavBar,
    report::{
        ChartPanel, annual_overview, annual_overview_chart, category_breakdown,
        category_pie_chart, charts_script, get_transactions_in_year, monthly_report,
    },
    timezone::get_local_offset,
    transaction::{
        TransactionKind, TransactionListEntry, get_transaction_list_entries,
    },
};

/// How many of the latest transactions to show on the dashboard.
const RECENT_TRANSACTION_COUNT: u64 = 5;

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Holds all the data needed to render the dashboard.
struct DashboardData {
    total_income: f64,
    total_expenses: f64,
    charts: Vec<ChartPanel>,
    recent_transactions: Vec<TransactionListEntry>,
}

/// Display a page with an overview of the user's data.
pub async fn get_dashboard_page(State(state): State<DashboardState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW);

    match build_dashboard_data(&state.local_timezone, &connection)? {
        Some(data) => Ok(dashboard_view(nav_bar, &data).into_response()),
        None => Ok(dashboard_no_data_view(nav_bar).into_response()),
    }
}

/// Fetches and builds all data needed for the dashboard display.
///
/// # Returns
/// All dashboard data ready for rendering, or `None` if no transaction data
/// exists for the current year.
///
/// # Errors
/// Returns an error if database queries fail or the timezone is invalid.
fn build_dashboard_data(
    local_timezone_name: &str,
    connection: &Connection,
) -> Result<Option<DashboardData>, Error> {
    let local_timezone = get_local_offset(local_timezone_name).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", local_timezone_name);
        Error::InvalidTimezoneError(local_timezone_name.to_owned())
    })?;
    let today = OffsetDateTime::now_utc().to_offset(local_timezone).date();
    let year = today.year();
    let month = today.month() as u8;

    let transactions = get_transactions_in_year(year, connection)
        .inspect_err(|error| tracing::error!("could not get this year's transactions: {error}"))?;

    if transactions.is_empty() {
        return Ok(None);
    }

    let report = monthly_report(&transactions, year, month)?;
    let total_income: f64 = report.income.iter().map(|bucket| bucket.amount).sum();
    let total_expenses: f64 = report.expenses.iter().map(|bucket| bucket.amount).sum();

    let overview = annual_overview(&transactions, year);
    let expense_breakdown =
        category_breakdown(&transactions, year, month, TransactionKind::Expense)?;

    let mut charts = vec![ChartPanel {
        id: "overview-chart",
        options: annual_overview_chart(&overview).to_string(),
    }];

    if !expense_breakdown.is_empty() {
        charts.push(ChartPanel {
            id: "expenses-chart",
            options: category_pie_chart("This Month's Expenses", &expense_breakdown).to_string(),
        });
    }

    let recent_transactions =
        get_transaction_list_entries(RECENT_TRANSACTION_COUNT, 0, connection).inspect_err(
            |error| tracing::error!("could not get recent transactions: {error}"),
        )?;

    Ok(Some(DashboardData {
        total_income,
        total_expenses,
        charts,
        recent_transactions,
    }))
}

/// Renders the dashboard page when no transaction data exists.
fn dashboard_no_data_view(nav_bar: NavBar) -> Markup {
    let nav_bar = nav_bar.into_html();
    let new_transaction_link = link(endpoints::NEW_TRANSACTION_VIEW, "adding a transaction");

    let content = html!(
        (nav_bar)

        div class="flex flex-col items-center px-6 py-8 mx-auto text-gray-900 dark:text-white"
        {
            h2 class="text-xl font-bold"
            {
                "Nothing here yet..."
            }

            p
            {
                "Charts will show up here once you record some income or expenses.
                Get started by " (new_transaction_link) "."
            }
        }
    );

    base("Dashboard", &[], &content)
}

/// Renders the main dashboard page with cards, charts, and the recent
/// transactions table.
fn dashboard_view(nav_bar: NavBar, data: &DashboardData) -> Markup {
    let nav_bar = nav_bar.into_html();

    let content = html!(
        (nav_bar)

        div
            id="dashboard-content"
            class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            (summary_cards_view(data.total_income, data.total_expenses))

            section
                id="charts"
                class="w-full mx-auto mb-4"
            {
                div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
                {
                    @for chart in &data.charts {
                        div
                            id=(chart.id)
                            class="min-h-[380px] rounded dark:bg-gray-100"
                        {}
                    }
                }
            }

            (recent_transactions_table(&data.recent_transactions))
        }
    );

    let scripts = [
        HeadElement::ScriptLink("/static/echarts.6.0.0.min.js".to_owned()),
        charts_script(&data.charts),
    ];

    base("Dashboard", &scripts, &content)
}

/// Renders the table of the latest transactions with a link to the full list.
fn recent_transactions_table(entries: &[TransactionListEntry]) -> Markup {
    html!(
        section class="w-full mx-auto mb-8"
        {
            div class="flex justify-between items-baseline mb-4"
            {
                h3 class="text-xl font-semibold" { "Recent Transactions" }

                (link(endpoints::TRANSACTIONS_VIEW, "View all"))
            }

            div class="overflow-x-auto rounded-lg shadow"
            {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                        }
                    }
                    tbody
                    {
                        @for entry in entries {
                            tr class=(TABLE_ROW_STYLE)
                            {
                                td class=(TABLE_CELL_STYLE) { (entry.transaction.date) }
                                td class=(TABLE_CELL_STYLE) { (entry.transaction.description) }
                                td class=(TABLE_CELL_STYLE)
                                {
                                    @if let Some(category_name) = &entry.category_name {
                                        span class=(CATEGORY_BADGE_STYLE) { (category_name) }
                                    }
                                }
                                td class=(TABLE_CELL_STYLE)
                                {
                                    @match entry.transaction.kind {
                                        TransactionKind::Income => {
                                            span class="text-green-600 dark:text-green-400"
                                            {
                                                "+" (format_currency(entry.transaction.amount))
                                            }
                                        }
                                        TransactionKind::Expense => {
                                            span class="text-red-600 dark:text-red-400"
                                            {
                                                "-" (format_currency(entry.transaction.amount))
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    )
}
