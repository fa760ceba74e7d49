//! The monthly report page: summary cards, charts, and per-category detail
//! lists for a selected month.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use time::{Date, Month, OffsetDateTime};

use crate::{
    AppState, Error,
    dashboard::summary_cards_view,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, HeadElement,
        format_currency, base,
    },
    navigation::NavBar,
    report::{
        aggregation::{CategoryBucket, MonthlyReport, monthly_report},
        charts::{ChartPanel, category_pie_chart, charts_script, daily_transactions_chart},
        transaction::get_transactions_in_date_range,
    },
    timezone::get_local_offset,
};

/// Query parameters selecting the month to report on.
///
/// Both parameters default to the current month in the server's timezone.
#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    pub year: Option<i32>,
    pub month: Option<u8>,
}

/// The state needed for the monthly report page.
#[derive(Debug, Clone)]
pub struct MonthlyReportPageState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for MonthlyReportPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Display the report for the requested month.
pub async fn get_monthly_report_page(
    State(state): State<MonthlyReportPageState>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, Error> {
    let local_timezone = get_local_offset(&state.local_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        Error::InvalidTimezoneError(state.local_timezone.clone())
    })?;
    let today = OffsetDateTime::now_utc().to_offset(local_timezone).date();

    let year = query.year.unwrap_or_else(|| today.year());
    let month = query.month.unwrap_or(today.month() as u8);

    let parsed_month = Month::try_from(month).map_err(|_| Error::InvalidMonth(month))?;
    let first_day =
        Date::from_calendar_date(year, parsed_month, 1).map_err(|_| Error::InvalidYear(year))?;
    let last_day = first_day
        .replace_day(time::util::days_in_year_month(year, parsed_month))
        .unwrap();

    let transactions = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_transactions_in_date_range(first_day..=last_day, &connection).inspect_err(
            |error| tracing::error!("could not get transactions for the report: {error}"),
        )?
    };

    let report = monthly_report(&transactions, year, month)?;

    Ok(report_view(year, parsed_month, &report).into_response())
}

fn report_view(year: i32, month: Month, report: &MonthlyReport) -> Markup {
    let nav_bar = NavBar::new(endpoints::REPORTS_VIEW).into_html();

    let total_income: f64 = report.income.iter().map(|bucket| bucket.amount).sum();
    let total_expenses: f64 = report.expenses.iter().map(|bucket| bucket.amount).sum();

    let mut charts = Vec::new();

    if !report.daily_transactions.is_empty() {
        charts.push(ChartPanel {
            id: "daily-chart",
            options: daily_transactions_chart(&report.daily_transactions).to_string(),
        });
    }

    if !report.income.is_empty() {
        charts.push(ChartPanel {
            id: "income-chart",
            options: category_pie_chart("Income Breakdown", &report.income).to_string(),
        });
    }

    if !report.expenses.is_empty() {
        charts.push(ChartPanel {
            id: "expenses-chart",
            options: category_pie_chart("Expense Breakdown", &report.expenses).to_string(),
        });
    }

    let content = html!(
        (nav_bar)

        div class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
            max-w-screen-xl text-gray-900 dark:text-white"
        {
            div class="flex flex-col sm:flex-row w-full justify-between items-start sm:items-center gap-4 mb-4"
            {
                h2 class="text-2xl font-bold" { (month) " " (year) }

                (month_picker_form(year, month))
            }

            (summary_cards_view(total_income, total_expenses))

            @if report.daily_transactions.is_empty() {
                p class="py-10 text-gray-600 dark:text-gray-400"
                {
                    "No transaction data available for this month."
                }
            } @else {
                section
                    id="charts"
                    class="w-full mx-auto mb-4"
                {
                    div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
                    {
                        @for chart in &charts {
                            div
                                id=(chart.id)
                                class="min-h-[380px] rounded dark:bg-gray-100"
                            {}
                        }
                    }
                }

                div class="grid grid-cols-1 md:grid-cols-2 gap-4 w-full mb-8"
                {
                    (category_details("Income Details", &report.income))
                    (category_details("Expense Details", &report.expenses))
                }
            }
        }
    );

    let scripts = [
        HeadElement::ScriptLink("/static/echarts.6.0.0.min.js".to_owned()),
        charts_script(&charts),
    ];

    base("Monthly Report", &scripts, &content)
}

fn month_picker_form(year: i32, month: Month) -> Markup {
    html!(
        form
            method="get"
            action=(endpoints::REPORTS_VIEW)
            class="flex items-end gap-2"
        {
            div
            {
                label for="month" class=(FORM_LABEL_STYLE) { "Month" }

                select
                    id="month"
                    name="month"
                    class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for month_number in 1..=12u8 {
                        option
                            value=(month_number)
                            selected[month_number == month as u8]
                        {
                            (Month::try_from(month_number).unwrap())
                        }
                    }
                }
            }

            div
            {
                label for="year" class=(FORM_LABEL_STYLE) { "Year" }

                input
                    id="year"
                    type="number"
                    name="year"
                    value=(year)
                    min="1970"
                    max="9999"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Show" }
        }
    )
}

fn category_details(title: &str, buckets: &[CategoryBucket]) -> Markup {
    html!(
        div class="bg-white dark:bg-gray-800 border border-gray-200
            dark:border-gray-700 rounded-lg p-4 shadow-md"
        {
            h3 class="text-xl font-semibold mb-4" { (title) }

            @if buckets.is_empty() {
                p class="text-gray-600 dark:text-gray-400"
                {
                    "No data available for this month."
                }
            } @else {
                div class="space-y-4"
                {
                    @for bucket in buckets {
                        div class="flex items-center justify-between"
                        {
                            span { (bucket.category) }

                            span class="font-medium"
                            {
                                (format_currency(bucket.amount))
                                " (" (format!("{:.1}", bucket.percent * 100.0)) "%)"
                            }
                        }
                    }
                }
            }
        }
    )
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        body::Body,
        extract::{Query, State},
        http::{Response, StatusCode},
        response::IntoResponse,
    };
    use rusqlite::Connection;
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::{
        Error,
        db::initialize,
        transaction::{Transaction, TransactionKind, create_transaction},
    };

    use super::{MonthlyReportPageState, ReportQuery, get_monthly_report_page};

    fn get_test_state() -> MonthlyReportPageState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        MonthlyReportPageState {
            db_connection: Arc::new(Mutex::new(conn)),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    fn query(year: i32, month: u8) -> Query<ReportQuery> {
        Query(ReportQuery {
            year: Some(year),
            month: Some(month),
        })
    }

    #[tokio::test]
    async fn report_page_shows_charts_and_details() {
        let state = get_test_state();
        {
            let connection = state.db_connection.lock().unwrap();
            create_transaction(
                Transaction::build(
                    TransactionKind::Income,
                    900.0,
                    date!(2024 - 03 - 01),
                    "salary",
                ),
                &connection,
            )
            .unwrap();
            create_transaction(
                Transaction::build(
                    TransactionKind::Expense,
                    250.0,
                    date!(2024 - 03 - 05),
                    "groceries",
                ),
                &connection,
            )
            .unwrap();
        }

        let response = get_monthly_report_page(State(state), query(2024, 3))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html(response).await;
        assert_valid_html(&html);
        assert_element_exists(&html, "#daily-chart");
        assert_element_exists(&html, "#income-chart");
        assert_element_exists(&html, "#expenses-chart");

        let text = html.html();
        assert!(text.contains("March 2024"));
        assert!(text.contains("$900.00"));
        assert!(text.contains("$250.00"));
    }

    #[tokio::test]
    async fn report_page_shows_no_data_state_for_empty_month() {
        let state = get_test_state();

        let response = get_monthly_report_page(State(state), query(2024, 7))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html(response).await;
        assert_valid_html(&html);
        assert!(
            html.html()
                .contains("No transaction data available for this month.")
        );
    }

    #[tokio::test]
    async fn report_page_rejects_invalid_month() {
        let state = get_test_state();

        let result = get_monthly_report_page(State(state), query(2024, 13)).await;

        assert_eq!(result.as_ref().err(), Some(&Error::InvalidMonth(13)));

        let response = result.unwrap_err().into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn report_page_excludes_other_months() {
        let state = get_test_state();
        {
            let connection = state.db_connection.lock().unwrap();
            create_transaction(
                Transaction::build(
                    TransactionKind::Expense,
                    99.0,
                    date!(2024 - 04 - 01),
                    "next month",
                ),
                &connection,
            )
            .unwrap();
        }

        let response = get_monthly_report_page(State(state), query(2024, 3))
            .await
            .unwrap();

        let html = parse_html(response).await;
        assert!(
            html.html()
                .contains("No transaction data available for this month.")
        );
    }

    async fn parse_html(response: Response<Body>) -> Html {
        let body = response.into_body();
        let body = axum::body::to_bytes(body, usize::MAX).await.unwrap();
        let text = String::from_utf8_lossy(&body).to_string();

        Html::parse_document(&text)
    }

    #[track_caller]
    fn assert_valid_html(html: &Html) {
        assert!(
            html.errors.is_empty(),
            "Got HTML parsing errors: {:?}",
            html.errors
        );
    }

    #[track_caller]
    fn assert_element_exists(html: &Html, selector: &str) {
        let selector = Selector::parse(selector).unwrap();
        assert!(
            html.select(&selector).next().is_some(),
            "Element '{selector:?}' not found"
        );
    }
}
