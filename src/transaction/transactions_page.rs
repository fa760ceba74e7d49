//! Defines the route handler for the paginated transactions listing page.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error, endpoints,
    html::{
        BUTTON_DELETE_STYLE, CATEGORY_BADGE_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE,
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, format_currency, link,
    },
    navigation::NavBar,
    pagination::{
        PaginationConfig, PaginationIndicator, create_pagination_indicators,
    },
    transaction::{
        TransactionKind, TransactionListEntry,
        core::{count_transactions, get_transaction_list_entries},
    },
};

/// Query parameters for the transactions page.
#[derive(Debug, Deserialize)]
pub struct TransactionsQuery {
    /// The page of transactions to show, starting from 1.
    pub page: Option<u64>,
}

/// The state needed for the transactions page.
#[derive(Debug, Clone)]
pub struct TransactionsPageState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The config that controls how to display pages of data.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for TransactionsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// Display the user's transactions, newest first.
pub async fn get_transactions_page(
    State(state): State<TransactionsPageState>,
    Query(query): Query<TransactionsQuery>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let page_size = state.pagination_config.default_page_size;
    let transaction_count = count_transactions(&connection)
        .inspect_err(|error| tracing::error!("could not count transactions: {error}"))?;
    let page_count = transaction_count.div_ceil(page_size).max(1);

    let page = query
        .page
        .unwrap_or(state.pagination_config.default_page)
        .clamp(1, page_count);

    let entries = get_transaction_list_entries(page_size, (page - 1) * page_size, &connection)
        .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?;

    let indicators =
        create_pagination_indicators(page, page_count, state.pagination_config.max_pages);

    Ok(
        transactions_view(&entries, &indicators, page_count > 1)
            .into_response(),
    )
}

fn transactions_view(
    entries: &[TransactionListEntry],
    indicators: &[PaginationIndicator],
    show_pagination: bool,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();

    let content = html!(
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="flex w-full max-w-5xl justify-between items-center mb-4"
            {
                h2 class="text-xl font-bold" { "Transactions" }

                a href=(endpoints::NEW_TRANSACTION_VIEW) class=(LINK_STYLE) { "New Transaction" }
            }

            @if entries.is_empty() {
                p
                {
                    "No transactions yet. Add one " (link(endpoints::NEW_TRANSACTION_VIEW, "here")) "."
                }
            } @else {
                div class="w-full max-w-5xl overflow-x-auto rounded-lg shadow"
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
                                th scope="col" class=(TABLE_CELL_STYLE) { "Receipt" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }
                        tbody
                        {
                            @for entry in entries {
                                (transaction_row(entry))
                            }
                        }
                    }
                }

                @if show_pagination {
                    (pagination_nav(indicators))
                }
            }
        }
    );

    base("Transactions", &[], &content)
}

fn transaction_row(entry: &TransactionListEntry) -> Markup {
    let transaction = &entry.transaction;
    let edit_url = endpoints::format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id);
    let delete_url = endpoints::format_endpoint(endpoints::TRANSACTION, transaction.id);

    html!(
        tr class=(TABLE_ROW_STYLE)
        {
            td class=(TABLE_CELL_STYLE) { (transaction.date) }
            td class=(TABLE_CELL_STYLE) { (transaction.description) }
            td class=(TABLE_CELL_STYLE)
            {
                @if let Some(category_name) = &entry.category_name {
                    span class=(CATEGORY_BADGE_STYLE) { (category_name) }
                }
            }
            td class=(TABLE_CELL_STYLE)
            {
                @match transaction.kind {
                    TransactionKind::Income => {
                        span class="text-green-600 dark:text-green-400"
                        {
                            "+" (format_currency(transaction.amount))
                        }
                    }
                    TransactionKind::Expense => {
                        span class="text-red-600 dark:text-red-400"
                        {
                            "-" (format_currency(transaction.amount))
                        }
                    }
                }
            }
            td class=(TABLE_CELL_STYLE)
            {
                @if let Some(receipt_url) = &transaction.receipt_url {
                    a href=(receipt_url) class=(LINK_STYLE) { "View" }
                }
            }
            td class=(TABLE_CELL_STYLE)
            {
                a href=(edit_url) class=(LINK_STYLE) { "Edit" }

                " "

                button
                    hx-delete=(delete_url)
                    hx-confirm="Delete this transaction?"
                    hx-target-error="#alert-container"
                    class=(BUTTON_DELETE_STYLE)
                {
                    "Delete"
                }
            }
        }
    )
}

fn pagination_nav(indicators: &[PaginationIndicator]) -> Markup {
    let page_url = |page: u64| format!("{}?page={page}", endpoints::TRANSACTIONS_VIEW);
    let page_link_style = "flex items-center justify-center px-3 h-8 leading-tight \
        text-gray-500 bg-white border border-gray-300 hover:bg-gray-100 \
        hover:text-gray-700 dark:bg-gray-800 dark:border-gray-700 \
        dark:text-gray-400 dark:hover:bg-gray-700 dark:hover:text-white";
    let current_page_style = "flex items-center justify-center px-3 h-8 \
        text-blue-600 border border-gray-300 bg-blue-50 hover:bg-blue-100 \
        hover:text-blue-700 dark:bg-gray-700 dark:border-gray-700 dark:text-white";

    html!(
        nav aria-label="Transaction pages" class="mt-4"
        {
            ul class="inline-flex -space-x-px text-sm"
            {
                @for indicator in indicators {
                    li
                    {
                        @match indicator {
                            PaginationIndicator::BackButton(page) => {
                                a href=(page_url(*page)) class=(page_link_style) { "Previous" }
                            }
                            PaginationIndicator::Page(page) => {
                                a href=(page_url(*page)) class=(page_link_style) { (page) }
                            }
                            PaginationIndicator::CurrPage(page) => {
                                a
                                    href=(page_url(*page))
                                    aria-current="page"
                                    class=(current_page_style)
                                {
                                    (page)
                                }
                            }
                            PaginationIndicator::Ellipsis => {
                                span class=(page_link_style) { "..." }
                            }
                            PaginationIndicator::NextButton(page) => {
                                a href=(page_url(*page)) class=(page_link_style) { "Next" }
                            }
                        }
                    }
                }
            }
        }
    )
}
