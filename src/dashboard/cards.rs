//! Summary cards showing the month's headline figures.

use maud::{Markup, html};

use crate::html::format_currency;

const CARD_STYLE: &str = "bg-white dark:bg-gray-800 border border-gray-200 \
    dark:border-gray-700 rounded-lg p-4 shadow-md";

const CARD_TITLE_STYLE: &str = "text-sm font-medium text-gray-600 dark:text-gray-400 mb-1";

/// The percentage of income left over after expenses, rounded to the nearest
/// whole number. Zero when there is no income.
pub(super) fn savings_rate(total_income: f64, total_expenses: f64) -> i64 {
    if total_income > 0.0 {
        ((total_income - total_expenses) / total_income * 100.0).round() as i64
    } else {
        0
    }
}

/// Renders the row of headline cards: income, expenses, balance, and savings
/// rate for one month.
pub(crate) fn summary_cards_view(total_income: f64, total_expenses: f64) -> Markup {
    let balance = total_income - total_expenses;
    let balance_color = if balance >= 0.0 {
        "text-green-600 dark:text-green-400"
    } else {
        "text-red-600 dark:text-red-400"
    };

    html! {
        section class="grid grid-cols-1 sm:grid-cols-2 xl:grid-cols-4 gap-4 w-full mb-4"
        {
            div class=(CARD_STYLE)
            {
                h3 class=(CARD_TITLE_STYLE) { "Total Income" }
                div class="text-2xl font-bold text-green-600 dark:text-green-400"
                {
                    (format_currency(total_income))
                }
            }

            div class=(CARD_STYLE)
            {
                h3 class=(CARD_TITLE_STYLE) { "Total Expenses" }
                div class="text-2xl font-bold text-red-600 dark:text-red-400"
                {
                    (format_currency(total_expenses))
                }
            }

            div class=(CARD_STYLE)
            {
                h3 class=(CARD_TITLE_STYLE) { "Balance" }
                div class={ "text-2xl font-bold " (balance_color) }
                {
                    (format_currency(balance))
                }
            }

            div class=(CARD_STYLE)
            {
                h3 class=(CARD_TITLE_STYLE) { "Savings Rate" }
                div class="text-2xl font-bold"
                {
                    (savings_rate(total_income, total_expenses)) "%"
                }
            }
        }
    }
}
