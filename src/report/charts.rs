//! Chart generation for the report and dashboard pages.
//!
//! Each chart is generated as an ECharts option object for the charming
//! library and rendered into an HTML container with JavaScript
//! initialization code.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, Emphasis, EmphasisFocus, JsFunction,
        Tooltip, Trigger,
    },
    series::{Pie, bar},
};
use maud::PreEscaped;

use crate::{
    html::HeadElement,
    report::aggregation::{CategoryBucket, DayBucket, MonthBucket},
};

/// A chart with its HTML container ID and ECharts configuration.
pub(crate) struct ChartPanel {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Generates JavaScript initialization code for charts.
///
/// Creates scripts that initialize ECharts instances with dark mode support
/// and responsive resizing.
pub(crate) fn charts_script(charts: &[ChartPanel]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        script_content
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

/// Income vs expense bars for each day of the month that has transactions.
pub(crate) fn daily_transactions_chart(daily_transactions: &[DayBucket]) -> Chart {
    let labels: Vec<String> = daily_transactions
        .iter()
        .map(|bucket| bucket.day.clone())
        .collect();
    let income: Vec<f64> = daily_transactions
        .iter()
        .map(|bucket| bucket.income)
        .collect();
    let expenses: Vec<f64> = daily_transactions
        .iter()
        .map(|bucket| bucket.expenses)
        .collect();

    Chart::new()
        .title(
            Title::new()
                .text("Daily Transactions")
                .subtext("Income and expenses throughout the month"),
        )
        .tooltip(currency_tooltip())
        .legend(Legend::new().top("5%"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(bar::Bar::new().name("Income").data(income))
        .series(bar::Bar::new().name("Expenses").data(expenses))
}

/// A pie of per-category totals for one transaction kind.
pub(crate) fn category_pie_chart(title: &str, buckets: &[CategoryBucket]) -> Chart {
    let data: Vec<(f64, &str)> = buckets
        .iter()
        .map(|bucket| (bucket.amount, bucket.category.as_str()))
        .collect();

    Chart::new()
        .title(Title::new().text(title))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(currency_formatter()),
        )
        .legend(Legend::new().top("bottom"))
        .series(
            Pie::new()
                .name(title)
                .radius("65%")
                .emphasis(Emphasis::new().focus(EmphasisFocus::Series))
                .data(data),
        )
}

/// Income vs expense bars for the twelve months of a year.
pub(crate) fn annual_overview_chart(months: &[MonthBucket; 12]) -> Chart {
    let labels: Vec<String> = months.iter().map(|month| month.name.to_owned()).collect();
    let income: Vec<f64> = months.iter().map(|month| month.income).collect();
    let expenses: Vec<f64> = months.iter().map(|month| month.expenses).collect();

    Chart::new()
        .title(Title::new().text("Overview").subtext("This year"))
        .tooltip(currency_tooltip())
        .legend(Legend::new().top("5%"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(bar::Bar::new().name("Income").data(income))
        .series(bar::Bar::new().name("Expenses").data(expenses))
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}
