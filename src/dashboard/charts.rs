//! Chart generation and rendering for the dashboard.
//!
//! Charts are generated as JSON configuration for the ECharts library and
//! rendered next to an inline script that initialises them, so they also work
//! when the dashboard summary is swapped in by htmx.

use charming::{
    Chart,
    component::{Legend, Title},
    element::{JsFunction, Label, Tooltip, Trigger},
    series::Pie,
};
use maud::{Markup, PreEscaped, html};

use crate::aggregation::GroupTotals;

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Renders the container for `chart` and the script that draws into it.
///
/// Any chart already drawn into the container is disposed first.
pub(super) fn chart_view(chart: &DashboardChart) -> Markup {
    let script = format!(
        r#"(function() {{
            const chartDom = document.getElementById("{}");
            const existing = echarts.getInstanceByDom(chartDom);
            if (existing) {{
                existing.dispose();
            }}
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
    );

    html!(
        div
            id=(chart.id)
            class="min-h-[380px] rounded dark:bg-gray-100"
        {}

        script { (PreEscaped(script)) }
    )
}

/// A doughnut chart of expenses by category.
///
/// `categories` should already be sorted for display.
pub(super) fn expenses_chart(categories: &[(String, GroupTotals)]) -> Chart {
    let data: Vec<(f64, &str)> = categories
        .iter()
        .map(|(category, group)| (group.total, category.as_str()))
        .collect();

    Chart::new()
        .title(Title::new().text("Expenses by Category").left("center"))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(currency_formatter()),
        )
        .legend(Legend::new().bottom(0))
        .series(
            Pie::new()
                .name("Expenses")
                .radius(vec!["40%", "70%"])
                .label(Label::new().show(true).formatter("{b} {d}%"))
                .data(data),
        )
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
