//! A standalone, printable HTML financial report.

use maud::{DOCTYPE, Markup, PreEscaped, html};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    aggregation::{aggregate, sorted_groups, totals},
    export::ExportContent,
    html::format_currency,
    transaction::Transaction,
};

const LONG_DATE: &[BorrowedFormatItem<'static>] =
    format_description!("[month repr:long] [day], [year]");
const SHORT_DATE: &[BorrowedFormatItem<'static>] =
    format_description!("[month repr:short] [day], [year]");

const REPORT_STYLE: &str = r#"
    body { font-family: Arial, sans-serif; margin: 20px; }
    h1 { color: #333; border-bottom: 2px solid #333; padding-bottom: 10px; }
    table { width: 100%; border-collapse: collapse; margin-top: 20px; }
    th, td { border: 1px solid #ddd; padding: 8px; text-align: left; }
    th { background-color: #f2f2f2; }
    .income { color: #22c55e; }
    .expense { color: #ef4444; }
    .summary { background-color: #f8f9fa; padding: 15px; margin: 20px 0; border-radius: 5px; }
"#;

const PRINT_SCRIPT: &str =
    "window.addEventListener('load', () => setTimeout(() => window.print(), 500));";

fn format_date(date: Date, format: &[BorrowedFormatItem<'_>]) -> String {
    date.format(format).unwrap_or_else(|error| {
        tracing::warn!("could not format date {date}: {error}");
        date.to_string()
    })
}

fn transaction_details(transactions: &[Transaction]) -> Markup {
    html!(
        h2 { "Transaction Details" }

        table
        {
            thead
            {
                tr
                {
                    th { "Date" }
                    th { "Type" }
                    th { "Category" }
                    th { "Amount" }
                    th { "Note" }
                    th { "Recurring" }
                }
            }

            tbody
            {
                @for transaction in transactions {
                    tr data-report-row="true"
                    {
                        td { (format_date(transaction.date, SHORT_DATE)) }
                        td class=(transaction.kind.as_str()) { (transaction.kind.as_str()) }
                        td { (transaction.category) }
                        td class=(transaction.kind.as_str()) { (format_currency(transaction.amount)) }
                        td { (transaction.note.as_deref().unwrap_or("-")) }
                        td { @if transaction.is_recurring { "Yes" } @else { "No" } }
                    }
                }
            }
        }
    )
}

fn category_summary(transactions: &[Transaction]) -> Markup {
    let groups = sorted_groups(aggregate(transactions));

    html!(
        h2 { "Summary by Category" }

        table
        {
            thead
            {
                tr
                {
                    th { "Type" }
                    th { "Category" }
                    th { "Total Amount" }
                    th { "Transaction Count" }
                }
            }

            tbody
            {
                @for ((kind, category), group) in &groups {
                    tr data-report-row="true"
                    {
                        td class=(kind.as_str()) { (kind.as_str()) }
                        td { (category) }
                        td class=(kind.as_str()) { (format_currency(group.total)) }
                        td { (group.count) }
                    }
                }
            }
        }
    )
}

/// Render the report for `transactions`, generated on `today`.
///
/// The page opens the browser's print dialog once it has loaded so the report
/// can be printed or saved as a PDF.
pub fn report_view(content: ExportContent, transactions: &[Transaction], today: Date) -> Markup {
    let totals = totals(transactions);

    html!(
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                title { "Financial Report" }
                style { (PreEscaped(REPORT_STYLE)) }
            }

            body
            {
                h1 { "Financial Report" }
                p { "Generated on " (format_date(today, LONG_DATE)) }

                div class="summary" data-totals="true"
                {
                    h3 { "Totals" }
                    p { strong { "Total Income: " } (format_currency(totals.income)) }
                    p { strong { "Total Expenses: " } (format_currency(totals.expenses)) }
                    p { strong { "Net Income: " } (format_currency(totals.net)) }
                }

                @match content {
                    ExportContent::Transactions => (transaction_details(transactions)),
                    ExportContent::Summary => (category_summary(transactions)),
                }

                script { (PreEscaped(PRINT_SCRIPT)) }
            }
        }
    )
}
