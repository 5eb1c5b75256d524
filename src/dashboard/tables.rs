//! The expenses by category table shown under the dashboard chart.

use maud::{Markup, html};

use crate::{
    aggregation::GroupTotals,
    html::{
        CATEGORY_BADGE_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        format_currency,
    },
};

/// The share of `total_expenses` that `amount` makes up, as a percentage.
fn share_of(amount: f64, total_expenses: f64) -> f64 {
    if total_expenses > 0.0 {
        amount / total_expenses * 100.0
    } else {
        0.0
    }
}

/// Renders a table with the total, number of transactions and share of
/// expenses for each category in `categories`.
pub(super) fn category_table(categories: &[(String, GroupTotals)], total_expenses: f64) -> Markup {
    html! {
        div class="overflow-x-auto rounded-lg shadow"
        {
            table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class="px-6 py-3 text-right" { "Total" }
                        th scope="col" class="px-6 py-3 text-right" { "Transactions" }
                        th scope="col" class="px-6 py-3 text-right" { "Share" }
                    }
                }

                tbody
                {
                    @for (category, group) in categories {
                        tr class=(TABLE_ROW_STYLE) data-category-row="true"
                        {
                            th scope="row" class=(TABLE_CELL_STYLE)
                            {
                                span class=(CATEGORY_BADGE_STYLE) { (category) }
                            }
                            td class="px-6 py-4 text-right" { (format_currency(group.total)) }
                            td class="px-6 py-4 text-right" { (group.count) }
                            td class="px-6 py-4 text-right"
                            {
                                (format!("{:.1}%", share_of(group.total, total_expenses)))
                            }
                        }
                    }
                }
            }
        }
    }
}
