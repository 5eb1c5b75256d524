//! The income, expenses and net summary cards shown at the top of the dashboard.

use maud::{Markup, html};

use crate::{
    aggregation::Totals,
    html::{CARD_STYLE, CARD_TITLE_STYLE, format_currency},
};

const GREEN_AMOUNT_STYLE: &str = "text-2xl font-bold text-green-600 dark:text-green-400";
const RED_AMOUNT_STYLE: &str = "text-2xl font-bold text-red-600 dark:text-red-400";

/// Renders a card for total income, total expenses and net income.
///
/// The net card is labelled "Positive" when income covers expenses and
/// "Negative" otherwise.
pub(super) fn summary_cards_view(totals: &Totals) -> Markup {
    let is_positive = totals.net >= 0.0;
    let (net_style, net_label, net_badge_style) = if is_positive {
        (
            GREEN_AMOUNT_STYLE,
            "Positive",
            "px-2.5 py-0.5 text-xs font-semibold rounded-full \
            text-green-800 bg-green-100 dark:bg-green-900 dark:text-green-300",
        )
    } else {
        (
            RED_AMOUNT_STYLE,
            "Negative",
            "px-2.5 py-0.5 text-xs font-semibold rounded-full \
            text-red-800 bg-red-100 dark:bg-red-900 dark:text-red-300",
        )
    };

    html! {
        section class="grid w-full grid-cols-1 gap-4 md:grid-cols-3"
        {
            div class=(CARD_STYLE) data-card="income"
            {
                span class=(CARD_TITLE_STYLE) { "Total Income" }
                span class=(GREEN_AMOUNT_STYLE) { (format_currency(totals.income)) }
            }

            div class=(CARD_STYLE) data-card="expenses"
            {
                span class=(CARD_TITLE_STYLE) { "Total Expenses" }
                span class=(RED_AMOUNT_STYLE) { (format_currency(totals.expenses)) }
            }

            div class=(CARD_STYLE) data-card="net"
            {
                div class="flex items-center justify-between"
                {
                    span class=(CARD_TITLE_STYLE) { "Net Income" }
                    span class=(net_badge_style) data-net-label { (net_label) }
                }
                span class=(net_style) { (format_currency(totals.net)) }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use crate::{aggregation::Totals, html::format_currency};

    use super::summary_cards_view;

    fn card_text(html: &Html, card: &str) -> String {
        html.select(&Selector::parse(&format!("[data-card={card}]")).unwrap())
            .next()
            .unwrap_or_else(|| panic!("no {card} card"))
            .text()
            .collect()
    }

    fn net_label(html: &Html) -> String {
        html.select(&Selector::parse("[data-net-label]").unwrap())
            .next()
            .expect("no net label")
            .text()
            .collect()
    }

    #[test]
    fn shows_totals_with_positive_label() {
        let totals = Totals {
            income: 4800.0,
            expenses: 3555.0,
            net: 1245.0,
        };

        let html = Html::parse_fragment(&summary_cards_view(&totals).into_string());

        assert!(card_text(&html, "income").contains(&format_currency(4800.0)));
        assert!(card_text(&html, "expenses").contains(&format_currency(3555.0)));
        assert!(card_text(&html, "net").contains(&format_currency(1245.0)));
        assert_eq!(net_label(&html), "Positive");
    }

    #[test]
    fn negative_net_is_labelled() {
        let totals = Totals {
            income: 100.0,
            expenses: 250.0,
            net: -150.0,
        };

        let html = Html::parse_fragment(&summary_cards_view(&totals).into_string());

        assert_eq!(net_label(&html), "Negative");
    }

    #[test]
    fn zero_net_counts_as_positive() {
        let html = Html::parse_fragment(&summary_cards_view(&Totals::default()).into_string());

        assert_eq!(net_label(&html), "Positive");
    }
}
