//! The page for managing recurring transactions: next month's forecast, the
//! transactions that repeat, and recent one-off transactions that can be made
//! to repeat.
use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    endpoints::{self, format_endpoint},
    events::{TRANSACTIONS_CHANGED, reload_on},
    html::{
        BUTTON_DELETE_STYLE, CARD_STYLE, CARD_TITLE_STYLE, CATEGORY_BADGE_STYLE,
        FORM_TEXT_INPUT_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, format_currency, link,
    },
    navigation::NavBar,
    profile::ProfileId,
    recurrence::Frequency,
    timezone::local_today,
    transaction::{
        Transaction,
        core::{get_recurring_candidates, get_recurring_transactions},
        forecast::{Forecast, next_month_forecast},
    },
};

/// How many one-off transactions to offer for marking as recurring.
const CANDIDATE_LIMIT: u32 = 10;

/// The state needed for the recurring transactions page.
#[derive(Debug, Clone)]
pub struct RecurringPageState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for RecurringPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Renders the recurring transactions page.
pub async fn get_recurring_page(
    State(state): State<RecurringPageState>,
    Extension(profile_id): Extension<ProfileId>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let forecast = next_month_forecast(profile_id, today, &connection)
        .inspect_err(|error| tracing::error!("could not compute forecast: {error}"))?;
    let recurring = get_recurring_transactions(profile_id, &connection)
        .inspect_err(|error| tracing::error!("could not get recurring transactions: {error}"))?;
    let candidates = get_recurring_candidates(profile_id, CANDIDATE_LIMIT, &connection)
        .inspect_err(|error| tracing::error!("could not get recurring candidates: {error}"))?;

    Ok(recurring_view(&forecast, &recurring, &candidates).into_response())
}

fn forecast_card(forecast: &Forecast) -> Markup {
    html!(
        div class=(CARD_STYLE) data-forecast="true"
        {
            span class=(CARD_TITLE_STYLE) { "Recurring expenses for " (forecast.month) " " (forecast.year) }
            span class="text-2xl font-bold" { (format_currency(forecast.total)) }
            span class="text-sm text-gray-500 dark:text-gray-400"
            {
                (forecast.count())
                @if forecast.count() == 1 { " payment due" } @else { " payments due" }
            }

            @if !forecast.items.is_empty() {
                ul class="mt-3 space-y-1 text-sm"
                {
                    @for item in &forecast.items {
                        li class="flex justify-between gap-4" data-forecast-item="true"
                        {
                            span
                            {
                                time datetime=(item.due) { (item.due) }
                                " " (item.category)
                            }
                            span { (format_currency(item.amount)) }
                        }
                    }
                }
            }
        }
    )
}

fn recurring_table(recurring: &[Transaction]) -> Markup {
    html!(
        table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
        {
            thead class=(TABLE_HEADER_STYLE)
            {
                tr
                {
                    th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                    th scope="col" class="px-6 py-3 text-right" { "Amount" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Repeats" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Next due" }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                }
            }

            tbody
            {
                @for transaction in recurring {
                    tr class=(TABLE_ROW_STYLE) data-recurring-row="true"
                    {
                        td class=(TABLE_CELL_STYLE)
                        {
                            span class=(CATEGORY_BADGE_STYLE) { (transaction.category) }
                        }
                        td class="px-6 py-4 text-right" { (format_currency(transaction.amount)) }
                        td class=(TABLE_CELL_STYLE)
                        {
                            (transaction.recurring_frequency.map(|frequency| frequency.label()).unwrap_or_default())
                        }
                        td class=(TABLE_CELL_STYLE)
                        {
                            @if let Some(next) = transaction.next_occurrence {
                                time datetime=(next) { (next) }
                            }
                        }
                        td class=(TABLE_CELL_STYLE)
                        {
                            button
                                hx-delete=(format_endpoint(endpoints::TRANSACTION_RECURRING, transaction.id))
                                hx-target="#alert-container"
                                hx-target-error="#alert-container"
                                class=(BUTTON_DELETE_STYLE)
                            {
                                "Stop repeating"
                            }
                        }
                    }
                }

                @if recurring.is_empty() {
                    tr
                    {
                        td colspan="5" class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                        {
                            "Nothing repeats yet. Mark a transaction below as recurring."
                        }
                    }
                }
            }
        }
    )
}

fn candidate_list(candidates: &[Transaction]) -> Markup {
    html!(
        ul class="space-y-2"
        {
            @for transaction in candidates {
                li
                    class="flex flex-wrap items-center justify-between gap-3 rounded border
                        border-gray-200 bg-white px-4 py-3 dark:border-gray-700 dark:bg-gray-800"
                    data-candidate="true"
                {
                    div class="text-sm"
                    {
                        span class="font-semibold" { (transaction.category) }
                        " " (format_currency(transaction.amount))
                        span class="block text-xs text-gray-500 dark:text-gray-400"
                        {
                            time datetime=(transaction.date) { (transaction.date) }
                        }
                    }

                    form
                        hx-post=(format_endpoint(endpoints::TRANSACTION_RECURRING, transaction.id))
                        hx-target="#alert-container"
                        hx-target-error="#alert-container"
                        class="flex items-center gap-2"
                    {
                        select
                            name="frequency"
                            aria-label="Frequency"
                            class=(FORM_TEXT_INPUT_STYLE)
                        {
                            @for frequency in Frequency::ALL {
                                option
                                    value=(frequency.as_str())
                                    selected[frequency == Frequency::Monthly]
                                {
                                    (frequency.label())
                                }
                            }
                        }

                        button type="submit" class=(LINK_STYLE) { "Make recurring" }
                    }
                }
            }
        }
    )
}

fn recurring_view(
    forecast: &Forecast,
    recurring: &[Transaction],
    candidates: &[Transaction],
) -> Markup {
    let nav_bar = NavBar::new(endpoints::RECURRING_VIEW).into_html();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            div
                id="recurring-content"
                hx-get=(endpoints::RECURRING_VIEW)
                hx-select="#recurring-content"
                hx-target="this"
                hx-swap="outerHTML"
                hx-trigger=(reload_on(TRANSACTIONS_CHANGED))
                class="w-full space-y-8 lg:max-w-5xl"
            {
                h1 class="text-xl font-bold" { "Recurring Transactions" }

                (forecast_card(forecast))

                section class="space-y-4 overflow-x-auto"
                {
                    h2 class="text-lg font-semibold" { "Repeating" }
                    (recurring_table(recurring))
                }

                section class="space-y-4"
                {
                    h2 class="text-lg font-semibold" { "Recent one-off transactions" }

                    @if candidates.is_empty() {
                        p class="text-sm text-gray-500 dark:text-gray-400"
                        {
                            "No one-off transactions to choose from. "
                            (link(endpoints::TRANSACTIONS_VIEW, "Add a transaction"))
                            "."
                        }
                    } @else {
                        (candidate_list(candidates))
                    }
                }
            }
        }
    );

    base("Recurring", &[], &content)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, extract::State};
    use rusqlite::Connection;
    use scraper::{Html, Selector};
    use time::{Month, OffsetDateTime, macros::date};

    use crate::{
        category::TransactionKind,
        db::initialize,
        endpoints::{self, format_endpoint},
        profile::{ProfileId, create_profile, test_profile},
        recurrence::Frequency,
        test_utils::{assert_status_ok, assert_valid_html, parse_html_document},
        transaction::{Forecast, ForecastItem, NewTransaction, create_transaction},
    };

    use super::{RecurringPageState, forecast_card, get_recurring_page};

    fn get_state() -> (RecurringPageState, ProfileId) {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let profile_id = create_profile(test_profile(), &conn).unwrap().id;

        let state = RecurringPageState {
            db_connection: Arc::new(Mutex::new(conn)),
            local_timezone: "Etc/UTC".to_owned(),
        };

        (state, profile_id)
    }

    #[tokio::test]
    async fn page_lists_recurring_and_candidates() {
        let (state, profile_id) = get_state();
        {
            let connection = state.db_connection.lock().unwrap();
            create_transaction(
                NewTransaction::new(
                    TransactionKind::Expense,
                    1800.0,
                    "Bills & Utilities",
                    date!(2024 - 03 - 01),
                )
                .recurring(Frequency::Monthly),
                profile_id,
                &connection,
            )
            .unwrap();
            let candidate = create_transaction(
                NewTransaction::new(
                    TransactionKind::Expense,
                    285.0,
                    "Entertainment",
                    date!(2024 - 03 - 08),
                ),
                profile_id,
                &connection,
            )
            .unwrap();
            assert_eq!(candidate.id, 2);
        }

        let response = get_recurring_page(State(state), Extension(profile_id))
            .await
            .unwrap();

        assert_status_ok(&response);
        let document = parse_html_document(response).await;
        assert_valid_html(&document);

        let rows: Vec<_> = document
            .select(&Selector::parse("tr[data-recurring-row]").unwrap())
            .collect();
        assert_eq!(rows.len(), 1);
        let row_text: String = rows[0].text().collect();
        assert!(row_text.contains("Bills & Utilities"));
        assert!(row_text.contains("2024-04-01"));

        let candidate_form = document
            .select(&Selector::parse("li[data-candidate] form").unwrap())
            .next()
            .expect("no candidate form");
        assert_eq!(
            candidate_form.value().attr("hx-post"),
            Some(format_endpoint(endpoints::TRANSACTION_RECURRING, 2).as_str())
        );
    }

    #[tokio::test]
    async fn page_shows_forecast_for_next_month() {
        let (state, profile_id) = get_state();
        let today = OffsetDateTime::now_utc().date();

        let response = get_recurring_page(State(state), Extension(profile_id))
            .await
            .unwrap();

        let document = parse_html_document(response).await;
        let card = document
            .select(&Selector::parse("[data-forecast]").unwrap())
            .next()
            .expect("no forecast card");
        let text: String = card.text().collect();
        assert!(text.contains("$0.00"));
        assert!(text.contains("0 payments due"));
        let next_month = today.month().next();
        assert!(
            text.contains(&next_month.to_string()),
            "want forecast for {next_month}, got {text}"
        );
    }

    #[test]
    fn forecast_card_lists_each_payment() {
        let forecast = Forecast {
            total: 1850.0,
            items: vec![
                ForecastItem {
                    category: "Bills & Utilities".to_owned(),
                    amount: 1800.0,
                    due: date!(2024 - 04 - 01),
                },
                ForecastItem {
                    category: "Food & Dining".to_owned(),
                    amount: 50.0,
                    due: date!(2024 - 04 - 03),
                },
            ],
            month: Month::April,
            year: 2024,
        };

        let html = Html::parse_fragment(&forecast_card(&forecast).into_string());

        let card_text: String = html.root_element().text().collect();
        assert!(card_text.contains("$1,850.00"));
        assert!(card_text.contains("2 payments due"));
        let items: Vec<String> = html
            .select(&Selector::parse("li[data-forecast-item]").unwrap())
            .map(|item| item.text().collect())
            .collect();
        assert_eq!(items.len(), 2);
        assert!(items[0].contains("2024-04-01"));
        assert!(items[0].contains("Bills & Utilities"));
        assert!(items[0].contains("$1,800.00"));
        assert!(items[1].contains("Food & Dining"));
        assert!(items[1].contains("$50.00"));
    }
}
