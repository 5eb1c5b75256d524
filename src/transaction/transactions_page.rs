//! Defines the route handlers for the page that records transactions and lists them as a table.
use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use time::Date;

use crate::{
    AppState, Error,
    category::TransactionKind,
    endpoints::{self, format_endpoint},
    events::{TRANSACTIONS_CHANGED, reload_on},
    html::{
        BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, CATEGORY_BADGE_STYLE, PAGE_CONTAINER_STYLE,
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, dollar_input_styles,
        format_currency, loading_spinner,
    },
    navigation::NavBar,
    profile::ProfileId,
    timezone::local_today,
    transaction::{Transaction, core::get_transactions, form::transaction_form_fields},
};

/// The state needed for the transactions page and list.
#[derive(Debug, Clone)]
pub struct TransactionsPageState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for TransactionsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Renders the transaction form above the list of the profile's transactions.
pub async fn get_transactions_page(
    State(state): State<TransactionsPageState>,
    Extension(profile_id): Extension<ProfileId>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;
    let transactions = load_transactions(&state, profile_id)?;

    Ok(transactions_view(today, &transactions).into_response())
}

/// Renders just the transaction list, used to refresh it after changes.
pub async fn get_transaction_list(
    State(state): State<TransactionsPageState>,
    Extension(profile_id): Extension<ProfileId>,
) -> Result<Response, Error> {
    let transactions = load_transactions(&state, profile_id)?;

    Ok(transaction_list_view(&transactions).into_response())
}

fn load_transactions(
    state: &TransactionsPageState,
    profile_id: ProfileId,
) -> Result<Vec<Transaction>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_transactions(profile_id, &connection)
        .inspect_err(|error| tracing::error!("could not get transactions: {error}"))
}

fn transactions_view(today: Date, transactions: &[Transaction]) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();
    let spinner = loading_spinner();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="grid w-full gap-8 lg:grid-cols-[24rem_1fr] lg:max-w-6xl"
            {
                section class="space-y-4"
                {
                    h1 class="text-xl font-bold" { "Add Transaction" }

                    form
                        hx-post=(endpoints::TRANSACTIONS_API)
                        hx-target="#alert-container"
                        hx-target-error="#alert-container"
                        data-reset-on-success
                        class="space-y-4"
                    {
                        (transaction_form_fields(today))

                        button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                        {
                            span id="indicator" class="inline htmx-indicator" { (spinner) }
                            " Add Transaction"
                        }
                    }
                }

                section class="space-y-4 min-w-0"
                {
                    h2 class="text-xl font-bold" { "Transactions" }

                    (transaction_list_view(transactions))
                }
            }
        }
    );

    base("Transactions", &[dollar_input_styles()], &content)
}

fn amount_style(kind: TransactionKind) -> &'static str {
    match kind {
        TransactionKind::Income => "px-6 py-4 text-right text-green-600 dark:text-green-400",
        TransactionKind::Expense => "px-6 py-4 text-right text-red-600 dark:text-red-400",
    }
}

fn signed_amount(transaction: &Transaction) -> String {
    match transaction.kind {
        TransactionKind::Income => format!("+{}", format_currency(transaction.amount)),
        TransactionKind::Expense => format!("-{}", format_currency(transaction.amount)),
    }
}

/// The table of transactions, reloads itself when transactions change.
pub(crate) fn transaction_list_view(transactions: &[Transaction]) -> Markup {
    let table_row = |transaction: &Transaction| {
        let delete_url = format_endpoint(endpoints::TRANSACTION, transaction.id);

        html!(
            tr class=(TABLE_ROW_STYLE) data-transaction-row="true"
            {
                td class=(TABLE_CELL_STYLE)
                {
                    time datetime=(transaction.date) { (transaction.date) }
                }

                td class=(TABLE_CELL_STYLE)
                {
                    span class=(CATEGORY_BADGE_STYLE) { (transaction.category) }

                    @if let Some(frequency) = transaction.recurring_frequency {
                        span class="ml-2 text-xs text-gray-500 dark:text-gray-400"
                        {
                            (frequency.label())
                        }
                    }
                }

                td class=(TABLE_CELL_STYLE)
                {
                    (transaction.note.as_deref().unwrap_or_default())
                }

                td class=(amount_style(transaction.kind))
                {
                    (signed_amount(transaction))
                }

                td class=(TABLE_CELL_STYLE)
                {
                    button
                        hx-delete=(delete_url)
                        hx-confirm="Are you sure you want to delete this transaction? This cannot be undone."
                        hx-target="closest tr"
                        hx-target-error="#alert-container"
                        hx-swap="delete"
                        class=(BUTTON_DELETE_STYLE)
                    {
                        "Delete"
                    }
                }
            }
        )
    };

    html!(
        div
            id="transaction-list"
            hx-get=(endpoints::TRANSACTIONS_LIST)
            hx-trigger=(reload_on(TRANSACTIONS_CHANGED))
            hx-swap="outerHTML"
            class="w-full overflow-x-auto dark:bg-gray-800"
        {
            table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Note" }
                        th scope="col" class="px-6 py-3 text-right" { "Amount" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                    }
                }

                tbody
                {
                    @for transaction in transactions {
                        (table_row(transaction))
                    }

                    @if transactions.is_empty() {
                        tr
                        {
                            td
                                colspan="5"
                                class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                            {
                                "No transactions yet. Add your first one with the form."
                            }
                        }
                    }
                }
            }
        }
    )
}
