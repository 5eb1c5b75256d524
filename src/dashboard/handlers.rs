//! Dashboard HTTP handlers and view rendering.
//!
//! This module contains:
//! - Route handlers for the dashboard page and its summary partial
//! - HTML view functions for rendering the dashboard UI

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
    aggregation::{expenses_by_category, sorted_by_total, totals},
    dashboard::{
        cards::summary_cards_view,
        charts::{DashboardChart, chart_view, expenses_chart},
        tables::category_table,
    },
    endpoints,
    events::{TRANSACTIONS_CHANGED, reload_on},
    html::{HeadElement, base, link},
    navigation::NavBar,
    profile::ProfileId,
    transaction::{Transaction, get_transactions},
};

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Display a page with an overview of the profile's transactions.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Extension(profile_id): Extension<ProfileId>,
) -> Result<Response, Error> {
    let transactions = load_transactions(&state, profile_id)?;

    Ok(dashboard_view(&transactions).into_response())
}

/// Renders just the dashboard summary, used to refresh it after transactions change.
pub async fn get_dashboard_summary(
    State(state): State<DashboardState>,
    Extension(profile_id): Extension<ProfileId>,
) -> Result<Response, Error> {
    let transactions = load_transactions(&state, profile_id)?;

    Ok(dashboard_summary_view(&transactions).into_response())
}

fn load_transactions(
    state: &DashboardState,
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

/// Shown in place of the summary when the profile has no transactions.
fn no_data_view() -> Markup {
    let transactions_link = link(endpoints::TRANSACTIONS_VIEW, "add a transaction");

    html!(
        div class="flex flex-col items-center gap-2 py-8 text-center"
        {
            h2 class="text-xl font-bold" { "Nothing here yet..." }

            p
            {
                "Your summary and charts will show up here once you "
                (transactions_link) "."
            }
        }
    )
}

/// The cards, chart and table, reloads itself when transactions change.
fn dashboard_summary_view(transactions: &[Transaction]) -> Markup {
    let content = if transactions.is_empty() {
        no_data_view()
    } else {
        let totals = totals(transactions);
        let categories = sorted_by_total(expenses_by_category(transactions));
        let chart = DashboardChart {
            id: "expenses-chart",
            options: expenses_chart(&categories).to_string(),
        };

        html!(
            (summary_cards_view(&totals))

            section class="w-full space-y-4"
            {
                h2 class="text-xl font-semibold" { "Expenses by Category" }

                @if categories.is_empty() {
                    p class="py-8 text-center text-gray-500 dark:text-gray-400"
                    {
                        "No expense data available. Add some expenses to see the breakdown!"
                    }
                } @else {
                    div class="grid grid-cols-1 gap-4 xl:grid-cols-2"
                    {
                        div { (chart_view(&chart)) }
                        (category_table(&categories, totals.expenses))
                    }
                }
            }
        )
    };

    html!(
        div
            id="dashboard-summary"
            hx-get=(endpoints::DASHBOARD_SUMMARY)
            hx-trigger=(reload_on(TRANSACTIONS_CHANGED))
            hx-swap="outerHTML"
            class="flex w-full flex-col items-center gap-8"
        {
            (content)
        }
    )
}

fn dashboard_view(transactions: &[Transaction]) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();

    let content = html!(
        (nav_bar)

        div
            id="dashboard-content"
            class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            (dashboard_summary_view(transactions))
        }
    );

    let scripts = [HeadElement::ScriptLink(
        "/static/echarts.6.0.0.min.js".to_owned(),
    )];

    base("Dashboard", &scripts, &content)
}
