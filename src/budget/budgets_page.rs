//! Defines the route handlers for the budgets page and its list partial.
use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use time::{Date, Month};

use crate::{
    AppState, Error,
    budget::core::{BudgetStatus, BudgetWithUsage, get_budgets_with_usage},
    category::EXPENSE_CATEGORIES,
    endpoints::{self, format_endpoint},
    events::{BUDGETS_CHANGED, TRANSACTIONS_CHANGED, reload_on},
    html::{
        BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        PAGE_CONTAINER_STYLE, base, dollar_input_styles, format_currency, loading_spinner,
    },
    navigation::NavBar,
    profile::ProfileId,
    timezone::local_today,
};

/// The state needed for the budgets page and list.
#[derive(Debug, Clone)]
pub struct BudgetsPageState {
    /// The database connection for reading budgets and transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for BudgetsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Renders the budget form above the profile's budgets.
pub async fn get_budgets_page(
    State(state): State<BudgetsPageState>,
    Extension(profile_id): Extension<ProfileId>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;
    let budgets = load_budgets(&state, profile_id)?;

    Ok(budgets_view(today, &budgets).into_response())
}

/// Renders just the budget list, used to refresh it after changes.
pub async fn get_budget_list(
    State(state): State<BudgetsPageState>,
    Extension(profile_id): Extension<ProfileId>,
) -> Result<Response, Error> {
    let budgets = load_budgets(&state, profile_id)?;

    Ok(budget_list_view(&budgets).into_response())
}

fn load_budgets(
    state: &BudgetsPageState,
    profile_id: ProfileId,
) -> Result<Vec<BudgetWithUsage>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_budgets_with_usage(profile_id, &connection)
        .inspect_err(|error| tracing::error!("could not get budgets: {error}"))
}

fn budget_form(today: Date) -> Markup {
    let spinner = loading_spinner();
    let current_month = today.month();

    html!(
        form
            hx-post=(endpoints::BUDGETS_API)
            hx-target="#alert-container"
            hx-target-error="#alert-container"
            data-reset-on-success
            class="space-y-4"
        {
            div
            {
                label for="category" class=(FORM_LABEL_STYLE) { "Category" }

                select name="category" id="category" required class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for category in EXPENSE_CATEGORIES {
                        option value=(category) { (category) }
                    }
                }
            }

            div
            {
                label for="monthly_limit" class=(FORM_LABEL_STYLE) { "Monthly Limit" }

                div class="input-wrapper w-full"
                {
                    input
                        name="monthly_limit"
                        id="monthly_limit"
                        type="number"
                        step="0.01"
                        min="0.01"
                        placeholder="500.00"
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }
            }

            div class="grid grid-cols-2 gap-4"
            {
                div
                {
                    label for="month" class=(FORM_LABEL_STYLE) { "Month" }

                    select name="month" id="month" required class=(FORM_TEXT_INPUT_STYLE)
                    {
                        @for number in 1..=12u8 {
                            @if let Ok(month) = Month::try_from(number) {
                                option value=(number) selected[month == current_month] { (month) }
                            }
                        }
                    }
                }

                div
                {
                    label for="year" class=(FORM_LABEL_STYLE) { "Year" }

                    input
                        name="year"
                        id="year"
                        type="number"
                        min="2000"
                        max="9999"
                        value=(today.year())
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }
            }

            button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                span id="indicator" class="inline htmx-indicator" { (spinner) }
                " Create Budget"
            }
        }
    )
}

fn status_style(status: BudgetStatus) -> (&'static str, &'static str) {
    match status {
        BudgetStatus::Good => (
            "inline-flex px-2.5 py-0.5 text-xs font-semibold rounded-full \
            text-green-800 bg-green-100 dark:bg-green-900 dark:text-green-300",
            "h-2 rounded-full bg-green-500",
        ),
        BudgetStatus::Warning => (
            "inline-flex px-2.5 py-0.5 text-xs font-semibold rounded-full \
            text-yellow-800 bg-yellow-100 dark:bg-yellow-900 dark:text-yellow-300",
            "h-2 rounded-full bg-yellow-400",
        ),
        BudgetStatus::Exceeded => (
            "inline-flex px-2.5 py-0.5 text-xs font-semibold rounded-full \
            text-red-800 bg-red-100 dark:bg-red-900 dark:text-red-300",
            "h-2 rounded-full bg-red-600",
        ),
    }
}

fn budget_card(budget: &BudgetWithUsage) -> Markup {
    let status = budget.status();
    let (badge_style, bar_style) = status_style(status);
    let delete_url = format_endpoint(endpoints::BUDGET, budget.budget.id);

    html!(
        li
            class="p-4 rounded-lg bg-white shadow dark:bg-gray-800"
            data-budget="true"
            data-status=(status.label())
        {
            div class="flex items-center justify-between mb-2"
            {
                div class="flex items-center gap-2"
                {
                    h3 class="font-medium" { (budget.budget.category) }
                    span class=(badge_style) { (status.label()) }
                }

                div class="flex items-center gap-2 text-sm text-gray-600 dark:text-gray-400"
                {
                    span { (budget.budget.month_name()) " " (budget.budget.year) }

                    button
                        hx-delete=(delete_url)
                        hx-confirm="Are you sure you want to delete this budget?"
                        hx-target="closest li"
                        hx-target-error="#alert-container"
                        hx-swap="delete"
                        class=(BUTTON_DELETE_STYLE)
                    {
                        "Delete"
                    }
                }
            }

            div class="flex justify-between text-sm mb-1"
            {
                span { "Spent: " (format_currency(budget.usage)) }
                span { "Limit: " (format_currency(budget.budget.monthly_limit)) }
            }

            div class="w-full h-2 rounded-full bg-gray-200 dark:bg-gray-700"
            {
                div class=(bar_style) style=(format!("width: {:.1}%", budget.bar_width())) {}
            }

            div class="flex justify-between mt-1 text-xs text-gray-500 dark:text-gray-400"
            {
                span { (format!("{:.1}", budget.bar_width())) "% of budget used" }
                span { "Remaining: " (format_currency(budget.remaining())) }
            }

            @if let Some(suggestion) = budget.suggestion() {
                p class="mt-2 p-2 rounded text-sm bg-blue-50 text-blue-800 dark:bg-gray-700 dark:text-blue-300"
                    data-suggestion="true"
                {
                    strong { "Suggestion: " }
                    (suggestion)
                }
            }
        }
    )
}

/// The list of budgets, reloads itself when budgets or transactions change.
fn budget_list_view(budgets: &[BudgetWithUsage]) -> Markup {
    let triggers = format!(
        "{}, {}",
        reload_on(BUDGETS_CHANGED),
        reload_on(TRANSACTIONS_CHANGED)
    );

    html!(
        div
            id="budget-list"
            hx-get=(endpoints::BUDGETS_LIST)
            hx-trigger=(triggers)
            hx-swap="outerHTML"
            class="w-full"
        {
            @if budgets.is_empty() {
                p class="py-8 text-center text-gray-500 dark:text-gray-400"
                {
                    "No budgets set. Create your first budget to track spending!"
                }
            } @else {
                ul class="space-y-4"
                {
                    @for budget in budgets {
                        (budget_card(budget))
                    }
                }
            }
        }
    )
}

fn budgets_view(today: Date, budgets: &[BudgetWithUsage]) -> Markup {
    let nav_bar = NavBar::new(endpoints::BUDGETS_VIEW).into_html();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="grid w-full gap-8 lg:grid-cols-[24rem_1fr] lg:max-w-6xl"
            {
                section class="space-y-4"
                {
                    h1 class="text-xl font-bold" { "Add Budget" }
                    (budget_form(today))
                }

                section class="space-y-4 min-w-0"
                {
                    h2 class="text-xl font-bold" { "Budgets" }
                    (budget_list_view(budgets))
                }
            }
        }
    );

    base("Budgets", &[dollar_input_styles()], &content)
}
