//! The onboarding page and the endpoint that creates a profile from it.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::{Form, PrivateCookieJar};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        base, loading_spinner,
    },
    profile::{
        NewProfile,
        cookie::set_profile_cookie,
        core::{
            Choice, INCOME_RANGES, INVESTMENT_EXPERIENCE, MONTHLY_EXPENSE_RANGES,
            RISK_TOLERANCES, SAVINGS_RANGES, create_profile,
        },
    },
};

/// The state needed to create a profile.
#[derive(Debug, Clone)]
pub struct OnboardingState {
    /// The database connection for storing profiles.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for OnboardingState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

fn select_input(name: &str, label: &str, choices: &[Choice]) -> Markup {
    html! {
        div
        {
            label for=(name) class=(FORM_LABEL_STYLE) { (label) }

            select
                name=(name)
                id=(name)
                required
                class=(FORM_TEXT_INPUT_STYLE)
            {
                option value="" disabled selected { "Select an option" }

                @for (value, text) in choices {
                    option value=(value) { (text) }
                }
            }
        }
    }
}

fn step_legend(step: u8, title: &str) -> Markup {
    html! {
        legend class="text-lg font-semibold mb-2"
        {
            span class="text-sm font-normal text-gray-500 dark:text-gray-400 block"
            {
                "Step " (step) " of 4"
            }
            (title)
        }
    }
}

fn onboarding_view() -> Markup {
    let spinner = loading_spinner();

    let content = html! {
        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-2xl font-bold mt-4" { "Welcome to Finboard" }
            p class="mb-6 text-center text-gray-600 dark:text-gray-300"
            {
                "Tell us a little about yourself so we can tailor your dashboard."
            }

            form
                hx-post=(endpoints::ONBOARDING_API)
                hx-target-error="#alert-container"
                class="w-full space-y-8"
            {
                fieldset class="space-y-4"
                {
                    (step_legend(1, "Personal information"))

                    div
                    {
                        label for="name" class=(FORM_LABEL_STYLE) { "Full Name" }
                        input
                            name="name"
                            id="name"
                            type="text"
                            placeholder="Your name"
                            required
                            autofocus
                            class=(FORM_TEXT_INPUT_STYLE);
                    }

                    div
                    {
                        label for="age" class=(FORM_LABEL_STYLE) { "Age" }
                        input
                            name="age"
                            id="age"
                            type="number"
                            min="16"
                            max="120"
                            placeholder="Your age"
                            class=(FORM_TEXT_INPUT_STYLE);
                    }

                    (select_input("income_range", "Annual Income", &INCOME_RANGES))
                }

                fieldset class="space-y-4"
                {
                    (step_legend(2, "Financial situation"))
                    (select_input("current_savings", "Current Savings", &SAVINGS_RANGES))
                    (select_input("monthly_expenses", "Monthly Expenses", &MONTHLY_EXPENSE_RANGES))
                }

                fieldset class="space-y-4"
                {
                    (step_legend(3, "Goals and risk"))

                    div
                    {
                        label for="financial_goals" class=(FORM_LABEL_STYLE) { "Financial Goals" }
                        textarea
                            name="financial_goals"
                            id="financial_goals"
                            rows="3"
                            placeholder="e.g. Buy a house, build an emergency fund"
                            class=(FORM_TEXT_INPUT_STYLE)
                        {}
                    }

                    (select_input("risk_tolerance", "Risk Tolerance", &RISK_TOLERANCES))
                }

                fieldset class="space-y-4"
                {
                    (step_legend(4, "Investment experience"))
                    (select_input("investment_experience", "Investment Experience", &INVESTMENT_EXPERIENCE))
                }

                button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                {
                    span id="indicator" class="inline htmx-indicator" { (spinner) }
                    " Get Started"
                }
            }
        }
    };

    base("Welcome", &[], &content)
}

/// Renders the onboarding form.
pub async fn get_onboarding_page() -> Response {
    onboarding_view().into_response()
}

/// A route handler for creating a profile, sets the profile cookie and
/// redirects to the dashboard on success.
pub async fn create_profile_endpoint(
    State(state): State<OnboardingState>,
    jar: PrivateCookieJar,
    Form(form): Form<NewProfile>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let profile = match create_profile(form, &connection) {
        Ok(profile) => profile,
        Err(error) => {
            tracing::error!("could not create profile: {error}");
            return error.into_alert_response();
        }
    };

    tracing::info!("Created profile {}", profile.id);

    (
        set_profile_cookie(jar, profile.id),
        HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}
