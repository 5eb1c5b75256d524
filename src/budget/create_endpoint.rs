//! Defines the endpoint for creating a new budget.
use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::Alert,
    budget::core::{NewBudget, create_budget},
    events::{BUDGETS_CHANGED, trigger},
    html::format_currency,
    profile::ProfileId,
};

/// The state needed to create a budget.
#[derive(Debug, Clone)]
pub struct CreateBudgetState {
    /// The database connection for managing budgets.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateBudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for creating a new budget.
pub async fn create_budget_endpoint(
    State(state): State<CreateBudgetState>,
    Extension(profile_id): Extension<ProfileId>,
    Form(new_budget): Form<NewBudget>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let budget = match create_budget(new_budget, profile_id, &connection) {
        Ok(budget) => budget,
        Err(error) => {
            tracing::warn!("could not create budget: {error}");
            return error.into_alert_response();
        }
    };

    tracing::debug!("Created budget {}", budget.id);

    let details = format!(
        "{} for {} in {} {}.",
        format_currency(budget.monthly_limit),
        budget.category,
        budget.month_name(),
        budget.year
    );

    (
        trigger(BUDGETS_CHANGED),
        Alert::success("Budget created successfully.", &details),
    )
        .into_response()
}
