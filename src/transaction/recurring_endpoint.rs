//! Endpoints that switch recurrence on or off for an existing transaction.
use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    alert::Alert,
    database_id::TransactionId,
    events::{TRANSACTIONS_CHANGED, trigger},
    profile::ProfileId,
    recurrence::Frequency,
    transaction::core::{mark_recurring, remove_recurring},
};

/// The state needed to change whether a transaction recurs.
#[derive(Debug, Clone)]
pub struct RecurringState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RecurringState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for marking a transaction as recurring.
#[derive(Debug, Deserialize)]
pub struct RecurringForm {
    /// The frequency tag, e.g. "monthly".
    pub frequency: String,
}

/// A route handler that makes a transaction repeat.
pub async fn mark_recurring_endpoint(
    State(state): State<RecurringState>,
    Extension(profile_id): Extension<ProfileId>,
    Path(transaction_id): Path<TransactionId>,
    Form(form): Form<RecurringForm>,
) -> Response {
    let frequency: Frequency = match form.frequency.parse() {
        Ok(frequency) => frequency,
        Err(error) => {
            tracing::warn!("Rejected recurrence for transaction {transaction_id}: {error}");
            return error.into_alert_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match mark_recurring(transaction_id, frequency, profile_id, &connection) {
        Ok(transaction) => {
            let details = match transaction.next_occurrence {
                Some(next) => format!("Repeats {}, next due on {next}.", frequency.as_str()),
                None => format!("Repeats {}.", frequency.as_str()),
            };

            (
                trigger(TRANSACTIONS_CHANGED),
                Alert::success("Marked as recurring", &details),
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("Could not mark transaction {transaction_id} as recurring: {error}");
            error.into_alert_response()
        }
    }
}

/// A route handler that stops a transaction from repeating.
pub async fn remove_recurring_endpoint(
    State(state): State<RecurringState>,
    Extension(profile_id): Extension<ProfileId>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match remove_recurring(transaction_id, profile_id, &connection) {
        Ok(()) => (
            trigger(TRANSACTIONS_CHANGED),
            Alert::success("Stopped repeating", "The transaction no longer recurs."),
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Could not remove recurrence from transaction {transaction_id}: {error}");
            error.into_alert_response()
        }
    }
}
