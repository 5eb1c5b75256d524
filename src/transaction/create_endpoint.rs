//! Defines the endpoint for creating a new transaction.
use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::Alert,
    events::{TRANSACTIONS_CHANGED, trigger},
    html::format_currency,
    profile::ProfileId,
    transaction::{NewTransaction, core::create_transaction, form::TransactionForm},
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for creating a new transaction.
///
/// Responds with a success alert and fires the `transactions-changed` event so
/// the list and summaries reload.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Extension(profile_id): Extension<ProfileId>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let new_transaction = match NewTransaction::try_from(form) {
        Ok(new_transaction) => new_transaction,
        Err(error) => return error.into_alert_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let transaction = match create_transaction(new_transaction, profile_id, &connection) {
        Ok(transaction) => transaction,
        Err(error) => {
            tracing::error!("could not create transaction: {error}");
            return error.into_alert_response();
        }
    };

    tracing::debug!("Created transaction {}", transaction.id);

    let details = format!(
        "{} of {} in {} on {}.",
        transaction.kind.label(),
        format_currency(transaction.amount),
        transaction.category,
        transaction.date
    );

    (
        trigger(TRANSACTIONS_CHANGED),
        Alert::success("Transaction added", &details),
    )
        .into_response()
}
