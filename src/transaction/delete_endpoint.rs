//! Defines the endpoint for deleting a transaction.
use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    database_id::TransactionId,
    events::{TRANSACTIONS_CHANGED, trigger},
    profile::ProfileId,
    transaction::core::delete_transaction,
};

/// The state needed to delete a transaction.
#[derive(Debug, Clone)]
pub struct DeleteTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting a transaction.
///
/// Responds with an empty body so htmx removes the table row, and fires the
/// `transactions-changed` event.
pub async fn delete_transaction_endpoint(
    State(state): State<DeleteTransactionState>,
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

    match delete_transaction(transaction_id, profile_id, &connection) {
        // The status code has to be 200 OK or HTMX will not delete the table row.
        Ok(()) => (trigger(TRANSACTIONS_CHANGED), "").into_response(),
        Err(error) => {
            tracing::error!("Could not delete transaction {transaction_id}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension,
        extract::{Path, State},
        http::StatusCode,
    };
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        category::TransactionKind,
        db::initialize,
        profile::{ProfileId, create_profile, test_profile},
        test_utils::{assert_status_ok, get_header},
        transaction::{NewTransaction, core::get_transaction, create_transaction},
    };

    use super::{DeleteTransactionState, delete_transaction_endpoint};

    fn get_state() -> (DeleteTransactionState, ProfileId) {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let profile_id = create_profile(test_profile(), &conn).unwrap().id;

        (
            DeleteTransactionState {
                db_connection: Arc::new(Mutex::new(conn)),
            },
            profile_id,
        )
    }

    #[tokio::test]
    async fn can_delete_transaction() {
        let (state, profile_id) = get_state();
        let transaction = create_transaction(
            NewTransaction::new(
                TransactionKind::Expense,
                420.0,
                "Transportation",
                date!(2024 - 03 - 12),
            ),
            profile_id,
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();

        let response = delete_transaction_endpoint(
            State(state.clone()),
            Extension(profile_id),
            Path(transaction.id),
        )
        .await;

        assert_status_ok(&response);
        assert_eq!(get_header(&response, "hx-trigger"), "transactions-changed");
        assert_eq!(
            get_transaction(
                transaction.id,
                profile_id,
                &state.db_connection.lock().unwrap()
            ),
            Err(Error::NotFound)
        );
    }

    #[tokio::test]
    async fn deleting_missing_transaction_returns_not_found() {
        let (state, profile_id) = get_state();

        let response =
            delete_transaction_endpoint(State(state), Extension(profile_id), Path(1337)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
