//! Finboard is a web app for tracking your personal finances.
//!
//! This library provides a REST API that directly serves HTML pages. Pages
//! are rendered on the server and partially refreshed with htmx.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod aggregation;
mod alert;
mod app_state;
mod assistant;
mod budget;
mod category;
mod dashboard;
mod database_id;
mod db;
mod endpoints;
mod events;
mod export;
mod html;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
mod profile;
mod recurrence;
mod routing;
mod timezone;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use aggregation::{GroupTotals, Totals, aggregate, expenses_by_category, totals};
pub use app_state::{AppState, create_cookie_key};
pub use budget::{Budget, NewBudget, create_budget};
pub use category::TransactionKind;
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use profile::{NewProfile, ProfileId, create_profile};
pub use recurrence::{Frequency, next_occurrence, next_occurrence_from_tag};
pub use routing::build_router;
pub use timezone::get_local_offset;
pub use transaction::{NewTransaction, Transaction, create_transaction};

use crate::{
    alert::Alert, html::format_currency, internal_server_error::InternalServerError,
    not_found::get_404_not_found_response, transaction::MAX_AMOUNT,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install terminate signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// A recurrence frequency tag that is not one of weekly, biweekly,
    /// monthly, quarterly or yearly.
    #[error("\"{0}\" is not a valid recurrence frequency")]
    InvalidFrequency(String),

    /// A transaction was marked as recurring without saying how often it recurs.
    #[error("a recurring transaction needs a frequency")]
    MissingFrequency,

    /// The category is not one of the categories for the transaction type.
    #[error("\"{0}\" is not a valid category")]
    InvalidCategory(String),

    /// Amounts must be finite and not negative.
    #[error("{0} is not a valid amount")]
    InvalidAmount(f64),

    /// The budget failed validation, the string describes which field.
    #[error("invalid budget: {0}")]
    InvalidBudget(String),

    /// The onboarding form failed validation, the string describes which field.
    #[error("invalid profile: {0}")]
    InvalidProfile(String),

    /// The request did not carry a cookie for an existing profile.
    #[error("no profile cookie in the request")]
    ProfileMissing,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction,

    /// Tried to delete a budget that does not exist
    #[error("tried to delete a budget that is not in the database")]
    DeleteMissingBudget,

    /// An export was requested but there are no transactions to export.
    #[error("there are no transactions to export")]
    NothingToExport,

    /// The CSV writer failed.
    #[error("could not write CSV: {0}")]
    CsvError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<csv::Error> for Error {
    fn from(value: csv::Error) -> Self {
        Error::CsvError(value.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    fn into_alert_response(self) -> Response {
        match self {
            Error::InvalidTimezoneError(timezone) => Alert::error(
                "Invalid Timezone Settings",
                &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            )
            .into_response_with_status(StatusCode::INTERNAL_SERVER_ERROR),
            Error::InvalidFrequency(tag) => Alert::error(
                "Invalid frequency",
                &format!(
                    "\"{tag}\" is not a frequency. Choose weekly, biweekly, monthly, quarterly or yearly."
                ),
            )
            .into_response_with_status(StatusCode::BAD_REQUEST),
            Error::MissingFrequency => Alert::error(
                "Missing frequency",
                "Choose how often the transaction repeats.",
            )
            .into_response_with_status(StatusCode::BAD_REQUEST),
            Error::InvalidCategory(category) => Alert::error(
                "Invalid category",
                &format!("\"{category}\" is not a category for this type of transaction."),
            )
            .into_response_with_status(StatusCode::BAD_REQUEST),
            Error::InvalidAmount(amount) => Alert::error(
                "Invalid amount",
                &format!(
                    "{amount} is not a valid amount. \
                    Enter a number from zero up to {}.",
                    format_currency(MAX_AMOUNT)
                ),
            )
            .into_response_with_status(StatusCode::BAD_REQUEST),
            Error::InvalidBudget(reason) => Alert::error("Invalid budget", &reason)
                .into_response_with_status(StatusCode::BAD_REQUEST),
            Error::InvalidProfile(reason) => Alert::error("Check your details", &reason)
                .into_response_with_status(StatusCode::BAD_REQUEST),
            Error::UpdateMissingTransaction => Alert::error(
                "Could not update transaction",
                "The transaction could not be found.",
            )
            .into_response_with_status(StatusCode::NOT_FOUND),
            Error::DeleteMissingTransaction => Alert::error(
                "Could not delete transaction",
                "The transaction could not be found. \
                Try refreshing the page to see if the transaction has already been deleted.",
            )
            .into_response_with_status(StatusCode::NOT_FOUND),
            Error::DeleteMissingBudget => Alert::error(
                "Could not delete budget",
                "The budget could not be found. \
                Try refreshing the page to see if the budget has already been deleted.",
            )
            .into_response_with_status(StatusCode::NOT_FOUND),
            Error::NothingToExport => Alert::error(
                "Nothing to export",
                "Add some transactions before exporting.",
            )
            .into_response_with_status(StatusCode::BAD_REQUEST),
            _ => Alert::error(
                "Something went wrong",
                "An unexpected error occurred, check the server logs for more details.",
            )
            .into_response_with_status(StatusCode::INTERNAL_SERVER_ERROR),
        }
    }
}
