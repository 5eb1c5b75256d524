//! Defines the export page and the endpoint that produces export documents.
use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error,
    endpoints,
    export::{
        ExportContent, ExportFormat,
        csv::{summary_csv, transactions_csv},
        report::report_view,
    },
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, PAGE_CONTAINER_STYLE, base,
        link,
    },
    navigation::NavBar,
    profile::ProfileId,
    timezone::local_today,
    transaction::{Transaction, get_transactions},
};

/// The state needed to export transactions.
#[derive(Debug, Clone)]
pub struct ExportState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for ExportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The query string for [export_endpoint].
#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    /// The kind of document to produce.
    pub format: ExportFormat,
    /// What to put in the document.
    pub content: ExportContent,
}

fn load_transactions(
    state: &ExportState,
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

/// Renders the page for choosing the export format and content.
pub async fn get_export_page(
    State(state): State<ExportState>,
    Extension(profile_id): Extension<ProfileId>,
) -> Result<Response, Error> {
    let transaction_count = load_transactions(&state, profile_id)?.len();

    Ok(export_view(transaction_count).into_response())
}

/// Produces a CSV download or a printable report of the profile's transactions.
///
/// Responds with an alert and status 400 if there is nothing to export.
pub async fn export_endpoint(
    State(state): State<ExportState>,
    Extension(profile_id): Extension<ProfileId>,
    Query(query): Query<ExportQuery>,
) -> Response {
    let today = match local_today(&state.local_timezone) {
        Ok(today) => today,
        Err(error) => return error.into_alert_response(),
    };

    let transactions = match load_transactions(&state, profile_id) {
        Ok(transactions) => transactions,
        Err(error) => return error.into_alert_response(),
    };

    if transactions.is_empty() {
        return Error::NothingToExport.into_alert_response();
    }

    match query.format {
        ExportFormat::Csv => csv_response(query.content, &transactions, today),
        ExportFormat::Report => report_view(query.content, &transactions, today).into_response(),
    }
}

fn csv_response(content: ExportContent, transactions: &[Transaction], today: Date) -> Response {
    let csv = match content {
        ExportContent::Transactions => transactions_csv(transactions),
        ExportContent::Summary => summary_csv(transactions),
    };

    match csv {
        Ok(csv) => {
            let filename = format!("{}_{today}.csv", content.file_prefix());
            tracing::debug!("Exporting {} transactions as {filename}", transactions.len());

            (
                [
                    (header::CONTENT_TYPE, "text/csv".to_owned()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{filename}\""),
                    ),
                ],
                csv,
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("could not write CSV export: {error}");
            error.into_alert_response()
        }
    }
}

fn export_view(transaction_count: usize) -> Markup {
    let nav_bar = NavBar::new(endpoints::EXPORT_VIEW).into_html();
    let nothing_to_export = transaction_count == 0;

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-md space-y-4"
            {
                h1 class="text-xl font-bold" { "Export Data" }

                form
                    method="get"
                    action=(endpoints::EXPORT_API)
                    target="_blank"
                    class="space-y-4"
                {
                    div
                    {
                        label for="format" class=(FORM_LABEL_STYLE) { "Export Format" }

                        select name="format" id="format" class=(FORM_TEXT_INPUT_STYLE)
                        {
                            option value="csv" selected { "CSV File" }
                            option value="report" { "Printable Report" }
                        }
                    }

                    div
                    {
                        label for="content" class=(FORM_LABEL_STYLE) { "Export Type" }

                        select name="content" id="content" class=(FORM_TEXT_INPUT_STYLE)
                        {
                            option value="transactions" selected { "Detailed Transactions" }
                            option value="summary" { "Category Summary" }
                        }
                    }

                    div class="p-4 rounded-lg bg-gray-100 text-sm text-gray-600 dark:bg-gray-800 dark:text-gray-400"
                    {
                        p
                        {
                            "Detailed transactions include the date, type, category, amount, \
                            note and recurring status of every transaction. The category \
                            summary shows totals and counts by type and category."
                        }
                        p class="mt-1"
                        {
                            "The printable report opens in a new tab, ready to print or save as a PDF."
                        }
                    }

                    @if nothing_to_export {
                        p class="text-sm text-gray-600 dark:text-gray-400" data-nothing-to-export
                        {
                            "There is nothing to export yet. "
                            (link(endpoints::TRANSACTIONS_VIEW, "Add a transaction"))
                            " first."
                        }
                    }

                    button
                        type="submit"
                        disabled[nothing_to_export]
                        class=(BUTTON_PRIMARY_STYLE)
                    {
                        "Export"
                    }
                }
            }
        }
    );

    base("Export", &[], &content)
}
