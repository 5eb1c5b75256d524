//! Exports a profile's transactions as CSV files or a printable report.

mod csv;
mod handlers;
mod report;

use serde::Deserialize;

pub use self::csv::{summary_csv, transactions_csv};
pub use handlers::{export_endpoint, get_export_page};
pub use report::report_view;

/// The kind of document to export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// A CSV file download.
    Csv,
    /// An HTML page that opens the print dialog.
    Report,
}

/// What the exported document contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportContent {
    /// Every transaction.
    Transactions,
    /// Totals and counts per type and category.
    Summary,
}

impl ExportContent {
    fn file_prefix(&self) -> &'static str {
        match self {
            ExportContent::Transactions => "transactions",
            ExportContent::Summary => "summary",
        }
    }
}
