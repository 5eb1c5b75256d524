//! Dashboard module
//!
//! Provides an overview page with income and expense totals, and a breakdown
//! of expenses by category as a chart and a table.

mod cards;
mod charts;
mod handlers;
mod tables;

pub use handlers::{get_dashboard_page, get_dashboard_summary};
