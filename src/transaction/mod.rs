//! Transactions: income and expenses recorded by a profile.
//!
//! This module contains:
//! - the `Transaction` model and database functions scoped to a profile,
//! - the transactions page with its entry form and list,
//! - recurring transaction management and the next-month forecast.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod forecast;
mod form;
mod recurring_endpoint;
mod recurring_page;
mod transactions_page;

pub use core::{
    MAX_AMOUNT, NewTransaction, Transaction, create_transaction, create_transaction_table,
    delete_transaction, get_recurring_candidates, get_recurring_transactions, get_transaction,
    get_transactions, map_transaction_row, mark_recurring, remove_recurring,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use forecast::{Forecast, ForecastItem, next_month_forecast};
pub use form::get_category_options;
pub use recurring_endpoint::{mark_recurring_endpoint, remove_recurring_endpoint};
pub use recurring_page::get_recurring_page;
pub use transactions_page::{get_transaction_list, get_transactions_page};

#[cfg(test)]
pub(crate) use core::test_transaction;
