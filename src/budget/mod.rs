//! Monthly spending limits per expense category.
//!
//! Usage is not stored, it is summed from the profile's expenses whenever the
//! budgets are listed.

mod budgets_page;
mod core;
mod create_endpoint;
mod delete_endpoint;

pub use budgets_page::{get_budget_list, get_budgets_page};
pub use core::{
    Budget, BudgetStatus, BudgetWithUsage, NewBudget, budget_usage, create_budget,
    create_budget_table, delete_budget, get_budgets_with_usage,
};
pub use create_endpoint::create_budget_endpoint;
pub use delete_endpoint::delete_budget_endpoint;
