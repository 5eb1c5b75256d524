//! Defines the budget model, its usage and status, and the database queries
//! for budgets.

use rusqlite::{Connection, Row};
use serde::Deserialize;
use time::{Date, Month};

use crate::{
    Error,
    category::TransactionKind,
    database_id::BudgetId,
    html::format_currency,
    profile::ProfileId,
    recurrence::{Frequency, next_occurrence},
    transaction::MAX_AMOUNT,
};

// ============================================================================
// MODELS
// ============================================================================

/// A monthly spending limit for one expense category.
#[derive(Debug, Clone, PartialEq)]
pub struct Budget {
    /// The ID of the budget.
    pub id: BudgetId,
    /// The expense category the limit applies to.
    pub category: String,
    /// The most that should be spent in the month, always positive.
    pub monthly_limit: f64,
    /// The month of the year, 1 to 12.
    pub month: u8,
    /// The year, 2000 to 9999.
    pub year: i32,
}

impl Budget {
    /// The full name of the budget's month, e.g. "March".
    pub fn month_name(&self) -> String {
        Month::try_from(self.month)
            .map(|month| month.to_string())
            .unwrap_or_default()
    }
}

/// The form data for creating a budget.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewBudget {
    /// Must be one of the expense categories.
    pub category: String,
    /// Must be greater than zero and at most [MAX_AMOUNT].
    pub monthly_limit: f64,
    /// Must be 1 to 12.
    pub month: u8,
    /// Must be 2000 to 9999.
    pub year: i32,
}

impl NewBudget {
    /// Check the category, the limit and the period of the budget.
    ///
    /// # Errors
    /// Returns [Error::InvalidCategory] if the category is not an expense
    /// category, or [Error::InvalidBudget] describing the first bad field.
    pub fn validate(&self) -> Result<(), Error> {
        TransactionKind::Expense.validate_category(&self.category)?;

        if !self.monthly_limit.is_finite() || self.monthly_limit <= 0.0 {
            return Err(Error::InvalidBudget(
                "The monthly limit must be greater than zero.".to_owned(),
            ));
        }

        if self.monthly_limit > MAX_AMOUNT {
            return Err(Error::InvalidBudget(format!(
                "The monthly limit must be at most {}.",
                format_currency(MAX_AMOUNT)
            )));
        }

        if !(1..=12).contains(&self.month) {
            return Err(Error::InvalidBudget(
                "The month must be between 1 and 12.".to_owned(),
            ));
        }

        if !(2000..=9999).contains(&self.year) {
            return Err(Error::InvalidBudget(
                "The year must be between 2000 and 9999.".to_owned(),
            ));
        }

        Ok(())
    }
}

/// How close spending is to a budget's limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetStatus {
    /// Less than 80% of the limit has been spent.
    Good,
    /// At least 80% of the limit has been spent.
    Warning,
    /// The limit has been reached or passed.
    Exceeded,
}

impl BudgetStatus {
    /// The status for spending `percentage` percent of a limit.
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 100.0 {
            BudgetStatus::Exceeded
        } else if percentage >= 80.0 {
            BudgetStatus::Warning
        } else {
            BudgetStatus::Good
        }
    }

    /// The text shown on a budget's status badge.
    pub fn label(&self) -> &'static str {
        match self {
            BudgetStatus::Good => "On Track",
            BudgetStatus::Warning => "Warning",
            BudgetStatus::Exceeded => "Over Budget",
        }
    }
}

/// A budget together with what has been spent against it.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetWithUsage {
    /// The budget.
    pub budget: Budget,
    /// The sum of the expenses in the budget's category and month.
    pub usage: f64,
}

impl BudgetWithUsage {
    /// The share of the limit that has been spent, uncapped.
    pub fn percentage(&self) -> f64 {
        self.usage / self.budget.monthly_limit * 100.0
    }

    /// The width of the progress bar as a percentage, at most 100.
    pub fn bar_width(&self) -> f64 {
        self.percentage().clamp(0.0, 100.0)
    }

    /// The status for how much of the limit has been spent.
    pub fn status(&self) -> BudgetStatus {
        BudgetStatus::from_percentage(self.percentage())
    }

    /// How much can still be spent, negative once the limit is passed.
    pub fn remaining(&self) -> f64 {
        self.budget.monthly_limit - self.usage
    }

    /// A tip for budgets that are nearly or completely used up.
    ///
    /// Budgets with no spending never get a suggestion.
    pub fn suggestion(&self) -> Option<String> {
        if self.usage == 0.0 {
            return None;
        }

        let category = &self.budget.category;

        match self.status() {
            BudgetStatus::Exceeded => Some(format!(
                "You've exceeded your {category} budget by ${:.2}. \
                Consider reducing spending in this category.",
                -self.remaining()
            )),
            BudgetStatus::Warning => Some(format!(
                "You're at {:.0}% of your {category} budget. \
                Consider monitoring spending closely.",
                self.percentage()
            )),
            BudgetStatus::Good => None,
        }
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the budget table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_budget_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS budget (
                id INTEGER PRIMARY KEY,
                profile_id INTEGER NOT NULL,
                category TEXT NOT NULL,
                monthly_limit REAL NOT NULL CHECK (monthly_limit > 0),
                month INTEGER NOT NULL CHECK (month BETWEEN 1 AND 12),
                year INTEGER NOT NULL CHECK (year >= 2000),
                FOREIGN KEY(profile_id) REFERENCES profile(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_budget_profile_period
            ON budget(profile_id, category, month, year);",
        (),
    )?;

    Ok(())
}

/// Validate `new_budget` and store it for `profile_id`.
///
/// # Errors
/// Returns the validation errors from [NewBudget::validate], or
/// [Error::SqlError] if there is an SQL error.
pub fn create_budget(
    new_budget: NewBudget,
    profile_id: ProfileId,
    connection: &Connection,
) -> Result<Budget, Error> {
    new_budget.validate()?;

    let budget = connection
        .prepare(
            "INSERT INTO budget (profile_id, category, monthly_limit, month, year)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id, category, monthly_limit, month, year",
        )?
        .query_row(
            (
                profile_id.as_i64(),
                &new_budget.category,
                new_budget.monthly_limit,
                new_budget.month,
                new_budget.year,
            ),
            map_budget_row,
        )?;

    Ok(budget)
}

/// Get the profile's budgets ordered by category, each with its usage.
///
/// If the usage of a budget cannot be computed it is reported as zero.
///
/// # Errors
/// Returns [Error::SqlError] if the budgets cannot be read.
pub fn get_budgets_with_usage(
    profile_id: ProfileId,
    connection: &Connection,
) -> Result<Vec<BudgetWithUsage>, Error> {
    let budgets = connection
        .prepare(
            "SELECT id, category, monthly_limit, month, year FROM budget
             WHERE profile_id = :profile_id
             ORDER BY category ASC, year ASC, month ASC, id ASC",
        )?
        .query_map(&[(":profile_id", &profile_id.as_i64())], map_budget_row)?
        .map(|maybe_budget| maybe_budget.map_err(Error::from))
        .collect::<Result<Vec<_>, Error>>()?;

    let budgets = budgets
        .into_iter()
        .map(|budget| {
            let usage = budget_usage(
                profile_id,
                &budget.category,
                budget.month,
                budget.year,
                connection,
            )
            .unwrap_or_else(|error| {
                tracing::warn!("could not get usage for budget {}: {error}", budget.id);
                0.0
            });

            BudgetWithUsage { budget, usage }
        })
        .collect();

    Ok(budgets)
}

/// Delete the budget with `id` belonging to `profile_id`.
///
/// # Errors
/// Returns [Error::DeleteMissingBudget] if no such budget exists,
/// or [Error::SqlError] if there is some other SQL error.
pub fn delete_budget(
    id: BudgetId,
    profile_id: ProfileId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM budget WHERE id = ?1 AND profile_id = ?2",
        (id, profile_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingBudget);
    }

    Ok(())
}

/// The sum of the profile's expenses in `category` during `month` of `year`.
///
/// # Errors
/// Returns [Error::InvalidBudget] if `month` and `year` do not name a month,
/// or [Error::SqlError] if there is an SQL error.
pub fn budget_usage(
    profile_id: ProfileId,
    category: &str,
    month: u8,
    year: i32,
    connection: &Connection,
) -> Result<f64, Error> {
    let start = Month::try_from(month)
        .and_then(|month| Date::from_calendar_date(year, month, 1))
        .map_err(|error| Error::InvalidBudget(error.to_string()))?;
    let end = next_occurrence(start, Frequency::Monthly);

    let usage = connection
        .prepare(
            "SELECT COALESCE(SUM(amount), 0.0) FROM \"transaction\"
             WHERE profile_id = :profile_id AND kind = 'expense' AND category = :category
                AND date >= :start AND date < :end",
        )?
        .query_one(
            rusqlite::named_params! {
                ":profile_id": profile_id.as_i64(),
                ":category": category,
                ":start": start,
                ":end": end,
            },
            |row| row.get(0),
        )?;

    Ok(usage)
}

fn map_budget_row(row: &Row) -> Result<Budget, rusqlite::Error> {
    Ok(Budget {
        id: row.get(0)?,
        category: row.get(1)?,
        monthly_limit: row.get(2)?,
        month: row.get(3)?,
        year: row.get(4)?,
    })
}
