//! Transaction kinds and the fixed category lists for each kind.

use std::fmt::Display;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

use crate::Error;

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money coming in.
    Income,
    /// Money going out.
    Expense,
}

/// Categories available for expenses.
pub const EXPENSE_CATEGORIES: [&str; 9] = [
    "Food & Dining",
    "Transportation",
    "Shopping",
    "Entertainment",
    "Bills & Utilities",
    "Healthcare",
    "Education",
    "Travel",
    "Other",
];

/// Categories available for income.
pub const INCOME_CATEGORIES: [&str; 6] = [
    "Salary",
    "Freelance",
    "Business",
    "Investment",
    "Gift",
    "Other",
];

impl TransactionKind {
    /// The lowercase tag used in forms and the database, e.g. "income".
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }

    /// The capitalised name used in tables and exports.
    pub fn label(&self) -> &'static str {
        match self {
            TransactionKind::Income => "Income",
            TransactionKind::Expense => "Expense",
        }
    }

    /// The categories a transaction of this kind may use.
    pub fn categories(&self) -> &'static [&'static str] {
        match self {
            TransactionKind::Income => &INCOME_CATEGORIES,
            TransactionKind::Expense => &EXPENSE_CATEGORIES,
        }
    }

    /// Check that `category` is one of the categories for this kind.
    ///
    /// # Errors
    /// Returns [Error::InvalidCategory] if it is not.
    pub fn validate_category(&self, category: &str) -> Result<(), Error> {
        if self.categories().contains(&category) {
            Ok(())
        } else {
            Err(Error::InvalidCategory(category.to_owned()))
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for TransactionKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => Err(FromSqlError::Other(
                format!("invalid transaction kind \"{other}\"").into(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::Error;

    use super::TransactionKind;

    #[test]
    fn categories_are_checked_per_kind() {
        assert_eq!(TransactionKind::Expense.validate_category("Travel"), Ok(()));
        assert_eq!(TransactionKind::Income.validate_category("Salary"), Ok(()));
        assert_eq!(
            TransactionKind::Income.validate_category("Travel"),
            Err(Error::InvalidCategory("Travel".to_owned()))
        );
        assert_eq!(
            TransactionKind::Expense.validate_category("Salary"),
            Err(Error::InvalidCategory("Salary".to_owned()))
        );
    }

    #[test]
    fn other_is_valid_for_both_kinds() {
        assert_eq!(TransactionKind::Expense.validate_category("Other"), Ok(()));
        assert_eq!(TransactionKind::Income.validate_category("Other"), Ok(()));
    }
}
