//! Grouped totals over transactions.
//!
//! Provides the per (kind, category) totals used by the dashboard, the export
//! documents and the budget page, plus the overall income/expense totals.

use std::collections::HashMap;

use crate::{category::TransactionKind, transaction::Transaction};

/// The sum and number of transactions in a group.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GroupTotals {
    /// The sum of the transaction amounts.
    pub total: f64,
    /// The number of transactions.
    pub count: usize,
}

impl GroupTotals {
    fn add(&mut self, amount: f64) {
        self.total += amount;
        self.count += 1;
    }
}

/// Income, expenses and the difference between them.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    /// Total income.
    pub income: f64,
    /// Total expenses.
    pub expenses: f64,
    /// Income minus expenses.
    pub net: f64,
}

/// The key for grouping transactions.
pub type GroupKey = (TransactionKind, String);

/// Group `transactions` by kind and category.
///
/// Returns an empty map for an empty slice.
pub fn aggregate(transactions: &[Transaction]) -> HashMap<GroupKey, GroupTotals> {
    let mut groups: HashMap<GroupKey, GroupTotals> = HashMap::new();

    for transaction in transactions {
        groups
            .entry((transaction.kind, transaction.category.clone()))
            .or_default()
            .add(transaction.amount);
    }

    groups
}

/// Group the expenses in `transactions` by category, ignoring income.
pub fn expenses_by_category(transactions: &[Transaction]) -> HashMap<String, GroupTotals> {
    let mut groups: HashMap<String, GroupTotals> = HashMap::new();

    for transaction in transactions
        .iter()
        .filter(|transaction| transaction.kind == TransactionKind::Expense)
    {
        groups
            .entry(transaction.category.clone())
            .or_default()
            .add(transaction.amount);
    }

    groups
}

/// Sum income and expenses across all of `transactions`.
pub fn totals(transactions: &[Transaction]) -> Totals {
    let (income, expenses) =
        transactions
            .iter()
            .fold((0.0, 0.0), |(income, expenses), transaction| {
                match transaction.kind {
                    TransactionKind::Income => (income + transaction.amount, expenses),
                    TransactionKind::Expense => (income, expenses + transaction.amount),
                }
            });

    Totals {
        income,
        expenses,
        net: income - expenses,
    }
}

/// Flatten grouped totals into a list sorted by kind, then category.
pub fn sorted_groups(groups: HashMap<GroupKey, GroupTotals>) -> Vec<(GroupKey, GroupTotals)> {
    let mut groups: Vec<_> = groups.into_iter().collect();
    groups.sort_by(|(left, _), (right, _)| left.cmp(right));
    groups
}

/// Expense categories sorted from the largest total to the smallest.
///
/// Ties are broken by category name so the order is stable.
pub fn sorted_by_total(groups: HashMap<String, GroupTotals>) -> Vec<(String, GroupTotals)> {
    let mut groups: Vec<_> = groups.into_iter().collect();
    groups.sort_by(|(left_name, left), (right_name, right)| {
        right
            .total
            .total_cmp(&left.total)
            .then_with(|| left_name.cmp(right_name))
    });
    groups
}
