//! Defines the core data models and database queries for transactions.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    category::TransactionKind,
    database_id::TransactionId,
    profile::ProfileId,
    recurrence::{Frequency, next_occurrence},
};

// ============================================================================
// MODELS
// ============================================================================

/// The largest amount a single transaction or budget limit may have.
pub const MAX_AMOUNT: f64 = 1_000_000_000.0;

/// An expense or income, i.e. an event where money was either spent or earned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// Whether money was earned or spent.
    pub kind: TransactionKind,
    /// The amount of money spent or earned, never negative.
    pub amount: f64,
    /// One of the categories for `kind`.
    pub category: String,
    /// When the transaction happened.
    pub date: Date,
    /// Optional free text about the transaction.
    pub note: Option<String>,
    /// Whether the transaction repeats.
    pub is_recurring: bool,
    /// How often the transaction repeats, set only when `is_recurring` is.
    pub recurring_frequency: Option<Frequency>,
    /// The date the transaction next falls due, set only when `is_recurring` is.
    pub next_occurrence: Option<Date>,
    /// When the transaction was recorded.
    pub created_at: OffsetDateTime,
}

/// The data needed to record a transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// Whether money was earned or spent.
    pub kind: TransactionKind,
    /// The amount of money, must be zero up to [MAX_AMOUNT].
    pub amount: f64,
    /// Must be one of the categories for `kind`.
    pub category: String,
    /// When the transaction happened.
    pub date: Date,
    /// Optional free text, blank notes are stored as `None`.
    pub note: Option<String>,
    /// Whether the transaction repeats.
    pub is_recurring: bool,
    /// Required when `is_recurring` is set, ignored otherwise.
    pub recurring_frequency: Option<Frequency>,
}

impl NewTransaction {
    /// Start a one-off transaction with no note.
    pub fn new(kind: TransactionKind, amount: f64, category: &str, date: Date) -> Self {
        Self {
            kind,
            amount,
            category: category.to_owned(),
            date,
            note: None,
            is_recurring: false,
            recurring_frequency: None,
        }
    }

    /// Set the note for the transaction.
    pub fn note(mut self, note: &str) -> Self {
        self.note = Some(note.to_owned());
        self
    }

    /// Make the transaction repeat every `frequency`.
    pub fn recurring(mut self, frequency: Frequency) -> Self {
        self.is_recurring = true;
        self.recurring_frequency = Some(frequency);
        self
    }

    /// Check the amount, the category and the recurrence settings.
    ///
    /// # Errors
    /// Returns:
    /// - [Error::InvalidAmount] if the amount is negative, above [MAX_AMOUNT]
    ///   or not a finite number,
    /// - [Error::InvalidCategory] if the category does not belong to the kind,
    /// - [Error::MissingFrequency] if the transaction recurs without a frequency.
    pub fn validate(&self) -> Result<(), Error> {
        if !self.amount.is_finite() || !(0.0..=MAX_AMOUNT).contains(&self.amount) {
            return Err(Error::InvalidAmount(self.amount));
        }

        self.kind.validate_category(&self.category)?;

        if self.is_recurring && self.recurring_frequency.is_none() {
            return Err(Error::MissingFrequency);
        }

        Ok(())
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

const TRANSACTION_COLUMNS: &str = "id, kind, amount, category, date, note, is_recurring, \
    recurring_frequency, next_occurrence, created_at";

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY,
                profile_id INTEGER NOT NULL,
                kind TEXT NOT NULL CHECK (kind IN ('income', 'expense')),
                amount REAL NOT NULL CHECK (amount >= 0),
                category TEXT NOT NULL,
                date TEXT NOT NULL,
                note TEXT,
                is_recurring INTEGER NOT NULL DEFAULT 0,
                recurring_frequency TEXT,
                next_occurrence TEXT,
                created_at TEXT NOT NULL,
                FOREIGN KEY(profile_id) REFERENCES profile(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    // Used by the transaction list and the dashboard.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_profile_date ON \"transaction\"(profile_id, date);",
        (),
    )?;

    Ok(())
}

/// Validate `new_transaction` and store it for `profile_id`.
///
/// Blank notes are stored as `None`. For recurring transactions the next
/// occurrence is computed from the transaction date, for one-off transactions
/// any frequency is dropped.
///
/// # Errors
/// Returns the validation errors from [NewTransaction::validate], or
/// [Error::SqlError] if there is an SQL error.
pub fn create_transaction(
    new_transaction: NewTransaction,
    profile_id: ProfileId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    new_transaction.validate()?;

    let note = new_transaction
        .note
        .as_deref()
        .map(str::trim)
        .filter(|note| !note.is_empty());
    let recurring_frequency = new_transaction
        .recurring_frequency
        .filter(|_| new_transaction.is_recurring);
    let next =
        recurring_frequency.map(|frequency| next_occurrence(new_transaction.date, frequency));

    let transaction = connection
        .prepare(&format!(
            "INSERT INTO \"transaction\" (profile_id, kind, amount, category, date, note,
                is_recurring, recurring_frequency, next_occurrence, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
             RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            (
                profile_id.as_i64(),
                new_transaction.kind,
                new_transaction.amount,
                &new_transaction.category,
                new_transaction.date,
                note,
                recurring_frequency.is_some(),
                recurring_frequency,
                next,
                OffsetDateTime::now_utc(),
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve the transaction with `id` belonging to `profile_id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to one of the profile's transactions,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(
    id: TransactionId,
    profile_id: ProfileId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\"
             WHERE id = :id AND profile_id = :profile_id"
        ))?
        .query_one(
            &[(":id", &id), (":profile_id", &profile_id.as_i64())],
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Get all of a profile's transactions, newest first.
///
/// Transactions on the same date are ordered by when they were recorded,
/// most recent first.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn get_transactions(
    profile_id: ProfileId,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\"
             WHERE profile_id = :profile_id
             ORDER BY date DESC, created_at DESC, id DESC"
        ))?
        .query_map(&[(":profile_id", &profile_id.as_i64())], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

/// Delete the transaction with `id` belonging to `profile_id`.
///
/// # Errors
/// Returns [Error::DeleteMissingTransaction] if no such transaction exists,
/// or [Error::SqlError] if there is some other SQL error.
pub fn delete_transaction(
    id: TransactionId,
    profile_id: ProfileId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM \"transaction\" WHERE id = ?1 AND profile_id = ?2",
        (id, profile_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingTransaction);
    }

    Ok(())
}

/// Get the profile's recurring transactions, soonest next occurrence first.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn get_recurring_transactions(
    profile_id: ProfileId,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\"
             WHERE profile_id = :profile_id AND is_recurring = 1
             ORDER BY next_occurrence ASC, id ASC"
        ))?
        .query_map(&[(":profile_id", &profile_id.as_i64())], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

/// Get up to `limit` of the profile's most recent one-off transactions, the
/// candidates for being marked as recurring.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn get_recurring_candidates(
    profile_id: ProfileId,
    limit: u32,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\"
             WHERE profile_id = :profile_id AND is_recurring = 0
             ORDER BY date DESC, created_at DESC, id DESC
             LIMIT :limit"
        ))?
        .query_map(
            &[
                (":profile_id", &profile_id.as_i64()),
                (":limit", &i64::from(limit)),
            ],
            map_transaction_row,
        )?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

/// Make the transaction repeat every `frequency`.
///
/// The next occurrence is computed from the transaction's date.
///
/// # Errors
/// Returns [Error::UpdateMissingTransaction] if the transaction does not
/// exist, or [Error::SqlError] if there is some other SQL error.
pub fn mark_recurring(
    id: TransactionId,
    frequency: Frequency,
    profile_id: ProfileId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = match get_transaction(id, profile_id, connection) {
        Ok(transaction) => transaction,
        Err(Error::NotFound) => return Err(Error::UpdateMissingTransaction),
        Err(error) => return Err(error),
    };

    let next = next_occurrence(transaction.date, frequency);

    connection.execute(
        "UPDATE \"transaction\"
         SET is_recurring = 1, recurring_frequency = ?1, next_occurrence = ?2
         WHERE id = ?3 AND profile_id = ?4",
        (frequency, next, id, profile_id.as_i64()),
    )?;

    Ok(Transaction {
        is_recurring: true,
        recurring_frequency: Some(frequency),
        next_occurrence: Some(next),
        ..transaction
    })
}

/// Stop the transaction from repeating.
///
/// # Errors
/// Returns [Error::UpdateMissingTransaction] if the transaction does not
/// exist, or [Error::SqlError] if there is some other SQL error.
pub fn remove_recurring(
    id: TransactionId,
    profile_id: ProfileId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE \"transaction\"
         SET is_recurring = 0, recurring_frequency = NULL, next_occurrence = NULL
         WHERE id = ?1 AND profile_id = ?2",
        (id, profile_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingTransaction);
    }

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        kind: row.get(1)?,
        amount: row.get(2)?,
        category: row.get(3)?,
        date: row.get(4)?,
        note: row.get(5)?,
        is_recurring: row.get(6)?,
        recurring_frequency: row.get(7)?,
        next_occurrence: row.get(8)?,
        created_at: row.get(9)?,
    })
}

/// A transaction that has not been stored, for testing code that works on
/// lists of transactions.
#[cfg(test)]
pub(crate) fn test_transaction(
    kind: TransactionKind,
    category: &str,
    amount: f64,
    date: Date,
) -> Transaction {
    Transaction {
        id: 0,
        kind,
        amount,
        category: category.to_owned(),
        date,
        note: None,
        is_recurring: false,
        recurring_frequency: None,
        next_occurrence: None,
        created_at: OffsetDateTime::UNIX_EPOCH,
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        category::TransactionKind,
        db::initialize,
        profile::{ProfileId, create_profile, test_profile},
        recurrence::Frequency,
    };

    use super::{
        MAX_AMOUNT, NewTransaction, create_transaction, delete_transaction,
        get_recurring_candidates, get_recurring_transactions, get_transaction, get_transactions,
        mark_recurring, remove_recurring,
    };

    fn get_test_connection() -> (Connection, ProfileId) {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let profile = create_profile(test_profile(), &conn).unwrap();
        (conn, profile.id)
    }

    fn groceries(amount: f64) -> NewTransaction {
        NewTransaction::new(
            TransactionKind::Expense,
            amount,
            "Food & Dining",
            date!(2024 - 03 - 10),
        )
    }

    #[test]
    fn create_succeeds() {
        let (conn, profile_id) = get_test_connection();

        let transaction =
            create_transaction(groceries(12.3).note("weekly shop"), profile_id, &conn).unwrap();

        assert_eq!(transaction.amount, 12.3);
        assert_eq!(transaction.kind, TransactionKind::Expense);
        assert_eq!(transaction.category, "Food & Dining");
        assert_eq!(transaction.note.as_deref(), Some("weekly shop"));
        assert!(!transaction.is_recurring);
        assert_eq!(transaction.next_occurrence, None);
        assert_eq!(get_transaction(transaction.id, profile_id, &conn), Ok(transaction));
    }

    #[test]
    fn create_stores_blank_note_as_none() {
        let (conn, profile_id) = get_test_connection();

        let transaction =
            create_transaction(groceries(1.0).note("   "), profile_id, &conn).unwrap();

        assert_eq!(transaction.note, None);
    }

    #[test]
    fn create_recurring_sets_next_occurrence() {
        let (conn, profile_id) = get_test_connection();
        let rent = NewTransaction::new(
            TransactionKind::Expense,
            1800.0,
            "Bills & Utilities",
            date!(2024 - 01 - 31),
        )
        .recurring(Frequency::Monthly);

        let transaction = create_transaction(rent, profile_id, &conn).unwrap();

        assert!(transaction.is_recurring);
        assert_eq!(transaction.recurring_frequency, Some(Frequency::Monthly));
        assert_eq!(transaction.next_occurrence, Some(date!(2024 - 02 - 29)));
    }

    #[test]
    fn create_ignores_frequency_when_not_recurring() {
        let (conn, profile_id) = get_test_connection();
        let transaction = NewTransaction {
            recurring_frequency: Some(Frequency::Weekly),
            ..groceries(5.0)
        };

        let transaction = create_transaction(transaction, profile_id, &conn).unwrap();

        assert!(!transaction.is_recurring);
        assert_eq!(transaction.recurring_frequency, None);
        assert_eq!(transaction.next_occurrence, None);
    }

    #[test]
    fn create_fails_on_recurring_without_frequency() {
        let (conn, profile_id) = get_test_connection();
        let transaction = NewTransaction {
            is_recurring: true,
            ..groceries(5.0)
        };

        assert_eq!(
            create_transaction(transaction, profile_id, &conn),
            Err(Error::MissingFrequency)
        );
    }

    #[test]
    fn create_fails_on_negative_amount() {
        let (conn, profile_id) = get_test_connection();

        assert_eq!(
            create_transaction(groceries(-1.0), profile_id, &conn),
            Err(Error::InvalidAmount(-1.0))
        );
    }

    #[test]
    fn create_fails_on_non_finite_amount() {
        let (conn, profile_id) = get_test_connection();

        let result = create_transaction(groceries(f64::INFINITY), profile_id, &conn);

        assert!(matches!(result, Err(Error::InvalidAmount(_))));
    }

    #[test]
    fn create_fails_on_amount_above_maximum() {
        let (conn, profile_id) = get_test_connection();

        assert_eq!(
            create_transaction(groceries(1e12), profile_id, &conn),
            Err(Error::InvalidAmount(1e12))
        );
        assert!(create_transaction(groceries(MAX_AMOUNT), profile_id, &conn).is_ok());
    }

    #[test]
    fn create_fails_on_category_of_other_kind() {
        let (conn, profile_id) = get_test_connection();
        let transaction = NewTransaction::new(
            TransactionKind::Expense,
            10.0,
            "Salary",
            date!(2024 - 03 - 10),
        );

        assert_eq!(
            create_transaction(transaction, profile_id, &conn),
            Err(Error::InvalidCategory("Salary".to_owned()))
        );
    }

    #[test]
    fn zero_amount_is_allowed() {
        let (conn, profile_id) = get_test_connection();

        assert!(create_transaction(groceries(0.0), profile_id, &conn).is_ok());
    }

    #[test]
    fn get_transactions_orders_by_date_then_creation() {
        let (conn, profile_id) = get_test_connection();
        let older = NewTransaction {
            date: date!(2024 - 03 - 01),
            ..groceries(1.0)
        };
        let first_on_day = groceries(2.0);
        let second_on_day = groceries(3.0);
        for transaction in [older, first_on_day, second_on_day] {
            create_transaction(transaction, profile_id, &conn).unwrap();
        }

        let amounts: Vec<f64> = get_transactions(profile_id, &conn)
            .unwrap()
            .into_iter()
            .map(|transaction| transaction.amount)
            .collect();

        assert_eq!(amounts, [3.0, 2.0, 1.0]);
    }

    #[test]
    fn queries_are_scoped_to_profile() {
        let (conn, profile_id) = get_test_connection();
        let other_profile = create_profile(test_profile(), &conn).unwrap().id;
        let transaction = create_transaction(groceries(9.0), other_profile, &conn).unwrap();

        assert_eq!(get_transactions(profile_id, &conn), Ok(vec![]));
        assert_eq!(
            get_transaction(transaction.id, profile_id, &conn),
            Err(Error::NotFound)
        );
        assert_eq!(
            delete_transaction(transaction.id, profile_id, &conn),
            Err(Error::DeleteMissingTransaction)
        );
        assert_eq!(
            mark_recurring(transaction.id, Frequency::Weekly, profile_id, &conn),
            Err(Error::UpdateMissingTransaction)
        );
    }

    #[test]
    fn delete_removes_transaction() {
        let (conn, profile_id) = get_test_connection();
        let transaction = create_transaction(groceries(9.0), profile_id, &conn).unwrap();

        delete_transaction(transaction.id, profile_id, &conn).unwrap();

        assert_eq!(
            get_transaction(transaction.id, profile_id, &conn),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn delete_missing_transaction_fails() {
        let (conn, profile_id) = get_test_connection();

        assert_eq!(
            delete_transaction(42, profile_id, &conn),
            Err(Error::DeleteMissingTransaction)
        );
    }

    #[test]
    fn mark_and_remove_recurring() {
        let (conn, profile_id) = get_test_connection();
        let transaction = create_transaction(groceries(80.0), profile_id, &conn).unwrap();

        let marked =
            mark_recurring(transaction.id, Frequency::Biweekly, profile_id, &conn).unwrap();

        assert_eq!(marked.next_occurrence, Some(date!(2024 - 03 - 24)));
        assert_eq!(get_transaction(transaction.id, profile_id, &conn), Ok(marked));

        remove_recurring(transaction.id, profile_id, &conn).unwrap();

        let cleared = get_transaction(transaction.id, profile_id, &conn).unwrap();
        assert!(!cleared.is_recurring);
        assert_eq!(cleared.recurring_frequency, None);
        assert_eq!(cleared.next_occurrence, None);
    }

    #[test]
    fn remove_recurring_on_missing_transaction_fails() {
        let (conn, profile_id) = get_test_connection();

        assert_eq!(
            remove_recurring(7, profile_id, &conn),
            Err(Error::UpdateMissingTransaction)
        );
    }

    #[test]
    fn recurring_transactions_are_ordered_by_next_occurrence() {
        let (conn, profile_id) = get_test_connection();
        let yearly = groceries(1.0).recurring(Frequency::Yearly);
        let weekly = groceries(2.0).recurring(Frequency::Weekly);
        let one_off = groceries(3.0);
        for transaction in [yearly, weekly, one_off] {
            create_transaction(transaction, profile_id, &conn).unwrap();
        }

        let frequencies: Vec<_> = get_recurring_transactions(profile_id, &conn)
            .unwrap()
            .into_iter()
            .map(|transaction| transaction.recurring_frequency)
            .collect();

        assert_eq!(
            frequencies,
            [Some(Frequency::Weekly), Some(Frequency::Yearly)]
        );
    }

    #[test]
    fn candidates_exclude_recurring_and_respect_limit() {
        let (conn, profile_id) = get_test_connection();
        create_transaction(groceries(100.0).recurring(Frequency::Monthly), profile_id, &conn)
            .unwrap();
        for day in 1..=12 {
            let transaction = NewTransaction {
                date: time::Date::from_calendar_date(2024, time::Month::April, day).unwrap(),
                ..groceries(day as f64)
            };
            create_transaction(transaction, profile_id, &conn).unwrap();
        }

        let candidates = get_recurring_candidates(profile_id, 10, &conn).unwrap();

        assert_eq!(candidates.len(), 10);
        assert!(candidates.iter().all(|transaction| !transaction.is_recurring));
        assert_eq!(candidates[0].amount, 12.0);
    }
}
