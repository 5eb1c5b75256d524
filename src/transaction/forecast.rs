//! Projects recurring expenses into the next calendar month.

use rusqlite::Connection;
use time::{Date, Duration, Month};

use crate::{
    Error,
    profile::ProfileId,
    recurrence::{Frequency, next_occurrence, next_occurrence_from_tag},
};

/// One payment of a recurring expense that falls due next month.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastItem {
    /// The expense category of the recurring transaction.
    pub category: String,
    /// The amount of the payment.
    pub amount: f64,
    /// The date the payment falls due.
    pub due: Date,
}

/// The recurring expenses due next month.
#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    /// The sum of every payment due.
    pub total: f64,
    /// Every payment due, ordered by due date then category.
    pub items: Vec<ForecastItem>,
    /// The month the forecast covers.
    pub month: Month,
    /// The year of `month`.
    pub year: i32,
}

impl Forecast {
    /// The number of payments due.
    pub fn count(&self) -> usize {
        self.items.len()
    }
}

/// Sum the recurring expenses that fall due in the calendar month after `today`.
///
/// Each recurring expense is stepped forward from its stored next occurrence
/// using its frequency, so an expense that repeats weekly is counted for every
/// week that lands in next month. Unrecognised frequency tags fall back to
/// monthly.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn next_month_forecast(
    profile_id: ProfileId,
    today: Date,
    connection: &Connection,
) -> Result<Forecast, Error> {
    let start_of_this_month = today.saturating_sub(Duration::days(i64::from(today.day()) - 1));
    let month_start = next_occurrence(start_of_this_month, Frequency::Monthly);
    let month_end = next_occurrence(month_start, Frequency::Monthly);

    let recurring_expenses = connection
        .prepare(
            "SELECT category, amount, recurring_frequency, next_occurrence FROM \"transaction\"
             WHERE profile_id = :profile_id AND kind = 'expense' AND is_recurring = 1
                AND next_occurrence IS NOT NULL AND next_occurrence < :month_end",
        )?
        .query_map(
            rusqlite::named_params! {
                ":profile_id": profile_id.as_i64(),
                ":month_end": month_end,
            },
            |row| {
                let category: String = row.get(0)?;
                let amount: f64 = row.get(1)?;
                let tag: Option<String> = row.get(2)?;
                let next: Date = row.get(3)?;

                Ok((category, amount, tag.unwrap_or_default(), next))
            },
        )?
        .collect::<Result<Vec<_>, rusqlite::Error>>()?;

    let mut forecast = Forecast {
        total: 0.0,
        items: Vec::new(),
        month: month_start.month(),
        year: month_start.year(),
    };

    for (category, amount, tag, next) in recurring_expenses {
        let mut due = next;

        while due < month_end {
            if due >= month_start {
                forecast.total += amount;
                forecast.items.push(ForecastItem {
                    category: category.clone(),
                    amount,
                    due,
                });
            }

            let following = next_occurrence_from_tag(due, &tag);

            if following <= due {
                break;
            }

            due = following;
        }
    }

    forecast
        .items
        .sort_by(|a, b| a.due.cmp(&b.due).then_with(|| a.category.cmp(&b.category)));

    Ok(forecast)
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::{Month, macros::date};

    use crate::{
        category::TransactionKind,
        db::initialize,
        profile::{ProfileId, create_profile, test_profile},
        recurrence::Frequency,
        transaction::{NewTransaction, create_transaction},
    };

    use super::{Forecast, ForecastItem, next_month_forecast};

    fn get_test_connection() -> (Connection, ProfileId) {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let profile_id = create_profile(test_profile(), &conn).unwrap().id;
        (conn, profile_id)
    }

    fn expense(category: &str, amount: f64, date: time::Date) -> NewTransaction {
        NewTransaction::new(TransactionKind::Expense, amount, category, date)
    }

    fn item(category: &str, amount: f64, due: time::Date) -> ForecastItem {
        ForecastItem {
            category: category.to_owned(),
            amount,
            due,
        }
    }

    #[test]
    fn forecast_counts_each_occurrence_in_next_month() {
        let (conn, profile_id) = get_test_connection();
        let transactions = [
            // Next due 2024-04-01.
            expense("Bills & Utilities", 1800.0, date!(2024 - 03 - 01))
                .recurring(Frequency::Monthly),
            // Next due 2024-03-20, then 3, 10, 17 and 24 April.
            expense("Food & Dining", 50.0, date!(2024 - 03 - 13)).recurring(Frequency::Weekly),
            // Next due 2025-01-01.
            expense("Other", 900.0, date!(2024 - 01 - 01)).recurring(Frequency::Yearly),
            expense("Shopping", 400.0, date!(2024 - 03 - 14)),
            NewTransaction::new(TransactionKind::Income, 4200.0, "Salary", date!(2024 - 03 - 01))
                .recurring(Frequency::Monthly),
        ];
        for transaction in transactions {
            create_transaction(transaction, profile_id, &conn).unwrap();
        }

        let forecast = next_month_forecast(profile_id, date!(2024 - 03 - 15), &conn).unwrap();

        assert_eq!(
            forecast,
            Forecast {
                total: 2000.0,
                items: vec![
                    item("Bills & Utilities", 1800.0, date!(2024 - 04 - 01)),
                    item("Food & Dining", 50.0, date!(2024 - 04 - 03)),
                    item("Food & Dining", 50.0, date!(2024 - 04 - 10)),
                    item("Food & Dining", 50.0, date!(2024 - 04 - 17)),
                    item("Food & Dining", 50.0, date!(2024 - 04 - 24)),
                ],
                month: Month::April,
                year: 2024,
            }
        );
    }

    #[test]
    fn forecast_wraps_into_next_year() {
        let (conn, profile_id) = get_test_connection();
        create_transaction(
            expense("Bills & Utilities", 100.0, date!(2024 - 12 - 05))
                .recurring(Frequency::Monthly),
            profile_id,
            &conn,
        )
        .unwrap();

        let forecast = next_month_forecast(profile_id, date!(2024 - 12 - 31), &conn).unwrap();

        assert_eq!(forecast.month, Month::January);
        assert_eq!(forecast.year, 2025);
        assert_eq!(forecast.count(), 1);
        assert_eq!(forecast.total, 100.0);
    }

    #[test]
    fn unknown_frequency_tag_falls_back_to_monthly() {
        let (conn, profile_id) = get_test_connection();
        create_transaction(
            expense("Bills & Utilities", 75.0, date!(2024 - 02 - 05)).recurring(Frequency::Weekly),
            profile_id,
            &conn,
        )
        .unwrap();
        conn.execute(
            "UPDATE \"transaction\" SET recurring_frequency = 'sometimes', next_occurrence = ?1",
            (date!(2024 - 03 - 05),),
        )
        .unwrap();

        let forecast = next_month_forecast(profile_id, date!(2024 - 03 - 15), &conn).unwrap();

        assert_eq!(forecast.count(), 1);
        assert_eq!(forecast.total, 75.0);
    }

    #[test]
    fn forecast_is_empty_without_recurring_expenses() {
        let (conn, profile_id) = get_test_connection();

        let forecast = next_month_forecast(profile_id, date!(2024 - 03 - 15), &conn).unwrap();

        assert_eq!(forecast.count(), 0);
        assert_eq!(forecast.total, 0.0);
    }
}
