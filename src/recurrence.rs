//! Scheduling for recurring transactions.
//!
//! A recurring transaction stores the date it next falls due. That date is
//! computed once from the transaction date when recurrence is switched on and
//! is not recomputed afterwards.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use time::{Date, Duration, Month};

use crate::Error;

/// How often a recurring transaction repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// Every seven days.
    Weekly,
    /// Every fourteen days.
    Biweekly,
    /// Every calendar month.
    Monthly,
    /// Every three calendar months.
    Quarterly,
    /// Every calendar year.
    Yearly,
}

impl Frequency {
    /// All frequencies, in order of increasing period.
    pub const ALL: [Frequency; 5] = [
        Frequency::Weekly,
        Frequency::Biweekly,
        Frequency::Monthly,
        Frequency::Quarterly,
        Frequency::Yearly,
    ];

    /// The tag used in forms and in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Weekly => "weekly",
            Frequency::Biweekly => "biweekly",
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
            Frequency::Yearly => "yearly",
        }
    }

    /// A human readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Frequency::Weekly => "Weekly",
            Frequency::Biweekly => "Every two weeks",
            Frequency::Monthly => "Monthly",
            Frequency::Quarterly => "Quarterly",
            Frequency::Yearly => "Yearly",
        }
    }
}

impl Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = Error;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        Frequency::ALL
            .into_iter()
            .find(|frequency| frequency.as_str() == tag)
            .ok_or_else(|| Error::InvalidFrequency(tag.to_owned()))
    }
}

impl ToSql for Frequency {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Frequency {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let tag = value.as_str()?;

        tag.parse()
            .map_err(|error: Error| FromSqlError::Other(Box::new(error)))
    }
}

/// Compute the date one `frequency` period after `date`.
///
/// Month based periods keep the day of the month, clamped to the last day of
/// the target month, so 31 January plus one month is 28 or 29 February.
/// Results that would fall after [Date::MAX] saturate to [Date::MAX].
pub fn next_occurrence(date: Date, frequency: Frequency) -> Date {
    match frequency {
        Frequency::Weekly => add_days(date, 7),
        Frequency::Biweekly => add_days(date, 14),
        Frequency::Monthly => add_months(date, 1),
        Frequency::Quarterly => add_months(date, 3),
        Frequency::Yearly => add_months(date, 12),
    }
}

/// Compute the next occurrence from an untyped frequency tag.
///
/// Unrecognised tags are treated as monthly and logged as a warning. Prefer
/// parsing the tag into a [Frequency] when the input comes from a user.
pub fn next_occurrence_from_tag(date: Date, tag: &str) -> Date {
    let frequency = tag.parse().unwrap_or_else(|_| {
        tracing::warn!("unrecognised frequency \"{tag}\", falling back to monthly");
        Frequency::Monthly
    });

    next_occurrence(date, frequency)
}

fn add_days(date: Date, days: i64) -> Date {
    date.checked_add(Duration::days(days)).unwrap_or(Date::MAX)
}

fn add_months(date: Date, months: i32) -> Date {
    let month_index = date.month() as i32 - 1 + months;
    let year = date.year() + month_index.div_euclid(12);
    let month = match Month::try_from((month_index.rem_euclid(12) + 1) as u8) {
        Ok(month) => month,
        Err(_) => return Date::MAX,
    };

    // Walk back from the original day until the date exists in the target month.
    (1..=date.day())
        .rev()
        .find_map(|day| Date::from_calendar_date(year, month, day).ok())
        .unwrap_or(Date::MAX)
}
