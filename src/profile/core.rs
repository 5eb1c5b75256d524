//! The profile model, validation and database queries.

use std::fmt::Display;

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::Error;

/// A newtype wrapper for integer profile IDs.
///
/// Every transaction and budget belongs to a profile, and queries for them
/// take a `ProfileId` so IDs of other records cannot be passed by mistake.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct ProfileId(i64);

impl ProfileId {
    /// Create a new profile ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the profile ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for ProfileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A value stored in the database paired with the label shown in forms.
pub type Choice = (&'static str, &'static str);

pub const INCOME_RANGES: [Choice; 6] = [
    ("<30k", "Less than $30,000"),
    ("30k-50k", "$30,000 - $50,000"),
    ("50k-75k", "$50,000 - $75,000"),
    ("75k-100k", "$75,000 - $100,000"),
    ("100k-150k", "$100,000 - $150,000"),
    (">150k", "More than $150,000"),
];

pub const SAVINGS_RANGES: [Choice; 5] = [
    ("<1k", "Less than $1,000"),
    ("1k-5k", "$1,000 - $5,000"),
    ("5k-15k", "$5,000 - $15,000"),
    ("15k-50k", "$15,000 - $50,000"),
    (">50k", "More than $50,000"),
];

pub const MONTHLY_EXPENSE_RANGES: [Choice; 5] = [
    ("<1k", "Less than $1,000"),
    ("1k-2k", "$1,000 - $2,000"),
    ("2k-4k", "$2,000 - $4,000"),
    ("4k-6k", "$4,000 - $6,000"),
    (">6k", "More than $6,000"),
];

pub const RISK_TOLERANCES: [Choice; 3] = [
    ("conservative", "Conservative - Prefer stable, low-risk investments"),
    ("moderate", "Moderate - Balanced approach to risk and return"),
    ("aggressive", "Aggressive - Comfortable with high-risk, high-reward"),
];

pub const INVESTMENT_EXPERIENCE: [Choice; 3] = [
    ("beginner", "Beginner - New to investing"),
    ("intermediate", "Intermediate - Some experience with basic investments"),
    ("advanced", "Advanced - Experienced with various investment types"),
];

const MAX_NAME_LENGTH: usize = 100;
const MAX_GOALS_LENGTH: usize = 1000;
const MIN_AGE: u8 = 16;
const MAX_AGE: u8 = 120;

/// The details collected during onboarding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    pub name: String,
    pub age: Option<u8>,
    pub income_range: String,
    pub current_savings: String,
    pub monthly_expenses: String,
    pub financial_goals: String,
    pub risk_tolerance: String,
    pub investment_experience: String,
}

/// The onboarding form, also used to create profiles directly.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NewProfile {
    /// The user's name, shown in greetings.
    pub name: String,
    /// The user's age in years.
    #[serde(default)]
    pub age: Option<u8>,
    /// One of the values in [INCOME_RANGES].
    pub income_range: String,
    /// One of the values in [SAVINGS_RANGES].
    pub current_savings: String,
    /// One of the values in [MONTHLY_EXPENSE_RANGES].
    pub monthly_expenses: String,
    /// Free text describing what the user is saving for.
    #[serde(default)]
    pub financial_goals: String,
    /// One of the values in [RISK_TOLERANCES].
    pub risk_tolerance: String,
    /// One of the values in [INVESTMENT_EXPERIENCE].
    pub investment_experience: String,
}

impl NewProfile {
    /// Check every field of the form.
    ///
    /// # Errors
    /// Returns [Error::InvalidProfile] describing the first invalid field.
    pub fn validate(&self) -> Result<(), Error> {
        let name = self.name.trim();

        if name.is_empty() {
            return Err(Error::InvalidProfile("Enter your name.".to_owned()));
        }

        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(Error::InvalidProfile(format!(
                "Your name must be at most {MAX_NAME_LENGTH} characters."
            )));
        }

        if let Some(age) = self.age
            && !(MIN_AGE..=MAX_AGE).contains(&age)
        {
            return Err(Error::InvalidProfile(format!(
                "Age must be between {MIN_AGE} and {MAX_AGE}."
            )));
        }

        if self.financial_goals.chars().count() > MAX_GOALS_LENGTH {
            return Err(Error::InvalidProfile(format!(
                "Financial goals must be at most {MAX_GOALS_LENGTH} characters."
            )));
        }

        validate_choice("annual income", &self.income_range, &INCOME_RANGES)?;
        validate_choice("current savings", &self.current_savings, &SAVINGS_RANGES)?;
        validate_choice(
            "monthly expenses",
            &self.monthly_expenses,
            &MONTHLY_EXPENSE_RANGES,
        )?;
        validate_choice("risk tolerance", &self.risk_tolerance, &RISK_TOLERANCES)?;
        validate_choice(
            "investment experience",
            &self.investment_experience,
            &INVESTMENT_EXPERIENCE,
        )?;

        Ok(())
    }
}

fn validate_choice(field: &str, value: &str, choices: &[Choice]) -> Result<(), Error> {
    if choices.iter().any(|(choice, _)| *choice == value) {
        Ok(())
    } else {
        Err(Error::InvalidProfile(format!("Choose an option for {field}.")))
    }
}

/// Create the profile table.
///
/// # Errors
/// This function will return an error if the SQL query failed.
pub fn create_profile_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS profile (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                age INTEGER,
                income_range TEXT NOT NULL,
                current_savings TEXT NOT NULL,
                monthly_expenses TEXT NOT NULL,
                financial_goals TEXT NOT NULL,
                risk_tolerance TEXT NOT NULL,
                investment_experience TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Validate and insert a new profile into the database.
///
/// The name is stored with surrounding whitespace removed.
///
/// # Errors
/// Returns a [Error::InvalidProfile] if the form is invalid, or
/// [Error::SqlError] if an SQL related error occurred.
pub fn create_profile(new_profile: NewProfile, connection: &Connection) -> Result<Profile, Error> {
    new_profile.validate()?;

    let profile = connection
        .prepare(
            "INSERT INTO profile (name, age, income_range, current_savings, monthly_expenses,
                financial_goals, risk_tolerance, investment_experience)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             RETURNING id, name, age, income_range, current_savings, monthly_expenses,
                financial_goals, risk_tolerance, investment_experience",
        )?
        .query_row(
            (
                new_profile.name.trim(),
                new_profile.age,
                &new_profile.income_range,
                &new_profile.current_savings,
                &new_profile.monthly_expenses,
                new_profile.financial_goals.trim(),
                &new_profile.risk_tolerance,
                &new_profile.investment_experience,
            ),
            map_profile_row,
        )?;

    Ok(profile)
}

/// Get the profile with `id`.
///
/// # Errors
/// Returns [Error::NotFound] if there is no such profile, or
/// [Error::SqlError] for other SQL errors.
pub fn get_profile(id: ProfileId, connection: &Connection) -> Result<Profile, Error> {
    let profile = connection
        .prepare(
            "SELECT id, name, age, income_range, current_savings, monthly_expenses,
                financial_goals, risk_tolerance, investment_experience
             FROM profile WHERE id = :id",
        )?
        .query_one(&[(":id", &id.as_i64())], map_profile_row)?;

    Ok(profile)
}

fn map_profile_row(row: &Row) -> Result<Profile, rusqlite::Error> {
    Ok(Profile {
        id: ProfileId::new(row.get(0)?),
        name: row.get(1)?,
        age: row.get(2)?,
        income_range: row.get(3)?,
        current_savings: row.get(4)?,
        monthly_expenses: row.get(5)?,
        financial_goals: row.get(6)?,
        risk_tolerance: row.get(7)?,
        investment_experience: row.get(8)?,
    })
}

#[cfg(test)]
pub(crate) fn test_profile() -> NewProfile {
    NewProfile {
        name: "Alex".to_owned(),
        age: Some(34),
        income_range: "50k-75k".to_owned(),
        current_savings: "5k-15k".to_owned(),
        monthly_expenses: "2k-4k".to_owned(),
        financial_goals: "Build an emergency fund".to_owned(),
        risk_tolerance: "moderate".to_owned(),
        investment_experience: "beginner".to_owned(),
    }
}
