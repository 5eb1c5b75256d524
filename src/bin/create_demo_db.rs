use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Date, Duration, OffsetDateTime};

use finboard::{
    Frequency, NewBudget, NewProfile, NewTransaction, TransactionKind, create_budget,
    create_profile, create_transaction, initialize_db,
};

/// A utility for creating a demo database for finboard.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create a database with a demo profile, a month of transactions and a few budgets.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        Some(extension) if !extension.is_empty() => {}
        _ => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating demo profile...");
    let profile = create_profile(
        NewProfile {
            name: "Jordan".to_owned(),
            age: Some(32),
            income_range: "50k-75k".to_owned(),
            current_savings: "5k-15k".to_owned(),
            monthly_expenses: "2k-4k".to_owned(),
            financial_goals: "Build an emergency fund and save for a house deposit".to_owned(),
            risk_tolerance: "moderate".to_owned(),
            investment_experience: "beginner".to_owned(),
        },
        &conn,
    )?;

    let today = OffsetDateTime::now_utc().date();
    let days_ago = |days: i64| -> Date { today - Duration::days(days) };

    println!("Creating transactions...");
    let transactions = [
        NewTransaction::new(TransactionKind::Income, 4200.0, "Salary", days_ago(28))
            .note("Monthly salary")
            .recurring(Frequency::Monthly),
        NewTransaction::new(TransactionKind::Income, 600.0, "Freelance", days_ago(12))
            .note("Website project"),
        NewTransaction::new(TransactionKind::Expense, 1800.0, "Bills & Utilities", days_ago(27))
            .note("Rent")
            .recurring(Frequency::Monthly),
        NewTransaction::new(TransactionKind::Expense, 650.0, "Food & Dining", days_ago(20))
            .note("Groceries"),
        NewTransaction::new(TransactionKind::Expense, 300.0, "Transportation", days_ago(18))
            .note("Fuel and bus fares"),
        NewTransaction::new(TransactionKind::Expense, 200.0, "Entertainment", days_ago(9))
            .note("Concert tickets"),
        NewTransaction::new(TransactionKind::Expense, 400.0, "Shopping", days_ago(6))
            .note("Winter jacket"),
        NewTransaction::new(TransactionKind::Expense, 205.0, "Healthcare", days_ago(3))
            .note("Gym membership")
            .recurring(Frequency::Monthly),
    ];

    for transaction in transactions {
        create_transaction(transaction, profile.id, &conn)?;
    }

    println!("Creating budgets...");
    for (category, monthly_limit) in [
        ("Food & Dining", 700.0),
        ("Shopping", 300.0),
        ("Entertainment", 250.0),
    ] {
        create_budget(
            NewBudget {
                category: category.to_owned(),
                monthly_limit,
                month: today.month().into(),
                year: today.year(),
            },
            profile.id,
            &conn,
        )?;
    }

    println!("Success!");

    Ok(())
}
