//! Writes transactions and per-category summaries as CSV documents.

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::{
    Error,
    aggregation::{aggregate, sorted_groups},
    transaction::Transaction,
};

const TRANSACTION_HEADER: [&str; 6] = ["Date", "Type", "Category", "Amount", "Note", "Recurring"];
const SUMMARY_HEADER: [&str; 4] = ["Type", "Category", "Total Amount", "Transaction Count"];

fn write_csv<const N: usize>(header: [&str; N], rows: Vec<[String; N]>) -> Result<String, Error> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(header)?;

    for row in rows {
        writer.write_record(&row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|error| Error::CsvError(error.to_string()))?;

    String::from_utf8(bytes).map_err(|error| Error::CsvError(error.to_string()))
}

/// One row per transaction in the order given, every field quoted.
///
/// # Errors
/// Returns [Error::CsvError] if the CSV cannot be written.
pub fn transactions_csv(transactions: &[Transaction]) -> Result<String, Error> {
    let rows = transactions
        .iter()
        .map(|transaction| {
            [
                transaction.date.to_string(),
                transaction.kind.as_str().to_owned(),
                transaction.category.clone(),
                format!("{:.2}", transaction.amount),
                transaction.note.clone().unwrap_or_default(),
                if transaction.is_recurring { "Yes" } else { "No" }.to_owned(),
            ]
        })
        .collect();

    write_csv(TRANSACTION_HEADER, rows)
}

/// One row per (type, category) group, sorted by type then category.
///
/// # Errors
/// Returns [Error::CsvError] if the CSV cannot be written.
pub fn summary_csv(transactions: &[Transaction]) -> Result<String, Error> {
    let rows = sorted_groups(aggregate(transactions))
        .into_iter()
        .map(|((kind, category), group)| {
            [
                kind.as_str().to_owned(),
                category,
                format!("{:.2}", group.total),
                group.count.to_string(),
            ]
        })
        .collect();

    write_csv(SUMMARY_HEADER, rows)
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        category::TransactionKind,
        recurrence::Frequency,
        transaction::{Transaction, test_transaction},
    };

    use super::{summary_csv, transactions_csv};

    fn transactions() -> Vec<Transaction> {
        vec![
            Transaction {
                note: Some("Rent, \"March\"".to_owned()),
                is_recurring: true,
                recurring_frequency: Some(Frequency::Monthly),
                ..test_transaction(
                    TransactionKind::Expense,
                    "Bills & Utilities",
                    1800.0,
                    date!(2024 - 03 - 05),
                )
            },
            test_transaction(TransactionKind::Income, "Salary", 4200.5, date!(2024 - 03 - 01)),
            test_transaction(
                TransactionKind::Expense,
                "Food & Dining",
                20.0,
                date!(2024 - 03 - 02),
            ),
            test_transaction(
                TransactionKind::Expense,
                "Food & Dining",
                12.25,
                date!(2024 - 03 - 03),
            ),
        ]
    }

    #[test]
    fn transactions_csv_quotes_every_field() {
        let csv = transactions_csv(&transactions()[..2]).unwrap();

        assert_eq!(
            csv,
            "\"Date\",\"Type\",\"Category\",\"Amount\",\"Note\",\"Recurring\"\n\
            \"2024-03-05\",\"expense\",\"Bills & Utilities\",\"1800.00\",\"Rent, \"\"March\"\"\",\"Yes\"\n\
            \"2024-03-01\",\"income\",\"Salary\",\"4200.50\",\"\",\"No\"\n"
        );
    }

    #[test]
    fn transactions_csv_of_nothing_is_just_the_header() {
        let csv = transactions_csv(&[]).unwrap();

        assert_eq!(
            csv,
            "\"Date\",\"Type\",\"Category\",\"Amount\",\"Note\",\"Recurring\"\n"
        );
    }

    #[test]
    fn summary_csv_groups_by_type_and_category() {
        let csv = summary_csv(&transactions()).unwrap();

        assert_eq!(
            csv,
            "\"Type\",\"Category\",\"Total Amount\",\"Transaction Count\"\n\
            \"income\",\"Salary\",\"4200.50\",\"1\"\n\
            \"expense\",\"Bills & Utilities\",\"1800.00\",\"1\"\n\
            \"expense\",\"Food & Dining\",\"32.25\",\"2\"\n"
        );
    }
}
