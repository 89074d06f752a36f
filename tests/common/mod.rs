// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use chrono::NaiveDate;
use spendbook::application::{LedgerService, TransactionInput};
use spendbook::domain::TransactionKind;
use tempfile::TempDir;

/// Helper to create a test service backed by a ledger file in a temporary directory
pub fn test_service() -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let service = LedgerService::open(temp_dir.path().join("expenses.csv"));
    Ok((service, temp_dir))
}

/// Helper to parse a YYYY-MM-DD string
pub fn date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

/// Build input the way the CLI does
pub fn input(kind: TransactionKind, amount: &str, date: &str, category: &str) -> TransactionInput {
    TransactionInput {
        kind,
        amount: amount.to_string(),
        date: Some(date.to_string()),
        category: Some(category.to_string()),
        note: None,
    }
}

/// Test fixture: a quarter of typical household activity
pub struct StandardLedger;

impl StandardLedger {
    /// Jan-Mar 2025: monthly salary, rent, groceries and a few extras.
    /// Totals: income 7500.00, expense 3171.30.
    pub fn populate(service: &LedgerService) -> Result<()> {
        use TransactionKind::{Expense, Income};

        let entries = [
            (Income, "2500.00", "01/01/2025", "Salary"),
            (Expense, "900.00", "03/01/2025", "Rent"),
            (Expense, "65.50", "10/01/2025", "Groceries"),
            (Expense, "12.00", "18/01/2025", "Subscriptions"),
            (Income, "2500.00", "01/02/2025", "Salary"),
            (Expense, "900.00", "03/02/2025", "Rent"),
            (Expense, "42.00", "12/02/2025", "Groceries"),
            (Expense, "31.80", "14/02/2025", "Eating Out"),
            (Income, "2500.00", "01/03/2025", "Salary"),
            (Expense, "900.00", "03/03/2025", "Rent"),
            (Expense, "320.00", "20/03/2025", "Transport"),
        ];

        for (kind, amount, date, category) in entries {
            service.record(input(kind, amount, date, category))?;
        }
        Ok(())
    }
}
