use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Cents;

/// Category used when the user leaves it blank.
pub const DEFAULT_CATEGORY: &str = "Other";

/// Suggested categories shown when recording an expense.
pub const DEFAULT_CATEGORIES: [&str; 12] = [
    "Groceries",
    "Transport",
    "Eating Out",
    "Bills",
    "Rent",
    "Entertainment",
    "Health",
    "Education",
    "Subscriptions",
    "Gifts",
    "Savings",
    "Other",
];

/// Date format written to the ledger file.
pub const LEDGER_DATE_FORMAT: &str = "%d/%m/%Y";

/// Date formats accepted on input, tried in order.
const INPUT_DATE_FORMATS: [&str; 2] = [LEDGER_DATE_FORMAT, "%Y-%m-%d"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money coming in (salary, refunds, gifts received)
    Income,
    /// Money going out
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" => Some(TransactionKind::Income),
            "expense" => Some(TransactionKind::Expense),
            _ => None,
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single ledger entry. Transactions are immutable once recorded;
/// the ledger only ever grows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Calendar day the money moved
    pub date: NaiveDate,
    pub category: String,
    /// Amount in cents (never negative; direction comes from `kind`)
    pub amount_cents: Cents,
    pub kind: TransactionKind,
    pub note: Option<String>,
}

impl Transaction {
    /// Create a new transaction. A blank category becomes [`DEFAULT_CATEGORY`].
    pub fn new(
        date: NaiveDate,
        kind: TransactionKind,
        category: impl Into<String>,
        amount_cents: Cents,
    ) -> Self {
        assert!(amount_cents >= 0, "Transaction amount must not be negative");
        Self {
            date,
            category: normalize_category(&category.into()),
            amount_cents,
            kind,
            note: None,
        }
    }

    pub fn income(date: NaiveDate, category: impl Into<String>, amount_cents: Cents) -> Self {
        Self::new(date, TransactionKind::Income, category, amount_cents)
    }

    pub fn expense(date: NaiveDate, category: impl Into<String>, amount_cents: Cents) -> Self {
        Self::new(date, TransactionKind::Expense, category, amount_cents)
    }

    /// Attach a note. Blank notes are dropped.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        let note = note.into();
        let note = note.trim();
        self.note = if note.is_empty() {
            None
        } else {
            Some(note.to_string())
        };
        self
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    /// Signed effect on the balance: positive for income, negative for expenses.
    pub fn signed_amount(&self) -> Cents {
        match self.kind {
            TransactionKind::Income => self.amount_cents,
            TransactionKind::Expense => -self.amount_cents,
        }
    }
}

fn normalize_category(category: &str) -> String {
    let category = category.trim();
    if category.is_empty() {
        DEFAULT_CATEGORY.to_string()
    } else {
        category.to_string()
    }
}

/// Parse a date in `DD/MM/YYYY` or `YYYY-MM-DD` form.
pub fn parse_date(input: &str) -> Result<NaiveDate, ParseDateError> {
    let input = input.trim();
    INPUT_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(input, format).ok())
        .ok_or_else(|| ParseDateError(input.to_string()))
}

/// Format a date the way it is stored in the ledger file.
pub fn format_date(date: NaiveDate) -> String {
    date.format(LEDGER_DATE_FORMAT).to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDateError(pub String);

impl std::fmt::Display for ParseDateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid date '{}': use DD/MM/YYYY (e.g., 05/11/2025) or YYYY-MM-DD",
            self.0
        )
    }
}

impl std::error::Error for ParseDateError {}
