use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use tracing::{debug, info};

use crate::charts;
use crate::domain::{
    category_breakdown, compute_balance, monthly_summary, parse_cents, parse_date, total_expense,
    total_income, ParseAmountError, Transaction, TransactionKind, MAX_AMOUNT_CENTS,
};
use crate::storage::LedgerStore;

use super::{AppError, BalanceReport, CategoryReport, MonthlyReport};

/// Application service providing high-level operations for the ledger.
/// This is the primary interface for any client (CLI, tests, scripts).
pub struct LedgerService {
    store: LedgerStore,
}

/// Raw user input for a new transaction, validated by [`LedgerService::record`].
#[derive(Debug, Clone)]
pub struct TransactionInput {
    pub kind: TransactionKind,
    /// Decimal amount as typed, e.g. "12.50" or "£12.50"
    pub amount: String,
    /// DD/MM/YYYY or YYYY-MM-DD; today when omitted
    pub date: Option<String>,
    pub category: Option<String>,
    pub note: Option<String>,
}

/// Filter for querying transactions. All bounds are inclusive.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    /// Case-insensitive category match
    pub category: Option<String>,
    pub kind: Option<TransactionKind>,
}

impl TransactionFilter {
    pub fn matches(&self, txn: &Transaction) -> bool {
        self.from_date.is_none_or(|from| txn.date >= from)
            && self.to_date.is_none_or(|to| txn.date <= to)
            && self
                .category
                .as_deref()
                .is_none_or(|c| txn.category.eq_ignore_ascii_case(c.trim()))
            && self.kind.is_none_or(|k| txn.kind == k)
    }
}

impl LedgerService {
    /// Create a new ledger service with the given store.
    pub fn new(store: LedgerStore) -> Self {
        Self { store }
    }

    /// Open the ledger at the given path. The file does not need to exist yet.
    pub fn open(ledger_path: impl Into<PathBuf>) -> Self {
        Self::new(LedgerStore::new(ledger_path))
    }

    pub fn ledger_path(&self) -> &Path {
        self.store.path()
    }

    /// Create the ledger file if missing. Returns true if it was created.
    pub fn init(&self) -> Result<bool, AppError> {
        Ok(self.store.ensure_exists()?)
    }

    // ========================
    // Recording
    // ========================

    /// Validate user input and append the resulting transaction.
    pub fn record(&self, input: TransactionInput) -> Result<Transaction, AppError> {
        let amount_cents =
            parse_cents(&input.amount).map_err(|e| AppError::InvalidAmount(e.to_string()))?;
        let date = match input.date.as_deref() {
            Some(date_str) => {
                parse_date(date_str).map_err(|e| AppError::InvalidDate(e.to_string()))?
            }
            None => Local::now().date_naive(),
        };

        let mut transaction = Transaction::new(
            date,
            input.kind,
            input.category.unwrap_or_default(),
            amount_cents,
        );
        if let Some(note) = input.note {
            transaction = transaction.with_note(note);
        }

        self.record_transaction(&transaction)?;
        Ok(transaction)
    }

    /// Append an already-built transaction.
    pub fn record_transaction(&self, transaction: &Transaction) -> Result<(), AppError> {
        if transaction.amount_cents <= 0 {
            return Err(AppError::InvalidAmount(
                "Amount must be positive".to_string(),
            ));
        }
        if transaction.amount_cents > MAX_AMOUNT_CENTS {
            return Err(AppError::InvalidAmount(
                ParseAmountError::TooLarge.to_string(),
            ));
        }
        self.store.append(transaction)?;
        info!(
            kind = %transaction.kind,
            category = %transaction.category,
            amount_cents = transaction.amount_cents,
            "recorded transaction"
        );
        Ok(())
    }

    // ========================
    // Queries
    // ========================

    /// Every transaction, in the order it was recorded.
    pub fn load_transactions(&self) -> Result<Vec<Transaction>, AppError> {
        Ok(self.store.load_all()?)
    }

    /// Transactions matching the filter, in recorded order.
    /// With a limit, only the most recent `limit` matches are returned.
    pub fn list_transactions(
        &self,
        filter: &TransactionFilter,
        limit: Option<usize>,
    ) -> Result<Vec<Transaction>, AppError> {
        let mut matching: Vec<Transaction> = self
            .load_transactions()?
            .into_iter()
            .filter(|t| filter.matches(t))
            .collect();

        if let Some(limit) = limit {
            let skip = matching.len().saturating_sub(limit);
            matching.drain(..skip);
        }
        Ok(matching)
    }

    // ========================
    // Reports
    // ========================

    pub fn get_balance(&self) -> Result<BalanceReport, AppError> {
        let transactions = self.load_transactions()?;
        Ok(BalanceReport {
            total_income: total_income(&transactions),
            total_expense: total_expense(&transactions),
            net: compute_balance(&transactions),
            transaction_count: transactions.len(),
        })
    }

    pub fn get_monthly_report(&self) -> Result<MonthlyReport, AppError> {
        let transactions = self.load_transactions()?;
        Ok(MonthlyReport {
            months: monthly_summary(&transactions),
            total_income: total_income(&transactions),
            total_expense: total_expense(&transactions),
        })
    }

    pub fn get_category_report(&self) -> Result<CategoryReport, AppError> {
        let transactions = self.load_transactions()?;
        Ok(CategoryReport {
            categories: category_breakdown(&transactions),
            total: total_expense(&transactions),
        })
    }

    // ========================
    // Charts
    // ========================

    /// Render the expense-by-category pie chart to `path`.
    pub fn render_category_pie(&self, path: &Path) -> Result<(), AppError> {
        let report = self.get_category_report()?;
        debug!(categories = report.categories.len(), "rendering category pie");
        charts::render_category_pie(&report, path)?;
        Ok(())
    }

    /// Render the monthly income/expense/net line chart to `path`.
    pub fn render_monthly_trend(&self, path: &Path) -> Result<(), AppError> {
        let report = self.get_monthly_report()?;
        debug!(months = report.months.len(), "rendering monthly trend");
        charts::render_monthly_trend(&report, path)?;
        Ok(())
    }
}

/// Parse a transaction type name as typed on the command line.
pub fn parse_kind(input: &str) -> Result<TransactionKind, AppError> {
    TransactionKind::from_str(input).ok_or_else(|| AppError::InvalidKind(input.to_string()))
}
