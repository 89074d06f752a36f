use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::{Cents, Transaction, TransactionKind, YearMonth};

/// Income and expense totals for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthSummary {
    pub month: YearMonth,
    pub income: Cents,
    pub expense: Cents,
    pub net: Cents,
}

/// Expense total for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: String,
    pub total: Cents,
    pub count: usize,
    /// Share of all expenses, 0.0 to 100.0
    pub percentage: f64,
}

/// Sum of all income amounts.
pub fn total_income(transactions: &[Transaction]) -> Cents {
    total_of_kind(transactions, TransactionKind::Income)
}

/// Sum of all expense amounts.
pub fn total_expense(transactions: &[Transaction]) -> Cents {
    total_of_kind(transactions, TransactionKind::Expense)
}

fn total_of_kind(transactions: &[Transaction], kind: TransactionKind) -> Cents {
    transactions
        .iter()
        .filter(|t| t.kind == kind)
        .map(|t| t.amount_cents)
        .sum()
}

/// Balance = sum of income - sum of expenses
pub fn compute_balance(transactions: &[Transaction]) -> Cents {
    transactions
        .iter()
        .fold(0, |balance, txn| balance + txn.signed_amount())
}

/// Group transactions by calendar month, oldest month first.
/// Only months that have at least one transaction appear.
pub fn monthly_summary(transactions: &[Transaction]) -> Vec<MonthSummary> {
    let mut months: BTreeMap<YearMonth, (Cents, Cents)> = BTreeMap::new();

    for txn in transactions {
        let entry = months.entry(YearMonth::of(txn.date)).or_insert((0, 0));
        match txn.kind {
            TransactionKind::Income => entry.0 += txn.amount_cents,
            TransactionKind::Expense => entry.1 += txn.amount_cents,
        }
    }

    months
        .into_iter()
        .map(|(month, (income, expense))| MonthSummary {
            month,
            income,
            expense,
            net: income - expense,
        })
        .collect()
}

/// Group expense transactions by category.
/// Sorted by total descending; ties are broken by category name.
pub fn category_breakdown(transactions: &[Transaction]) -> Vec<CategorySummary> {
    let mut totals: HashMap<&str, (Cents, usize)> = HashMap::new();

    for txn in transactions.iter().filter(|t| t.is_expense()) {
        let entry = totals.entry(txn.category.as_str()).or_insert((0, 0));
        entry.0 += txn.amount_cents;
        entry.1 += 1;
    }

    let grand_total: Cents = totals.values().map(|(total, _)| total).sum();

    let mut categories: Vec<CategorySummary> = totals
        .into_iter()
        .map(|(category, (total, count))| CategorySummary {
            category: category.to_string(),
            total,
            count,
            percentage: percentage_of(total, grand_total),
        })
        .collect();

    categories.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| a.category.cmp(&b.category))
    });
    categories
}

fn percentage_of(part: Cents, whole: Cents) -> f64 {
    if whole == 0 {
        0.0
    } else {
        (part as f64 / whole as f64) * 100.0
    }
}
