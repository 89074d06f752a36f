use serde::{Deserialize, Serialize};

use crate::domain::{Cents, CategorySummary, MonthSummary};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceReport {
    pub total_income: Cents,
    pub total_expense: Cents,
    pub net: Cents,
    pub transaction_count: usize,
}

impl BalanceReport {
    /// True when income covers expenses.
    pub fn is_surplus(&self) -> bool {
        self.net >= 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyReport {
    pub months: Vec<MonthSummary>,
    pub total_income: Cents,
    pub total_expense: Cents,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryReport {
    pub categories: Vec<CategorySummary>,
    pub total: Cents,
}
