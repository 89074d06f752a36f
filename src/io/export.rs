use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::application::{LedgerService, TransactionFilter};
use crate::domain::Transaction;
use crate::storage::{to_record, LEDGER_HEADER};

/// Ledger snapshot for JSON export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub transactions: Vec<Transaction>,
}

/// Exporter for writing filtered ledger data to other files
pub struct Exporter<'a> {
    service: &'a LedgerService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a LedgerService) -> Self {
        Self { service }
    }

    /// Matching transactions ordered by date. Same-day entries keep ledger order.
    fn sorted_matches(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>> {
        let mut transactions = self.service.list_transactions(filter, None)?;
        transactions.sort_by_key(|t| t.date);
        Ok(transactions)
    }

    /// Export matching transactions to CSV, in the ledger's own column layout,
    /// so an export can be opened as a ledger file.
    pub fn export_csv<W: Write>(&self, filter: &TransactionFilter, writer: W) -> Result<usize> {
        let transactions = self.sorted_matches(filter)?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(LEDGER_HEADER)?;

        let mut count = 0;
        for txn in &transactions {
            csv_writer.write_record(to_record(txn))?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export matching transactions as a JSON snapshot
    pub fn export_json<W: Write>(
        &self,
        filter: &TransactionFilter,
        mut writer: W,
    ) -> Result<LedgerSnapshot> {
        let snapshot = LedgerSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            transactions: self.sorted_matches(filter)?,
        };

        let json = serde_json::to_string_pretty(&snapshot)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;

        Ok(snapshot)
    }
}
