use std::fs::{File, OpenOptions};
use std::io::{self, ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::{format_cents, format_date, parse_cents, parse_date, Transaction, TransactionKind};

/// Column order of the ledger file.
pub const LEDGER_HEADER: [&str; 5] = ["date", "category", "amount", "type", "note"];

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to access ledger file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read or write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Malformed row at line {line}: {reason}")]
    MalformedRow { line: u64, reason: String },
}

/// Append-only transaction store backed by a single CSV file.
///
/// Every operation opens the file, does its work and closes it again;
/// nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct LedgerStore {
    path: PathBuf,
}

impl LedgerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the ledger file with its header row if it does not exist yet.
    /// Returns true if a new file was created.
    pub fn ensure_exists(&self) -> Result<bool, StoreError> {
        if self.path.exists() {
            return Ok(false);
        }
        let file = File::create(&self.path).map_err(|e| self.io_error(e))?;
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
        writer.write_record(LEDGER_HEADER)?;
        writer.flush().map_err(|e| self.io_error(e))?;
        info!(path = %self.path.display(), "created ledger file");
        Ok(true)
    }

    /// Append one transaction as a single row.
    /// A header row is written first when the file is new or empty.
    pub fn append(&self, transaction: &Transaction) -> Result<(), StoreError> {
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_error(e))?;
        let is_empty = file.metadata().map_err(|e| self.io_error(e))?.len() == 0;

        // A hand-edited file may lack a final newline; the new row must not join it
        if !is_empty && !ends_with_newline(&mut file).map_err(|e| self.io_error(e))? {
            file.write_all(b"\n").map_err(|e| self.io_error(e))?;
        }

        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
        if is_empty {
            writer.write_record(LEDGER_HEADER)?;
        }
        writer.write_record(to_record(transaction))?;
        writer.flush().map_err(|e| self.io_error(e))?;

        debug!(
            date = %transaction.date,
            kind = %transaction.kind,
            category = %transaction.category,
            amount_cents = transaction.amount_cents,
            "appended transaction"
        );
        Ok(())
    }

    /// Read every transaction in file order.
    /// A missing file is an empty ledger; a malformed row fails the whole load.
    pub fn load_all(&self) -> Result<Vec<Transaction>, StoreError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "ledger file not found, treating as empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(self.io_error(e)),
        };

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(file);

        let headers = reader.headers().map_err(row_error)?.clone();
        if headers.is_empty() {
            return Ok(Vec::new());
        }
        check_header(&headers)?;

        let mut transactions = Vec::new();
        for result in reader.records() {
            let record = result.map_err(row_error)?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            if record.iter().all(str::is_empty) {
                continue;
            }
            let transaction =
                from_record(&record).map_err(|reason| StoreError::MalformedRow { line, reason })?;
            transactions.push(transaction);
        }

        debug!(count = transactions.len(), "loaded ledger");
        Ok(transactions)
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

fn ends_with_newline(file: &mut File) -> io::Result<bool> {
    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

/// Attach the file line to CSV errors that carry a position, such as invalid UTF-8.
fn row_error(err: csv::Error) -> StoreError {
    if let csv::ErrorKind::Utf8 {
        pos: Some(pos),
        err: utf8,
    } = err.kind()
    {
        return StoreError::MalformedRow {
            line: pos.line(),
            reason: format!("invalid UTF-8: {}", utf8),
        };
    }
    StoreError::Csv(err)
}

fn check_header(headers: &StringRecord) -> Result<(), StoreError> {
    let matches = (4..=LEDGER_HEADER.len()).contains(&headers.len())
        && headers
            .iter()
            .zip(LEDGER_HEADER)
            .all(|(found, expected)| found.eq_ignore_ascii_case(expected));
    if matches {
        Ok(())
    } else {
        Err(StoreError::MalformedRow {
            line: 1,
            reason: format!(
                "unexpected header '{}', expected '{}'",
                headers.iter().collect::<Vec<_>>().join(","),
                LEDGER_HEADER.join(",")
            ),
        })
    }
}

/// One ledger row in [`LEDGER_HEADER`] column order.
pub(crate) fn to_record(transaction: &Transaction) -> [String; 5] {
    [
        format_date(transaction.date),
        transaction.category.clone(),
        format_cents(transaction.amount_cents),
        transaction.kind.as_str().to_string(),
        transaction.note.clone().unwrap_or_default(),
    ]
}

fn from_record(record: &StringRecord) -> Result<Transaction, String> {
    if !(4..=5).contains(&record.len()) {
        return Err(format!("expected 4 or 5 fields, found {}", record.len()));
    }

    let date_str = record.get(0).unwrap_or("");
    let category = record.get(1).unwrap_or("");
    let amount_str = record.get(2).unwrap_or("");
    let kind_str = record.get(3).unwrap_or("");
    let note = record.get(4).unwrap_or("");

    let date = parse_date(date_str).map_err(|e| e.to_string())?;
    let amount_cents =
        parse_cents(amount_str).map_err(|e| format!("invalid amount '{}': {}", amount_str, e))?;
    let kind = TransactionKind::from_str(kind_str)
        .ok_or_else(|| format!("unknown type '{}', expected income or expense", kind_str))?;

    Ok(Transaction::new(date, kind, category, amount_cents).with_note(note))
}
