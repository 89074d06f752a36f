use thiserror::Error;

use crate::charts::ChartError;
use crate::storage::StoreError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid transaction type '{0}': expected income or expense")]
    InvalidKind(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Chart(#[from] ChartError),
}
