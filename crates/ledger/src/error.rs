//! The module contains the errors the ledger can return.
//!
//! - [`Validation`] when a field of a new transaction is missing or malformed.
//!   Nothing has been written when it is returned.
//! - [`KeyNotFound`] when an operation needs an existing row that is absent.
//! - [`CorruptedRow`] when a stored row cannot be turned back into a
//!   [`Transaction`].
//! - [`Storage`] when the backing database fails.
//!
//! Removing an id that does not exist is not an error.
//!
//!  [`Validation`]: LedgerError::Validation
//!  [`KeyNotFound`]: LedgerError::KeyNotFound
//!  [`CorruptedRow`]: LedgerError::CorruptedRow
//!  [`Storage`]: LedgerError::Storage
//!  [`Transaction`]: crate::Transaction
use sea_orm::DbErr;
use thiserror::Error;

/// Ledger custom errors.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(i64),
    #[error("Corrupted row: {0}")]
    CorruptedRow(String),
    #[error(transparent)]
    Storage(#[from] DbErr),
}

impl LedgerError {
    /// Returns `true` for failures of the backing store.
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}

impl PartialEq for LedgerError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::CorruptedRow(a), Self::CorruptedRow(b)) => a == b,
            (Self::Storage(a), Self::Storage(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
