//! Error types for the ordering app's persistence layer.
//!
//! Two families live here:
//! - [`StorageError`]: technical failures of the key-value adapter or of JSON
//!   (de)serialization. The stores never hand these to their callers; they log
//!   them and fall back to an empty or default value.
//! - [`Error`]: business rejections raised by the [`Engine`](crate::Engine)
//!   flows, like ordering with an empty cart or confirming a receipt for an
//!   unknown transaction.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Backend error: {0}")]
    Backend(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug, Error, PartialEq)]
pub enum Error {
    #[error("cart is empty")]
    EmptyCart,

    #[error("insufficient balance")]
    InsufficientBalance,

    #[error("transaction not found: {0}")]
    TransactionNotFound(String),

    #[error("receipt amount must be positive")]
    InvalidReceiptAmount,

    #[error("payment collection not found: {0}")]
    PaymentCollectionNotFound(String),

    #[error("invalid authorization code")]
    InvalidAuthorizationCode,

    #[error("invoice {invoice} does not belong to outlet {outlet}")]
    InvoiceOutletMismatch { invoice: String, outlet: String },

    #[error("invoice {0} is not pending")]
    InvoiceNotPending(String),
}
