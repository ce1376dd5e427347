//! Local persistence for the warung ordering app: cart, credit balance,
//! order history, payment collections and the language preference, all kept
//! in a string key-value store with JSON values.

mod config;
mod csv_utils;
mod dto;
mod engine;
mod error;
pub mod history;
mod kv;
mod runner;
mod stores;

pub use config::Config;
pub use csv_utils::write_csv;
pub use dto::{
    BalanceRow, BalanceSnapshot, CartLine, CartRow, CollectionRow, CollectionStatus, Invoice,
    InvoiceStatus, Language, LocalizedText, Outlet, PaymentCollection, Product, ReceiptState,
    Transaction, TransactionRow,
};
pub use engine::Engine;
pub use error::{Error, StorageError, StorageResult};
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use runner::{run, Section};
pub use stores::{
    BalanceStore, CartStore, LanguageStore, PaymentCollectionStore, Placement, Record,
    TransactionStore, BALANCE_KEY, CART_KEY, LANGUAGE_KEY, PAYMENT_COLLECTIONS_KEY,
    TRANSACTIONS_KEY,
};
