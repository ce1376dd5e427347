//! Persistent stores of the ordering app. Provides storage for:
//! - The shopping cart ([`CartStore`])
//! - The last fetched credit balance ([`BalanceStore`])
//! - Order history ([`TransactionStore`])
//! - Payment collection history ([`PaymentCollectionStore`])
//! - The display language ([`LanguageStore`])
//!
//! Each store owns exactly one key of the shared [`KeyValueStore`] and never
//! touches another store's key. Storage failures stop here: they are logged
//! and replaced by the empty or default value, so callers only ever see data.

mod balance;
mod cart;
mod language;
mod payment_collections;
mod record_log;
mod transactions;

pub use balance::BalanceStore;
pub use cart::CartStore;
pub use language::LanguageStore;
pub use payment_collections::PaymentCollectionStore;
pub use record_log::{Placement, Record};
pub use transactions::TransactionStore;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StorageResult;
use crate::kv::KeyValueStore;

// Key names are shared with installs of earlier app versions.
pub const CART_KEY: &str = "@warung_order_app_cart";
pub const LANGUAGE_KEY: &str = "@warung_order_app_language";
pub const BALANCE_KEY: &str = "warung_order_app_balance_data";
pub const TRANSACTIONS_KEY: &str = "warung_order_app_transactions_data";
pub const PAYMENT_COLLECTIONS_KEY: &str = "warung_order_app_payment_collections_data";

async fn read_json<T: DeserializeOwned>(
    kv: &dyn KeyValueStore,
    key: &str,
) -> StorageResult<Option<T>> {
    match kv.get(key).await? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

async fn write_json<T: Serialize + ?Sized>(
    kv: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> StorageResult<()> {
    kv.set(key, serde_json::to_string(value)?).await
}

/// Reads `key`, falling back to `T::default()` when it is absent, unreadable or malformed.
async fn load_or_default<T: DeserializeOwned + Default>(kv: &dyn KeyValueStore, key: &str) -> T {
    match read_json(kv, key).await {
        Ok(Some(value)) => value,
        Ok(None) => T::default(),
        Err(e) => {
            tracing::error!(key, error = %e, "failed to load stored value");
            T::default()
        }
    }
}

/// Writes `value` under `key`. Returns whether the write succeeded; failures are logged.
async fn save_or_log<T: Serialize + ?Sized>(kv: &dyn KeyValueStore, key: &str, value: &T) -> bool {
    match write_json(kv, key, value).await {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(key, error = %e, "failed to save value");
            false
        }
    }
}

async fn remove_or_log(kv: &dyn KeyValueStore, key: &str) -> bool {
    match kv.remove(key).await {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(key, error = %e, "failed to clear stored value");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::testing::FailingStore;
    use crate::kv::MemoryStore;

    #[tokio::test]
    async fn test_load_absent_key_is_default() {
        let kv = MemoryStore::new();
        let value: Vec<String> = load_or_default(&kv, "absent").await;
        assert!(value.is_empty());
    }

    #[tokio::test]
    async fn test_load_malformed_value_is_default() {
        let kv = MemoryStore::new();
        kv.set("k", "{not json".to_string()).await.unwrap();
        let value: Option<Vec<u32>> = load_or_default(&kv, "k").await;
        assert_eq!(value, None);
    }

    #[tokio::test]
    async fn test_load_wrong_shape_is_default() {
        let kv = MemoryStore::new();
        kv.set("k", r#"{"an":"object"}"#.to_string()).await.unwrap();
        let value: Vec<u32> = load_or_default(&kv, "k").await;
        assert!(value.is_empty());
    }

    #[tokio::test]
    async fn test_failures_are_masked() {
        let kv = FailingStore;
        let value: Vec<u32> = load_or_default(&kv, "k").await;
        assert!(value.is_empty());
        assert!(!save_or_log(&kv, "k", &[1u32]).await);
        assert!(!remove_or_log(&kv, "k").await);
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let kv = MemoryStore::new();
        assert!(save_or_log(&kv, "k", &[1u32, 2, 3]).await);
        let value: Vec<u32> = load_or_default(&kv, "k").await;
        assert_eq!(value, vec![1, 2, 3]);
    }
}
