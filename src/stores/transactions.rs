//! Order history.
//!
//! Transactions are kept most-recent-first by insertion. A transaction saved
//! again under the same id replaces the stored one without moving it, which
//! is how receipt confirmation is recorded.

use rust_decimal::Decimal;
use std::sync::Arc;

use super::record_log::{Placement, Record, RecordLog};
use super::TRANSACTIONS_KEY;
use crate::dto::{ReceiptState, Transaction};
use crate::kv::KeyValueStore;
use crate::Error;

impl Record for Transaction {
    fn record_id(&self) -> &str {
        &self.transaction_id
    }
}

pub struct TransactionStore {
    log: RecordLog<Transaction>,
}

impl TransactionStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            log: RecordLog::new(kv, TRANSACTIONS_KEY),
        }
    }

    /// Inserts a new transaction at the head, or replaces the stored one with the same id in place.
    pub async fn save(&self, transaction: Transaction) -> Placement {
        self.log.save(transaction).await
    }

    pub async fn load(&self) -> Vec<Transaction> {
        self.log.load().await
    }

    pub async fn find(&self, transaction_id: &str) -> Option<Transaction> {
        self.log.find(transaction_id).await
    }

    /// Records that the goods of a transaction were received.
    ///
    /// `amount` defaults to the transaction total. Confirming an already
    /// confirmed transaction changes nothing and returns it as stored,
    /// whatever amount is passed.
    pub async fn confirm_receipt(
        &self,
        transaction_id: &str,
        amount: Option<Decimal>,
    ) -> Result<Transaction, Error> {
        self.apply_receipt(transaction_id, amount)
            .await
            .map(|(transaction, _)| transaction)
    }

    /// Like [`confirm_receipt`](Self::confirm_receipt), also reporting whether
    /// this call moved the transaction to `Confirmed`.
    pub(crate) async fn apply_receipt(
        &self,
        transaction_id: &str,
        amount: Option<Decimal>,
    ) -> Result<(Transaction, bool), Error> {
        self.log
            .update(transaction_id, |transaction| {
                if transaction.receipt_state() == ReceiptState::Confirmed {
                    return Ok(false);
                }
                match amount {
                    Some(amount) if amount <= Decimal::ZERO => Err(Error::InvalidReceiptAmount),
                    Some(amount) => Ok(transaction.confirm_receipt(amount)),
                    None => {
                        let total = transaction.total;
                        Ok(transaction.confirm_receipt(total))
                    }
                }
            })
            .await?
            .ok_or_else(|| Error::TransactionNotFound(transaction_id.to_owned()))
    }

    pub async fn clear(&self) {
        self.log.clear().await
    }
}
