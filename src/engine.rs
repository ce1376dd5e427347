use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::dto::{
    BalanceSnapshot, CollectionStatus, Invoice, InvoiceStatus, Outlet, PaymentCollection,
    Transaction,
};
use crate::kv::KeyValueStore;
use crate::stores::{
    BalanceStore, CartStore, LanguageStore, PaymentCollectionStore, TransactionStore,
};
use crate::Error;

/// Prefixes accepted on a payment authorization code.
const AUTHORIZATION_PREFIXES: [&str; 3] = ["WA-", "AUTH-", "WARUNG-"];

const ORDER_DESCRIPTION: &str = "Submit new order";

/// All stores of the app over one shared key-value adapter.
///
/// Built once at startup and handed to whatever drives the app. Besides
/// exposing the stores it implements the flows that touch more than one of
/// them: placing an order, confirming receipt of goods, collecting a payment.
pub struct Engine {
    cart: CartStore,
    balance: BalanceStore,
    transactions: TransactionStore,
    payment_collections: PaymentCollectionStore,
    language: LanguageStore,
}

impl Engine {
    pub async fn open(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            cart: CartStore::open(kv.clone()).await,
            balance: BalanceStore::new(kv.clone()),
            transactions: TransactionStore::new(kv.clone()),
            payment_collections: PaymentCollectionStore::new(kv.clone()),
            language: LanguageStore::new(kv),
        }
    }

    pub fn cart(&self) -> &CartStore {
        &self.cart
    }

    pub fn cart_mut(&mut self) -> &mut CartStore {
        &mut self.cart
    }

    pub fn balance(&self) -> &BalanceStore {
        &self.balance
    }

    pub fn transactions(&self) -> &TransactionStore {
        &self.transactions
    }

    pub fn payment_collections(&self) -> &PaymentCollectionStore {
        &self.payment_collections
    }

    pub fn language(&self) -> &LanguageStore {
        &self.language
    }

    /// Stores a freshly fetched balance, stamped with `now`.
    pub async fn refresh_balance(
        &self,
        mut snapshot: BalanceSnapshot,
        now: DateTime<Utc>,
    ) -> BalanceSnapshot {
        snapshot.last_updated = now;
        self.balance.save(&snapshot).await;
        tracing::info!(outlet = %snapshot.outlet_id, available = %snapshot.available_amount, "balance refreshed");
        snapshot
    }

    /// Turns the current cart into a transaction and empties the cart.
    ///
    /// Requires a stored balance whose available amount covers the cart total.
    pub async fn place_order(&mut self, now: DateTime<Utc>) -> Result<Transaction, Error> {
        if self.cart.is_empty() {
            return Err(Error::EmptyCart);
        }
        let total = self.cart.total();
        let balance = self.balance.load().await.ok_or(Error::InsufficientBalance)?;
        if !balance.covers(total) {
            return Err(Error::InsufficientBalance);
        }

        let millis = now.timestamp_millis();
        let day = now.format("%Y-%m-%d").to_string();
        let transaction = Transaction {
            transaction_id: format!(
                "TXN-{}-{}-{}",
                now.format("%Y%m%d"),
                balance.distributor_id,
                millis
            ),
            loan_id: Some(format!("LOAN-{millis}")),
            items: self.cart.lines().to_vec(),
            total,
            date: now,
            raw_date: day.clone(),
            transaction_date: day,
            description: ORDER_DESCRIPTION.to_owned(),
            has_good_receipt: false,
            good_receipt_total: None,
        };

        self.transactions.save(transaction.clone()).await;
        self.cart.clear().await;
        tracing::info!(transaction = %transaction.transaction_id, %total, "order placed");
        Ok(transaction)
    }

    /// Marks the goods of a transaction as received. See [`TransactionStore::confirm_receipt`].
    pub async fn confirm_receipt(
        &self,
        transaction_id: &str,
        amount: Option<Decimal>,
    ) -> Result<Transaction, Error> {
        let (transaction, confirmed) = self
            .transactions
            .apply_receipt(transaction_id, amount)
            .await?;
        if confirmed {
            tracing::info!(transaction = %transaction_id, received = ?transaction.good_receipt_total, "receipt confirmed");
        } else {
            tracing::debug!(transaction = %transaction_id, "receipt already confirmed");
        }
        Ok(transaction)
    }

    /// Records a completed payment for one of the outlet's pending invoices.
    pub async fn collect_payment(
        &self,
        outlet: &Outlet,
        invoice: &Invoice,
        authorization_code: &str,
        now: DateTime<Utc>,
    ) -> Result<PaymentCollection, Error> {
        if !is_valid_authorization_code(authorization_code) {
            return Err(Error::InvalidAuthorizationCode);
        }
        if invoice.outlet_id != outlet.id {
            return Err(Error::InvoiceOutletMismatch {
                invoice: invoice.id.clone(),
                outlet: outlet.id.clone(),
            });
        }
        if invoice.status != InvoiceStatus::Pending {
            return Err(Error::InvoiceNotPending(invoice.id.clone()));
        }

        let collection = PaymentCollection {
            id: format!("PAY-{}", now.timestamp_millis()),
            outlet_id: outlet.id.clone(),
            outlet_name: outlet.name.clone(),
            invoice_id: invoice.id.clone(),
            invoice_amount: invoice.amount,
            authorization_code: authorization_code.to_owned(),
            collection_date: now,
            status: CollectionStatus::Completed,
            notes: format!("Payment collected for invoice {}", invoice.id),
        };
        self.payment_collections.save(collection.clone()).await;
        tracing::info!(collection = %collection.id, invoice = %invoice.id, "payment collected");
        Ok(collection)
    }
}

fn is_valid_authorization_code(code: &str) -> bool {
    AUTHORIZATION_PREFIXES
        .iter()
        .any(|prefix| code.starts_with(prefix))
}
