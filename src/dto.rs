//! Records persisted by the stores, plus the flat rows used for CSV export.
//!
//! Field names on the wire match what earlier app versions wrote to device
//! storage, which is why the casing is mixed: cart lines and payment
//! collections are camelCase, transactions and the balance are snake_case.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Display language of the app.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Bahasa Indonesia.
    #[default]
    Id,
    En,
}

impl Language {
    /// Parses a stored language code. Only the exact codes `id` and `en` are recognized.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "id" => Some(Language::Id),
            "en" => Some(Language::En),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Language::Id => "id",
            Language::En => "en",
        }
    }

    /// Selects the variant of a bilingual text for this language.
    pub fn pick(self, text: &LocalizedText) -> &str {
        match self {
            Language::Id => &text.id,
            Language::En => &text.en,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalizedText {
    pub id: String,
    pub en: String,
}

/// Catalog product as offered to the outlet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub sku: String,
    pub name: String,
    pub brand: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub description: LocalizedText,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// One line of the shopping cart. Also used as the item snapshot inside a [`Transaction`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Product id, unique within a cart.
    pub id: String,
    pub sku: String,
    pub name: String,
    pub brand: String,
    #[serde(rename = "price", with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl CartLine {
    /// A fresh line for `product` with quantity 1.
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            sku: product.sku.clone(),
            name: product.name.clone(),
            brand: product.brand.clone(),
            unit_price: product.price,
            quantity: 1,
            image_url: product.image_url.clone(),
        }
    }

    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Most recently fetched credit balance of the outlet. Overwritten on each refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    pub distributor_id: String,
    pub distributor_name: String,
    pub outlet_id: String,
    #[serde(rename = "outlet_Name")]
    pub outlet_name: Option<String>,
    pub limit_type: String,
    /// Credit ceiling assigned to the outlet.
    #[serde(with = "rust_decimal::serde::float")]
    pub plafond_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub available_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub outstanding_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub hold_amount: Decimal,
    #[serde(rename = "lastUpdated")]
    pub last_updated: DateTime<Utc>,
}

impl BalanceSnapshot {
    pub fn covers(&self, amount: Decimal) -> bool {
        self.available_amount >= amount
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiptState {
    Pending,
    Confirmed,
}

/// A confirmed order, kept in the local history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub transaction_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loan_id: Option<String>,
    /// Cart lines as they were at order time.
    pub items: Vec<CartLine>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub date: DateTime<Utc>,
    pub raw_date: String,
    pub transaction_date: String,
    pub description: String,
    pub has_good_receipt: bool,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub good_receipt_total: Option<Decimal>,
}

impl Transaction {
    pub fn receipt_state(&self) -> ReceiptState {
        if self.has_good_receipt {
            ReceiptState::Confirmed
        } else {
            ReceiptState::Pending
        }
    }

    /// Moves the transaction from `Pending` to `Confirmed` with the received amount.
    /// Returns false, leaving the record untouched, when it was already confirmed.
    pub fn confirm_receipt(&mut self, amount: Decimal) -> bool {
        if self.has_good_receipt {
            return false;
        }
        self.has_good_receipt = true;
        self.good_receipt_total = Some(amount);
        true
    }

    pub fn day(&self) -> NaiveDate {
        self.date.date_naive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionStatus {
    Pending,
    Completed,
    Failed,
}

/// A payment collected from an outlet against one of its invoices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentCollection {
    pub id: String,
    pub outlet_id: String,
    pub outlet_name: String,
    pub invoice_id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub invoice_amount: Decimal,
    pub authorization_code: String,
    pub collection_date: DateTime<Utc>,
    pub status: CollectionStatus,
    pub notes: String,
}

impl PaymentCollection {
    pub fn day(&self) -> NaiveDate {
        self.collection_date.date_naive()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outlet {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Pending,
    Paid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: String,
    pub outlet_id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub status: InvoiceStatus,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct TransactionRow {
    pub transaction_id: String,
    pub date: String,
    pub items: u64,
    pub total: Decimal,
    pub has_good_receipt: bool,
    pub good_receipt_total: Option<Decimal>,
}

impl From<&Transaction> for TransactionRow {
    fn from(transaction: &Transaction) -> Self {
        Self {
            transaction_id: transaction.transaction_id.clone(),
            date: transaction.date.to_rfc3339(),
            items: transaction
                .items
                .iter()
                .map(|line| u64::from(line.quantity))
                .sum(),
            total: transaction.total,
            has_good_receipt: transaction.has_good_receipt,
            good_receipt_total: transaction.good_receipt_total,
        }
    }
}

#[derive(Debug, Serialize, PartialEq)]
pub struct CollectionRow {
    pub id: String,
    pub outlet_id: String,
    pub outlet_name: String,
    pub invoice_id: String,
    pub invoice_amount: Decimal,
    pub authorization_code: String,
    pub collection_date: String,
    pub status: CollectionStatus,
}

impl From<&PaymentCollection> for CollectionRow {
    fn from(collection: &PaymentCollection) -> Self {
        Self {
            id: collection.id.clone(),
            outlet_id: collection.outlet_id.clone(),
            outlet_name: collection.outlet_name.clone(),
            invoice_id: collection.invoice_id.clone(),
            invoice_amount: collection.invoice_amount,
            authorization_code: collection.authorization_code.clone(),
            collection_date: collection.collection_date.to_rfc3339(),
            status: collection.status,
        }
    }
}

#[derive(Debug, Serialize, PartialEq)]
pub struct CartRow {
    pub id: String,
    pub sku: String,
    pub name: String,
    pub quantity: u32,
    pub price: Decimal,
    pub line_total: Decimal,
}

impl From<&CartLine> for CartRow {
    fn from(line: &CartLine) -> Self {
        Self {
            id: line.id.clone(),
            sku: line.sku.clone(),
            name: line.name.clone(),
            quantity: line.quantity,
            price: line.unit_price,
            line_total: line.line_total(),
        }
    }
}

#[derive(Debug, Serialize, PartialEq)]
pub struct BalanceRow {
    pub distributor_id: String,
    pub outlet_id: String,
    pub plafond: Decimal,
    pub available: Decimal,
    pub outstanding: Decimal,
    pub hold: Decimal,
    pub last_updated: String,
}

impl From<&BalanceSnapshot> for BalanceRow {
    fn from(balance: &BalanceSnapshot) -> Self {
        Self {
            distributor_id: balance.distributor_id.clone(),
            outlet_id: balance.outlet_id.clone(),
            plafond: balance.plafond_amount,
            available: balance.available_amount,
            outstanding: balance.outstanding_amount,
            hold: balance.hold_amount,
            last_updated: balance.last_updated.to_rfc3339(),
        }
    }
}
