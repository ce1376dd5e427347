//! Writes the sample payment collections used for demos into a store file.
//!
//! Example:
//! ```bash
//! cargo run --example seed_sample_data demo_store.json
//! cargo run -- collections demo_store.json
//! ```

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::env;
use std::error::Error;
use std::process;
use std::sync::Arc;

use warung_order::{CollectionStatus, FileStore, PaymentCollection, PaymentCollectionStore};

struct Sample {
    id: &'static str,
    outlet_id: &'static str,
    outlet_name: &'static str,
    invoice_id: &'static str,
    invoice_amount: i64,
    authorization_code: &'static str,
    collection_date: &'static str,
    status: CollectionStatus,
    notes: &'static str,
}

const SAMPLES: [Sample; 3] = [
    Sample {
        id: "PAY-2024-001",
        outlet_id: "OUTLET-001",
        outlet_name: "Warung Adil Jakarta",
        invoice_id: "INV-001",
        invoice_amount: 1_500_000,
        authorization_code: "WA-2024-ABC123",
        collection_date: "2024-01-15T10:30:00Z",
        status: CollectionStatus::Completed,
        notes: "Payment collected successfully via QR scan",
    },
    Sample {
        id: "PAY-2024-002",
        outlet_id: "OUTLET-002",
        outlet_name: "Warung Adil Bandung",
        invoice_id: "INV-003",
        invoice_amount: 1_800_000,
        authorization_code: "WA-2024-DEF456",
        collection_date: "2024-01-18T14:45:00Z",
        status: CollectionStatus::Completed,
        notes: "Payment collected via manual authorization code",
    },
    Sample {
        id: "PAY-2024-003",
        outlet_id: "OUTLET-003",
        outlet_name: "Warung Adil Surabaya",
        invoice_id: "INV-004",
        invoice_amount: 2_100_000,
        authorization_code: "WA-2024-GHI789",
        collection_date: "2024-01-22T09:15:00Z",
        status: CollectionStatus::Pending,
        notes: "Payment pending confirmation",
    },
];

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().init();
    if let Err(err) = run_app().await {
        eprintln!("Error: {}", err);
        process::exit(1);
    }
}

async fn run_app() -> Result<(), Box<dyn Error + Send + Sync>> {
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        return Err("Usage: cargo run --example seed_sample_data -- store.json".into());
    }

    let store = PaymentCollectionStore::new(Arc::new(FileStore::new(&args[1])));
    store.clear().await;
    // New records go to the head, so save in reverse to keep the listed order
    for sample in SAMPLES.iter().rev() {
        let collection_date: DateTime<Utc> = sample.collection_date.parse()?;
        store
            .save(PaymentCollection {
                id: sample.id.to_owned(),
                outlet_id: sample.outlet_id.to_owned(),
                outlet_name: sample.outlet_name.to_owned(),
                invoice_id: sample.invoice_id.to_owned(),
                invoice_amount: Decimal::from(sample.invoice_amount),
                authorization_code: sample.authorization_code.to_owned(),
                collection_date,
                status: sample.status,
                notes: sample.notes.to_owned(),
            })
            .await;
    }
    tracing::info!(count = SAMPLES.len(), path = %args[1], "sample payment collections written");
    Ok(())
}
