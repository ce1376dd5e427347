use std::error::Error;
use std::fmt;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use crate::{
    csv_utils::write_csv,
    dto::{BalanceRow, CartRow, CollectionRow, TransactionRow},
    Engine, FileStore,
};

type Result<T, E = Box<dyn Error + Send + Sync>> = std::result::Result<T, E>;

/// Which persisted collection to export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Transactions,
    Collections,
    Cart,
    Balance,
}

#[derive(Debug)]
pub struct UnknownSection(String);

impl fmt::Display for UnknownSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown section '{}', expected transactions, collections, cart or balance",
            self.0
        )
    }
}

impl Error for UnknownSection {}

impl FromStr for Section {
    type Err = UnknownSection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "transactions" => Ok(Section::Transactions),
            "collections" => Ok(Section::Collections),
            "cart" => Ok(Section::Cart),
            "balance" => Ok(Section::Balance),
            other => Err(UnknownSection(other.to_owned())),
        }
    }
}

/// Opens the store file at `store_path` and writes one section of it as CSV.
///
/// # Arguments
/// * `store_path` - Path to the JSON store document
/// * `section` - Collection to export
/// * `writer` - Where to write the rows (e.g. stdout)
///
/// # Errors
/// Returns an error if writing to the output fails. Unreadable store data is
/// exported as an empty section, the same way the app would show it.
pub async fn run<P, W>(store_path: P, section: Section, writer: W) -> Result<()>
where
    P: AsRef<Path>,
    W: Write,
{
    let engine = Engine::open(Arc::new(FileStore::new(store_path))).await;

    match section {
        Section::Transactions => {
            let transactions = engine.transactions().load().await;
            write_csv(writer, transactions.iter().map(TransactionRow::from))?;
        }
        Section::Collections => {
            let collections = engine.payment_collections().load().await;
            write_csv(writer, collections.iter().map(CollectionRow::from))?;
        }
        Section::Cart => {
            write_csv(writer, engine.cart().lines().iter().map(CartRow::from))?;
        }
        Section::Balance => {
            let balance = engine.balance().load().await;
            write_csv(writer, balance.iter().map(BalanceRow::from))?;
        }
    }
    Ok(())
}
