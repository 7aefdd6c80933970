//! redb-based device-local storage
//!
//! Holds the two single-device blobs the engine owns:
//!
//! | Key | Value | Purpose |
//! |-----|-------|---------|
//! | `cart` | serialized [`Cart`] | replace-on-write cart state |
//! | `last_receipt` | serialized [`Receipt`] | written once per successful submission, read once |
//!
//! redb commits with `Durability::Immediate`, so every mutation is
//! persistent before the call returns; the in-memory cart and the stored
//! representation never diverge across a crash.

use redb::{Database, ReadableDatabase, TableDefinition};
use shared::models::{Cart, Receipt};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Single KV table: key = state slot name, value = JSON blob
const STATE_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("local_state");

const CART_KEY: &str = "cart";
const RECEIPT_KEY: &str = "last_receipt";

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Device-local state backed by redb
#[derive(Clone)]
pub struct CartStorage {
    db: Arc<Database>,
}

impl CartStorage {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StorageResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(STATE_TABLE)?;
        }
        write_txn.commit()?;
        Ok(Self { db: Arc::new(db) })
    }

    fn put(&self, key: &str, value: &[u8]) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(STATE_TABLE)?;
            table.insert(key, value)?;
        }
        txn.commit()?;
        Ok(())
    }

    fn get(&self, key: &str) -> StorageResult<Option<Vec<u8>>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(STATE_TABLE)?;
        Ok(table.get(key)?.map(|guard| guard.value().to_vec()))
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(STATE_TABLE)?;
            table.remove(key)?;
        }
        txn.commit()?;
        Ok(())
    }

    // ========== Cart Slot ==========

    /// Load the persisted cart; an absent slot is an empty cart.
    pub fn load_cart(&self) -> StorageResult<Cart> {
        match self.get(CART_KEY)? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => Ok(Cart::default()),
        }
    }

    /// Persist the whole cart (replace-on-write).
    pub fn store_cart(&self, cart: &Cart) -> StorageResult<()> {
        let value = serde_json::to_vec(cart)?;
        self.put(CART_KEY, &value)
    }

    /// Drop the cart slot entirely.
    pub fn clear_cart(&self) -> StorageResult<()> {
        self.remove(CART_KEY)
    }

    // ========== Receipt Slot ==========

    /// Write the last-submission receipt, replacing any previous one.
    pub fn store_receipt(&self, receipt: &Receipt) -> StorageResult<()> {
        let value = serde_json::to_vec(receipt)?;
        self.put(RECEIPT_KEY, &value)
    }

    /// Read-once: returns the stored receipt and removes it.
    pub fn take_receipt(&self) -> StorageResult<Option<Receipt>> {
        match self.get(RECEIPT_KEY)? {
            Some(bytes) => {
                let receipt: Receipt = serde_json::from_slice(&bytes)?;
                self.remove(RECEIPT_KEY)?;
                Ok(Some(receipt))
            }
            None => Ok(None),
        }
    }
}
