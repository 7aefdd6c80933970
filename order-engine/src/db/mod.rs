//! Remote document store handle
//!
//! Embedded SurrealDB plays the role of the shared, concurrently-written
//! store: it generates record keys on create, supports field-level
//! patches, equality filters on any field, and full-collection reads.

pub mod repository;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

const NAMESPACE: &str = "amerta";
const DATABASE: &str = "main";

/// Open the store at the given path (RocksDB-backed).
pub async fn open(path: &str) -> Result<Surreal<Db>, surrealdb::Error> {
    let db = Surreal::new::<RocksDb>(path).await?;
    db.use_ns(NAMESPACE).use_db(DATABASE).await?;
    Ok(db)
}

/// Open an in-memory store (for testing).
pub async fn open_in_memory() -> Result<Surreal<Db>, surrealdb::Error> {
    let db = Surreal::new::<Mem>(()).await?;
    db.use_ns(NAMESPACE).use_db(DATABASE).await?;
    Ok(db)
}
