//! Repository Module
//!
//! Append-only access to the shared collections. Keys are always
//! store-generated; repositories never choose or reuse record ids.

pub mod order;
pub mod reservation;

pub use order::{OrderRepository, SavedOrder};
pub use reservation::{ReservationError, ReservationRepository, ReservationRequest};

use shared::error::ValidationError;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Remote store failure. A failed save means the order was **not
/// placed**: it does not exist for any reader and no retry happens here.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Draft failed re-validation before the write was attempted
    #[error("rejected before write: {0}")]
    Rejected(#[from] ValidationError),

    #[error("database error: {0}")]
    Database(String),

    #[error("remote write timed out after {0} ms")]
    Timeout(u64),

    /// The store accepted the write but returned no generated key
    #[error("store returned no record key")]
    MissingKey,
}

impl From<surrealdb::Error> for PersistenceError {
    fn from(err: surrealdb::Error) -> Self {
        PersistenceError::Database(err.to_string())
    }
}

pub type RepoResult<T> = Result<T, PersistenceError>;

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}
