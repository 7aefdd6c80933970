//! Order Repository
//!
//! Appends order drafts into the shared `order` collection under
//! store-generated keys and serves the read paths. Status mutations go
//! through `StatusTracker`, which delegates to [`OrderRepository::patch_status`]
//! so that only the status field and its timestamp slot are ever touched.

use super::{BaseRepository, PersistenceError, RepoResult};
use crate::builder::validate_order;
use serde::{Deserialize, Serialize};
use shared::models::{Order, OrderStatus};
use shared::types::Timestamp;
use std::time::Duration;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "order";

/// Result of a successful save: the store-assigned key plus the
/// client-generated human-readable number.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SavedOrder {
    pub order_id: String,
    pub order_number: String,
}

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
    save_timeout_ms: u64,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>, save_timeout_ms: u64) -> Self {
        Self {
            base: BaseRepository::new(db),
            save_timeout_ms,
        }
    }

    /// Append a draft to the `order` collection.
    ///
    /// Re-validates the draft (defense in depth), then collapses
    /// duplicate submissions: if a record with the same client-generated
    /// `request_id` already exists, its ids are returned and no second
    /// record is written. Drafts built independently carry distinct
    /// request ids, so identical business content from two checkouts
    /// still produces two records.
    ///
    /// The write runs under an explicit timeout; on expiry the order must
    /// be treated as not placed.
    pub async fn save(&self, draft: &Order) -> RepoResult<SavedOrder> {
        validate_order(draft)?;

        let write = self.save_inner(draft);
        match tokio::time::timeout(Duration::from_millis(self.save_timeout_ms), write).await {
            Ok(result) => result,
            Err(_) => Err(PersistenceError::Timeout(self.save_timeout_ms)),
        }
    }

    async fn save_inner(&self, draft: &Order) -> RepoResult<SavedOrder> {
        let mut existing = self
            .base
            .db()
            .query("SELECT <string>id AS order_id, order_number FROM order WHERE request_id = $rid LIMIT 1")
            .bind(("rid", draft.request_id.clone()))
            .await?;
        let prior: Vec<SavedOrder> = existing.take(0)?;
        if let Some(prior) = prior.into_iter().next() {
            tracing::info!(
                order_id = %prior.order_id,
                request_id = %draft.request_id,
                "duplicate submission collapsed"
            );
            return Ok(prior);
        }

        let mut result = self
            .base
            .db()
            .query(
                r#"
                LET $created = (CREATE order CONTENT $draft);
                SELECT <string>id AS order_id, order_number FROM $created;
            "#,
            )
            .bind(("draft", draft.clone()))
            .await?;

        // slot 0 belongs to the LET statement; the projection is slot 1
        let created: Vec<SavedOrder> = result.take(1)?;
        let saved = created
            .into_iter()
            .next()
            .ok_or(PersistenceError::MissingKey)?;
        tracing::info!(
            order_id = %saved.order_id,
            order_number = %saved.order_number,
            total = draft.pricing.total,
            "order persisted"
        );
        Ok(saved)
    }

    /// Fetch a single order by its store-assigned key.
    pub async fn find_by_id(&self, order_id: &str) -> RepoResult<Option<Order>> {
        // An unparsable id cannot name a record
        let Ok(record_id) = order_id.parse::<RecordId>() else {
            return Ok(None);
        };
        let mut result = self
            .base
            .db()
            .query("SELECT *, <string>id AS id FROM order WHERE id = $id")
            .bind(("id", record_id))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders.into_iter().next())
    }

    /// Order history for one owner, most-recent-first.
    ///
    /// The ownership index does not support timestamp ordering, so the
    /// limit applies at fetch time and the sort happens client-side:
    /// this is `limit` fetched-then-sorted, not the `limit` most recent.
    pub async fn find_by_owner(&self, owner_id: &str, limit: usize) -> RepoResult<Vec<Order>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT *, <string>id AS id FROM order \
                 WHERE customer.identity.owner_id = $owner LIMIT $limit",
            )
            .bind(("owner", owner_id.to_string()))
            .bind(("limit", limit as i64))
            .await?;
        let mut orders: Vec<Order> = result.take(0)?;
        orders.sort_by_key(|o| std::cmp::Reverse(o.metadata.submitted_at));
        Ok(orders)
    }

    /// Full-collection read. Cost is O(total historical orders); the
    /// statistics aggregator filters client-side on top of this.
    pub async fn find_all(&self) -> RepoResult<Vec<Order>> {
        let mut result = self
            .base
            .db()
            .query("SELECT *, <string>id AS id FROM order")
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders)
    }

    /// Patch exactly the `status` field and its matching timestamp slot.
    /// Never a full-record overwrite: `items`, `pricing` and `customer`
    /// survive every status change untouched.
    pub async fn patch_status(
        &self,
        order_id: &str,
        status: OrderStatus,
        timestamp: Timestamp,
    ) -> RepoResult<()> {
        let record_id: RecordId = order_id
            .parse()
            .map_err(|_| PersistenceError::Database(format!("invalid record id: {order_id}")))?;
        // status names are a closed set, safe to interpolate as a field path
        let sql = format!(
            "UPDATE $id SET status = $status, status_timestamps.{} = $ts",
            status.as_str()
        );
        self.base
            .db()
            .query(sql)
            .bind(("id", record_id))
            .bind(("status", status))
            .bind(("ts", timestamp))
            .await?;
        Ok(())
    }
}
