//! StatusTracker - drives orders through their lifecycle
//!
//! Status values arrive as raw strings from the kitchen surface, so
//! parsing and state-machine enforcement both live here. Writes are
//! delegated to the repository, which patches only the status field and
//! its timestamp slot.

use crate::db::repository::{OrderRepository, PersistenceError};
use shared::error::InvalidStatusError;
use shared::models::{Order, OrderStatus};
use shared::util::now_millis;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StatusError {
    #[error(transparent)]
    InvalidStatus(#[from] InvalidStatusError),

    #[error("order not found: {0}")]
    NotFound(String),

    #[error("cannot move order from '{from}' to '{to}'")]
    Transition { from: OrderStatus, to: OrderStatus },

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

pub struct StatusTracker {
    repo: OrderRepository,
}

impl StatusTracker {
    pub fn new(repo: OrderRepository) -> Self {
        Self { repo }
    }

    /// Move one order to `new_status`.
    ///
    /// Rejects unknown status strings, unknown orders, and any hop the
    /// state machine forbids (skipping stages, leaving a terminal state,
    /// cancelling once preparation has started). On success the record's
    /// status and the matching timestamp slot are patched; nothing else
    /// about the order changes.
    pub async fn update_status(
        &self,
        order_id: &str,
        new_status: &str,
    ) -> Result<Order, StatusError> {
        let next: OrderStatus = new_status.parse()?;

        let current = self
            .repo
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| StatusError::NotFound(order_id.to_string()))?;

        if !current.status.can_transition_to(next) {
            return Err(StatusError::Transition {
                from: current.status,
                to: next,
            });
        }

        let stamped_at = now_millis();
        self.repo.patch_status(order_id, next, stamped_at).await?;
        tracing::info!(
            order_id = %order_id,
            from = %current.status,
            to = %next,
            "order status advanced"
        );

        self.repo
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| StatusError::NotFound(order_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{CustomerDetails, OrderBuilder};
    use crate::config::Config;
    use crate::identity::MockIdentityProvider;
    use shared::models::{Cart, CartItem, Pricing};
    use std::sync::Arc;

    async fn setup() -> (StatusTracker, OrderRepository, String) {
        let db = crate::db::open_in_memory().await.unwrap();
        let repo = OrderRepository::new(db, 10_000);
        let builder = OrderBuilder::new(
            Arc::new(MockIdentityProvider::anonymous()),
            Config::default(),
        );
        let cart = Cart {
            items: vec![CartItem {
                id: "item-1".to_string(),
                name: "Es Teh".to_string(),
                unit_price: 8_000,
                quantity: 1,
                notes: String::new(),
                category: "Minuman".to_string(),
                image_ref: String::new(),
            }],
        };
        let draft = builder
            .create_order_data(
                CustomerDetails {
                    name: "Budi".to_string(),
                    table_number: "3".to_string(),
                },
                cart,
                Pricing::new(8_000, 0, None),
                None,
            )
            .await
            .unwrap();
        let saved = repo.save(&draft).await.unwrap();
        (StatusTracker::new(repo.clone()), repo, saved.order_id)
    }

    #[tokio::test]
    async fn advances_one_step_and_stamps_the_slot() {
        let (tracker, _, id) = setup().await;
        let updated = tracker.update_status(&id, "confirmed").await.unwrap();
        assert_eq!(updated.status, OrderStatus::Confirmed);
        assert!(updated.status_timestamps.confirmed.is_some());
        assert!(updated.status_timestamps.preparing.is_none());
    }

    #[tokio::test]
    async fn patch_leaves_the_rest_of_the_record_alone() {
        let (tracker, repo, id) = setup().await;
        let before = repo.find_by_id(&id).await.unwrap().unwrap();

        let after = tracker.update_status(&id, "confirmed").await.unwrap();
        assert_eq!(after.items, before.items);
        assert_eq!(after.pricing, before.pricing);
        assert_eq!(after.customer, before.customer);
        assert_eq!(after.order_number, before.order_number);
    }

    #[tokio::test]
    async fn skipping_stages_is_rejected() {
        let (tracker, _, id) = setup().await;
        let err = tracker.update_status(&id, "completed").await.unwrap_err();
        assert!(matches!(err, StatusError::Transition { .. }));
    }

    #[tokio::test]
    async fn cancel_allowed_early_but_not_once_preparing() {
        let (tracker, _, id) = setup().await;
        tracker.update_status(&id, "confirmed").await.unwrap();
        tracker.update_status(&id, "preparing").await.unwrap();

        let err = tracker.update_status(&id, "cancelled").await.unwrap_err();
        assert!(matches!(err, StatusError::Transition { .. }));
    }

    #[tokio::test]
    async fn cancel_from_pending_is_terminal() {
        let (tracker, _, id) = setup().await;
        let cancelled = tracker.update_status(&id, "cancelled").await.unwrap();
        assert_eq!(cancelled.status, OrderStatus::Cancelled);
        assert!(cancelled.status_timestamps.cancelled.is_some());

        let err = tracker.update_status(&id, "confirmed").await.unwrap_err();
        assert!(matches!(err, StatusError::Transition { .. }));
    }

    #[tokio::test]
    async fn unknown_status_string_is_rejected_without_a_read() {
        let (tracker, _, id) = setup().await;
        let err = tracker.update_status(&id, "Delivered").await.unwrap_err();
        assert!(matches!(err, StatusError::InvalidStatus(_)));
    }

    #[tokio::test]
    async fn unknown_order_is_not_found() {
        let (tracker, _, _) = setup().await;
        let err = tracker
            .update_status("order:missing", "confirmed")
            .await
            .unwrap_err();
        assert!(matches!(err, StatusError::NotFound(_)));
    }

    #[tokio::test]
    async fn full_lifecycle_fills_every_slot() {
        let (tracker, repo, id) = setup().await;
        for step in ["confirmed", "preparing", "ready", "completed"] {
            tracker.update_status(&id, step).await.unwrap();
        }
        let done = repo.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(done.status, OrderStatus::Completed);
        assert!(done.status_timestamps.confirmed.is_some());
        assert!(done.status_timestamps.preparing.is_some());
        assert!(done.status_timestamps.ready.is_some());
        assert!(done.status_timestamps.completed.is_some());
        assert!(done.status_timestamps.cancelled.is_none());

        // completed is terminal
        let err = tracker.update_status(&id, "confirmed").await.unwrap_err();
        assert!(matches!(err, StatusError::Transition { .. }));
    }
}
