//! CheckoutService - cart to persisted order in one call
//!
//! Sequencing is the whole point of this module: the cart is only
//! cleared after the order is durably stored, so any failure up to and
//! including the save leaves the customer's selection intact for a
//! retry. Failures after the save are reported with the placed order's
//! ids so the caller never re-submits.

use crate::builder::{CustomerDetails, OrderBuilder};
use crate::cart::{CartError, CartStorage, CartStore};
use crate::db::repository::{OrderRepository, PersistenceError, SavedOrder};
use crate::promo;
use shared::error::ValidationError;
use shared::models::{Pricing, Receipt};
use shared::util::now_millis;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("unknown promo code: {0}")]
    UnknownPromo(String),

    #[error(transparent)]
    Rejected(#[from] ValidationError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// The order was placed; only local bookkeeping failed afterwards.
    /// Retrying the submission would duplicate the order.
    #[error("order {order_number} was placed but local cleanup failed: {source}")]
    PostSave {
        order_id: String,
        order_number: String,
        source: CartError,
    },
}

pub struct CheckoutService {
    builder: OrderBuilder,
    repo: OrderRepository,
    storage: CartStorage,
}

impl CheckoutService {
    pub fn new(builder: OrderBuilder, repo: OrderRepository, storage: CartStorage) -> Self {
        Self {
            builder,
            repo,
            storage,
        }
    }

    /// Submit the current cart as an order.
    ///
    /// Resolves the promo code, assembles and validates the draft,
    /// persists it, writes the local receipt, then clears the cart.
    pub async fn submit(
        &self,
        cart: &mut CartStore,
        customer: CustomerDetails,
        promo_code: Option<&str>,
    ) -> Result<SavedOrder, CheckoutError> {
        let snapshot = cart.snapshot();

        let promo_code = promo_code.map(str::trim).filter(|c| !c.is_empty());
        let discount = match promo_code {
            Some(code) => {
                promo::resolve(code).ok_or_else(|| CheckoutError::UnknownPromo(code.to_string()))?
            }
            None => 0,
        };

        let pricing = Pricing::new(snapshot.subtotal(), discount, None);
        let draft = self
            .builder
            .create_order_data(customer, snapshot, pricing, promo_code)
            .await?;

        let saved = self.repo.save(&draft).await?;

        let receipt = Receipt {
            order_id: saved.order_id.clone(),
            order_number: saved.order_number.clone(),
            customer_name: draft.customer.name.clone(),
            table_number: draft.customer.table_number.clone(),
            items: draft.items.clone(),
            pricing: draft.pricing.clone(),
            timestamp: now_millis(),
        };
        if let Err(err) = self
            .storage
            .store_receipt(&receipt)
            .map_err(CartError::from)
            .and_then(|()| cart.clear())
        {
            tracing::warn!(
                order_id = %saved.order_id,
                error = %err,
                "order placed but local cleanup failed"
            );
            return Err(CheckoutError::PostSave {
                order_id: saved.order_id,
                order_number: saved.order_number,
                source: err,
            });
        }

        tracing::info!(
            order_id = %saved.order_id,
            order_number = %saved.order_number,
            "checkout complete"
        );
        Ok(saved)
    }
}
