//! CartStore - the customer's in-progress selection
//!
//! All mutations are synchronous and persist the whole cart before
//! returning, so the stored representation is always consistent with
//! memory. The store is an explicit instance injected into whatever
//! drives the UI; nothing here touches rendering.

pub mod storage;

pub use storage::{CartStorage, StorageError, StorageResult};

use shared::models::{Cart, CartItem};
use shared::types::Money;
use thiserror::Error;
use uuid::Uuid;

/// Cart mutation errors
#[derive(Debug, Error)]
pub enum CartError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("unit price must be non-negative, got {0}")]
    NegativePrice(Money),
}

/// Input for a new cart entry; quantity starts at 1 and notes empty.
#[derive(Debug, Clone)]
pub struct ItemDraft {
    pub name: String,
    pub unit_price: Money,
    pub category: String,
    pub image_ref: String,
}

/// Outcome of [`CartStore::update_quantity`].
///
/// A requested quantity below 1 is a removal request, not a clamp: the
/// store leaves the entry untouched and the caller must confirm intent
/// before following up with [`CartStore::remove_item`]. Values above the
/// configured cap are rejected outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityOutcome {
    Updated,
    RemovalRequested,
    RejectedOverCap,
    /// No entry with the given id
    NotFound,
}

/// Owns cart state and keeps the local store in sync on every mutation.
pub struct CartStore {
    items: Vec<CartItem>,
    storage: CartStorage,
    max_quantity: u32,
}

impl CartStore {
    /// Open the store, restoring any previously persisted cart.
    pub fn open(storage: CartStorage, max_quantity: u32) -> Result<Self, CartError> {
        let cart = storage.load_cart()?;
        Ok(Self {
            items: cart.items,
            storage,
            max_quantity,
        })
    }

    fn persist(&self) -> Result<(), CartError> {
        self.storage.store_cart(&Cart {
            items: self.items.clone(),
        })?;
        Ok(())
    }

    /// Add one unit of an item. Matching `name` merges into the existing
    /// entry; otherwise a new entry is created with a fresh id.
    pub fn add_item(&mut self, draft: ItemDraft) -> Result<(), CartError> {
        if draft.unit_price < 0 {
            return Err(CartError::NegativePrice(draft.unit_price));
        }

        match self.items.iter_mut().find(|i| i.name == draft.name) {
            Some(existing) => existing.quantity += 1,
            None => self.items.push(CartItem {
                id: Uuid::new_v4().to_string(),
                name: draft.name,
                unit_price: draft.unit_price,
                quantity: 1,
                notes: String::new(),
                category: draft.category,
                image_ref: draft.image_ref,
            }),
        }
        self.persist()
    }

    /// Set an entry's quantity. See [`QuantityOutcome`] for the `< 1` and
    /// over-cap cases, both of which leave the cart unchanged.
    pub fn update_quantity(
        &mut self,
        id: &str,
        new_quantity: u32,
    ) -> Result<QuantityOutcome, CartError> {
        let Some(item) = self.items.iter_mut().find(|i| i.id == id) else {
            return Ok(QuantityOutcome::NotFound);
        };
        if new_quantity < 1 {
            return Ok(QuantityOutcome::RemovalRequested);
        }
        if new_quantity > self.max_quantity {
            tracing::debug!(id, new_quantity, cap = self.max_quantity, "quantity over cap rejected");
            return Ok(QuantityOutcome::RejectedOverCap);
        }
        item.quantity = new_quantity;
        self.persist()?;
        Ok(QuantityOutcome::Updated)
    }

    /// Delete an entry; no-op if `id` is absent.
    pub fn remove_item(&mut self, id: &str) -> Result<(), CartError> {
        let before = self.items.len();
        self.items.retain(|i| i.id != id);
        if self.items.len() != before {
            self.persist()?;
        }
        Ok(())
    }

    /// Attach a free-text note to an entry; no-op if `id` is absent.
    pub fn set_notes(&mut self, id: &str, text: &str) -> Result<(), CartError> {
        let Some(item) = self.items.iter_mut().find(|i| i.id == id) else {
            return Ok(());
        };
        item.notes = text.to_string();
        self.persist()
    }

    /// Empty the cart. Called exactly once per successful submission.
    pub fn clear(&mut self) -> Result<(), CartError> {
        self.items.clear();
        self.storage.clear_cart()?;
        Ok(())
    }

    /// Immutable cart value for handoff to the order builder.
    pub fn snapshot(&self) -> Cart {
        Cart {
            items: self.items.clone(),
        }
    }

    pub fn count(&self) -> u32 {
        self.snapshot().count()
    }

    pub fn subtotal(&self) -> Money {
        self.snapshot().subtotal()
    }
}
