//! Cart Model

use crate::types::Money;
use serde::{Deserialize, Serialize};

/// A single cart entry.
///
/// `id` is unique and stable for the entry's lifetime; `name` is unique
/// within a cart (adding an item with a matching name merges into the
/// existing entry instead of creating a new one).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartItem {
    pub id: String,
    pub name: String,
    /// Unit price in minor currency units
    pub unit_price: Money,
    pub quantity: u32,
    /// Free-text customer annotation ("no chili", ...)
    #[serde(default)]
    pub notes: String,
    pub category: String,
    pub image_ref: String,
}

impl CartItem {
    /// Line total for this entry.
    pub fn line_total(&self) -> Money {
        self.unit_price * self.quantity as Money
    }
}

/// The customer's in-progress selection, persisted as a whole
/// (replace-on-write). Insertion order is irrelevant to computation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Cart {
    pub items: Vec<CartItem>,
}

impl Cart {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all entries.
    pub fn count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Σ unit_price · quantity over all entries.
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(CartItem::line_total).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, unit_price: Money, quantity: u32) -> CartItem {
        CartItem {
            id: format!("test-{name}"),
            name: name.to_string(),
            unit_price,
            quantity,
            notes: String::new(),
            category: "Makanan".to_string(),
            image_ref: String::new(),
        }
    }

    #[test]
    fn derived_values() {
        let cart = Cart {
            items: vec![item("Nasi Goreng", 25_000, 2), item("Es Teh", 5_000, 3)],
        };
        assert_eq!(cart.count(), 5);
        assert_eq!(cart.subtotal(), 65_000);
    }

    #[test]
    fn empty_cart_sums_to_zero() {
        let cart = Cart::default();
        assert!(cart.is_empty());
        assert_eq!(cart.count(), 0);
        assert_eq!(cart.subtotal(), 0);
    }
}
