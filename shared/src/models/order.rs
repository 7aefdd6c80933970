//! Order Model
//!
//! Orders are append-only: once persisted, `items`, `pricing` and
//! `customer` are never mutated. Only `status` and its matching timestamp
//! slot change, via a field-level patch.

use crate::error::InvalidStatusError;
use crate::types::{Money, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Order lifecycle status.
///
/// Forward path: `pending → confirmed → preparing → ready → completed`,
/// with a branch to `cancelled` from `pending` or `confirmed`.
/// `completed` and `cancelled` are terminal.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Preparing,
    Ready,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    /// Wire name, matching the persisted representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Position on the forward path; `cancelled` sits outside it.
    fn rank(&self) -> Option<u8> {
        match self {
            OrderStatus::Pending => Some(0),
            OrderStatus::Confirmed => Some(1),
            OrderStatus::Preparing => Some(2),
            OrderStatus::Ready => Some(3),
            OrderStatus::Completed => Some(4),
            OrderStatus::Cancelled => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// Strict transition rule: the lifecycle advances exactly one step at
    /// a time, and cancellation is only possible before the kitchen has
    /// started (`pending` or `confirmed`).
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        match (self.rank(), next.rank()) {
            // cancel branch
            (Some(r), None) => r <= 1,
            // forward path, no skips and no backward moves
            (Some(from), Some(to)) => to == from + 1,
            // cancelled is terminal
            (None, _) => false,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = InvalidStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "confirmed" => Ok(OrderStatus::Confirmed),
            "preparing" => Ok(OrderStatus::Preparing),
            "ready" => Ok(OrderStatus::Ready),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" => Ok(OrderStatus::Cancelled),
            _ => Err(InvalidStatusError(s.to_string())),
        }
    }
}

/// One timestamp slot per status, null until that status is reached.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusTimestamps {
    pub pending: Option<Timestamp>,
    pub confirmed: Option<Timestamp>,
    pub preparing: Option<Timestamp>,
    pub ready: Option<Timestamp>,
    pub completed: Option<Timestamp>,
    pub cancelled: Option<Timestamp>,
}

impl StatusTimestamps {
    pub fn get(&self, status: OrderStatus) -> Option<Timestamp> {
        match status {
            OrderStatus::Pending => self.pending,
            OrderStatus::Confirmed => self.confirmed,
            OrderStatus::Preparing => self.preparing,
            OrderStatus::Ready => self.ready,
            OrderStatus::Completed => self.completed,
            OrderStatus::Cancelled => self.cancelled,
        }
    }
}

/// Order line item, annotated with its computed line subtotal at the time
/// the cart snapshot was taken.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderItem {
    pub name: String,
    /// Unit price in minor currency units
    pub unit_price: Money,
    pub quantity: u32,
    /// unit_price · quantity, frozen at order assembly
    pub subtotal: Money,
    #[serde(default)]
    pub notes: String,
    pub category: String,
    pub image_ref: String,
}

/// Optional account linkage, present only when a session could be
/// resolved at order assembly time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Identity {
    pub owner_id: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomerInfo {
    pub name: String,
    pub table_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<Identity>,
}

/// Pricing block. Invariant: `total = subtotal - discount`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pricing {
    pub subtotal: Money,
    pub discount: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promo_code: Option<String>,
    pub total: Money,
}

impl Pricing {
    /// Build a consistent pricing block from a subtotal and discount.
    pub fn new(subtotal: Money, discount: Money, promo_code: Option<String>) -> Self {
        Self {
            subtotal,
            discount,
            promo_code,
            total: subtotal - discount,
        }
    }

    pub fn is_consistent(&self) -> bool {
        self.total == self.subtotal - self.discount
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderMetadata {
    /// Originating surface, e.g. "web"
    pub source: String,
    pub submitted_at: Timestamp,
    pub locale: String,
}

/// Order entity as persisted in the `order` collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Order {
    /// Store-assigned record key, never chosen by the client.
    /// `None` on a draft that has not been persisted yet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Human-readable, client-generated number (prefix + millisecond
    /// timestamp). Monotonic within one process, not globally unique.
    pub order_number: String,
    /// Client-generated idempotency key; the repository collapses
    /// duplicate submissions carrying the same value.
    pub request_id: String,
    pub customer: CustomerInfo,
    pub items: Vec<OrderItem>,
    pub pricing: Pricing,
    pub status: OrderStatus,
    pub status_timestamps: StatusTimestamps,
    pub metadata: OrderMetadata,
}

/// Receipt blob written once to the device-local store on successful
/// submission, read once for receipt display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Receipt {
    pub order_id: String,
    pub order_number: String,
    pub customer_name: String,
    pub table_number: String,
    pub items: Vec<OrderItem>,
    pub pricing: Pricing,
    pub timestamp: Timestamp,
}
