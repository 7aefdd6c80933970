//! Persisted record shapes
//!
//! Every struct here maps 1:1 onto a stored representation: the `order`,
//! `reservation` and `user` collections in the remote document store, or
//! the `cart` / `last_receipt` slots in the device-local store.

pub mod cart;
pub mod order;
pub mod reservation;
pub mod user;

pub use cart::{Cart, CartItem};
pub use order::{
    CustomerInfo, Identity, Order, OrderItem, OrderMetadata, OrderStatus, Pricing, Receipt,
    StatusTimestamps,
};
pub use reservation::{Reservation, ReservationStatus};
pub use user::UserProfile;
