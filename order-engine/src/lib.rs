//! Order Lifecycle & Cart Reconciliation Engine
//!
//! The engine turns a customer's in-progress cart into a durable order
//! record in a shared, concurrently-written document store, then tracks
//! that order through a forward-only status lifecycle and answers
//! aggregate reporting queries over the whole collection.
//!
//! # Components (leaves first)
//!
//! - [`cart::CartStore`] — the customer's selection; device-local state,
//!   persisted synchronously on every mutation.
//! - [`builder::OrderBuilder`] — validates cart + customer info + pricing
//!   into an immutable order draft, with optional identity enrichment.
//! - [`db::repository::OrderRepository`] — appends drafts under
//!   store-generated keys, fetches by id/owner, applies status patches.
//! - [`status::StatusTracker`] — enforces the status state machine on top
//!   of the repository.
//! - [`stats::StatisticsAggregator`] — reporting views derived by
//!   scanning the persisted collection.
//! - [`checkout::CheckoutService`] — the one multi-step async sequence:
//!   identity lookup → validation → remote write → receipt → cart clear.
//!
//! The engine has zero UI dependency; a rendering layer drives
//! `CartStore`/`CheckoutService`, staff tooling drives `StatusTracker`
//! and `StatisticsAggregator`.

pub mod builder;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod db;
pub mod identity;
pub mod promo;
pub mod stats;
pub mod status;

pub use config::Config;
