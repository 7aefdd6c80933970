//! Shared data model for the Amerta order engine
//!
//! Types in this crate are consumed by the engine itself and by the
//! rendering layer / staff tooling that sit on either side of it.

pub mod error;
pub mod models;
pub mod types;
pub mod util;
