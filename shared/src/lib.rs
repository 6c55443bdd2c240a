//! Shared types for the storefront
//!
//! Entity models, status enums, money arithmetic and id/time utilities
//! used by the store-server crate and any transport layer bolted on top.

pub mod models;
pub mod money;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
