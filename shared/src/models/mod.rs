//! Data models
//!
//! Shared between store-server and any transport layer. Entities are stored
//! as JSON documents; enums serialize as SCREAMING_SNAKE_CASE tags.

pub mod address;
pub mod cart;
pub mod customer;
pub mod order;
pub mod payment;
pub mod product;

// Re-exports
pub use address::*;
pub use cart::*;
pub use customer::*;
pub use order::*;
pub use payment::*;
pub use product::*;
