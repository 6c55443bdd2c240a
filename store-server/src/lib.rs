//! Storefront engine
//!
//! Core pipelines for the electronics storefront:
//!
//! - **store**: redb-backed persistence gateway (products, customers,
//!   orders, payments as JSON documents)
//! - **catalog**: product browsing facade plus the stock ledger
//!   (check / reserve / release with per-product locking)
//! - **checkout**: cart -> confirmed order pipeline with compensating
//!   stock release on partial failure
//! - **payments**: confirmed order -> paid order pipeline driving a
//!   payment instrument through authorize and capture
//! - **seed**: demo catalogue bootstrap
//!
//! The web request-handling layer lives elsewhere; everything here is
//! synchronous and in-process.

pub mod catalog;
pub mod checkout;
pub mod payments;
pub mod seed;
pub mod store;

// Re-export 公共类型
pub use catalog::{CatalogService, ProductFilter, ProductSort};
pub use checkout::{CheckoutError, CheckoutService};
pub use payments::{PaymentError, PaymentService};
pub use store::{StorageError, StorageResult, Store};
