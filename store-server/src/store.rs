//! redb-based persistence gateway
//!
//! # Tables
//!
//! | Table | Key | Value |
//! |-------|-----|-------|
//! | `products` | `product_id` | JSON-serialized Product |
//! | `customers` | `customer_id` | JSON-serialized Customer |
//! | `orders` | `order_id` | JSON-serialized Order |
//! | `payments` | `payment_id` | JSON-serialized Payment |
//!
//! Every `put_*` is an idempotent overwrite inside its own write
//! transaction: redb's copy-on-write commit gives replace-on-write
//! atomicity, so a concurrent reader never observes a half-written
//! document. No multi-put transaction is offered; callers sequence their
//! writes (reserve stock before the order lands, persist the payment
//! before the order flips to PAID).

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::models::{Customer, Order, Payment, Product};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

const PRODUCTS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("products");
const CUSTOMERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("customers");
const ORDERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("orders");
const PAYMENTS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("payments");

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Entity storage backed by redb
#[derive(Clone)]
pub struct Store {
    db: Arc<Database>,
}

impl Store {
    /// Open or create the database at the given path
    ///
    /// redb commits with `Durability::Immediate`: once `commit()` returns
    /// the document is on disk and the file is in a consistent state even
    /// across power loss.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open an in-memory database (tests, demos)
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StorageResult<Self> {
        // Create all tables if they don't exist
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(PRODUCTS_TABLE)?;
            let _ = write_txn.open_table(CUSTOMERS_TABLE)?;
            let _ = write_txn.open_table(ORDERS_TABLE)?;
            let _ = write_txn.open_table(PAYMENTS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    // ========== Generic document operations ==========

    fn put<T: Serialize>(
        &self,
        table: TableDefinition<'static, &'static str, &'static [u8]>,
        id: &str,
        entity: &T,
    ) -> StorageResult<()> {
        let value = serde_json::to_vec(entity)?;
        let write_txn = self.db.begin_write()?;
        {
            let mut t = write_txn.open_table(table)?;
            t.insert(id, value.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn get<T: DeserializeOwned>(
        &self,
        table: TableDefinition<'static, &'static str, &'static [u8]>,
        id: &str,
    ) -> StorageResult<Option<T>> {
        let read_txn = self.db.begin_read()?;
        let t = read_txn.open_table(table)?;
        match t.get(id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    fn list<T: DeserializeOwned>(
        &self,
        table: TableDefinition<'static, &'static str, &'static [u8]>,
    ) -> StorageResult<Vec<T>> {
        let read_txn = self.db.begin_read()?;
        let t = read_txn.open_table(table)?;
        let mut entities = Vec::new();
        for result in t.iter()? {
            let (_key, value) = result?;
            entities.push(serde_json::from_slice(value.value())?);
        }
        Ok(entities)
    }

    // ========== Products ==========

    pub fn put_product(&self, product: &Product) -> StorageResult<()> {
        self.put(PRODUCTS_TABLE, &product.product_id, product)
    }

    pub fn get_product(&self, product_id: &str) -> StorageResult<Option<Product>> {
        self.get(PRODUCTS_TABLE, product_id)
    }

    pub fn list_products(&self) -> StorageResult<Vec<Product>> {
        self.list(PRODUCTS_TABLE)
    }

    // ========== Customers ==========

    pub fn put_customer(&self, customer: &Customer) -> StorageResult<()> {
        self.put(CUSTOMERS_TABLE, &customer.customer_id, customer)
    }

    pub fn get_customer(&self, customer_id: &str) -> StorageResult<Option<Customer>> {
        self.get(CUSTOMERS_TABLE, customer_id)
    }

    pub fn list_customers(&self) -> StorageResult<Vec<Customer>> {
        self.list(CUSTOMERS_TABLE)
    }

    // ========== Orders ==========

    pub fn put_order(&self, order: &Order) -> StorageResult<()> {
        self.put(ORDERS_TABLE, &order.order_id, order)
    }

    pub fn get_order(&self, order_id: &str) -> StorageResult<Option<Order>> {
        self.get(ORDERS_TABLE, order_id)
    }

    pub fn list_orders(&self) -> StorageResult<Vec<Order>> {
        self.list(ORDERS_TABLE)
    }

    // ========== Payments ==========

    pub fn put_payment(&self, payment: &Payment) -> StorageResult<()> {
        self.put(PAYMENTS_TABLE, &payment.payment_id, payment)
    }

    pub fn get_payment(&self, payment_id: &str) -> StorageResult<Option<Payment>> {
        self.get(PAYMENTS_TABLE, payment_id)
    }

    pub fn list_payments(&self) -> StorageResult<Vec<Payment>> {
        self.list(PAYMENTS_TABLE)
    }

    /// All payments recorded against an order
    pub fn payments_for_order(&self, order_id: &str) -> StorageResult<Vec<Payment>> {
        Ok(self
            .list_payments()?
            .into_iter()
            .filter(|p| p.order_id == order_id)
            .collect())
    }
}
