//! Catalog service - product browsing facade plus the stock ledger
//!
//! Products are cached in a `DashMap` loaded at warmup and written through
//! to the store on every mutation. The stock ledger operations
//! (`check_availability` / `reserve` / `release`) are the only paths that
//! mutate `stock_quantity`; `reserve` runs its check-and-decrement under
//! the map's per-entry lock, so two checkouts racing on the same product
//! serialize there while unrelated products stay independent.

use crate::store::{StorageResult, Store};
use dashmap::DashMap;
use shared::models::Product;
use std::sync::Arc;

/// Sort key for catalogue queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductSort {
    Name,
    Price,
    Category,
    Stock,
}

/// Filter and sort criteria for catalogue queries
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Match a category, case-insensitive
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    /// Only products with units on hand
    pub in_stock_only: bool,
    pub sort: Option<ProductSort>,
    pub descending: bool,
}

/// Unified catalogue and stock service
#[derive(Clone)]
pub struct CatalogService {
    store: Store,
    /// Products cache: product_id -> Product
    products: Arc<DashMap<String, Product>>,
}

impl std::fmt::Debug for CatalogService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogService")
            .field("products_count", &self.products.len())
            .finish()
    }
}

impl CatalogService {
    /// Create the service and load the product cache
    pub fn new(store: Store) -> StorageResult<Self> {
        let service = Self {
            store,
            products: Arc::new(DashMap::new()),
        };
        service.warmup()?;
        Ok(service)
    }

    /// Reload the product cache from storage
    pub fn warmup(&self) -> StorageResult<()> {
        let products = self.store.list_products()?;
        self.products.clear();
        for product in products {
            self.products.insert(product.product_id.clone(), product);
        }
        tracing::debug!(count = self.products.len(), "catalog warmed up");
        Ok(())
    }

    /// Write-through insert/update (seed and admin path)
    pub fn save_product(&self, product: Product) -> StorageResult<()> {
        self.store.put_product(&product)?;
        self.products.insert(product.product_id.clone(), product);
        Ok(())
    }

    /// Look up a product by id
    pub fn product(&self, product_id: &str) -> Option<Product> {
        self.products.get(product_id).map(|entry| entry.value().clone())
    }

    /// All products, ordered by product id
    pub fn all_products(&self) -> Vec<Product> {
        let mut products: Vec<Product> =
            self.products.iter().map(|entry| entry.value().clone()).collect();
        products.sort_by(|a, b| a.product_id.cmp(&b.product_id));
        products
    }

    /// Whether the catalogue has no products (fresh store)
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Case-insensitive partial match over name, description and category.
    /// A blank query returns the whole catalogue.
    pub fn search(&self, query: &str) -> Vec<Product> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.all_products();
        }
        let mut products: Vec<Product> = self
            .products
            .iter()
            .filter(|entry| {
                entry.name.to_lowercase().contains(&query)
                    || entry.description.to_lowercase().contains(&query)
                    || entry.category.to_lowercase().contains(&query)
            })
            .map(|entry| entry.value().clone())
            .collect();
        products.sort_by(|a, b| a.product_id.cmp(&b.product_id));
        products
    }

    /// Products in a category, case-insensitive. A blank category returns
    /// the whole catalogue.
    pub fn products_by_category(&self, category: &str) -> Vec<Product> {
        let category = category.trim();
        if category.is_empty() {
            return self.all_products();
        }
        let mut products: Vec<Product> = self
            .products
            .iter()
            .filter(|entry| entry.category.eq_ignore_ascii_case(category))
            .map(|entry| entry.value().clone())
            .collect();
        products.sort_by(|a, b| a.product_id.cmp(&b.product_id));
        products
    }

    /// Distinct category names, sorted
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self
            .products
            .iter()
            .map(|entry| entry.category.clone())
            .collect();
        categories.sort();
        categories.dedup();
        categories
    }

    /// (min, max) price across the catalogue, None when empty
    pub fn price_range(&self) -> Option<(f64, f64)> {
        let mut range: Option<(f64, f64)> = None;
        for entry in self.products.iter() {
            range = match range {
                None => Some((entry.price, entry.price)),
                Some((min, max)) => Some((min.min(entry.price), max.max(entry.price))),
            };
        }
        range
    }

    /// Combined filter + sort query
    pub fn query(&self, filter: &ProductFilter) -> Vec<Product> {
        let mut products: Vec<Product> = self
            .products
            .iter()
            .filter(|entry| {
                filter
                    .category
                    .as_deref()
                    .is_none_or(|c| entry.category.eq_ignore_ascii_case(c))
                    && filter.min_price.is_none_or(|min| entry.price >= min)
                    && filter.max_price.is_none_or(|max| entry.price <= max)
                    && (!filter.in_stock_only || entry.is_in_stock())
            })
            .map(|entry| entry.value().clone())
            .collect();

        match filter.sort {
            Some(ProductSort::Name) => products.sort_by(|a, b| a.name.cmp(&b.name)),
            Some(ProductSort::Price) => products.sort_by(|a, b| a.price.total_cmp(&b.price)),
            Some(ProductSort::Category) => products.sort_by(|a, b| a.category.cmp(&b.category)),
            Some(ProductSort::Stock) => {
                products.sort_by(|a, b| a.stock_quantity.cmp(&b.stock_quantity))
            }
            None => products.sort_by(|a, b| a.product_id.cmp(&b.product_id)),
        }
        if filter.descending {
            products.reverse();
        }
        products
    }

    // ========== Stock ledger ==========

    /// True iff the product exists with units on hand covering `quantity`
    pub fn check_availability(&self, product_id: &str, quantity: i32) -> bool {
        self.products
            .get(product_id)
            .map(|entry| entry.is_in_stock() && entry.stock_quantity >= quantity)
            .unwrap_or(false)
    }

    /// Atomic check-and-decrement. Returns `Ok(true)` and persists the new
    /// count iff the full `quantity` could be taken; `Ok(false)` leaves the
    /// product untouched (unknown product, non-positive or short quantity).
    /// Never partially decrements.
    pub fn reserve(&self, product_id: &str, quantity: i32) -> StorageResult<bool> {
        if quantity <= 0 {
            return Ok(false);
        }
        let Some(mut entry) = self.products.get_mut(product_id) else {
            return Ok(false);
        };
        if !entry.decrease_stock(quantity) {
            return Ok(false);
        }
        // Persist while still holding the entry lock so a concurrent
        // reserve on the same product cannot interleave between the
        // decrement and the write.
        if let Err(e) = self.store.put_product(entry.value()) {
            entry.increase_stock(quantity);
            return Err(e);
        }
        tracing::debug!(product_id, quantity, remaining = entry.stock_quantity, "stock reserved");
        Ok(true)
    }

    /// Unconditional increment (restock / compensating release). No-op for
    /// non-positive quantities and unknown products.
    pub fn release(&self, product_id: &str, quantity: i32) -> StorageResult<()> {
        if quantity <= 0 {
            return Ok(());
        }
        let Some(mut entry) = self.products.get_mut(product_id) else {
            tracing::warn!(product_id, "release for unknown product ignored");
            return Ok(());
        };
        entry.increase_stock(quantity);
        if let Err(e) = self.store.put_product(entry.value()) {
            entry.decrease_stock(quantity);
            return Err(e);
        }
        tracing::debug!(product_id, quantity, on_hand = entry.stock_quantity, "stock released");
        Ok(())
    }
}
