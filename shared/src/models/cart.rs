//! Shopping cart
//!
//! Pure value type owned by the caller's session; nothing here touches
//! storage. One line per product id, merged on repeated adds.

use super::product::Product;
use crate::money;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Cart mutation failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("quantity must be positive, got {0}")]
    InvalidQuantity(i32),

    #[error("insufficient stock for {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: String,
        requested: i32,
        available: i32,
    },

    #[error("price for {0} is not a usable amount")]
    InvalidPrice(String),

    #[error("product not in cart: {0}")]
    NotInCart(String),
}

/// One cart line. `unit_price` is the price seen when the line was added;
/// checkout re-snapshots the live catalogue price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: String,
    pub name: String,
    pub quantity: i32,
    pub unit_price: f64,
}

/// A customer's pending selection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    pub customer_id: String,
    pub items: Vec<CartItem>,
}

impl Cart {
    pub fn new(customer_id: impl Into<String>) -> Self {
        Self {
            customer_id: customer_id.into(),
            items: Vec::new(),
        }
    }

    /// Add `quantity` units of `product`, merging with an existing line.
    /// The merged line quantity may not exceed the product's stock as seen
    /// on the snapshot passed in.
    pub fn add_item(&mut self, product: &Product, quantity: i32) -> Result<(), CartError> {
        if !money::is_valid_quantity(quantity) {
            return Err(CartError::InvalidQuantity(quantity));
        }
        if !money::is_valid_price(product.price) {
            return Err(CartError::InvalidPrice(product.product_id.clone()));
        }

        let merged = self.item_quantity(&product.product_id) + quantity;
        if merged > product.stock_quantity {
            return Err(CartError::InsufficientStock {
                product_id: product.product_id.clone(),
                requested: merged,
                available: product.stock_quantity,
            });
        }

        match self
            .items
            .iter_mut()
            .find(|item| item.product_id == product.product_id)
        {
            Some(item) => item.quantity = merged,
            None => self.items.push(CartItem {
                product_id: product.product_id.clone(),
                name: product.name.clone(),
                quantity,
                unit_price: product.price,
            }),
        }
        Ok(())
    }

    /// Remove a line entirely. Returns false when the product was not in the
    /// cart.
    pub fn remove_item(&mut self, product_id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.product_id != product_id);
        self.items.len() != before
    }

    /// Set a line's quantity. Non-positive quantities remove the line.
    pub fn update_quantity(&mut self, product: &Product, new_quantity: i32) -> Result<(), CartError> {
        if new_quantity <= 0 {
            self.remove_item(&product.product_id);
            return Ok(());
        }
        if new_quantity > product.stock_quantity {
            return Err(CartError::InsufficientStock {
                product_id: product.product_id.clone(),
                requested: new_quantity,
                available: product.stock_quantity,
            });
        }
        match self
            .items
            .iter_mut()
            .find(|item| item.product_id == product.product_id)
        {
            Some(item) => {
                item.quantity = new_quantity;
                Ok(())
            }
            None => Err(CartError::NotInCart(product.product_id.clone())),
        }
    }

    /// Quantity of a product in the cart, 0 when absent
    pub fn item_quantity(&self, product_id: &str) -> i32 {
        self.items
            .iter()
            .find(|item| item.product_id == product_id)
            .map(|item| item.quantity)
            .unwrap_or(0)
    }

    /// Sum of line subtotals (pre-GST), to the cent
    pub fn subtotal(&self) -> f64 {
        let total = self
            .items
            .iter()
            .map(|item| money::line_subtotal(item.unit_price, item.quantity))
            .sum();
        money::to_f64(total)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Number of distinct lines
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Total units across all lines
    pub fn total_quantity(&self) -> i32 {
        self.items.iter().map(|item| item.quantity).sum()
    }
}
