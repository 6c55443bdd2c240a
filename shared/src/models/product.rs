//! Product Model

use serde::{Deserialize, Serialize};

/// Product entity
///
/// `stock_quantity` is never negative and is only mutated through the
/// catalog's reserve/release operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub product_id: String,
    pub name: String,
    pub description: String,
    /// Category name (free-form, e.g. "Smartphones")
    pub category: String,
    /// Unit price in dollars
    pub price: f64,
    /// Units on hand
    pub stock_quantity: i32,
}

impl Product {
    pub fn new(
        product_id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
        price: f64,
        stock_quantity: i32,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            name: name.into(),
            description: description.into(),
            category: category.into(),
            price,
            stock_quantity,
        }
    }

    /// Whether any units are on hand
    pub fn is_in_stock(&self) -> bool {
        self.stock_quantity > 0
    }

    /// Check-and-decrement. Returns false and leaves stock untouched when
    /// `quantity` is non-positive or exceeds the units on hand.
    ///
    /// Callers needing atomicity must hold the catalog's per-product lock.
    pub fn decrease_stock(&mut self, quantity: i32) -> bool {
        if quantity > 0 && quantity <= self.stock_quantity {
            self.stock_quantity -= quantity;
            true
        } else {
            false
        }
    }

    /// Unconditional increment (restock / compensating release). No-op for
    /// non-positive quantities.
    pub fn increase_stock(&mut self, quantity: i32) {
        if quantity > 0 {
            self.stock_quantity += quantity;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phone() -> Product {
        Product::new("P001", "iPhone 17 Pro", "Latest smartphone", "Smartphones", 1899.00, 10)
    }

    #[test]
    fn test_decrease_stock_within_bounds() {
        let mut p = phone();
        assert!(p.decrease_stock(3));
        assert_eq!(p.stock_quantity, 7);
    }

    #[test]
    fn test_decrease_stock_insufficient_leaves_stock_untouched() {
        let mut p = phone();
        assert!(!p.decrease_stock(11));
        assert_eq!(p.stock_quantity, 10);
    }

    #[test]
    fn test_decrease_stock_rejects_non_positive() {
        let mut p = phone();
        assert!(!p.decrease_stock(0));
        assert!(!p.decrease_stock(-2));
        assert_eq!(p.stock_quantity, 10);
    }

    #[test]
    fn test_increase_stock_round_trip() {
        let mut p = phone();
        assert!(p.decrease_stock(4));
        p.increase_stock(4);
        assert_eq!(p.stock_quantity, 10);
    }

    #[test]
    fn test_increase_stock_ignores_non_positive() {
        let mut p = phone();
        p.increase_stock(0);
        p.increase_stock(-5);
        assert_eq!(p.stock_quantity, 10);
    }

    #[test]
    fn test_is_in_stock() {
        let mut p = phone();
        assert!(p.is_in_stock());
        assert!(p.decrease_stock(10));
        assert!(!p.is_in_stock());
    }
}
