//! Order Model
//!
//! Orders snapshot their line items at creation time; the total is always
//! recomputed from the lines (10% GST on top of the subtotal), never
//! hand-edited. Status moves through a closed state machine.

use super::address::Address;
use super::product::Product;
use crate::money;
use crate::util::now_millis;
use serde::{Deserialize, Serialize};

/// Order lifecycle states
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Paid,
    Cancelled,
    Shipped,
    Delivered,
}

/// One order line: unit price captured at order-creation time, immune to
/// later catalogue price changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: String,
    /// Name snapshot for receipts
    pub name: String,
    pub quantity: i32,
    pub unit_price: f64,
}

impl OrderItem {
    /// Snapshot a line from the product's current price
    pub fn from_product(product: &Product, quantity: i32) -> Self {
        Self {
            product_id: product.product_id.clone(),
            name: product.name.clone(),
            quantity,
            unit_price: product.price,
        }
    }

    /// Line subtotal (pre-GST), to the cent
    pub fn subtotal(&self) -> f64 {
        money::to_f64(money::line_subtotal(self.unit_price, self.quantity))
    }
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub order_id: String,
    /// Creation timestamp, UTC millis
    pub created_at: i64,
    pub customer_id: String,
    pub items: Vec<OrderItem>,
    pub shipping_address: Address,
    /// GST-inclusive total, recomputed on every item change
    pub total_amount: f64,
    pub status: OrderStatus,
}

impl Order {
    pub fn new(
        order_id: impl Into<String>,
        customer_id: impl Into<String>,
        shipping_address: Address,
    ) -> Self {
        Self {
            order_id: order_id.into(),
            created_at: now_millis(),
            customer_id: customer_id.into(),
            items: Vec::new(),
            shipping_address,
            total_amount: 0.0,
            status: OrderStatus::Pending,
        }
    }

    /// Append a line and recompute the total
    pub fn add_item(&mut self, item: OrderItem) {
        self.items.push(item);
        self.recalculate_total();
    }

    /// total = sum(line subtotals) * 1.10, to the cent
    pub fn recalculate_total(&mut self) {
        let subtotal = self
            .items
            .iter()
            .map(|item| money::line_subtotal(item.unit_price, item.quantity))
            .sum();
        self.total_amount = money::to_f64(money::order_total(subtotal));
    }

    /// Pending -> Confirmed
    pub fn confirm(&mut self) -> bool {
        match self.status {
            OrderStatus::Pending => {
                self.status = OrderStatus::Confirmed;
                true
            }
            _ => false,
        }
    }

    /// Confirmed -> Paid
    pub fn mark_paid(&mut self) -> bool {
        match self.status {
            OrderStatus::Confirmed => {
                self.status = OrderStatus::Paid;
                true
            }
            _ => false,
        }
    }

    /// Cancellation is only reachable before payment
    pub fn can_cancel(&self) -> bool {
        matches!(self.status, OrderStatus::Pending | OrderStatus::Confirmed)
    }

    /// Pending | Confirmed -> Cancelled
    pub fn cancel(&mut self) -> bool {
        if self.can_cancel() {
            self.status = OrderStatus::Cancelled;
            true
        } else {
            false
        }
    }

    /// Paid -> Shipped (fulfillment)
    pub fn mark_shipped(&mut self) -> bool {
        match self.status {
            OrderStatus::Paid => {
                self.status = OrderStatus::Shipped;
                true
            }
            _ => false,
        }
    }

    /// Shipped -> Delivered (fulfillment)
    pub fn mark_delivered(&mut self) -> bool {
        match self.status {
            OrderStatus::Shipped => {
                self.status = OrderStatus::Delivered;
                true
            }
            _ => false,
        }
    }
}
