//! Payment pipeline
//!
//! Drives a payment instrument against a CONFIRMED order:
//!
//! ```text
//! process_payment(order_id, method)
//!     ├─ 1. order id resolves, order is CONFIRMED
//!     ├─ 2. amount and order reference copied from the order
//!     │     (never trusted from the caller)
//!     ├─ 3. authorize  -> AUTHORIZED or AuthorizationFailed
//!     ├─ 4. capture    -> PROCESSED  or CaptureFailed
//!     ├─ 5. payment persisted (durable before the status flip)
//!     └─ 6. order marked PAID and persisted
//! ```
//!
//! Any failure leaves the order CONFIRMED with no processed payment on
//! record, so the caller can retry with a corrected instrument without
//! re-running checkout.

use crate::store::{StorageError, Store};
use shared::models::{Order, OrderStatus, Payment, PaymentMethod};
use shared::util::payment_number;
use thiserror::Error;

/// Payment pipeline failures. All recoverable; the order is never left in
/// a half-paid state.
#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("order id must not be blank")]
    InvalidInput,

    #[error("order not found: {0}")]
    OrderNotFound(String),

    #[error("order {0} is {1:?}, payment requires a confirmed order")]
    OrderNotConfirmed(String, OrderStatus),

    #[error("payment authorization failed")]
    AuthorizationFailed,

    #[error("payment capture failed")]
    CaptureFailed,

    #[error("payment not found: {0}")]
    PaymentNotFound(String),

    #[error("refund rejected for payment {0}")]
    RefundRejected(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Payment pipeline over the persistence gateway
#[derive(Clone)]
pub struct PaymentService {
    store: Store,
}

impl PaymentService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Authorize and capture a payment for a confirmed order, then mark
    /// the order paid. The payment amount is always the order's total.
    pub fn process_payment(
        &self,
        order_id: &str,
        method: PaymentMethod,
    ) -> Result<Payment, PaymentError> {
        if order_id.trim().is_empty() {
            return Err(PaymentError::InvalidInput);
        }
        let mut order: Order = self
            .store
            .get_order(order_id)?
            .ok_or_else(|| PaymentError::OrderNotFound(order_id.to_string()))?;

        if order.status != OrderStatus::Confirmed {
            return Err(PaymentError::OrderNotConfirmed(
                order.order_id.clone(),
                order.status,
            ));
        }

        // Amount and order reference always come from the order itself.
        let mut payment = Payment::new(
            payment_number(),
            order.order_id.clone(),
            order.total_amount,
            method,
        );

        if !payment.authorize() {
            tracing::warn!(
                order_id = %order.order_id,
                method = payment.method.name(),
                reference = %payment.method.masked_reference(),
                "payment authorization failed"
            );
            return Err(PaymentError::AuthorizationFailed);
        }

        if !payment.capture() {
            tracing::warn!(
                order_id = %order.order_id,
                payment_id = %payment.payment_id,
                "payment capture failed"
            );
            return Err(PaymentError::CaptureFailed);
        }

        // The processed payment must be durable before the order flips.
        self.store.put_payment(&payment)?;
        order.mark_paid();
        self.store.put_order(&order)?;

        tracing::info!(
            order_id = %order.order_id,
            payment_id = %payment.payment_id,
            amount = payment.amount,
            method = payment.method.name(),
            reference = %payment.method.masked_reference(),
            "payment processed"
        );
        Ok(payment)
    }

    /// Refund a processed payment. Only variants that support refunds and
    /// only from the PROCESSED state; cheques always require the manual
    /// out-of-band process.
    pub fn refund_payment(&self, payment_id: &str) -> Result<Payment, PaymentError> {
        let mut payment: Payment = self
            .store
            .get_payment(payment_id)?
            .ok_or_else(|| PaymentError::PaymentNotFound(payment_id.to_string()))?;

        if !payment.refund() {
            return Err(PaymentError::RefundRejected(payment_id.to_string()));
        }
        self.store.put_payment(&payment)?;

        tracing::info!(
            payment_id = %payment.payment_id,
            order_id = %payment.order_id,
            amount = payment.amount,
            "payment refunded"
        );
        Ok(payment)
    }
}
