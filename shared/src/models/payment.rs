//! Payment Model
//!
//! A payment record ties an instrument (card / cheque / finance account) to
//! an order. All variants share one state machine:
//!
//! ```text
//! PENDING -> AUTHORIZED -> PROCESSED -> REFUNDED
//!     \------------\
//!                   -> FAILED (authorization rejection)
//! ```
//!
//! Variant rules: cheques authorize unconditionally (manual clearing) and
//! are never refundable through this pipeline; cards and finance accounts
//! must validate their fields to authorize and refund only from PROCESSED.
//!
//! Card and account numbers must never reach logs or displays unmasked;
//! the `Debug` impls below enforce that for the tracing path.

use crate::util::now_millis;
use serde::{Deserialize, Serialize};

/// Payment lifecycle states
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Authorized,
    Processed,
    Failed,
    Refunded,
}

/// Card instrument fields
#[derive(Clone, Serialize, Deserialize)]
pub struct CardDetails {
    pub card_number: String,
    /// MM/YY
    pub expiry_date: String,
    pub card_holder_name: String,
    pub cvv: String,
}

impl CardDetails {
    pub fn new(
        card_number: impl Into<String>,
        expiry_date: impl Into<String>,
        card_holder_name: impl Into<String>,
        cvv: impl Into<String>,
    ) -> Self {
        Self {
            card_number: card_number.into(),
            expiry_date: expiry_date.into(),
            card_holder_name: card_holder_name.into(),
            cvv: cvv.into(),
        }
    }

    /// 16-digit number, MM/YY expiry (month range checked, expiry in the
    /// past deliberately not), non-empty holder, 3-digit CVV
    pub fn is_valid(&self) -> bool {
        is_digits(&self.card_number, 16)
            && is_valid_expiry(&self.expiry_date)
            && !self.card_holder_name.trim().is_empty()
            && is_digits(&self.cvv, 3)
    }

    /// `****-****-****-NNNN` for display/logging
    pub fn masked_number(&self) -> String {
        if self.card_number.len() < 4 {
            return "****".to_string();
        }
        format!(
            "****-****-****-{}",
            &self.card_number[self.card_number.len() - 4..]
        )
    }
}

impl std::fmt::Debug for CardDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardDetails")
            .field("card_number", &self.masked_number())
            .field("expiry_date", &self.expiry_date)
            .field("card_holder_name", &self.card_holder_name)
            .field("cvv", &"***")
            .finish()
    }
}

/// Cheque instrument fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChequeDetails {
    pub cheque_number: String,
    pub bank_name: String,
}

impl ChequeDetails {
    pub fn new(cheque_number: impl Into<String>, bank_name: impl Into<String>) -> Self {
        Self {
            cheque_number: cheque_number.into(),
            bank_name: bank_name.into(),
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.cheque_number.trim().is_empty() && !self.bank_name.trim().is_empty()
    }
}

/// Finance account instrument fields
#[derive(Clone, Serialize, Deserialize)]
pub struct FinanceAccountDetails {
    pub account_number: String,
    pub bank_name: String,
    pub finance_provider: String,
}

impl FinanceAccountDetails {
    pub fn new(
        account_number: impl Into<String>,
        bank_name: impl Into<String>,
        finance_provider: impl Into<String>,
    ) -> Self {
        Self {
            account_number: account_number.into(),
            bank_name: bank_name.into(),
            finance_provider: finance_provider.into(),
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.account_number.trim().is_empty()
            && !self.bank_name.trim().is_empty()
            && !self.finance_provider.trim().is_empty()
    }

    /// `****NNNN` for display/logging
    pub fn masked_account(&self) -> String {
        if self.account_number.len() < 4 {
            return "****".to_string();
        }
        format!(
            "****{}",
            &self.account_number[self.account_number.len() - 4..]
        )
    }
}

impl std::fmt::Debug for FinanceAccountDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinanceAccountDetails")
            .field("account_number", &self.masked_account())
            .field("bank_name", &self.bank_name)
            .field("finance_provider", &self.finance_provider)
            .finish()
    }
}

/// Payment instrument, dispatched by variant tag
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Card(CardDetails),
    Cheque(ChequeDetails),
    FinanceAccount(FinanceAccountDetails),
}

impl PaymentMethod {
    /// Variant-specific field validation
    pub fn validate(&self) -> bool {
        match self {
            PaymentMethod::Card(card) => card.is_valid(),
            PaymentMethod::Cheque(cheque) => cheque.is_valid(),
            PaymentMethod::FinanceAccount(account) => account.is_valid(),
        }
    }

    /// Cheques require an out-of-band manual refund process
    pub fn supports_refund(&self) -> bool {
        !matches!(self, PaymentMethod::Cheque(_))
    }

    /// Display-safe reference for receipts and logs
    pub fn masked_reference(&self) -> String {
        match self {
            PaymentMethod::Card(card) => card.masked_number(),
            PaymentMethod::Cheque(cheque) => {
                format!("cheque {} ({})", cheque.cheque_number, cheque.bank_name)
            }
            PaymentMethod::FinanceAccount(account) => account.masked_account(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PaymentMethod::Card(_) => "CARD",
            PaymentMethod::Cheque(_) => "CHEQUE",
            PaymentMethod::FinanceAccount(_) => "FINANCE_ACCOUNT",
        }
    }
}

/// Payment record
///
/// `amount` is copied from the order's total when processing begins and is
/// never taken from the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub payment_id: String,
    pub order_id: String,
    pub amount: f64,
    pub status: PaymentStatus,
    /// Creation timestamp, UTC millis
    pub created_at: i64,
    #[serde(flatten)]
    pub method: PaymentMethod,
}

impl Payment {
    pub fn new(
        payment_id: impl Into<String>,
        order_id: impl Into<String>,
        amount: f64,
        method: PaymentMethod,
    ) -> Self {
        Self {
            payment_id: payment_id.into(),
            order_id: order_id.into(),
            amount,
            status: PaymentStatus::Pending,
            created_at: now_millis(),
            method,
        }
    }

    /// Authorize the instrument. Cheques always authorize (manual clearing);
    /// other variants must pass field validation. Sets AUTHORIZED or FAILED.
    pub fn authorize(&mut self) -> bool {
        let ok = match &self.method {
            PaymentMethod::Cheque(_) => true,
            other => other.validate(),
        };
        self.status = if ok {
            PaymentStatus::Authorized
        } else {
            PaymentStatus::Failed
        };
        ok
    }

    /// Capture a previously authorized payment. AUTHORIZED -> PROCESSED.
    pub fn capture(&mut self) -> bool {
        match self.status {
            PaymentStatus::Authorized => {
                self.status = PaymentStatus::Processed;
                true
            }
            _ => false,
        }
    }

    /// Refund a captured payment. PROCESSED -> REFUNDED, and only for
    /// variants that support refunds.
    pub fn refund(&mut self) -> bool {
        if self.status == PaymentStatus::Processed && self.method.supports_refund() {
            self.status = PaymentStatus::Refunded;
            true
        } else {
            false
        }
    }
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.bytes().all(|b| b.is_ascii_digit())
}

/// MM/YY with MM in 01..=12. Whether the date lies in the past is not
/// checked; only the shape is.
fn is_valid_expiry(value: &str) -> bool {
    let b = value.as_bytes();
    if b.len() != 5 || b[2] != b'/' {
        return false;
    }
    if ![b[0], b[1], b[3], b[4]].iter().all(|c| c.is_ascii_digit()) {
        return false;
    }
    let month = (b[0] - b'0') * 10 + (b[1] - b'0');
    (1..=12).contains(&month)
}
