//! Customer Model

use super::address::Address;
use serde::{Deserialize, Serialize};

/// Customer entity
///
/// Credentials live with the (external) auth layer; only profile data is
/// kept here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: String,
    pub username: String,
    pub name: String,
    pub email: String,
    pub addresses: Vec<Address>,
}

impl Customer {
    pub fn new(
        customer_id: impl Into<String>,
        username: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            customer_id: customer_id.into(),
            username: username.into(),
            name: name.into(),
            email: email.into(),
            addresses: Vec::new(),
        }
    }

    /// Add an address if it passes field validation
    pub fn add_address(&mut self, address: Address) -> bool {
        if address.validate().is_ok() {
            self.addresses.push(address);
            true
        } else {
            false
        }
    }

    /// All required fields present and at least one address on file
    pub fn is_valid(&self) -> bool {
        !self.customer_id.trim().is_empty()
            && !self.username.trim().is_empty()
            && self.email.contains('@')
            && !self.addresses.is_empty()
    }
}
