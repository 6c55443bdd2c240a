//! Shipping address with field validation

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Address validation failures, one variant per field rule
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("street must not be empty")]
    EmptyStreet,

    #[error("city must contain letters and spaces only")]
    InvalidCity,

    #[error("postcode must be 3-10 digits")]
    InvalidPostcode,

    #[error("country must contain letters and spaces only")]
    InvalidCountry,
}

/// Shipping address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub postcode: String,
    pub country: String,
}

impl Address {
    pub fn new(
        street: impl Into<String>,
        city: impl Into<String>,
        postcode: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            street: street.into(),
            city: city.into(),
            postcode: postcode.into(),
            country: country.into(),
        }
    }

    /// Validate all fields:
    /// - street: not empty
    /// - city / country: letters and spaces only
    /// - postcode: digits only, 3-10 length
    pub fn validate(&self) -> Result<(), AddressError> {
        if self.street.trim().is_empty() {
            return Err(AddressError::EmptyStreet);
        }
        if !is_letters_and_spaces(&self.city) {
            return Err(AddressError::InvalidCity);
        }
        if !is_valid_postcode(&self.postcode) {
            return Err(AddressError::InvalidPostcode);
        }
        if !is_letters_and_spaces(&self.country) {
            return Err(AddressError::InvalidCountry);
        }
        Ok(())
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {} {}, {}", self.street, self.city, self.postcode, self.country)
    }
}

fn is_letters_and_spaces(value: &str) -> bool {
    !value.trim().is_empty() && value.chars().all(|c| c.is_ascii_alphabetic() || c == ' ')
}

fn is_valid_postcode(value: &str) -> bool {
    (3..=10).contains(&value.len()) && value.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn melbourne() -> Address {
        Address::new("123 Main St", "Melbourne", "3000", "Australia")
    }

    #[test]
    fn test_valid_address() {
        assert_eq!(melbourne().validate(), Ok(()));
    }

    #[test]
    fn test_empty_street_rejected() {
        let mut a = melbourne();
        a.street = "  ".to_string();
        assert_eq!(a.validate(), Err(AddressError::EmptyStreet));
    }

    #[test]
    fn test_city_with_digits_rejected() {
        let mut a = melbourne();
        a.city = "Melbourne 3000".to_string();
        assert_eq!(a.validate(), Err(AddressError::InvalidCity));
    }

    #[test]
    fn test_postcode_length_bounds() {
        let mut a = melbourne();
        a.postcode = "30".to_string();
        assert_eq!(a.validate(), Err(AddressError::InvalidPostcode));
        a.postcode = "12345678901".to_string();
        assert_eq!(a.validate(), Err(AddressError::InvalidPostcode));
        a.postcode = "123".to_string();
        assert_eq!(a.validate(), Ok(()));
    }

    #[test]
    fn test_postcode_with_letters_rejected() {
        let mut a = melbourne();
        a.postcode = "3000A".to_string();
        assert_eq!(a.validate(), Err(AddressError::InvalidPostcode));
    }

    #[test]
    fn test_country_with_punctuation_rejected() {
        let mut a = melbourne();
        a.country = "U.S.A.".to_string();
        assert_eq!(a.validate(), Err(AddressError::InvalidCountry));
    }

    #[test]
    fn test_display_format() {
        assert_eq!(melbourne().to_string(), "123 Main St, Melbourne 3000, Australia");
    }
}
