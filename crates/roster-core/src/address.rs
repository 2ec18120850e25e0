//! Postal address normalization

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::validator::parse_postcode;

/// Structured postal address nested inside a normalized record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Street line
    #[serde(rename = "address")]
    pub line: String,

    /// Suburb
    pub suburb: String,

    /// State
    pub state: String,

    /// Numeric postcode
    #[serde(rename = "post")]
    pub postcode: i64,
}

impl Address {
    /// Build an address from raw fields.
    ///
    /// Text fields are trimmed. Fails with a validation error when the
    /// postcode is not an integer.
    pub fn build(line: &str, suburb: &str, state: &str, postcode: &str) -> Result<Self> {
        Ok(Self {
            line: line.trim().to_string(),
            suburb: suburb.trim().to_string(),
            state: state.trim().to_string(),
            postcode: parse_postcode(postcode)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_build_trims_fields() {
        let address = Address::build(" 123 Elm St ", "Elmwood ", " CA", " 90210").unwrap();
        assert_eq!(address.line, "123 Elm St");
        assert_eq!(address.suburb, "Elmwood");
        assert_eq!(address.state, "CA");
        assert_eq!(address.postcode, 90210);
    }

    #[test]
    fn test_build_keeps_numeric_value_only() {
        let address = Address::build("1 Main Rd", "Town", "NSW", "0800").unwrap();
        assert_eq!(address.postcode, 800);
    }

    #[test]
    fn test_build_rejects_bad_postcode() {
        for bad in ["abcd", "", "12.5", "20 00"] {
            let err = Address::build("1 Main Rd", "Town", "NSW", bad).unwrap_err();
            match err {
                Error::Validation { field, value } => {
                    assert_eq!(field, "Post");
                    assert_eq!(value, bad);
                }
                other => panic!("Expected validation error, got {other:?}"),
            }
        }
    }
}
