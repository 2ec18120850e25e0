//! Record types
//!
//! A [`RawRecord`] is one unparsed line of the personnel file. The
//! [`RecordTransformer`](crate::transform::RecordTransformer) turns it into a
//! [`NormalizedRecord`], the document shape handed to sinks.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::address::Address;

/// Positional field names of the source file.
///
/// The source has no header row, so this order is the file format. Changing
/// it is a breaking change for every existing export.
pub const FIELD_NAMES: [&str; 12] = [
    "FirstName",
    "LastName",
    "Company",
    "BirthDate",
    "Salary",
    "Address",
    "Suburb",
    "State",
    "Post",
    "Phone",
    "Mobile",
    "Email",
];

/// One row of the source file, all fields as raw text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawRecord {
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Employer
    pub company: String,
    /// Birth date as `ddmmyyyy`, possibly missing its leading zero
    pub birth_date: String,
    /// Annual salary as a decimal number
    pub salary: String,
    /// Street address line
    pub address: String,
    /// Suburb
    pub suburb: String,
    /// State
    pub state: String,
    /// Postcode
    pub post: String,
    /// Landline
    pub phone: String,
    /// Mobile
    pub mobile: String,
    /// Email address
    pub email: String,
}

impl RawRecord {
    /// Build a record from exactly [`FIELD_NAMES`]`.len()` values in file order.
    ///
    /// Returns `None` when the number of values does not match.
    pub fn from_fields<I, S>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut values = values.into_iter().map(Into::into);
        let mut next = || values.next();

        let record = Self {
            first_name: next()?,
            last_name: next()?,
            company: next()?,
            birth_date: next()?,
            salary: next()?,
            address: next()?,
            suburb: next()?,
            state: next()?,
            post: next()?,
            phone: next()?,
            mobile: next()?,
            email: next()?,
        };

        if next().is_some() {
            return None;
        }
        Some(record)
    }
}

/// Coarse salary grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SalaryBucket {
    /// Below 50,000
    A,
    /// 50,000 to 100,000 inclusive
    B,
    /// Above 100,000
    C,
}

impl fmt::Display for SalaryBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SalaryBucket::A => "A",
            SalaryBucket::B => "B",
            SalaryBucket::C => "C",
        };
        f.write_str(label)
    }
}

/// Validated and enriched record, ready for storage.
///
/// `birth_date` and `age` are either both present or both absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NormalizedRecord {
    /// First and last name joined by a single space
    pub full_name: String,
    /// Trimmed company name
    pub company: String,
    /// Birth date as `dd-mm-yyyy`
    pub birth_date: Option<String>,
    /// Salary formatted as currency, e.g. `$55,000.00`
    pub salary: String,
    /// Age in whole years at the configured reference date
    pub age: Option<i32>,
    /// Salary bucket
    pub salary_bucket: SalaryBucket,
    /// Nested postal address
    pub address: Address,
    /// Trimmed landline
    pub phone: String,
    /// Trimmed mobile
    pub mobile: String,
    /// Trimmed email address
    pub email: String,
}
