//! Record transformation
//!
//! Turns one [`RawRecord`] into one [`NormalizedRecord`]. The only external
//! input is the reference date used for ages.

use chrono::NaiveDate;

use crate::address::Address;
use crate::enrich::{build_full_name, compute_age, compute_salary_bucket, format_salary};
use crate::error::Result;
use crate::record::{NormalizedRecord, RawRecord};
use crate::validator::{correct_date, format_date, parse_date, parse_salary};

/// Default reference date for age calculation
pub fn default_reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap_or(NaiveDate::MIN)
}

/// Validates and enriches raw records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordTransformer {
    reference_date: NaiveDate,
}

impl Default for RecordTransformer {
    fn default() -> Self {
        Self::new(default_reference_date())
    }
}

impl RecordTransformer {
    /// Create a transformer that computes ages as of `reference_date`
    pub fn new(reference_date: NaiveDate) -> Self {
        Self { reference_date }
    }

    /// The date ages are computed against
    pub fn reference_date(&self) -> NaiveDate {
        self.reference_date
    }

    /// Transform a single record.
    ///
    /// An unparseable birth date is not an error: birth date and age are
    /// both left empty. A non-numeric salary or postcode rejects the record.
    pub fn transform(&self, raw: &RawRecord) -> Result<NormalizedRecord> {
        let full_name = build_full_name(&raw.first_name, &raw.last_name);
        let company = raw.company.trim().to_string();

        let birth = parse_date(&correct_date(&raw.birth_date));
        if birth.is_none() && !raw.birth_date.trim().is_empty() {
            tracing::debug!(
                birth_date = %raw.birth_date,
                "dropping unparseable birth date for {}",
                full_name
            );
        }
        let birth_date = birth.map(format_date);

        let salary_value = parse_salary(&raw.salary)?;
        let age = compute_age(birth, self.reference_date);
        let salary_bucket = compute_salary_bucket(salary_value);
        let salary = format_salary(salary_value);

        let address = Address::build(&raw.address, &raw.suburb, &raw.state, &raw.post)?;

        Ok(NormalizedRecord {
            full_name,
            company,
            birth_date,
            salary,
            age,
            salary_bucket,
            address,
            phone: raw.phone.trim().to_string(),
            mobile: raw.mobile.trim().to_string(),
            email: raw.email.trim().to_string(),
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::Error;
    use crate::record::SalaryBucket;

    pub(crate) fn john_doe() -> RawRecord {
        RawRecord {
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            company: "Company Inc.".to_string(),
            birth_date: "01051985".to_string(),
            salary: "55000".to_string(),
            address: "123 Elm St".to_string(),
            suburb: "Elmwood".to_string(),
            state: "CA".to_string(),
            post: "90210".to_string(),
            phone: "123456789".to_string(),
            mobile: "987654321".to_string(),
            email: "john.doe@example.com".to_string(),
        }
    }

    #[test]
    fn test_transform_full_record() {
        let transformer = RecordTransformer::default();
        let out = transformer.transform(&john_doe()).unwrap();

        assert_eq!(out.full_name, "John Doe");
        assert_eq!(out.company, "Company Inc.");
        assert_eq!(out.birth_date.as_deref(), Some("01-05-1985"));
        assert_eq!(out.age, Some(38));
        assert_eq!(out.salary_bucket, SalaryBucket::B);
        assert_eq!(out.salary, "$55,000.00");
        assert_eq!(out.address.postcode, 90210);
        assert_eq!(out.email, "john.doe@example.com");
    }

    #[test]
    fn test_transform_missing_birth_date() {
        let raw = RawRecord {
            first_name: "Jane".to_string(),
            last_name: "Smith".to_string(),
            birth_date: String::new(),
            salary: "120000".to_string(),
            post: "10001".to_string(),
            ..john_doe()
        };
        let out = RecordTransformer::default().transform(&raw).unwrap();

        assert_eq!(out.full_name, "Jane Smith");
        assert!(out.birth_date.is_none());
        assert!(out.age.is_none());
        assert_eq!(out.salary_bucket, SalaryBucket::C);
        assert_eq!(out.salary, "$120,000.00");
    }

    #[test]
    fn test_transform_recovers_dropped_leading_zero() {
        let raw = RawRecord {
            birth_date: " 1051985".to_string(),
            ..john_doe()
        };
        let out = RecordTransformer::default().transform(&raw).unwrap();
        assert_eq!(out.birth_date.as_deref(), Some("01-05-1985"));
        assert_eq!(out.age, Some(38));
    }

    #[test]
    fn test_transform_invalid_calendar_date_is_null() {
        let raw = RawRecord {
            birth_date: "31022001".to_string(),
            ..john_doe()
        };
        let out = RecordTransformer::default().transform(&raw).unwrap();
        assert!(out.birth_date.is_none());
        assert!(out.age.is_none());
    }

    #[test]
    fn test_transform_year_zero_birth_date_is_null() {
        let raw = RawRecord {
            birth_date: "01010000".to_string(),
            ..john_doe()
        };
        let out = RecordTransformer::default().transform(&raw).unwrap();
        assert!(out.birth_date.is_none());
        assert!(out.age.is_none());
    }

    #[test]
    fn test_transform_bad_salary_is_format_error() {
        let raw = RawRecord {
            salary: "lots".to_string(),
            ..john_doe()
        };
        let err = RecordTransformer::default().transform(&raw).unwrap_err();
        assert!(matches!(err, Error::Format { field: "Salary", .. }));
    }

    #[test]
    fn test_transform_bad_postcode_is_validation_error() {
        let raw = RawRecord {
            post: "abcd".to_string(),
            ..john_doe()
        };
        let err = RecordTransformer::default().transform(&raw).unwrap_err();
        assert!(matches!(err, Error::Validation { field: "Post", .. }));
    }

    #[test]
    fn test_transform_uses_configured_reference_date() {
        let reference = NaiveDate::from_ymd_opt(2030, 5, 1).unwrap();
        let out = RecordTransformer::new(reference)
            .transform(&john_doe())
            .unwrap();
        assert_eq!(out.age, Some(45));
    }

    #[test]
    fn test_transform_trims_contact_fields() {
        let raw = RawRecord {
            company: "  Acme  ".to_string(),
            phone: " 02 9999 0000 ".to_string(),
            mobile: "\t0400 000 000".to_string(),
            email: "a@b.com ".to_string(),
            ..john_doe()
        };
        let out = RecordTransformer::default().transform(&raw).unwrap();
        assert_eq!(out.company, "Acme");
        assert_eq!(out.phone, "02 9999 0000");
        assert_eq!(out.mobile, "0400 000 000");
        assert_eq!(out.email, "a@b.com");
    }

    #[test]
    fn test_transform_is_deterministic() {
        let transformer = RecordTransformer::default();
        let raw = john_doe();
        assert_eq!(
            transformer.transform(&raw).unwrap(),
            transformer.transform(&raw).unwrap()
        );
    }
}
