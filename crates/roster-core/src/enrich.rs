//! Derived attributes
//!
//! Everything here is a pure function of validated fields. The reference date
//! for ages is always passed in so output never depends on the clock.

use chrono::{Datelike, NaiveDate};

use crate::record::SalaryBucket;

/// Lower bound (inclusive) of bucket B
pub const BUCKET_B_MIN: f64 = 50_000.0;

/// Upper bound (inclusive) of bucket B
pub const BUCKET_B_MAX: f64 = 100_000.0;

/// Age in whole years on `reference`, or `None` when the birth date is unknown.
///
/// A Feb 29 birthday counts as Feb 28 when the reference year is not a leap
/// year.
pub fn compute_age(birth: Option<NaiveDate>, reference: NaiveDate) -> Option<i32> {
    let birth = birth?;
    let mut age = reference.year() - birth.year();

    if reference < anniversary(birth, reference.year()) {
        age -= 1;
    }
    Some(age)
}

fn anniversary(birth: NaiveDate, year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, birth.month(), birth.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, 2, 28))
        .unwrap_or(NaiveDate::MIN)
}

/// Bucket a numeric salary. Both bounds of B are inclusive.
pub fn compute_salary_bucket(salary: f64) -> SalaryBucket {
    if salary < BUCKET_B_MIN {
        SalaryBucket::A
    } else if salary <= BUCKET_B_MAX {
        SalaryBucket::B
    } else {
        SalaryBucket::C
    }
}

/// Format a salary as `$` + comma-grouped amount with two decimals
pub fn format_salary(salary: f64) -> String {
    let fixed = format!("{salary:.2}");
    let (sign, unsigned) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed.as_str()),
    };
    let (whole, cents) = unsigned.split_once('.').unwrap_or((unsigned, "00"));

    format!("${sign}{}.{cents}", group_thousands(whole))
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Trim both names and join them with a single space
pub fn build_full_name(first: &str, last: &str) -> String {
    format!("{} {}", first.trim(), last.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_age_before_birthday() {
        assert_eq!(
            compute_age(Some(date(1985, 5, 1)), date(2024, 3, 1)),
            Some(38)
        );
    }

    #[test]
    fn test_age_on_and_after_birthday() {
        assert_eq!(
            compute_age(Some(date(1985, 3, 1)), date(2024, 3, 1)),
            Some(39)
        );
        assert_eq!(
            compute_age(Some(date(1985, 2, 28)), date(2024, 3, 1)),
            Some(39)
        );
    }

    #[test]
    fn test_age_unknown_birth_date() {
        assert_eq!(compute_age(None, date(2024, 3, 1)), None);
    }

    #[rstest]
    #[case(date(2023, 2, 27), 22)]
    #[case(date(2023, 2, 28), 23)]
    #[case(date(2023, 3, 1), 23)]
    #[case(date(2024, 2, 28), 23)]
    #[case(date(2024, 2, 29), 24)]
    fn test_age_leap_day_birthday(#[case] reference: NaiveDate, #[case] expected: i32) {
        let born = date(2000, 2, 29);
        assert_eq!(compute_age(Some(born), reference), Some(expected));
    }

    #[rstest]
    #[case(0.0, SalaryBucket::A)]
    #[case(49_999.99, SalaryBucket::A)]
    #[case(50_000.0, SalaryBucket::B)]
    #[case(75_000.0, SalaryBucket::B)]
    #[case(100_000.0, SalaryBucket::B)]
    #[case(100_000.01, SalaryBucket::C)]
    #[case(-10.0, SalaryBucket::A)]
    fn test_salary_bucket(#[case] salary: f64, #[case] expected: SalaryBucket) {
        assert_eq!(compute_salary_bucket(salary), expected);
    }

    #[rstest]
    #[case(55_000.0, "$55,000.00")]
    #[case(0.0, "$0.00")]
    #[case(999.999, "$1,000.00")]
    #[case(123.4, "$123.40")]
    #[case(1_234_567.891, "$1,234,567.89")]
    #[case(100_000.0, "$100,000.00")]
    #[case(-1_234.5, "$-1,234.50")]
    fn test_format_salary(#[case] salary: f64, #[case] expected: &str) {
        assert_eq!(format_salary(salary), expected);
    }

    #[test]
    fn test_build_full_name() {
        assert_eq!(build_full_name(" John ", "Doe  "), "John Doe");
        assert_eq!(build_full_name("Mary Ann", "Lee"), "Mary Ann Lee");
    }

    proptest! {
        #[test]
        fn prop_age_non_increasing_with_later_birth(
            earlier in 0i64..40_000,
            gap in 0i64..5_000,
        ) {
            let base = date(1900, 1, 1);
            let reference = date(2024, 3, 1);
            let first = base + chrono::Duration::days(earlier);
            let second = first + chrono::Duration::days(gap);
            let a = compute_age(Some(first), reference).unwrap();
            let b = compute_age(Some(second), reference).unwrap();
            prop_assert!(a >= b);
        }
    }
}
