use crate::utils::error::{EstimatorError, Result};
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(EstimatorError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_non_negative(field_name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(EstimatorError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value must be a finite, non-negative number".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    // NaN fails both comparisons, so check containment rather than exclusion.
    if !(value >= min && value <= max) {
        return Err(EstimatorError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// Rejects the first id that appears twice.
pub fn validate_unique_ids<'a, I>(field_name: &str, ids: I) -> Result<()>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(EstimatorError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: id.to_string(),
                reason: "Duplicate id".to_string(),
            });
        }
    }
    Ok(())
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
    })
}

pub fn validate_email(field_name: &str, value: &str) -> Result<()> {
    if !email_regex().is_match(value.trim()) {
        return Err(EstimatorError::ValidationError {
            message: format!("{} must be a valid email address", field_name),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_non_negative() {
        assert!(validate_non_negative("basePrice", 0.0).is_ok());
        assert!(validate_non_negative("basePrice", 800.0).is_ok());
        assert!(validate_non_negative("basePrice", -1.0).is_err());
        assert!(validate_non_negative("basePrice", f64::NAN).is_err());
        assert!(validate_non_negative("basePrice", f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("failure_probability", 0.1, 0.0, 1.0).is_ok());
        assert!(validate_range("failure_probability", 1.5, 0.0, 1.0).is_err());
        assert!(validate_range("failure_probability", f64::NAN, 0.0, 1.0).is_err());
    }

    #[test]
    fn test_validate_unique_ids() {
        assert!(validate_unique_ids("categories", ["a", "b"]).is_ok());
        let err = validate_unique_ids("categories", ["a", "b", "a"]).unwrap_err();
        assert!(err.to_string().contains("'a'"));
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("email", "anna@example.ch").is_ok());
        assert!(validate_email("email", "  anna@example.ch ").is_ok());
        assert!(validate_email("email", "anna@example").is_err());
        assert!(validate_email("email", "anna example.ch").is_err());
        assert!(validate_email("email", "").is_err());
    }
}
