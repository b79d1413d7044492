//! Input checks shared by the customer operations.

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use std::sync::OnceLock;

use crate::details;
use crate::usecase::UseCaseError;

/// Email validation pattern
fn email_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$"))
        .as_ref()
        .ok()
}

/// Names of the fields in `fields` whose value is blank.
pub(crate) fn missing_fields<'a>(fields: &[(&'a str, &str)]) -> Vec<&'a str> {
    fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect()
}

pub(crate) fn require_fields(fields: &[(&str, &str)]) -> Result<(), UseCaseError> {
    let missing = missing_fields(fields);
    if missing.is_empty() {
        return Ok(());
    }

    Err(UseCaseError::validation_with_details(
        "MISSING_FIELDS",
        format!("Missing required fields: {}", missing.join(", ")),
        details! { "fields" => missing },
    ))
}

/// Trim and lowercase, then check the shape of the address.
pub(crate) fn normalize_email(email: &str) -> Result<String, UseCaseError> {
    let email = email.trim().to_lowercase();
    let valid = email_pattern().is_some_and(|pattern| pattern.is_match(&email));
    if !valid {
        return Err(UseCaseError::validation_with_details(
            "INVALID_EMAIL_FORMAT",
            "Invalid email address format",
            details! { "email" => email },
        ));
    }
    Ok(email)
}

/// Accepts `YYYY-MM-DD`, or an RFC 3339 timestamp whose date part is used.
/// Dates in the future are rejected.
pub(crate) fn parse_date_of_birth(value: &str) -> Result<NaiveDate, UseCaseError> {
    let value = value.trim();
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
        .ok_or_else(|| {
            UseCaseError::validation_with_details(
                "INVALID_DATE_OF_BIRTH",
                "Date of birth must be a date in YYYY-MM-DD format",
                details! { "dateOfBirth" => value },
            )
        })?;

    if date > Utc::now().date_naive() {
        return Err(UseCaseError::validation_with_details(
            "INVALID_DATE_OF_BIRTH",
            "Date of birth cannot be in the future",
            details! { "dateOfBirth" => value },
        ));
    }
    Ok(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields() {
        let missing = missing_fields(&[("name", "A"), ("email", "  "), ("phone", "")]);
        assert_eq!(missing, vec!["email", "phone"]);
        assert!(require_fields(&[("name", "A")]).is_ok());

        let err = require_fields(&[("name", "")]).unwrap_err();
        assert_eq!(err.code(), "MISSING_FIELDS");
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ada@Example.COM ").unwrap(), "ada@example.com");
        assert_eq!(normalize_email("a@x.com").unwrap(), "a@x.com");
        assert!(normalize_email("invalid").is_err());
        assert!(normalize_email("@example.com").is_err());
        assert!(normalize_email("user@").is_err());
    }

    #[test]
    fn test_parse_date_of_birth() {
        assert_eq!(
            parse_date_of_birth("2000-01-01").unwrap(),
            NaiveDate::from_ymd_opt(2000, 1, 1).unwrap()
        );
        assert_eq!(
            parse_date_of_birth("1999-12-31T23:00:00Z").unwrap(),
            NaiveDate::from_ymd_opt(1999, 12, 31).unwrap()
        );
        assert!(parse_date_of_birth("01/01/2000").is_err());
        assert!(parse_date_of_birth("2000-02-30").is_err());
        assert!(parse_date_of_birth("9999-01-01").is_err());
    }
}
