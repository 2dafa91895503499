//! Field-level validation for lead data.
//!
//! These validators back both the interactive create/edit paths and CSV
//! import. Websites without a scheme are retried with an `http://` prefix
//! before being rejected, matching the behavior lead entry has always had.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use validator::{ValidateEmail, ValidationError};

lazy_static! {
    /// Permissive phone pattern: digits plus common separators, 5-20 chars.
    static ref PHONE_RE: Regex = Regex::new(r"^\+?[0-9][0-9 ()\-./]{4,19}$").unwrap();

    /// Absolute http(s) URL with a dotted hostname.
    static ref WEBSITE_RE: Regex = Regex::new(
        r"^https?://[A-Za-z0-9]([A-Za-z0-9-]*[A-Za-z0-9])?(\.[A-Za-z0-9]([A-Za-z0-9-]*[A-Za-z0-9])?)+(:\d{1,5})?(/\S*)?$"
    )
    .unwrap();
}

/// Date format accepted for `follow_up` values.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Validates an email address.
pub fn validate_email_field(email: &str) -> Result<(), ValidationError> {
    if email.validate_email() {
        Ok(())
    } else {
        let mut err = ValidationError::new("email_format");
        err.message = Some("Invalid email address".into());
        Err(err)
    }
}

/// Validates a phone number against the permissive phone-character pattern.
pub fn validate_phone_field(phone: &str) -> Result<(), ValidationError> {
    if PHONE_RE.is_match(phone) {
        Ok(())
    } else {
        let mut err = ValidationError::new("phone_format");
        err.message = Some("Invalid phone number".into());
        Err(err)
    }
}

/// Validates a website URL, auto-fixing a missing scheme.
///
/// Returns the value to store: the input unchanged if it is already a valid
/// absolute URL, or the input with `http://` prepended if that makes it
/// valid. Rejects otherwise.
pub fn normalize_website(website: &str) -> Result<String, ValidationError> {
    if WEBSITE_RE.is_match(website) {
        return Ok(website.to_string());
    }
    if !website.contains("://") {
        let prefixed = format!("http://{}", website);
        if WEBSITE_RE.is_match(&prefixed) {
            return Ok(prefixed);
        }
    }
    let mut err = ValidationError::new("website_format");
    err.message = Some("Invalid website URL".into());
    Err(err)
}

/// Parses a follow-up date, rejecting values that are not real calendar dates.
pub fn parse_follow_up_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| {
        let mut err = ValidationError::new("date_format");
        err.message = Some("Invalid date, expected YYYY-MM-DD".into());
        err
    })
}
