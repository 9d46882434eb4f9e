//! Input validation helpers
//!
//! Centralized text length limits and field checks shared by the
//! customer and order services.

use thiserror::Error;

// ── Text length limits ──────────────────────────────────────────────

/// Customer names
pub const MAX_NAME_LEN: usize = 100;

/// Phone numbers
pub const MAX_PHONE_LEN: usize = 20;

/// Email addresses
pub const MAX_EMAIL_LEN: usize = 100;

/// Search keywords
pub const MAX_KEYWORD_LEN: usize = 100;

/// Upper bound for a single order total
pub const MAX_ORDER_TOTAL: f64 = 1_000_000_000.0;

/// A field failed validation; the message is user-facing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct InvalidField(pub String);

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), InvalidField> {
    if value.trim().is_empty() {
        return Err(InvalidField(format!("{field} must not be empty")));
    }
    if value.chars().count() > max_len {
        return Err(InvalidField(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.chars().count()
        )));
    }
    Ok(())
}

/// Validate an email address shape: `local@domain.tld`, no whitespace.
pub fn validate_email(value: &str) -> Result<(), InvalidField> {
    validate_required_text(value, "email", MAX_EMAIL_LEN)?;
    let invalid = || InvalidField(format!("email is not a valid address: {value}"));
    if value.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = value.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    let (host, tld) = domain.rsplit_once('.').ok_or_else(invalid)?;
    if host.is_empty() || tld.is_empty() {
        return Err(invalid());
    }
    Ok(())
}

/// Validate a money amount: finite, non-negative, within bounds.
///
/// `strictly_positive` additionally rejects zero.
pub fn validate_amount(value: f64, field: &str, strictly_positive: bool) -> Result<(), InvalidField> {
    if !value.is_finite() {
        return Err(InvalidField(format!("{field} must be a finite number")));
    }
    if strictly_positive && value <= 0.0 {
        return Err(InvalidField(format!("{field} must be greater than 0")));
    }
    if value < 0.0 {
        return Err(InvalidField(format!("{field} must not be negative")));
    }
    if value > MAX_ORDER_TOTAL {
        return Err(InvalidField(format!(
            "{field} exceeds maximum allowed ({MAX_ORDER_TOTAL})"
        )));
    }
    Ok(())
}
