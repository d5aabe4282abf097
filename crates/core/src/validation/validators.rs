//! Input validators for ledger operations.
//!
//! Every function here is pure: it checks one primitive value crossing into
//! the ledger and returns its normalized form, or a [`ValidationError`]
//! carrying a human-readable reason.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;

use crate::constants::MAX_WATCHLIST_NAME_LENGTH;
use crate::errors::ValidationError;
use crate::transactions::TransactionType;

pub type ValidationResult<T> = std::result::Result<T, ValidationError>;

lazy_static! {
    /// 1-10 letters, optionally followed by a dot and 1-3 letters (e.g. BRK.B)
    static ref TICKER_REGEX: Regex =
        Regex::new(r"^[A-Z]{1,10}(\.[A-Z]{1,3})?$").expect("Invalid regex pattern");
}

/// Naive date-time layouts accepted after the `Z`/offset forms fail.
const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Trims and uppercases a ticker symbol, then checks its shape.
pub fn validate_ticker(ticker: &str) -> ValidationResult<String> {
    let normalized = ticker.trim().to_uppercase();
    if normalized.is_empty() {
        return Err(ValidationError::invalid("Ticker cannot be empty"));
    }
    if !TICKER_REGEX.is_match(&normalized) {
        return Err(ValidationError::invalid(format!(
            "Invalid ticker format: '{}'. Ticker must be 1-10 uppercase letters, optionally \
             followed by a dot and 1-3 letters (e.g., 'AAPL', 'MSFT', 'BRK.B')",
            normalized
        )));
    }
    Ok(normalized)
}

/// Checks a share quantity: non-negative, a whole number and, unless
/// `allow_zero`, strictly positive. Fractional shares are rejected.
pub fn validate_quantity(quantity: Decimal, allow_zero: bool) -> ValidationResult<Decimal> {
    if quantity.is_sign_negative() && !quantity.is_zero() {
        return Err(ValidationError::invalid(format!(
            "Quantity cannot be negative: {}",
            quantity
        )));
    }
    if !allow_zero && quantity.is_zero() {
        return Err(ValidationError::invalid(
            "Quantity must be greater than zero",
        ));
    }
    if !quantity.fract().is_zero() {
        return Err(ValidationError::invalid(format!(
            "Quantity must be a whole number: {}",
            quantity
        )));
    }
    Ok(quantity.normalize())
}

/// Checks a per-share price: non-negative and, unless `allow_zero`, positive.
pub fn validate_price(price: Decimal, allow_zero: bool) -> ValidationResult<Decimal> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(ValidationError::invalid(format!(
            "Price cannot be negative: {}",
            price
        )));
    }
    if !allow_zero && price.is_zero() {
        return Err(ValidationError::invalid("Price must be greater than zero"));
    }
    Ok(price)
}

/// Multiplies a quantity by a price, rejecting results too large to
/// represent. `label` names the amount in the error message.
pub fn validate_total(
    quantity: Decimal,
    price: Decimal,
    label: &str,
) -> ValidationResult<Decimal> {
    quantity
        .checked_mul(price)
        .ok_or_else(|| ValidationError::invalid(format!("{} is too large", label)))
}

/// Parses an ISO-8601 date or date-time. `None` means "now".
///
/// Accepted: `YYYY-MM-DD` (midnight UTC), naive `YYYY-MM-DDTHH:MM[:SS[.fff]]`
/// taken as UTC (a space may replace the `T`), and RFC 3339 with `Z` or an
/// explicit offset, converted to UTC.
pub fn validate_date(date: Option<&str>) -> ValidationResult<DateTime<Utc>> {
    let Some(raw) = date else {
        return Ok(Utc::now());
    };
    let value = raw.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(naive.and_utc());
        }
    }
    if let Ok(day) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(midnight) = day.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }

    Err(ValidationError::invalid(format!(
        "Invalid date format: '{}'. Expected ISO format (YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS)",
        raw
    )))
}

/// Parses one of the six transaction types, case-insensitively.
pub fn validate_transaction_type(transaction_type: &str) -> ValidationResult<TransactionType> {
    if transaction_type.trim().is_empty() {
        return Err(ValidationError::invalid("Transaction type cannot be empty"));
    }
    transaction_type.parse()
}

/// Trims free-text notes. Blank input normalizes to `None`.
pub fn validate_notes(notes: Option<&str>, max_length: usize) -> ValidationResult<Option<String>> {
    let Some(raw) = notes else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let length = trimmed.chars().count();
    if length > max_length {
        return Err(ValidationError::invalid(format!(
            "Notes too long: {} characters (maximum {})",
            length, max_length
        )));
    }
    Ok(Some(trimmed.to_string()))
}

/// Position ids are opaque; they only have to be non-blank.
pub fn validate_position_id(position_id: &str) -> ValidationResult<String> {
    let trimmed = position_id.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::invalid("Position ID cannot be empty"));
    }
    Ok(trimmed.to_string())
}

pub fn validate_watchlist_name(name: &str) -> ValidationResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::invalid("Watchlist name cannot be empty"));
    }
    let length = trimmed.chars().count();
    if length > MAX_WATCHLIST_NAME_LENGTH {
        return Err(ValidationError::invalid(format!(
            "Watchlist name too long: {} characters (maximum {})",
            length, MAX_WATCHLIST_NAME_LENGTH
        )));
    }
    Ok(trimmed.to_string())
}
