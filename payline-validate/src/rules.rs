//! Directly callable validation rules used by the payload composites.
//! Each returns a [`Validation`] value; nothing here throws or does I/O.

use crate::card;
use once_cell::sync::Lazy;
use payline_core::Clock;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Methods accepted by the checkout flow.
pub const ALLOWED_PAYMENT_METHODS: &[&str] = &[
    "credit_card",
    "debit_card",
    "upi",
    "net_banking",
    "wallet",
    "cash_on_delivery",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Validation {
    pub is_valid: bool,
    pub message: Option<String>,
}

impl Validation {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            message: None,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            message: Some(message.into()),
        }
    }

    fn from_check(result: Option<String>) -> Self {
        match result {
            None => Self::valid(),
            Some(message) => Self::invalid(message),
        }
    }
}

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"));
static ZIP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{5}(-\d{4})?$").expect("zip regex"));

pub fn validate_payment_method(method: &str) -> Validation {
    if ALLOWED_PAYMENT_METHODS.contains(&method) {
        Validation::valid()
    } else {
        Validation::invalid(format!("Unsupported payment method: {method}"))
    }
}

pub fn validate_card_number(raw: &str) -> Validation {
    Validation::from_check(card::check_card_number_format(raw))
}

/// Checks `MM/YY` format and that the card has not expired against the
/// injected clock. A card expiring this month stays valid through month end.
pub fn validate_expiry_date(raw: &str, clock: &dyn Clock) -> Validation {
    let Some((month, year)) = card::parse_expiry(raw.trim()) else {
        return Validation::invalid("Expiry date must be in MM/YY format");
    };
    let now = clock.now();
    use chrono::Datelike;
    if year < now.year() || (year == now.year() && month < now.month()) {
        return Validation::invalid("Card has expired");
    }
    Validation::valid()
}

pub fn validate_cvv(raw: &str) -> Validation {
    Validation::from_check(card::check_cvv(raw))
}

pub fn validate_email(raw: &str) -> Validation {
    if EMAIL_RE.is_match(raw.trim()) {
        Validation::valid()
    } else {
        Validation::invalid("Enter a valid email address")
    }
}

pub fn validate_phone(raw: &str) -> Validation {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect();
    let digits = cleaned.strip_prefix('+').unwrap_or(&cleaned);
    if (10..=15).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit()) {
        Validation::valid()
    } else {
        Validation::invalid("Enter a valid phone number")
    }
}

pub fn validate_zip_code(raw: &str) -> Validation {
    if ZIP_RE.is_match(raw.trim()) {
        Validation::valid()
    } else {
        Validation::invalid("Enter a valid ZIP code")
    }
}
