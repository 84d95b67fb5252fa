//! Field-level validation: takes a [`PaymentField`] description and a raw
//! value, returns `None` when valid or a human-readable error.
//!
//! Dispatch order: named validator (card rules and friends), then field
//! type, then the generic string constraints the contract declares.

use crate::card;
use crate::rules;
use once_cell::sync::Lazy;
use payline_methods::{FieldType, PaymentField};
use regex::Regex;
use std::collections::HashMap;

/// A named validator for one well-known field.
pub type NamedValidator = fn(&str) -> Option<String>;

/// Strategy registry of per-name validators with a type-based fallback.
/// New method-specific fields plug in via [`register`](Self::register)
/// instead of editing a central dispatch function.
pub struct FieldValidationEngine {
    named: HashMap<&'static str, NamedValidator>,
}

impl FieldValidationEngine {
    pub fn new() -> Self {
        let mut named: HashMap<&'static str, NamedValidator> = HashMap::new();
        named.insert("cardNumber", card::check_card_number);
        named.insert("expiry", check_expiry_format);
        named.insert("cvv", card::check_cvv);
        named.insert("cardholder", card::check_cardholder);
        named.insert("upiId", card::check_upi_id);
        Self { named }
    }

    pub fn register(&mut self, name: &'static str, validator: NamedValidator) {
        self.named.insert(name, validator);
    }

    pub fn validate(&self, field: &PaymentField, value: &str) -> Option<String> {
        let trimmed = value.trim();

        if trimmed.is_empty() {
            if field.required {
                return Some(format!("{} is required", field.label));
            }
            return None;
        }

        if let Some(validator) = self.named.get(field.name.as_str()) {
            return validator(value);
        }

        if let Some(error) = self.validate_by_type(field, trimmed) {
            return Some(error);
        }

        self.validate_constraints(field, trimmed)
    }

    fn validate_by_type(&self, field: &PaymentField, value: &str) -> Option<String> {
        match field.field_type {
            FieldType::Email => rules::validate_email(value).message,
            FieldType::Phone => rules::validate_phone(value).message,
            FieldType::Number => {
                if value.parse::<f64>().is_err() {
                    Some(format!("{} must be a number", field.label))
                } else {
                    None
                }
            }
            FieldType::Select => match &field.options {
                Some(options) if !options.iter().any(|o| o == value) => {
                    Some(format!("{} must be one of the listed options", field.label))
                }
                _ => None,
            },
            FieldType::String | FieldType::Hidden | FieldType::Password => None,
        }
    }

    fn validate_constraints(&self, field: &PaymentField, value: &str) -> Option<String> {
        let len = value.chars().count();
        if let Some(min) = field.min_length {
            if len < min {
                return Some(format!("{} must be at least {min} characters", field.label));
            }
        }
        if let Some(max) = field.max_length {
            if len > max {
                return Some(format!("{} must be at most {max} characters", field.label));
            }
        }
        if let Some(pattern) = &field.pattern {
            // An unparseable pattern in a contract counts as a failed match.
            let matched = Regex::new(pattern)
                .map(|re| re.is_match(value))
                .unwrap_or(false);
            if !matched {
                return Some(format!("{} has an invalid format", field.label));
            }
        }
        None
    }
}

impl Default for FieldValidationEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn check_expiry_format(raw: &str) -> Option<String> {
    if card::parse_expiry(raw.trim()).is_none() {
        return Some("Expiry date must be in MM/YY format".to_string());
    }
    None
}

static DEFAULT_ENGINE: Lazy<FieldValidationEngine> = Lazy::new(FieldValidationEngine::new);

/// Validate against the default engine. `None` means the value is valid.
pub fn validate_field(field: &PaymentField, value: &str) -> Option<String> {
    DEFAULT_ENGINE.validate(field, value)
}
