//! Whole-payload validation for checkout submissions. A coarser layer than
//! the field engine: it checks cross-field business rules over a JSON
//! payload and aggregates every failure instead of stopping at the first.

use crate::rules::{self, Validation};
use payline_core::Clock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Aggregate outcome keyed by field path. Ordered map keeps error output
/// deterministic for logs and assertions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: BTreeMap<String, String>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            is_valid: true,
            errors: BTreeMap::new(),
        }
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.is_valid = false;
        self.errors.insert(field.into(), message.into());
    }

    fn absorb(&mut self, field: &str, validation: Validation) {
        if !validation.is_valid {
            self.add_error(
                field,
                validation
                    .message
                    .unwrap_or_else(|| format!("{field} is invalid")),
            );
        }
    }

    fn merge(&mut self, other: ValidationReport) {
        for (field, message) in other.errors {
            self.add_error(field, message);
        }
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of the dispatching [`validate`] entry point: either a single
/// rule outcome or an aggregate report, depending on the requested kind.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, String>>,
}

impl From<Validation> for ValidationOutcome {
    fn from(v: Validation) -> Self {
        Self {
            is_valid: v.is_valid,
            message: v.message,
            errors: None,
        }
    }
}

impl From<ValidationReport> for ValidationOutcome {
    fn from(r: ValidationReport) -> Self {
        Self {
            is_valid: r.is_valid,
            message: None,
            errors: Some(r.errors),
        }
    }
}

fn str_field<'a>(payload: &'a Value, key: &str) -> Option<&'a str> {
    payload.get(key).and_then(Value::as_str)
}

fn has_card_fields(payload: &Value) -> bool {
    ["cardNumber", "expiryDate", "cvv"]
        .iter()
        .any(|key| payload.get(*key).is_some())
}

/// Validate a payment submission: the method must be allowed, and card
/// methods must carry a valid card number, expiry and CVV.
pub fn validate_payment_data(payload: &Value, clock: &dyn Clock) -> ValidationReport {
    let mut report = ValidationReport::new();

    let method = match str_field(payload, "paymentMethod") {
        Some(method) if !method.is_empty() => method,
        _ => {
            report.add_error("paymentMethod", "Payment method is required");
            return report;
        }
    };
    report.absorb("paymentMethod", rules::validate_payment_method(method));

    // Card details are only demanded from card methods; UPI, wallets and
    // cash on delivery carry their own fields.
    if matches!(method, "credit_card" | "debit_card") {
        match str_field(payload, "cardNumber") {
            Some(number) if !number.trim().is_empty() => {
                report.absorb("cardNumber", rules::validate_card_number(number));
            }
            _ => report.add_error("cardNumber", "Card number is required"),
        }
        match str_field(payload, "expiryDate") {
            Some(expiry) if !expiry.trim().is_empty() => {
                report.absorb("expiryDate", rules::validate_expiry_date(expiry, clock));
            }
            _ => report.add_error("expiryDate", "Expiry date is required"),
        }
        match str_field(payload, "cvv") {
            Some(cvv) if !cvv.trim().is_empty() => {
                report.absorb("cvv", rules::validate_cvv(cvv));
            }
            _ => report.add_error("cvv", "CVV is required"),
        }
    }

    report
}

const ADDRESS_FIELDS: &[&str] = &[
    "fullName",
    "addressLine1",
    "city",
    "state",
    "zipCode",
    "phone",
    "email",
];

/// Validate an entire order submission before it reaches the payment flow.
pub fn validate_order_data(payload: &Value, clock: &dyn Clock) -> ValidationReport {
    let mut report = ValidationReport::new();

    match payload.get("items").and_then(Value::as_array) {
        Some(items) if !items.is_empty() => {}
        _ => report.add_error("items", "Order must contain at least one item"),
    }

    match payload.get("totalAmount").and_then(Value::as_f64) {
        Some(total) if total > 0.0 => {}
        _ => report.add_error("totalAmount", "Total amount must be a positive number"),
    }

    match payload.get("shippingAddress") {
        Some(address) if address.is_object() => {
            for key in ADDRESS_FIELDS {
                let path = format!("shippingAddress.{key}");
                match str_field(address, key) {
                    Some(value) if !value.trim().is_empty() => match *key {
                        "email" => report.absorb(&path, rules::validate_email(value)),
                        "phone" => report.absorb(&path, rules::validate_phone(value)),
                        "zipCode" => report.absorb(&path, rules::validate_zip_code(value)),
                        _ => {}
                    },
                    _ => report.add_error(path, format!("{key} is required")),
                }
            }
        }
        _ => report.add_error("shippingAddress", "Shipping address is required"),
    }

    match str_field(payload, "paymentMethod") {
        Some(method) if !method.is_empty() => {
            report.absorb("paymentMethod", rules::validate_payment_method(method));
        }
        _ => report.add_error("paymentMethod", "Payment method is required"),
    }

    if has_card_fields(payload) {
        report.merge(validate_payment_data(payload, clock));
    }

    report
}

/// Caller-facing dispatch over every validation kind. Single-value kinds
/// read the payload as a string; composite kinds take the whole object.
pub fn validate(kind: &str, payload: &Value, clock: &dyn Clock) -> ValidationOutcome {
    let as_str = || payload.as_str().unwrap_or("");
    match kind {
        "paymentMethod" => rules::validate_payment_method(as_str()).into(),
        "cardNumber" => rules::validate_card_number(as_str()).into(),
        "expiryDate" => rules::validate_expiry_date(as_str(), clock).into(),
        "cvv" => rules::validate_cvv(as_str()).into(),
        "email" => rules::validate_email(as_str()).into(),
        "phone" => rules::validate_phone(as_str()).into(),
        "zipCode" => rules::validate_zip_code(as_str()).into(),
        "paymentData" => validate_payment_data(payload, clock).into(),
        "orderData" => validate_order_data(payload, clock).into(),
        _ => Validation::invalid("Unknown validation type").into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use serde_json::json;

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap())
    }

    fn valid_card_payload() -> Value {
        json!({
            "paymentMethod": "credit_card",
            "cardNumber": "4111111111111111",
            "expiryDate": "12/27",
            "cvv": "123",
        })
    }

    #[test]
    fn card_payment_payload_happy_path() {
        let report = validate_payment_data(&valid_card_payload(), &clock());
        assert!(report.is_valid, "errors: {:?}", report.errors);
    }

    #[test]
    fn card_method_requires_card_fields() {
        let payload = json!({"paymentMethod": "credit_card"});
        let report = validate_payment_data(&payload, &clock());
        assert!(!report.is_valid);
        assert!(report.errors.contains_key("cardNumber"));
        assert!(report.errors.contains_key("expiryDate"));
        assert!(report.errors.contains_key("cvv"));
    }

    #[test]
    fn non_card_method_skips_card_fields() {
        let payload = json!({"paymentMethod": "cash_on_delivery"});
        let report = validate_payment_data(&payload, &clock());
        assert!(report.is_valid);
    }

    #[test]
    fn unknown_method_is_rejected() {
        let payload = json!({"paymentMethod": "bitcoin"});
        let report = validate_payment_data(&payload, &clock());
        assert!(!report.is_valid);
        assert!(report.errors.contains_key("paymentMethod"));
    }

    #[test]
    fn expired_card_is_rejected_by_payload_validator() {
        let mut payload = valid_card_payload();
        payload["expiryDate"] = json!("01/24");
        let report = validate_payment_data(&payload, &clock());
        assert_eq!(
            report.errors.get("expiryDate").map(String::as_str),
            Some("Card has expired")
        );
    }

    fn valid_order_payload() -> Value {
        json!({
            "items": [{"productId": "p1", "quantity": 2}],
            "totalAmount": 42.50,
            "paymentMethod": "upi",
            "shippingAddress": {
                "fullName": "Ana Diaz",
                "addressLine1": "12 Market St",
                "city": "Springfield",
                "state": "CA",
                "zipCode": "94110",
                "phone": "9876543210",
                "email": "ana@example.com",
            },
        })
    }

    #[test]
    fn order_payload_happy_path() {
        let report = validate_order_data(&valid_order_payload(), &clock());
        assert!(report.is_valid, "errors: {:?}", report.errors);
    }

    #[test]
    fn empty_items_and_bad_total_are_reported_together() {
        let mut payload = valid_order_payload();
        payload["items"] = json!([]);
        payload["totalAmount"] = json!(-5);
        let report = validate_order_data(&payload, &clock());
        assert!(!report.is_valid);
        assert!(report.errors.contains_key("items"));
        assert!(report.errors.contains_key("totalAmount"));
    }

    #[test]
    fn nested_address_fields_use_shared_rules() {
        let mut payload = valid_order_payload();
        payload["shippingAddress"]["email"] = json!("nope");
        payload["shippingAddress"]["zipCode"] = json!("12");
        payload["shippingAddress"]["city"] = json!("");
        let report = validate_order_data(&payload, &clock());
        assert!(report.errors.contains_key("shippingAddress.email"));
        assert!(report.errors.contains_key("shippingAddress.zipCode"));
        assert!(report.errors.contains_key("shippingAddress.city"));
    }

    #[test]
    fn order_with_card_fields_delegates_to_payment_data() {
        let mut payload = valid_order_payload();
        payload["paymentMethod"] = json!("credit_card");
        payload["cardNumber"] = json!("4111111111111112");
        payload["expiryDate"] = json!("12/27");
        payload["cvv"] = json!("123");
        let report = validate_order_data(&payload, &clock());
        assert!(!report.is_valid);
        assert!(report.errors.contains_key("cardNumber"));
    }

    #[test]
    fn dispatch_covers_every_kind() {
        let c = clock();
        assert!(validate("cardNumber", &json!("4111111111111111"), &c).is_valid);
        assert!(!validate("cardNumber", &json!("4111111111111112"), &c).is_valid);
        assert!(validate("email", &json!("a@b.co"), &c).is_valid);
        assert!(validate("phone", &json!("9876543210"), &c).is_valid);
        assert!(validate("zipCode", &json!("94110"), &c).is_valid);
        assert!(validate("cvv", &json!("123"), &c).is_valid);
        assert!(validate("expiryDate", &json!("12/27"), &c).is_valid);
        assert!(validate("paymentMethod", &json!("upi"), &c).is_valid);

        let outcome = validate("paymentData", &valid_card_payload(), &c);
        assert!(outcome.is_valid);
        assert!(outcome.errors.is_some());

        let outcome = validate("orderData", &valid_order_payload(), &c);
        assert!(outcome.is_valid);
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let outcome = validate("swiftCode", &json!("x"), &clock());
        assert!(!outcome.is_valid);
        assert_eq!(outcome.message.as_deref(), Some("Unknown validation type"));
    }
}
