use serde::{Deserialize, Serialize};

/// Input kinds a payment method can ask for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Number,
    Select,
    Hidden,
    Email,
    Phone,
    Password,
}

/// Declarative description of one input a payment method needs from the
/// caller. Pure data, no behavior; validation lives in payline-validate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentField {
    pub name: String,
    pub field_type: FieldType,
    pub label: String,
    pub required: bool,
    pub pattern: Option<String>,
    pub mask: Option<String>,
    pub options: Option<Vec<String>>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub placeholder: Option<String>,
}

impl PaymentField {
    pub fn new(name: impl Into<String>, field_type: FieldType, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type,
            label: label.into(),
            required: false,
            pattern: None,
            mask: None,
            options: None,
            min_length: None,
            max_length: None,
            placeholder: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn with_mask(mut self, mask: impl Into<String>) -> Self {
        self.mask = Some(mask.into());
        self
    }

    pub fn with_options(mut self, options: Vec<String>) -> Self {
        self.options = Some(options);
        self
    }

    pub fn with_length(mut self, min: usize, max: usize) -> Self {
        self.min_length = Some(min);
        self.max_length = Some(max);
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    // Fields shared by several method contracts.

    pub fn card_number() -> Self {
        Self::new("cardNumber", FieldType::String, "Card Number")
            .required()
            .with_mask("#### #### #### ####")
            .with_placeholder("1234 5678 9012 3456")
    }

    pub fn expiry() -> Self {
        Self::new("expiry", FieldType::String, "Expiry Date")
            .required()
            .with_mask("##/##")
            .with_placeholder("MM/YY")
    }

    pub fn cvv() -> Self {
        Self::new("cvv", FieldType::Password, "CVV")
            .required()
            .with_length(3, 4)
            .with_placeholder("123")
    }

    pub fn cardholder() -> Self {
        Self::new("cardholder", FieldType::String, "Cardholder Name")
            .required()
            .with_placeholder("Name as printed on card")
    }

    pub fn upi_id() -> Self {
        Self::new("upiId", FieldType::String, "UPI ID")
            .required()
            .with_placeholder("name@bank")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_constraints() {
        let field = PaymentField::new("note", FieldType::String, "Note")
            .with_length(2, 64)
            .with_pattern("^[a-z ]+$");
        assert!(!field.required);
        assert_eq!(field.min_length, Some(2));
        assert_eq!(field.max_length, Some(64));
        assert_eq!(field.pattern.as_deref(), Some("^[a-z ]+$"));
    }

    #[test]
    fn field_type_serializes_lowercase() {
        let json = serde_json::to_string(&FieldType::Password).unwrap();
        assert_eq!(json, "\"password\"");
    }
}
