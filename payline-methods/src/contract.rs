use crate::field::PaymentField;
use serde::{Deserialize, Serialize};

/// Declarative description of one payment method: identity, availability
/// and the fields the caller must supply. Immutable after construction;
/// changes happen by replacing the registry entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentMethodContract {
    pub id: String,
    pub display_name: String,
    pub description: String,
    pub icon: String,
    /// Gateway-mediated methods authorize online; pay-on-delivery-style
    /// methods only get marked pending.
    pub requires_online_auth: bool,
    pub enabled: bool,
    pub fields: Vec<PaymentField>,
}

impl PaymentMethodContract {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            description: String::new(),
            icon: String::new(),
            requires_online_auth: true,
            enabled: true,
            fields: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn offline(mut self) -> Self {
        self.requires_online_auth = false;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn with_fields(mut self, fields: Vec<PaymentField>) -> Self {
        self.fields = fields;
        self
    }

    pub fn field(&self, name: &str) -> Option<&PaymentField> {
        self.fields.iter().find(|f| f.name == name)
    }
}
