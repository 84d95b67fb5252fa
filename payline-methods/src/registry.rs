use crate::contract::PaymentMethodContract;
use crate::field::{FieldType, PaymentField};
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Payment method contract must have an id")]
    MissingId,
}

/// Process-local catalog of payment method contracts, keyed by id.
///
/// Read-mostly after startup: register/unregister are rare administrative
/// operations, lookups happen on every payment. One instance per process,
/// shared via `Arc` and injected into the use cases.
pub struct MethodRegistry {
    contracts: RwLock<HashMap<String, PaymentMethodContract>>,
}

impl MethodRegistry {
    /// Empty registry, no seeded methods.
    pub fn empty() -> Self {
        Self {
            contracts: RwLock::new(HashMap::new()),
        }
    }

    /// Registry seeded with the default method catalog.
    pub fn new() -> Self {
        let registry = Self::empty();
        for contract in default_contracts() {
            registry.register(contract);
        }
        registry
    }

    /// Register a contract, replacing any existing entry with the same id.
    ///
    /// Panics when the contract has no id: that is a startup configuration
    /// bug, not a runtime payment failure.
    pub fn register(&self, contract: PaymentMethodContract) {
        self.try_register(contract)
            .expect("payment method contract must have an id")
    }

    /// Non-panicking variant of [`register`](Self::register).
    pub fn try_register(&self, contract: PaymentMethodContract) -> Result<(), RegistryError> {
        if contract.id.is_empty() {
            return Err(RegistryError::MissingId);
        }
        info!(method_id = %contract.id, "registering payment method");
        let mut contracts = self.contracts.write().expect("registry lock poisoned");
        contracts.insert(contract.id.clone(), contract);
        Ok(())
    }

    pub fn unregister(&self, id: &str) -> Option<PaymentMethodContract> {
        info!(method_id = %id, "unregistering payment method");
        let mut contracts = self.contracts.write().expect("registry lock poisoned");
        contracts.remove(id)
    }

    pub fn get_contract(&self, id: &str) -> Option<PaymentMethodContract> {
        let contracts = self.contracts.read().expect("registry lock poisoned");
        contracts.get(id).cloned()
    }

    /// Present and enabled.
    pub fn is_available(&self, id: &str) -> bool {
        let contracts = self.contracts.read().expect("registry lock poisoned");
        contracts.get(id).map(|c| c.enabled).unwrap_or(false)
    }

    pub fn list_contracts(&self) -> Vec<PaymentMethodContract> {
        let contracts = self.contracts.read().expect("registry lock poisoned");
        let mut all: Vec<_> = contracts.values().cloned().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }

    pub fn list_enabled_contracts(&self) -> Vec<PaymentMethodContract> {
        self.list_contracts()
            .into_iter()
            .filter(|c| c.enabled)
            .collect()
    }

    /// Enabled contracts that go through an online gateway.
    pub fn list_online_auth_contracts(&self) -> Vec<PaymentMethodContract> {
        self.list_enabled_contracts()
            .into_iter()
            .filter(|c| c.requires_online_auth)
            .collect()
    }

    /// Enabled contracts settled offline, like cash on delivery.
    pub fn list_offline_auth_contracts(&self) -> Vec<PaymentMethodContract> {
        self.list_enabled_contracts()
            .into_iter()
            .filter(|c| !c.requires_online_auth)
            .collect()
    }
}

impl Default for MethodRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Default method catalog seeded at construction.
fn default_contracts() -> Vec<PaymentMethodContract> {
    vec![
        PaymentMethodContract::new("credit_card", "Credit Card")
            .with_description("Visa, Mastercard, Amex and other major cards")
            .with_icon("credit-card")
            .with_fields(vec![
                PaymentField::card_number(),
                PaymentField::expiry(),
                PaymentField::cvv(),
                PaymentField::cardholder(),
            ]),
        PaymentMethodContract::new("debit_card", "Debit Card")
            .with_description("Pay directly from your bank account")
            .with_icon("debit-card")
            .with_fields(vec![
                PaymentField::card_number(),
                PaymentField::expiry(),
                PaymentField::cvv(),
                PaymentField::cardholder(),
            ]),
        PaymentMethodContract::new("upi", "UPI")
            .with_description("Instant transfer via UPI ID")
            .with_icon("upi")
            .with_fields(vec![PaymentField::upi_id()]),
        PaymentMethodContract::new("net_banking", "Net Banking")
            .with_description("Pay through your bank's portal")
            .with_icon("bank")
            .with_fields(vec![PaymentField::new("bank", FieldType::Select, "Bank")
                .required()
                .with_options(vec![
                    "HDFC".to_string(),
                    "ICICI".to_string(),
                    "SBI".to_string(),
                    "Axis".to_string(),
                ])]),
        PaymentMethodContract::new("wallet", "Wallet")
            .with_description("Pay from a linked wallet balance")
            .with_icon("wallet")
            .with_fields(vec![
                PaymentField::new("walletProvider", FieldType::Select, "Wallet Provider")
                    .required()
                    .with_options(vec![
                        "Paytm".to_string(),
                        "PhonePe".to_string(),
                        "AmazonPay".to_string(),
                    ]),
                PaymentField::new("walletPhone", FieldType::Phone, "Registered Phone")
                    .required(),
            ]),
        PaymentMethodContract::new("cash_on_delivery", "Cash on Delivery")
            .with_description("Pay in cash when your order arrives")
            .with_icon("cash")
            .offline(),
    ]
}
