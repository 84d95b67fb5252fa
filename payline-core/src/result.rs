use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Outcome of a single provider operation.
///
/// Deliberately a smaller state space than [`crate::intent::IntentStatus`];
/// the mapping between the two happens once, at the use-case boundary.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResultStatus {
    Pending,
    Paid,
    Failed,
    Refunded,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentResult {
    pub status: ResultStatus,
    pub external_id: Option<String>,
    pub receipt_url: Option<String>,
    pub error: Option<String>,
    pub amount: Money,
    pub payment_method: String,
    pub order_id: Option<String>,
    pub customer_id: Option<String>,
    pub metadata: serde_json::Value,
}

impl PaymentResult {
    fn base(status: ResultStatus, amount: Money, payment_method: impl Into<String>) -> Self {
        Self {
            status,
            external_id: None,
            receipt_url: None,
            error: None,
            amount,
            payment_method: payment_method.into(),
            order_id: None,
            customer_id: None,
            metadata: serde_json::Value::Null,
        }
    }

    pub fn paid(amount: Money, payment_method: impl Into<String>) -> Self {
        Self::base(ResultStatus::Paid, amount, payment_method)
    }

    pub fn pending(amount: Money, payment_method: impl Into<String>) -> Self {
        Self::base(ResultStatus::Pending, amount, payment_method)
    }

    pub fn refunded(amount: Money, payment_method: impl Into<String>) -> Self {
        Self::base(ResultStatus::Refunded, amount, payment_method)
    }

    pub fn failed(
        amount: Money,
        payment_method: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        let mut result = Self::base(ResultStatus::Failed, amount, payment_method);
        result.error = Some(error.into());
        result
    }

    pub fn with_external_id(mut self, external_id: impl Into<String>) -> Self {
        self.external_id = Some(external_id.into());
        self
    }

    pub fn with_receipt_url(mut self, receipt_url: impl Into<String>) -> Self {
        self.receipt_url = Some(receipt_url.into());
        self
    }

    pub fn with_order(mut self, order_id: Option<String>, customer_id: Option<String>) -> Self {
        self.order_id = order_id;
        self.customer_id = customer_id;
        self
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, ResultStatus::Paid | ResultStatus::Refunded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_result_carries_the_error() {
        let amount = Money::new("10.00".parse().unwrap(), "USD").unwrap();
        let result = PaymentResult::failed(amount, "credit_card", "card declined");
        assert_eq!(result.status, ResultStatus::Failed);
        assert_eq!(result.error.as_deref(), Some("card declined"));
        assert!(!result.is_success());
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&ResultStatus::Paid).unwrap();
        assert_eq!(json, "\"paid\"");
    }
}
