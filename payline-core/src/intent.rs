use crate::money::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle states of a payment attempt.
///
/// Distinct from [`crate::result::ResultStatus`]: an intent records the
/// durable lifecycle, a result describes the outcome of one provider call.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IntentStatus {
    Created,
    RequiresAction,
    Authorized,
    Captured,
    Refunded,
    Failed,
    Canceled,
}

impl IntentStatus {
    /// Terminal states are never left again.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            IntentStatus::Captured
                | IntentStatus::Refunded
                | IntentStatus::Failed
                | IntentStatus::Canceled
        )
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum IntentError {
    #[error("Invalid transition from {from:?}: {reason}")]
    InvalidTransition { from: IntentStatus, reason: String },
}

/// Durable record of one payment attempt.
///
/// Mutated only through its own transition methods; the amount is fixed at
/// creation and never changed by capture or refund.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub method_id: String,
    pub amount: Money,
    pub metadata: serde_json::Value,
    pub status: IntentStatus,
    pub external_id: Option<String>,
    pub receipt_url: Option<String>,
    pub error: Option<String>,
    pub order_id: Option<String>,
    pub customer_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Optimistic-concurrency version, bumped by the store on every update.
    pub version: u64,
}

impl PaymentIntent {
    pub fn new(method_id: impl Into<String>, amount: Money) -> Self {
        let now = Utc::now();
        Self {
            id: format!("pi_{}", Uuid::new_v4().simple()),
            method_id: method_id.into(),
            amount,
            metadata: serde_json::Value::Null,
            status: IntentStatus::Created,
            external_id: None,
            receipt_url: None,
            error: None,
            order_id: None,
            customer_id: None,
            created_at: now,
            updated_at: now,
            version: 0,
        }
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

    /// Well-formedness check used before the intent is first persisted.
    pub fn is_valid(&self) -> bool {
        !self.method_id.is_empty() && self.amount.is_positive()
    }

    /// Transition: Created | RequiresAction → Authorized
    pub fn authorize(&mut self) -> Result<(), IntentError> {
        match self.status {
            IntentStatus::Created | IntentStatus::RequiresAction => {
                self.transition(IntentStatus::Authorized);
                Ok(())
            }
            from => Err(IntentError::InvalidTransition {
                from,
                reason: "must be created or awaiting action to authorize".to_string(),
            }),
        }
    }

    /// Transition: Authorized → Captured
    pub fn capture(&mut self) -> Result<(), IntentError> {
        match self.status {
            IntentStatus::Authorized => {
                self.transition(IntentStatus::Captured);
                Ok(())
            }
            from => Err(IntentError::InvalidTransition {
                from,
                reason: "must be authorized to capture".to_string(),
            }),
        }
    }

    /// Transition: Captured → Refunded
    pub fn refund(&mut self) -> Result<(), IntentError> {
        match self.status {
            IntentStatus::Captured => {
                self.transition(IntentStatus::Refunded);
                Ok(())
            }
            from => Err(IntentError::InvalidTransition {
                from,
                reason: "only captured payments can be refunded".to_string(),
            }),
        }
    }

    /// Transition: Created | RequiresAction | Authorized → Failed
    pub fn fail(&mut self, error: impl Into<String>) -> Result<(), IntentError> {
        match self.status {
            IntentStatus::Created | IntentStatus::RequiresAction | IntentStatus::Authorized => {
                self.error = Some(error.into());
                self.transition(IntentStatus::Failed);
                Ok(())
            }
            from => Err(IntentError::InvalidTransition {
                from,
                reason: "cannot fail a settled or closed payment".to_string(),
            }),
        }
    }

    /// Transition: any non-settled state → Canceled
    pub fn cancel(&mut self) -> Result<(), IntentError> {
        match self.status {
            IntentStatus::Captured | IntentStatus::Refunded => {
                Err(IntentError::InvalidTransition {
                    from: self.status,
                    reason: "captured payments cannot be canceled, refund instead".to_string(),
                })
            }
            _ => {
                self.transition(IntentStatus::Canceled);
                Ok(())
            }
        }
    }

    /// Transition: Created | RequiresAction → RequiresAction
    pub fn requires_action(&mut self) -> Result<(), IntentError> {
        match self.status {
            IntentStatus::Created | IntentStatus::RequiresAction => {
                self.transition(IntentStatus::RequiresAction);
                Ok(())
            }
            from => Err(IntentError::InvalidTransition {
                from,
                reason: "action can only be requested before authorization".to_string(),
            }),
        }
    }

    /// Side-channel setter; bumps `updated_at` but never changes status.
    pub fn set_external_id(&mut self, external_id: impl Into<String>) {
        self.external_id = Some(external_id.into());
        self.updated_at = Utc::now();
    }

    /// Side-channel setter; bumps `updated_at` but never changes status.
    pub fn set_receipt_url(&mut self, receipt_url: impl Into<String>) {
        self.receipt_url = Some(receipt_url.into());
        self.updated_at = Utc::now();
    }

    fn transition(&mut self, to: IntentStatus) {
        self.status = to;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intent() -> PaymentIntent {
        let amount = Money::new("10.00".parse().unwrap(), "USD").unwrap();
        PaymentIntent::new("credit_card", amount)
    }

    #[test]
    fn new_intent_is_created_and_valid() {
        let intent = intent();
        assert_eq!(intent.status, IntentStatus::Created);
        assert!(intent.id.starts_with("pi_"));
        assert!(intent.is_valid());
        assert_eq!(intent.version, 0);
    }

    #[test]
    fn zero_amount_intent_is_invalid() {
        let intent = PaymentIntent::new("credit_card", Money::zero("USD"));
        assert!(!intent.is_valid());
    }

    #[test]
    fn happy_path_authorize_then_capture() {
        let mut intent = intent();
        intent.authorize().unwrap();
        assert_eq!(intent.status, IntentStatus::Authorized);
        intent.capture().unwrap();
        assert_eq!(intent.status, IntentStatus::Captured);
    }

    #[test]
    fn capture_requires_authorized_state() {
        for setup in [
            |_: &mut PaymentIntent| {},
            |i: &mut PaymentIntent| i.requires_action().unwrap(),
            |i: &mut PaymentIntent| i.cancel().unwrap(),
            |i: &mut PaymentIntent| i.fail("declined").unwrap(),
        ] {
            let mut intent = intent();
            setup(&mut intent);
            let before = intent.status;
            let err = intent.capture().unwrap_err();
            assert!(matches!(err, IntentError::InvalidTransition { .. }));
            assert_eq!(intent.status, before, "status must be left unchanged");
        }
    }

    #[test]
    fn cancel_fails_only_after_capture() {
        let mut authorized = intent();
        authorized.authorize().unwrap();
        authorized.cancel().unwrap();
        assert_eq!(authorized.status, IntentStatus::Canceled);

        let mut captured = intent();
        captured.authorize().unwrap();
        captured.capture().unwrap();
        assert!(captured.cancel().is_err());
        assert_eq!(captured.status, IntentStatus::Captured);
    }

    #[test]
    fn refund_requires_captured_state() {
        let mut intent = intent();
        intent.authorize().unwrap();
        assert!(intent.refund().is_err());

        intent.capture().unwrap();
        intent.refund().unwrap();
        assert_eq!(intent.status, IntentStatus::Refunded);
    }

    #[test]
    fn requires_action_is_reentrant() {
        let mut intent = intent();
        intent.requires_action().unwrap();
        intent.requires_action().unwrap();
        assert_eq!(intent.status, IntentStatus::RequiresAction);
        intent.authorize().unwrap();
        assert!(intent.requires_action().is_err());
    }

    #[test]
    fn setters_do_not_change_status() {
        let mut intent = intent();
        intent.set_external_id("ch_1");
        intent.set_receipt_url("https://pay.example/r/1");
        assert_eq!(intent.status, IntentStatus::Created);
        assert_eq!(intent.external_id.as_deref(), Some("ch_1"));
    }

    #[test]
    fn fail_records_the_error() {
        let mut intent = intent();
        intent.fail("insufficient funds").unwrap();
        assert_eq!(intent.status, IntentStatus::Failed);
        assert_eq!(intent.error.as_deref(), Some("insufficient funds"));
    }
}
