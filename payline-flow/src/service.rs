use crate::capture::{CapturePayment, CapturePaymentInput};
use crate::error::FlowError;
use crate::process::{ProcessPayment, ProcessPaymentInput};
use crate::refund::{RefundPayment, RefundPaymentInput};
use payline_core::{Clock, PaymentIntentStore, PaymentProvider, PaymentResult, SystemClock};
use payline_methods::{MethodRegistry, PaymentField, PaymentMethodContract};
use payline_validate::{validate, validate_field, ValidationOutcome};
use rust_decimal::Decimal;
use std::sync::Arc;

/// Caller-facing surface of the payment core. Owns the shared registry
/// and the provider/store/clock boundaries; the HTTP layer above talks
/// only to this.
pub struct PaymentService {
    registry: Arc<MethodRegistry>,
    clock: Arc<dyn Clock>,
    process: ProcessPayment,
    capture: CapturePayment,
    refund: RefundPayment,
}

impl PaymentService {
    pub fn new(
        registry: Arc<MethodRegistry>,
        provider: Arc<dyn PaymentProvider>,
        store: Arc<dyn PaymentIntentStore>,
    ) -> Self {
        Self::with_clock(registry, provider, store, Arc::new(SystemClock))
    }

    pub fn with_clock(
        registry: Arc<MethodRegistry>,
        provider: Arc<dyn PaymentProvider>,
        store: Arc<dyn PaymentIntentStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            registry: registry.clone(),
            clock,
            process: ProcessPayment::new(registry, provider.clone(), store.clone()),
            capture: CapturePayment::new(provider.clone(), store.clone()),
            refund: RefundPayment::new(provider, store),
        }
    }

    pub fn registry(&self) -> &MethodRegistry {
        &self.registry
    }

    /// Payment methods the checkout can offer right now.
    pub fn available_methods(&self) -> Vec<PaymentMethodContract> {
        self.registry.list_enabled_contracts()
    }

    pub async fn process_payment(
        &self,
        input: ProcessPaymentInput,
    ) -> Result<PaymentResult, FlowError> {
        self.process.execute(input).await
    }

    pub async fn capture_payment(
        &self,
        intent_id: impl Into<String>,
        amount: Option<Decimal>,
        currency: impl Into<String>,
    ) -> Result<PaymentResult, FlowError> {
        self.capture
            .execute(CapturePaymentInput {
                intent_id: intent_id.into(),
                amount,
                currency: currency.into(),
            })
            .await
    }

    pub async fn refund_payment(
        &self,
        payment_id: impl Into<String>,
        amount: Decimal,
        currency: impl Into<String>,
        reason: Option<String>,
    ) -> Result<PaymentResult, FlowError> {
        self.refund
            .execute(RefundPaymentInput {
                payment_id: payment_id.into(),
                amount,
                currency: currency.into(),
                reason,
            })
            .await
    }

    /// Single-field validation; `None` means valid.
    pub fn validate_field(&self, field: &PaymentField, value: &str) -> Option<String> {
        validate_field(field, value)
    }

    /// Payload validation dispatch over the supported kinds.
    pub fn validate(&self, kind: &str, payload: &serde_json::Value) -> ValidationOutcome {
        validate(kind, payload, self.clock.as_ref())
    }
}
