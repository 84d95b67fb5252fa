use crate::error::FlowError;
use payline_core::{
    CaptureRequest, IntentStatus, Money, PaymentIntentStore, PaymentProvider, PaymentResult,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapturePaymentInput {
    pub intent_id: String,
    /// Defaults to the full authorized amount; a smaller explicit amount
    /// performs a partial capture.
    pub amount: Option<Decimal>,
    pub currency: String,
}

/// Settles a previously authorized payment.
pub struct CapturePayment {
    provider: Arc<dyn PaymentProvider>,
    store: Arc<dyn PaymentIntentStore>,
}

impl CapturePayment {
    pub fn new(provider: Arc<dyn PaymentProvider>, store: Arc<dyn PaymentIntentStore>) -> Self {
        Self { provider, store }
    }

    pub async fn execute(&self, input: CapturePaymentInput) -> Result<PaymentResult, FlowError> {
        let mut intent = self
            .store
            .find_by_id(&input.intent_id)
            .await?
            .ok_or_else(|| FlowError::PaymentIntentNotFound(input.intent_id.clone()))?;

        if intent.status != IntentStatus::Authorized {
            return Err(FlowError::PaymentIntentNotAuthorized {
                id: intent.id,
                status: intent.status,
            });
        }

        let capture_amount = match input.amount {
            None => intent.amount.clone(),
            Some(amount) => match Money::new(amount, &input.currency) {
                Ok(money) => money,
                Err(e) => {
                    return Ok(PaymentResult::failed(
                        intent.amount.clone(),
                        &intent.method_id,
                        e.to_string(),
                    ));
                }
            },
        };

        // Capturing more than was authorized is rejected here rather than
        // passed through for the provider to sort out.
        match capture_amount.is_greater_than(&intent.amount) {
            Ok(true) => {
                return Ok(PaymentResult::failed(
                    intent.amount.clone(),
                    &intent.method_id,
                    "Capture amount cannot exceed authorized amount",
                ));
            }
            Ok(false) => {}
            Err(e) => {
                return Ok(PaymentResult::failed(
                    intent.amount.clone(),
                    &intent.method_id,
                    e.to_string(),
                ));
            }
        }

        let request = CaptureRequest {
            intent_id: intent.id.clone(),
            amount: capture_amount,
        };
        match self.provider.capture(&request).await {
            Ok(result) => {
                intent
                    .capture()
                    .map_err(|e| FlowError::InvalidPaymentIntent(e.to_string()))?;
                if let Some(external_id) = &result.external_id {
                    intent.set_external_id(external_id);
                }
                if let Some(receipt_url) = &result.receipt_url {
                    intent.set_receipt_url(receipt_url);
                }
                self.store.update(&intent).await?;
                info!(intent_id = %intent.id, "payment captured");
                Ok(result)
            }
            Err(provider_error) => {
                // Provider failures never propagate: record them on the
                // intent and hand the caller a failed result.
                warn!(intent_id = %intent.id, error = %provider_error, "capture failed");
                intent
                    .fail(provider_error.to_string())
                    .map_err(|e| FlowError::InvalidPaymentIntent(e.to_string()))?;
                self.store.update(&intent).await?;
                Ok(PaymentResult::failed(
                    intent.amount.clone(),
                    &intent.method_id,
                    provider_error.to_string(),
                ))
            }
        }
    }
}
