use crate::error::FlowError;
use payline_core::{
    IntentStatus, Money, PaymentIntentStore, PaymentProvider, PaymentResult, RefundRequest,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefundPaymentInput {
    pub payment_id: String,
    pub amount: Decimal,
    pub currency: String,
    pub reason: Option<String>,
}

/// Returns funds for a captured payment. All business checks here resolve
/// to failed results rather than errors, and run before any provider call
/// so known-invalid input never costs a network round trip.
pub struct RefundPayment {
    provider: Arc<dyn PaymentProvider>,
    store: Arc<dyn PaymentIntentStore>,
}

impl RefundPayment {
    pub fn new(provider: Arc<dyn PaymentProvider>, store: Arc<dyn PaymentIntentStore>) -> Self {
        Self { provider, store }
    }

    pub async fn execute(&self, input: RefundPaymentInput) -> Result<PaymentResult, FlowError> {
        let refund_amount = match Money::new(input.amount, &input.currency) {
            Ok(money) => money,
            Err(e) => {
                return Ok(PaymentResult::failed(
                    Money::zero(&input.currency),
                    "",
                    e.to_string(),
                ));
            }
        };

        let Some(mut intent) = self.store.find_by_id(&input.payment_id).await? else {
            return Ok(PaymentResult::failed(
                refund_amount,
                "",
                "Payment intent not found",
            ));
        };

        let exceeds = match refund_amount.is_greater_than(&intent.amount) {
            Ok(exceeds) => exceeds,
            Err(e) => {
                return Ok(PaymentResult::failed(
                    intent.amount.clone(),
                    &intent.method_id,
                    e.to_string(),
                ));
            }
        };
        if exceeds {
            return Ok(PaymentResult::failed(
                intent.amount.clone(),
                &intent.method_id,
                "Refund amount cannot exceed payment amount",
            ));
        }

        if intent.status != IntentStatus::Captured {
            return Ok(PaymentResult::failed(
                intent.amount.clone(),
                &intent.method_id,
                "Only captured payments can be refunded",
            ));
        }

        let request = RefundRequest {
            payment_id: intent.id.clone(),
            amount: refund_amount,
            reason: input.reason,
        };
        match self.provider.refund(&request).await {
            Ok(result) => {
                intent
                    .refund()
                    .map_err(|e| FlowError::InvalidPaymentIntent(e.to_string()))?;
                self.store.update(&intent).await?;
                info!(intent_id = %intent.id, "payment refunded");
                Ok(result)
            }
            Err(provider_error) => {
                warn!(intent_id = %intent.id, error = %provider_error, "refund failed");
                Ok(PaymentResult::failed(
                    intent.amount.clone(),
                    &intent.method_id,
                    provider_error.to_string(),
                ))
            }
        }
    }
}
