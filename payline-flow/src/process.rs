use crate::error::FlowError;
use payline_core::{
    AuthorizeRequest, Money, PaymentIntent, PaymentIntentStore, PaymentProvider, PaymentResult,
    PendingRequest, ResultStatus,
};
use payline_methods::MethodRegistry;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessPaymentInput {
    pub method_id: String,
    pub amount: Decimal,
    pub currency: String,
    pub fields: serde_json::Value,
    pub order_id: Option<String>,
    pub customer_id: Option<String>,
    pub metadata: serde_json::Value,
}

/// Orchestrates one payment attempt: contract lookup, provider capability
/// check, durable intent creation, provider call, result mapping.
pub struct ProcessPayment {
    registry: Arc<MethodRegistry>,
    provider: Arc<dyn PaymentProvider>,
    store: Arc<dyn PaymentIntentStore>,
}

impl ProcessPayment {
    pub fn new(
        registry: Arc<MethodRegistry>,
        provider: Arc<dyn PaymentProvider>,
        store: Arc<dyn PaymentIntentStore>,
    ) -> Self {
        Self {
            registry,
            provider,
            store,
        }
    }

    pub async fn execute(&self, input: ProcessPaymentInput) -> Result<PaymentResult, FlowError> {
        let contract = self
            .registry
            .get_contract(&input.method_id)
            .ok_or_else(|| FlowError::UnsupportedPaymentMethod(input.method_id.clone()))?;
        if !contract.enabled {
            return Err(FlowError::PaymentMethodDisabled(input.method_id.clone()));
        }

        if !self.provider.supports(&input.method_id) {
            return Err(FlowError::NoProviderForMethod(input.method_id.clone()));
        }

        let amount = Money::new(input.amount, &input.currency)
            .map_err(|e| FlowError::InvalidPaymentIntent(e.to_string()))?;

        let mut intent = PaymentIntent::new(&input.method_id, amount.clone())
            .with_order(input.order_id.clone(), input.customer_id.clone())
            .with_metadata(input.metadata.clone());
        if !intent.is_valid() {
            return Err(FlowError::InvalidPaymentIntent(
                "amount must be positive and a method id is required".to_string(),
            ));
        }

        // Persist before contacting the provider: a crash mid-call must
        // still leave a durable, inspectable record.
        self.store.create(&intent).await?;
        info!(intent_id = %intent.id, method_id = %intent.method_id, "payment intent created");

        let provider_result = if contract.requires_online_auth {
            self.provider
                .authorize(&AuthorizeRequest {
                    amount: amount.clone(),
                    fields: input.fields.clone(),
                    order_id: input.order_id.clone(),
                    customer_id: input.customer_id.clone(),
                    metadata: input.metadata.clone(),
                })
                .await
        } else {
            self.provider
                .mark_pending(&PendingRequest {
                    amount: amount.clone(),
                    order_id: input.order_id.clone(),
                    metadata: input.metadata.clone(),
                })
                .await
        };

        match provider_result {
            Ok(mut result) => {
                self.apply_result(&mut intent, &result)?;
                self.store.update(&intent).await?;
                info!(intent_id = %intent.id, status = ?intent.status, "payment processed");
                attach_intent_id(&mut result, &intent.id);
                Ok(result)
            }
            Err(provider_error) => {
                // Provider failures never propagate: record them on the
                // intent and hand the caller a failed result.
                warn!(intent_id = %intent.id, error = %provider_error, "provider call failed");
                intent
                    .fail(provider_error.to_string())
                    .map_err(|e| FlowError::InvalidPaymentIntent(e.to_string()))?;
                self.store.update(&intent).await?;
                let mut result = PaymentResult::failed(
                    amount,
                    &input.method_id,
                    provider_error.to_string(),
                )
                .with_order(input.order_id, input.customer_id);
                attach_intent_id(&mut result, &intent.id);
                Ok(result)
            }
        }
    }

    /// The one place a provider call outcome is mapped onto the intent
    /// lifecycle; the two status vocabularies never mix anywhere else.
    fn apply_result(
        &self,
        intent: &mut PaymentIntent,
        result: &PaymentResult,
    ) -> Result<(), FlowError> {
        let map_err = |e: payline_core::IntentError| FlowError::InvalidPaymentIntent(e.to_string());
        match result.status {
            ResultStatus::Paid => {
                intent.authorize().map_err(map_err)?;
                if let Some(external_id) = &result.external_id {
                    intent.set_external_id(external_id);
                }
                if let Some(receipt_url) = &result.receipt_url {
                    intent.set_receipt_url(receipt_url);
                }
            }
            ResultStatus::Pending => {
                intent.requires_action().map_err(map_err)?;
                if let Some(external_id) = &result.external_id {
                    intent.set_external_id(external_id);
                }
            }
            ResultStatus::Failed | ResultStatus::Refunded => {
                let message = result
                    .error
                    .clone()
                    .unwrap_or_else(|| "Payment failed".to_string());
                intent.fail(message).map_err(map_err)?;
            }
        }
        Ok(())
    }
}

/// Callers need the intent id for later capture and refund calls, so it
/// rides along in the result metadata.
fn attach_intent_id(result: &mut PaymentResult, intent_id: &str) {
    match &mut result.metadata {
        serde_json::Value::Object(map) => {
            map.insert("intent_id".to_string(), intent_id.into());
        }
        metadata => {
            *metadata = serde_json::json!({ "intent_id": intent_id });
        }
    }
}
