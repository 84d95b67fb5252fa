use payline_core::{IntentStatus, StoreError};

/// Business-rule failures of the payment orchestration. These indicate a
/// caller or configuration mistake and propagate as errors; provider
/// failures never appear here, they become failed payment results.
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error("Unsupported payment method: {0}")]
    UnsupportedPaymentMethod(String),

    #[error("Payment method is disabled: {0}")]
    PaymentMethodDisabled(String),

    #[error("No provider available for payment method: {0}")]
    NoProviderForMethod(String),

    #[error("Invalid payment intent: {0}")]
    InvalidPaymentIntent(String),

    #[error("Payment intent not found: {0}")]
    PaymentIntentNotFound(String),

    #[error("Payment intent {id} must be authorized to capture, current status is {status:?}")]
    PaymentIntentNotAuthorized { id: String, status: IntentStatus },

    #[error(transparent)]
    Store(#[from] StoreError),
}
