use crate::money::Money;
use crate::result::PaymentResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Errors surfaced by a payment gateway. Use cases catch these and turn
/// them into a failed [`PaymentResult`]; they are never rethrown.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Gateway rejected the operation: {0}")]
    Gateway(String),

    #[error("Provider unreachable: {0}")]
    Connection(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizeRequest {
    pub amount: Money,
    pub fields: serde_json::Value,
    pub order_id: Option<String>,
    pub customer_id: Option<String>,
    pub metadata: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingRequest {
    pub amount: Money,
    pub order_id: Option<String>,
    pub metadata: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureRequest {
    pub intent_id: String,
    pub amount: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefundRequest {
    pub payment_id: String,
    pub amount: Money,
    pub reason: Option<String>,
}

/// External payment gateway boundary.
///
/// Concrete integrations (card gateways, UPI rails, wallet aggregators)
/// live outside this core; the use cases only see this trait.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Whether this provider can handle the given payment method.
    fn supports(&self, method_id: &str) -> bool;

    /// Reserve funds without settling.
    async fn authorize(&self, request: &AuthorizeRequest) -> Result<PaymentResult, ProviderError>;

    /// Record an offline method (e.g. cash on delivery) as pending.
    async fn mark_pending(&self, request: &PendingRequest) -> Result<PaymentResult, ProviderError>;

    /// Settle a previously authorized payment.
    async fn capture(&self, request: &CaptureRequest) -> Result<PaymentResult, ProviderError>;

    /// Return funds for a captured payment.
    async fn refund(&self, request: &RefundRequest) -> Result<PaymentResult, ProviderError>;
}
