pub mod clock;
pub mod intent;
pub mod money;
pub mod provider;
pub mod result;
pub mod store;

pub use clock::{Clock, SystemClock};
pub use intent::{IntentError, IntentStatus, PaymentIntent};
pub use money::{Money, MoneyError};
pub use provider::{
    AuthorizeRequest, CaptureRequest, PaymentProvider, PendingRequest, ProviderError,
    RefundRequest,
};
pub use result::{PaymentResult, ResultStatus};
pub use store::{InMemoryIntentStore, PaymentIntentStore, StoreError};
