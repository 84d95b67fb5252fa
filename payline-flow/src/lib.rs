pub mod capture;
pub mod error;
pub mod process;
pub mod refund;
pub mod service;

pub use capture::{CapturePayment, CapturePaymentInput};
pub use error::FlowError;
pub use process::{ProcessPayment, ProcessPaymentInput};
pub use refund::{RefundPayment, RefundPaymentInput};
pub use service::PaymentService;
