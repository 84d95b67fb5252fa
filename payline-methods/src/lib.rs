pub mod contract;
pub mod field;
pub mod registry;

pub use contract::PaymentMethodContract;
pub use field::{FieldType, PaymentField};
pub use registry::{MethodRegistry, RegistryError};
