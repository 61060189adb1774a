//! Request and response types for the PiratePay API.

pub mod initiate;
pub mod intent;

pub use initiate::{InitiateForm, OrderPaymentRequest, RequestValidationError};
pub use intent::{
    FailureKind, InitiateResponse, PaymentFailure, PaymentIntent,
    PaymentIntentResult,
};
