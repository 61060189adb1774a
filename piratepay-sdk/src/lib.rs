//! SDK for the PiratePay payment API.
//!
//! The shared value types live in [`objects`] and [`config`]; the HTTP client
//! is in [`client`] behind the `client` feature (on by default).

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![forbid(unsafe_code)]

#[cfg(feature = "client")]
pub mod client;
pub mod config;
pub mod objects;

#[cfg(feature = "client")]
pub use client::{PaymentIntentClient, PaymentIntents};
pub use config::GatewayConfig;
pub use objects::{
    FailureKind, OrderPaymentRequest, PaymentFailure, PaymentIntent, PaymentIntentResult,
};
