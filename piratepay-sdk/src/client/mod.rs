//! HTTP client for the PiratePay API.
//!
//! Gated behind the `client` cargo feature so downstream crates that only
//! need the shared types do not pull in `reqwest`.

mod intent;

pub use intent::{MAX_BODY_BYTES, PaymentIntentClient};

use crate::config::GatewayConfig;
use crate::objects::{OrderPaymentRequest, PaymentIntentResult};

/// Anything that can turn an order into a payment intent.
///
/// Storefront glue depends on this trait rather than on
/// [`PaymentIntentClient`] directly, so tests and alternative transports can
/// stand in for the real API.
#[async_trait::async_trait]
pub trait PaymentIntents: Send + Sync {
    /// Perform one initiate round trip for `request` against `config`.
    async fn request_payment(
        &self,
        config: &GatewayConfig,
        request: &OrderPaymentRequest,
    ) -> PaymentIntentResult;
}
