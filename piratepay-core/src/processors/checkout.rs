//! CheckoutGateway processor.
//!
//! The CheckoutGateway is responsible for:
//! - Parking a freshly placed order on-hold while the crypto payment is pending
//! - Requesting a payment intent when the thank-you page is rendered
//! - Requesting it again for the customer order email, if enabled
//!
//! Both rendering hooks share one `PaymentIntents::request_payment` call, so
//! the page and the email always show the same kind of result.

use std::sync::Arc;

use piratepay_sdk::GatewayConfig;
use piratepay_sdk::client::PaymentIntents;
use piratepay_sdk::objects::{PaymentIntentResult, RequestValidationError};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::{AWAITING_PAYMENT_NOTE, GatewaySettings, METHOD_ID};
use crate::entities::{LifecycleError, OrderLifecycle, OrderSnapshot, OrderStatus};
use crate::presentation::{
    Channel, Format, RenderedPayment, invalid_order_message, render_payment,
};

/// Errors that can occur while placing an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The merchant has switched the payment method off.
    #[error("the PiratePay payment method is disabled")]
    Disabled,

    /// The storefront rejected an order update.
    #[error("order lifecycle error: {0}")]
    Lifecycle(#[from] LifecycleError),

    /// The order snapshot cannot be turned into an initiate request.
    #[error("invalid order: {0}")]
    InvalidOrder(#[from] RequestValidationError),
}

/// Outcome of [`CheckoutGateway::process_payment`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessedPayment {
    /// Always `"success"`; the storefront redirects on it.
    pub result: &'static str,
    /// Thank-you page the buyer is sent to.
    pub redirect: Url,
}

/// Who an order email is addressed to, and in which format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EmailAudience {
    pub sent_to_admin: bool,
    pub plain_text: bool,
}

/// Glue between the storefront's order flow and the PiratePay API.
pub struct CheckoutGateway<L> {
    intents: Arc<dyn PaymentIntents>,
    config: GatewayConfig,
    settings: GatewaySettings,
    lifecycle: L,
}

impl<L: OrderLifecycle> CheckoutGateway<L> {
    /// Create a new CheckoutGateway.
    ///
    /// # Arguments
    ///
    /// * `intents` - Client used to reach the payment API
    /// * `config` - API connection settings
    /// * `settings` - Merchant-facing gateway settings
    /// * `lifecycle` - Storefront order operations
    pub fn new(
        intents: Arc<dyn PaymentIntents>,
        config: GatewayConfig,
        settings: GatewaySettings,
        lifecycle: L,
    ) -> Self {
        Self {
            intents,
            config,
            settings,
            lifecycle,
        }
    }

    pub fn settings(&self) -> &GatewaySettings {
        &self.settings
    }

    pub fn lifecycle(&self) -> &L {
        &self.lifecycle
    }

    /// Place the order: put it on-hold, reduce stock, empty the cart.
    ///
    /// No payment API call happens here; the intent is requested when the
    /// thank-you page is rendered.
    pub async fn process_payment(
        &self,
        order: &OrderSnapshot,
    ) -> Result<ProcessedPayment, CheckoutError> {
        if !self.settings.enabled {
            return Err(CheckoutError::Disabled);
        }

        self.lifecycle
            .update_status(&order.id, OrderStatus::OnHold, AWAITING_PAYMENT_NOTE)
            .await?;
        self.lifecycle.reduce_stock_levels(&order.id).await?;
        self.lifecycle.empty_cart().await?;
        let redirect = self.lifecycle.return_url(&order.id).await?;

        info!(order_id = %order.id, "Order placed on-hold awaiting PiratePay payment");

        Ok(ProcessedPayment {
            result: "success",
            redirect,
        })
    }

    /// Thank-you page hook: request a payment intent and render it as HTML.
    pub async fn on_order_ready_for_payment(&self, order: &OrderSnapshot) -> RenderedPayment {
        match self.request_payment(order).await {
            Ok(result) => render_payment(&result, Channel::ThankYouPage, Format::Html),
            Err(e) => invalid_order(order, e),
        }
    }

    /// Order email hook: a second chance to pay.
    ///
    /// Returns `None` without calling the API unless email payments are
    /// enabled, the email goes to the customer, the order was paid with
    /// PiratePay, and it is still on-hold.
    pub async fn on_order_payment_retry_requested(
        &self,
        order: &OrderSnapshot,
        audience: EmailAudience,
    ) -> Option<RenderedPayment> {
        if !self.settings.email_enabled
            || audience.sent_to_admin
            || order.payment_method != METHOD_ID
            || order.status != OrderStatus::OnHold
        {
            debug!(
                order_id = %order.id,
                status = %order.status,
                sent_to_admin = audience.sent_to_admin,
                "Skipping PiratePay email instructions"
            );
            return None;
        }

        let result = match self.request_payment(order).await {
            Ok(result) => result,
            Err(e) => return Some(invalid_order(order, e)),
        };
        let format = if audience.plain_text {
            Format::PlainText
        } else {
            Format::Html
        };
        Some(render_payment(
            &result,
            Channel::Email {
                instructions: &self.settings.email_instructions,
            },
            format,
        ))
    }

    /// Request a payment intent for `order`.
    ///
    /// Only an order that cannot be expressed as a valid request is an
    /// error; everything the API does wrong is inside the returned result.
    pub async fn request_payment(
        &self,
        order: &OrderSnapshot,
    ) -> Result<PaymentIntentResult, CheckoutError> {
        let request = order.payment_request()?;

        let result = self.intents.request_payment(&self.config, &request).await;
        match &result {
            PaymentIntentResult::Success(intent) => info!(
                order_id = %order.id,
                crypto_address = %intent.crypto_address,
                "Payment intent created"
            ),
            PaymentIntentResult::Failure(failure) => warn!(
                order_id = %order.id,
                kind = %failure.kind,
                "Payment intent unavailable"
            ),
        }
        Ok(result)
    }
}

fn invalid_order(order: &OrderSnapshot, error: CheckoutError) -> RenderedPayment {
    warn!(order_id = %order.id, error = %error, "Order cannot be sent to PiratePay");
    RenderedPayment {
        body: invalid_order_message(&error),
        is_error: true,
    }
}
