//! Storefront-facing gateway settings.
//!
//! These are the values a merchant edits in the storefront's payment settings.
//! The API connection itself lives in [`piratepay_sdk::GatewayConfig`].

use serde::{Deserialize, Serialize};

/// Payment method id registered with the storefront.
pub const METHOD_ID: &str = "piratepay_gateway";

/// Name of the payment method in the merchant's settings screen.
pub const METHOD_TITLE: &str = "PiratePay";

/// Description of the payment method in the merchant's settings screen.
pub const METHOD_DESCRIPTION: &str =
    "PiratePay Platform allows you to start accepting PirateChain (ARRR) on your store.";

/// Order note written when an order is parked waiting for the crypto payment.
pub const AWAITING_PAYMENT_NOTE: &str = "Awaiting PiratePay payment";

pub const DEFAULT_EMAIL_INSTRUCTIONS: &str = "Please note: if you were unable to complete your \
PirateChain (ARRR) payment during the checkout process, you can use the PiratePay information \
below to finalize your payment.";

/// Merchant settings for the PiratePay payment method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewaySettings {
    /// Whether the payment method is offered at checkout.
    pub enabled: bool,
    /// Title the buyer sees at checkout.
    pub title: String,
    /// Whether order emails carry a second chance to pay.
    pub email_enabled: bool,
    /// Text shown above the payment details in the order email.
    pub email_instructions: String,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            enabled: true,
            title: METHOD_TITLE.to_string(),
            email_enabled: true,
            email_instructions: DEFAULT_EMAIL_INSTRUCTIONS.to_string(),
        }
    }
}
