//! Buyer-facing rendering of a [`PaymentIntentResult`].
//!
//! Two channels show the same payment details: the thank-you page right
//! after checkout, and the order email as a second chance to pay.

use maud::{Markup, html};
use piratepay_sdk::objects::{FailureKind, PaymentIntent, PaymentIntentResult};
use serde::Serialize;

pub const MISSING_ADDRESS_MESSAGE: &str = "Error: Unable to get ARRR address from PiratePay";

/// Where the payment details are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel<'a> {
    /// Order-received page shown right after checkout.
    ThankYouPage,
    /// Customer order email, preceded by the merchant's instructions.
    Email { instructions: &'a str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Html,
    PlainText,
}

/// Rendered output handed back to the storefront.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedPayment {
    pub body: String,
    /// `true` when `body` is an error message rather than payment details.
    pub is_error: bool,
}

/// Render `result` for `channel` in the requested `format`.
pub fn render_payment(
    result: &PaymentIntentResult,
    channel: Channel<'_>,
    format: Format,
) -> RenderedPayment {
    match result {
        PaymentIntentResult::Success(intent) => RenderedPayment {
            body: match format {
                Format::Html => render_html(intent, channel),
                Format::PlainText => render_text(intent, channel),
            },
            is_error: false,
        },
        PaymentIntentResult::Failure(failure) => RenderedPayment {
            body: failure_message(failure.kind),
            is_error: true,
        },
    }
}

/// Message shown to the buyer when no payment details could be obtained.
///
/// Failures without an HTTP status report code `0`.
pub fn failure_message(kind: FailureKind) -> String {
    match kind {
        FailureKind::MissingAddress => MISSING_ADDRESS_MESSAGE.to_string(),
        other => format!(
            "Error: Connection to PiratePay failed. Error Code: {}",
            other.status_code().unwrap_or(0)
        ),
    }
}

/// Message shown when the order itself could not be sent to the API.
pub fn invalid_order_message(error: &impl std::fmt::Display) -> String {
    format!("Error: Unable to send order to PiratePay: {error}")
}

fn render_html(intent: &PaymentIntent, channel: Channel<'_>) -> String {
    payment_markup(intent, channel).into_string()
}

/// Payment details block. Every value from the API is escaped by `html!`.
fn payment_markup(intent: &PaymentIntent, channel: Channel<'_>) -> Markup {
    let (instructions, loading) = match channel {
        Channel::ThankYouPage => (None, Some("eager")),
        Channel::Email { instructions } => (Some(instructions), None),
    };

    html! {
        div class="container" style=" padding: 10px;" align="center" {
            @if let Some(instructions) = instructions {
                (instructions)
                br;
                br;
            }
            h2 { "PiratePay" }
            h4 { "PirateChain (ARRR) Cryptocurrency Payment:" }
            img src=(intent.crypto_qr_url) loading=[loading] alt="ARRR QR Code" width="300" height="300";
            p { b { "ARRR Market Price:" } br; " " (intent.market_price) }
            p { b { "ARRR Order Price:" } br; " " (intent.order_price_in_crypto) }
            p { b { "ARRR Address:" } br; " " (intent.crypto_address) }
        }
    }
}

fn render_text(intent: &PaymentIntent, channel: Channel<'_>) -> String {
    let mut text = String::new();
    if let Channel::Email { instructions } = channel {
        text.push_str(instructions);
        text.push_str("\n\n");
    }
    text.push_str("PiratePay\n");
    text.push_str("PirateChain (ARRR) Cryptocurrency Payment:\n");
    text.push_str(&format!("ARRR QR Code: {}\n", intent.crypto_qr_url));
    text.push_str(&format!("ARRR Market Price: {}\n", intent.market_price));
    text.push_str(&format!("ARRR Order Price: {}\n", intent.order_price_in_crypto));
    text.push_str(&format!("ARRR Address: {}\n", intent.crypto_address));
    text
}
