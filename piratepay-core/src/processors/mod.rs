//! Storefront hooks.
//!
//! The storefront calls into [`CheckoutGateway`] at three points of an
//! order's life: when the buyer places it, when the thank-you page is shown,
//! and when the customer order email is built.

mod checkout;

pub use checkout::{CheckoutError, CheckoutGateway, EmailAudience, ProcessedPayment};
