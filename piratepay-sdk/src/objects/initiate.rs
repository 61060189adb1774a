//! Outbound payload for `POST {api}/initiate`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons an [`OrderPaymentRequest`] cannot be built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestValidationError {
    #[error("order id must not be empty")]
    EmptyOrderId,

    #[error("order amount must not be negative, got {0}")]
    NegativeAmount(Decimal),

    #[error("currency must not be empty")]
    EmptyCurrency,
}

/// Order details sent to the payment API when a payment is initiated.
///
/// Built fresh from the storefront's order snapshot for every call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderPaymentRequest {
    currency: String,
    amount: Decimal,
    order_id: String,
    buyer_name: String,
    buyer_email: String,
}

impl OrderPaymentRequest {
    /// Create a new request, checking that the order id and currency are
    /// present and that the amount is not negative.
    pub fn new(
        currency: impl Into<String>,
        amount: Decimal,
        order_id: impl Into<String>,
        buyer_name: impl Into<String>,
        buyer_email: impl Into<String>,
    ) -> Result<Self, RequestValidationError> {
        let currency = currency.into().trim().to_owned();
        let order_id = order_id.into().trim().to_owned();

        if order_id.is_empty() {
            return Err(RequestValidationError::EmptyOrderId);
        }
        if currency.is_empty() {
            return Err(RequestValidationError::EmptyCurrency);
        }
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(RequestValidationError::NegativeAmount(amount));
        }

        Ok(Self {
            currency,
            amount,
            order_id,
            buyer_name: buyer_name.into(),
            buyer_email: buyer_email.into(),
        })
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn order_id(&self) -> &str {
        &self.order_id
    }

    pub fn buyer_name(&self) -> &str {
        &self.buyer_name
    }

    pub fn buyer_email(&self) -> &str {
        &self.buyer_email
    }

    /// The form body under the field names the API expects.
    pub fn to_form(&self) -> InitiateForm<'_> {
        InitiateForm {
            store_currency: &self.currency,
            store_order_price: self.amount.normalize().to_string(),
            store_order_id: &self.order_id,
            store_buyer_name: &self.buyer_name,
            store_buyer_email: &self.buyer_email,
        }
    }
}

/// `application/x-www-form-urlencoded` body of the initiate call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InitiateForm<'a> {
    pub store_currency: &'a str,
    pub store_order_price: String,
    pub store_order_id: &'a str,
    pub store_buyer_name: &'a str,
    pub store_buyer_email: &'a str,
}
