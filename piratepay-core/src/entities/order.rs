use piratepay_sdk::objects::{OrderPaymentRequest, RequestValidationError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order status as the storefront reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
    Pending,
    OnHold,
    Processing,
    Completed,
    Cancelled,
    Refunded,
    Failed,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "pending"),
            OrderStatus::OnHold => write!(f, "on-hold"),
            OrderStatus::Processing => write!(f, "processing"),
            OrderStatus::Completed => write!(f, "completed"),
            OrderStatus::Cancelled => write!(f, "cancelled"),
            OrderStatus::Refunded => write!(f, "refunded"),
            OrderStatus::Failed => write!(f, "failed"),
        }
    }
}

/// The storefront's view of an order at the moment a hook fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSnapshot {
    pub id: String,
    pub currency: String,
    pub total: Decimal,
    pub billing_first_name: String,
    pub billing_email: String,
    /// Id of the payment method the buyer picked.
    pub payment_method: String,
    pub status: OrderStatus,
}

impl OrderSnapshot {
    /// Build the initiate payload for this order.
    ///
    /// The buyer name sent to the API is the billing first name.
    pub fn payment_request(&self) -> Result<OrderPaymentRequest, RequestValidationError> {
        OrderPaymentRequest::new(
            self.currency.as_str(),
            self.total,
            self.id.as_str(),
            self.billing_first_name.as_str(),
            self.billing_email.as_str(),
        )
    }
}
