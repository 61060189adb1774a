//! Order lifecycle seam.
//!
//! The storefront owns orders, stock and carts. The gateway only needs to
//! nudge them, so it talks to the storefront through [`OrderLifecycle`].

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::RwLock;
use url::Url;

use super::{OrderSnapshot, OrderStatus};

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("order not found: {0}")]
    OrderNotFound(String),

    #[error("storefront error: {0}")]
    Storefront(String),
}

/// Operations the gateway performs on the storefront's orders.
#[async_trait::async_trait]
pub trait OrderLifecycle: Send + Sync {
    /// Move an order to `status`, attaching `note` to its history.
    async fn update_status(
        &self,
        order_id: &str,
        status: OrderStatus,
        note: &str,
    ) -> Result<(), LifecycleError>;

    async fn reduce_stock_levels(&self, order_id: &str) -> Result<(), LifecycleError>;

    /// Empty the current buyer's cart.
    async fn empty_cart(&self) -> Result<(), LifecycleError>;

    /// Where the buyer lands after checkout (the "order received" page).
    async fn return_url(&self, order_id: &str) -> Result<Url, LifecycleError>;
}

/// A single note appended to an order's history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderNote {
    pub status: OrderStatus,
    pub note: String,
}

#[derive(Debug, Default)]
struct OrderBookState {
    orders: HashMap<String, OrderSnapshot>,
    notes: HashMap<String, Vec<OrderNote>>,
    stock_reduced: Vec<String>,
    carts_emptied: usize,
}

/// In-process [`OrderLifecycle`] used by the CLI and tests.
///
/// Cloning shares the same book.
#[derive(Debug, Clone)]
pub struct MemoryOrderBook {
    state: Arc<RwLock<OrderBookState>>,
    base_url: Url,
}

impl MemoryOrderBook {
    /// Create an empty book whose return URLs hang off `base_url`.
    pub fn new(base_url: Url) -> Self {
        Self {
            state: Arc::new(RwLock::new(OrderBookState::default())),
            base_url,
        }
    }

    pub async fn insert(&self, order: OrderSnapshot) {
        let mut state = self.state.write().await;
        state.orders.insert(order.id.clone(), order);
    }

    pub async fn get(&self, order_id: &str) -> Option<OrderSnapshot> {
        self.state.read().await.orders.get(order_id).cloned()
    }

    pub async fn notes(&self, order_id: &str) -> Vec<OrderNote> {
        self.state
            .read()
            .await
            .notes
            .get(order_id)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn stock_reduced(&self, order_id: &str) -> bool {
        self.state
            .read()
            .await
            .stock_reduced
            .iter()
            .any(|id| id == order_id)
    }

    pub async fn carts_emptied(&self) -> usize {
        self.state.read().await.carts_emptied
    }
}

#[async_trait::async_trait]
impl OrderLifecycle for MemoryOrderBook {
    async fn update_status(
        &self,
        order_id: &str,
        status: OrderStatus,
        note: &str,
    ) -> Result<(), LifecycleError> {
        let mut state = self.state.write().await;
        let order = state
            .orders
            .get_mut(order_id)
            .ok_or_else(|| LifecycleError::OrderNotFound(order_id.to_string()))?;
        order.status = status;
        state
            .notes
            .entry(order_id.to_string())
            .or_default()
            .push(OrderNote {
                status,
                note: note.to_string(),
            });
        Ok(())
    }

    async fn reduce_stock_levels(&self, order_id: &str) -> Result<(), LifecycleError> {
        let mut state = self.state.write().await;
        if !state.orders.contains_key(order_id) {
            return Err(LifecycleError::OrderNotFound(order_id.to_string()));
        }
        state.stock_reduced.push(order_id.to_string());
        Ok(())
    }

    async fn empty_cart(&self) -> Result<(), LifecycleError> {
        self.state.write().await.carts_emptied += 1;
        Ok(())
    }

    async fn return_url(&self, order_id: &str) -> Result<Url, LifecycleError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| LifecycleError::Storefront(format!("{} cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(["checkout", "order-received", order_id]);
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn order(id: &str) -> OrderSnapshot {
        OrderSnapshot {
            id: id.to_string(),
            currency: "USD".to_string(),
            total: Decimal::ONE,
            billing_first_name: String::new(),
            billing_email: String::new(),
            payment_method: "piratepay_gateway".to_string(),
            status: OrderStatus::Pending,
        }
    }

    #[tokio::test]
    async fn test_update_status_records_note() {
        let book = MemoryOrderBook::new(Url::parse("https://shop.example.com").unwrap());
        book.insert(order("5")).await;

        book.update_status("5", OrderStatus::OnHold, "waiting")
            .await
            .unwrap();

        assert_eq!(book.get("5").await.unwrap().status, OrderStatus::OnHold);
        assert_eq!(
            book.notes("5").await,
            vec![OrderNote {
                status: OrderStatus::OnHold,
                note: "waiting".to_string()
            }]
        );
        assert!(matches!(
            book.update_status("6", OrderStatus::OnHold, "").await,
            Err(LifecycleError::OrderNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_return_url() {
        let book = MemoryOrderBook::new(Url::parse("https://shop.example.com/store/").unwrap());
        assert_eq!(
            book.return_url("5").await.unwrap().as_str(),
            "https://shop.example.com/store/checkout/order-received/5"
        );
    }
}
