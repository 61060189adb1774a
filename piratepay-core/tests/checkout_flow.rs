//! End-to-end checkout flow: storefront hooks → real client → mock API.

use std::sync::Arc;

use piratepay_core::config::{GatewaySettings, METHOD_ID};
use piratepay_core::entities::{MemoryOrderBook, OrderSnapshot, OrderStatus};
use piratepay_core::processors::{CheckoutGateway, EmailAudience};
use piratepay_sdk::{GatewayConfig, PaymentIntentClient};
use rust_decimal::Decimal;
use url::Url;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_string_contains, header, method, path},
};

fn order() -> OrderSnapshot {
    OrderSnapshot {
        id: "2024".to_string(),
        currency: "USD".to_string(),
        total: Decimal::new(9999, 2),
        billing_first_name: "Mary".to_string(),
        billing_email: "mary@example.com".to_string(),
        payment_method: METHOD_ID.to_string(),
        status: OrderStatus::Pending,
    }
}

fn checkout(server: &MockServer) -> CheckoutGateway<MemoryOrderBook> {
    let config = GatewayConfig::new(&server.uri(), "shop-token").unwrap();
    let settings = GatewaySettings {
        email_instructions: "Still need to pay? Use the details below.".to_string(),
        ..GatewaySettings::default()
    };
    let book = MemoryOrderBook::new(Url::parse("https://shop.example.com").unwrap());
    CheckoutGateway::new(Arc::new(PaymentIntentClient::new()), config, settings, book)
}

#[tokio::test]
async fn test_checkout_then_thank_you_then_email() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/initiate"))
        .and(header("authorization", "Bearer shop-token"))
        .and(body_string_contains("store_order_id=2024"))
        .and(body_string_contains("store_order_price=99.99"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "data": {
                "crypto_address": "zs1checkoutaddress",
                "crypto_qr": "https://pay.example.com/qr/2024.png",
                "crypto_market_price": "0.1234",
                "crypto_price": "810.37"
            }
        })))
        .expect(2)
        .mount(&mock_server)
        .await;

    let gateway = checkout(&mock_server);
    gateway.lifecycle().insert(order()).await;

    let processed = gateway.process_payment(&order()).await.unwrap();
    assert_eq!(processed.result, "success");

    let placed = gateway.lifecycle().get("2024").await.unwrap();
    assert_eq!(placed.status, OrderStatus::OnHold);

    let page = gateway.on_order_ready_for_payment(&placed).await;
    assert!(!page.is_error);
    assert!(page.body.contains("zs1checkoutaddress"));
    assert!(page.body.contains(r#"src="https://pay.example.com/qr/2024.png" loading="eager""#));

    let email = gateway
        .on_order_payment_retry_requested(
            &placed,
            EmailAudience {
                sent_to_admin: false,
                plain_text: true,
            },
        )
        .await
        .unwrap();
    assert!(!email.is_error);
    assert!(
        email
            .body
            .starts_with("Still need to pay? Use the details below.\n\n")
    );
    assert!(email.body.contains("ARRR Order Price: 810.37\n"));
}

#[tokio::test]
async fn test_thank_you_page_reports_status_code() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/initiate"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&mock_server)
        .await;

    let gateway = checkout(&mock_server);
    let page = gateway.on_order_ready_for_payment(&order()).await;

    assert!(page.is_error);
    assert_eq!(
        page.body,
        "Error: Connection to PiratePay failed. Error Code: 503"
    );
}

#[tokio::test]
async fn test_thank_you_page_missing_address() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/initiate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "data": {} })))
        .mount(&mock_server)
        .await;

    let gateway = checkout(&mock_server);
    let page = gateway.on_order_ready_for_payment(&order()).await;

    assert!(page.is_error);
    assert_eq!(page.body, "Error: Unable to get ARRR address from PiratePay");
}
