//! Payment initiation client (storefront backend → PiratePay API).
//!
//! Every request is authenticated with the merchant's bearer token and
//! carries the order as a urlencoded form.

use std::future::Future;

use reqwest::{Client, StatusCode, header};
use tracing::{debug, warn};

use super::PaymentIntents;
use crate::config::GatewayConfig;
use crate::objects::{
    FailureKind, InitiateResponse, OrderPaymentRequest, PaymentIntentResult,
};

/// How much of an unexpected response body is kept in the failure detail.
const DETAIL_BODY_LIMIT: usize = 200;

/// Largest success body accepted; a payment intent is a few hundred bytes.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Typed HTTP client for the PiratePay **initiate** endpoint.
///
/// The client owns nothing but a `reqwest::Client`, so it is cheap to clone
/// and safe to share between concurrent checkouts. Each call performs exactly
/// one round trip; retrying is left to the caller.
#[derive(Debug, Clone, Default)]
pub struct PaymentIntentClient {
    http: Client,
}

impl PaymentIntentClient {
    /// Create a new `PaymentIntentClient` with a default `reqwest::Client`.
    pub fn new() -> Self {
        Self {
            http: Client::new(),
        }
    }

    /// Replace the default `reqwest::Client` with a custom one (e.g. to
    /// configure a proxy). The per-request timeout still comes from
    /// [`GatewayConfig::timeout`].
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    /// `POST {api}/initiate` – start a crypto payment for one order.
    ///
    /// Never fails: transport problems, bad statuses and unusable bodies all
    /// come back as [`PaymentIntentResult::Failure`].
    pub async fn request_payment(
        &self,
        config: &GatewayConfig,
        request: &OrderPaymentRequest,
    ) -> PaymentIntentResult {
        let url = config.initiate_url();
        debug!(
            order_id = %request.order_id(),
            url = %url,
            "Requesting payment intent"
        );

        let sent = self
            .http
            .post(url)
            .bearer_auth(config.api_token())
            .header(header::ACCEPT, "application/json")
            .form(&request.to_form())
            .timeout(config.timeout())
            .send()
            .await;

        let result = match sent {
            Ok(resp) => parse_response(resp).await,
            Err(e) => {
                PaymentIntentResult::failure_of(FailureKind::RemoteUnavailable, e.to_string())
            }
        };

        if let PaymentIntentResult::Failure(failure) = &result {
            warn!(
                order_id = %request.order_id(),
                kind = %failure.kind,
                detail = %failure.detail,
                "Payment intent request failed"
            );
        }
        result
    }

    /// Same as [`request_payment`](Self::request_payment), but gives up as
    /// soon as `cancel` resolves.
    ///
    /// A cancelled call drops the in-flight request and reports
    /// [`FailureKind::RemoteUnavailable`].
    pub async fn request_payment_until<F>(
        &self,
        config: &GatewayConfig,
        request: &OrderPaymentRequest,
        cancel: F,
    ) -> PaymentIntentResult
    where
        F: Future,
    {
        tokio::select! {
            biased;

            _ = cancel => {
                debug!(order_id = %request.order_id(), "Payment intent request cancelled");
                PaymentIntentResult::failure_of(FailureKind::RemoteUnavailable, "request cancelled")
            }

            result = self.request_payment(config, request) => result,
        }
    }
}

#[async_trait::async_trait]
impl PaymentIntents for PaymentIntentClient {
    async fn request_payment(
        &self,
        config: &GatewayConfig,
        request: &OrderPaymentRequest,
    ) -> PaymentIntentResult {
        PaymentIntentClient::request_payment(self, config, request).await
    }
}

async fn parse_response(mut resp: reqwest::Response) -> PaymentIntentResult {
    let status = resp.status();
    if status != StatusCode::OK && status != StatusCode::CREATED {
        // Four bytes per char covers the longest UTF-8 encoding.
        let body = read_capped(&mut resp, DETAIL_BODY_LIMIT * 4)
            .await
            .map(|(bytes, _)| String::from_utf8_lossy(&bytes).into_owned())
            .unwrap_or_default();
        let detail: String = body.chars().take(DETAIL_BODY_LIMIT).collect();
        return PaymentIntentResult::failure_of(
            FailureKind::UnexpectedStatus(status.as_u16()),
            detail,
        );
    }

    let bytes = match read_capped(&mut resp, MAX_BODY_BYTES).await {
        Ok((bytes, false)) => bytes,
        Ok((_, true)) => {
            return PaymentIntentResult::failure_of(
                FailureKind::MalformedResponse,
                format!("response body exceeds {MAX_BODY_BYTES} bytes"),
            );
        }
        Err(e) if e.is_timeout() => {
            return PaymentIntentResult::failure_of(FailureKind::RemoteUnavailable, e.to_string());
        }
        Err(e) => {
            return PaymentIntentResult::failure_of(FailureKind::MalformedResponse, e.to_string());
        }
    };

    match serde_json::from_slice::<InitiateResponse>(&bytes) {
        Ok(parsed) => parsed.into_intent().into(),
        Err(e) => PaymentIntentResult::failure_of(FailureKind::MalformedResponse, e.to_string()),
    }
}

/// Read the body chunk by chunk, keeping at most `limit` bytes.
///
/// The flag is `true` when the body was longer than `limit`; reading stops
/// at that point.
async fn read_capped(
    resp: &mut reqwest::Response,
    limit: usize,
) -> Result<(Vec<u8>, bool), reqwest::Error> {
    let mut buf = Vec::new();
    while let Some(chunk) = resp.chunk().await? {
        let room = limit - buf.len();
        if chunk.len() > room {
            buf.extend_from_slice(&chunk[..room]);
            return Ok((buf, true));
        }
        buf.extend_from_slice(&chunk);
    }
    Ok((buf, false))
}
