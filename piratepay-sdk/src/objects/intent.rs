//! Result of a payment initiation and the wire shape it is parsed from.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Payment details returned by the API for a successful initiation.
///
/// `crypto_address` is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaymentIntent {
    /// ARRR address the buyer pays to.
    pub crypto_address: String,
    /// URL of a QR code image encoding the address.
    pub crypto_qr_url: String,
    /// Market price of one ARRR, as reported by the API.
    pub market_price: String,
    /// Order total converted to ARRR.
    pub order_price_in_crypto: String,
}

/// Why a payment initiation did not produce a [`PaymentIntent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "status", rename_all = "snake_case")]
pub enum FailureKind {
    /// Connection error, timeout, or cancellation before a response arrived.
    RemoteUnavailable,
    /// The API answered with a status other than 200 or 201.
    UnexpectedStatus(u16),
    /// The success body was not the expected JSON.
    MalformedResponse,
    /// The success body had no usable `data.crypto_address`.
    MissingAddress,
}

impl FailureKind {
    /// HTTP status attached to the failure, if the API answered at all.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            FailureKind::UnexpectedStatus(code) => Some(*code),
            _ => None,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::RemoteUnavailable => write!(f, "remote unavailable"),
            FailureKind::UnexpectedStatus(code) => write!(f, "unexpected status {code}"),
            FailureKind::MalformedResponse => write!(f, "malformed response"),
            FailureKind::MissingAddress => write!(f, "missing crypto address"),
        }
    }
}

/// A failed initiation: what went wrong and the underlying detail.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
#[error("{kind}: {detail}")]
pub struct PaymentFailure {
    pub kind: FailureKind,
    pub detail: String,
}

impl PaymentFailure {
    pub fn new(kind: FailureKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }
}

/// Outcome of one call to the initiate endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum PaymentIntentResult {
    Success(PaymentIntent),
    Failure(PaymentFailure),
}

impl PaymentIntentResult {
    pub(crate) fn failure_of(kind: FailureKind, detail: impl Into<String>) -> Self {
        PaymentIntentResult::Failure(PaymentFailure::new(kind, detail))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, PaymentIntentResult::Success(_))
    }

    pub fn intent(&self) -> Option<&PaymentIntent> {
        match self {
            PaymentIntentResult::Success(intent) => Some(intent),
            PaymentIntentResult::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&PaymentFailure> {
        match self {
            PaymentIntentResult::Success(_) => None,
            PaymentIntentResult::Failure(failure) => Some(failure),
        }
    }

    pub fn into_result(self) -> Result<PaymentIntent, PaymentFailure> {
        match self {
            PaymentIntentResult::Success(intent) => Ok(intent),
            PaymentIntentResult::Failure(failure) => Err(failure),
        }
    }
}

impl From<Result<PaymentIntent, PaymentFailure>> for PaymentIntentResult {
    fn from(value: Result<PaymentIntent, PaymentFailure>) -> Self {
        match value {
            Ok(intent) => PaymentIntentResult::Success(intent),
            Err(failure) => PaymentIntentResult::Failure(failure),
        }
    }
}

/// Body of a 200/201 answer from the initiate endpoint.
///
/// Deserializing only checks that the body is JSON. Its shape is read in
/// [`into_intent`](Self::into_intent), where anything without a usable
/// `data.crypto_address` is a [`FailureKind::MissingAddress`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct InitiateResponse {
    body: Value,
}

impl InitiateResponse {
    /// Turn the parsed body into a [`PaymentIntent`], or
    /// [`FailureKind::MissingAddress`] when there is no address to pay to.
    pub fn into_intent(self) -> Result<PaymentIntent, PaymentFailure> {
        let address = self
            .data_field("crypto_address")
            .map(|address| address.trim().to_owned())
            .filter(|address| !address.is_empty())
            .ok_or_else(|| {
                PaymentFailure::new(
                    FailureKind::MissingAddress,
                    "response has no data.crypto_address",
                )
            })?;

        Ok(PaymentIntent {
            crypto_address: address,
            crypto_qr_url: self.data_field("crypto_qr").unwrap_or_default(),
            market_price: self.data_field("crypto_market_price").unwrap_or_default(),
            order_price_in_crypto: self.data_field("crypto_price").unwrap_or_default(),
        })
    }

    /// `data.<name>` as text; numbers are accepted where strings are expected.
    fn data_field(&self, name: &str) -> Option<String> {
        match self.body.get("data").and_then(|data| data.get(name))? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> Result<PaymentIntent, PaymentFailure> {
        serde_json::from_str::<InitiateResponse>(body)
            .unwrap()
            .into_intent()
    }

    #[test]
    fn test_full_body() {
        let intent = parse(
            r#"{"data":{"crypto_address":"zs1abc","crypto_qr":"https://x/qr.png","crypto_market_price":"0.01","crypto_price":"1000"}}"#,
        )
        .unwrap();
        assert_eq!(intent.crypto_address, "zs1abc");
        assert_eq!(intent.crypto_qr_url, "https://x/qr.png");
        assert_eq!(intent.market_price, "0.01");
        assert_eq!(intent.order_price_in_crypto, "1000");
    }

    #[test]
    fn test_numbers_are_accepted() {
        let intent =
            parse(r#"{"data":{"crypto_address":"zs1abc","crypto_market_price":0.25,"crypto_price":40}}"#)
                .unwrap();
        assert_eq!(intent.market_price, "0.25");
        assert_eq!(intent.order_price_in_crypto, "40");
        assert_eq!(intent.crypto_qr_url, "");
    }

    #[test]
    fn test_unusable_secondary_fields_become_empty() {
        let intent =
            parse(r#"{"data":{"crypto_address":"zs1abc","crypto_qr":{},"crypto_price":[1]}}"#)
                .unwrap();
        assert_eq!(intent.crypto_address, "zs1abc");
        assert_eq!(intent.crypto_qr_url, "");
        assert_eq!(intent.order_price_in_crypto, "");
    }

    #[test]
    fn test_only_invalid_json_fails_to_parse() {
        assert!(serde_json::from_str::<InitiateResponse>("not json").is_err());
        assert!(serde_json::from_str::<InitiateResponse>(r#"{"data":"#).is_err());
        assert!(serde_json::from_str::<InitiateResponse>(r#"{"data":"x"}"#).is_ok());
    }

    #[test]
    fn test_missing_address_variants() {
        for body in [
            r#"{"data":{}}"#,
            r#"{}"#,
            r#"{"data":null}"#,
            r#"{"data":{"crypto_address":null}}"#,
            r#"{"data":{"crypto_address":"  "}}"#,
            r#"{"data":{"crypto_address":{"nested":"zs1abc"}}}"#,
            r#"{"data":{"crypto_address":true}}"#,
            r#"{"data":"x"}"#,
            r#"{"data":[]}"#,
            r#"null"#,
            r#"[]"#,
            r#""zs1abc""#,
        ] {
            let failure = parse(body).unwrap_err();
            assert_eq!(failure.kind, FailureKind::MissingAddress, "body: {body}");
        }
    }

    #[test]
    fn test_result_accessors() {
        let failure = PaymentIntentResult::failure_of(FailureKind::UnexpectedStatus(503), "busy");
        assert!(!failure.is_success());
        assert!(failure.intent().is_none());
        assert_eq!(
            failure.failure().map(|f| f.kind.status_code()),
            Some(Some(503))
        );
        assert_eq!(
            failure.into_result().unwrap_err().to_string(),
            "unexpected status 503: busy"
        );
    }
}
