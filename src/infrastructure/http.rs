use crate::domain::ports::PaymentProvider;
use crate::domain::settlement::{PaymentHandle, PaymentRequest, PaymentStatus};
use crate::error::{Result, SettlementError};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Payment rail client speaking the provider's HTTP API.
///
/// The provider's response bodies are treated as opaque JSON; only the
/// identifier on submission and the `hash` field on status queries are
/// inspected.
pub struct HttpProvider {
    client: reqwest::Client,
    base_url: String,
}

impl HttpProvider {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

/// The rail returns either a bare string identifier or a structured object;
/// both are normalized to a single string id.
fn normalize_handle(payload: &Value) -> Result<PaymentHandle> {
    let id = match payload {
        Value::String(id) => Some(id.as_str()),
        Value::Object(_) => payload
            .get("id")
            .or_else(|| payload.get("paymentId"))
            .or_else(|| payload.get("payment_id"))
            .and_then(Value::as_str),
        _ => None,
    };
    match id {
        Some(id) if !id.is_empty() => Ok(PaymentHandle::new(id)),
        _ => Err(SettlementError::Provider(format!(
            "unrecognized payment identifier in response: {payload}"
        ))),
    }
}

#[async_trait]
impl PaymentProvider for HttpProvider {
    async fn pay(&self, request: &PaymentRequest) -> Result<PaymentHandle> {
        let url = format!("{}/pay", self.base_url);
        tracing::debug!(%url, amount = %request.amount, "submitting payment");

        let response = self
            .client
            .post(&url)
            .json(&json!({
                "amount": request.amount.to_string(),
                "to": request.recipient,
                "testnet": request.network.is_testnet(),
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown".to_string());
            tracing::error!("payment submission rejected: {body}");
            return Err(SettlementError::Provider(format!(
                "payment rejected: {body}"
            )));
        }

        let payload: Value = response.json().await?;
        normalize_handle(&payload)
    }

    async fn payment_status(&self, handle: &PaymentHandle) -> Result<PaymentStatus> {
        let url = format!("{}/payments/{}/status", self.base_url, handle);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown".to_string());
            return Err(SettlementError::Provider(format!(
                "status query failed: {body}"
            )));
        }

        let payload: Value = response.json().await?;
        Ok(PaymentStatus::from_payload(&payload))
    }
}
