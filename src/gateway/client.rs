use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::GatewayConfig;
use crate::domain::CardDetails;
use crate::gateway::error::TransportFailure;

/// Presigned acceptance token the customer must accept before paying.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcceptanceToken {
    pub acceptance_token: String,
    pub permalink: String,
}

/// Body of `POST /transactions`.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionSubmission {
    pub acceptance_token: String,
    pub amount_in_cents: i64,
    pub currency: String,
    pub signature: String,
    pub customer_email: String,
    pub reference: String,
    pub payment_method: PaymentMethodSubmission,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentMethodSubmission {
    #[serde(rename = "type")]
    pub kind: String,
    pub installments: u32,
    pub token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sandbox_status: Option<String>,
}

/// A transaction as reported by the gateway status endpoint.
#[derive(Debug, Clone)]
pub struct GatewayTransaction {
    /// Untouched response body, kept for the audit log.
    pub raw: Value,
    pub data: GatewayTransactionData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayTransactionData {
    pub id: String,
    pub reference: String,
    pub status: String,
    #[serde(default)]
    pub finalized_at: Option<String>,
    #[serde(default)]
    pub payment_method: Option<GatewayPaymentMethod>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayPaymentMethod {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub extra: Option<GatewayPaymentMethodExtra>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayPaymentMethodExtra {
    #[serde(default)]
    pub brand: Option<String>,
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct MerchantData {
    presigned_acceptance: AcceptanceToken,
}

#[derive(Deserialize)]
struct IdData {
    id: String,
}

/// HTTP client for the payment gateway. One attempt per call unless the
/// config grants retries, and those only apply to GET requests.
#[derive(Clone)]
pub struct GatewayClient {
    client: Client,
    config: GatewayConfig,
}

impl GatewayClient {
    pub fn new(config: GatewayConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_default();

        GatewayClient { client, config }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Fetches the merchant's presigned acceptance token.
    pub async fn acceptance_token(&self) -> Result<AcceptanceToken, TransportFailure> {
        let url = self.config.acceptance_token_url();
        let body = self.get_with_retry(&url, None).await?;
        let merchant: Envelope<MerchantData> = decode(body)?;
        Ok(merchant.data.presigned_acceptance)
    }

    /// Exchanges card data for an opaque token id.
    pub async fn tokenize_card(&self, card: &CardDetails) -> Result<String, TransportFailure> {
        debug!("Tokenizing card {:?}", card);
        let request = self
            .client
            .post(self.config.tokenize_card_url())
            .bearer_auth(&self.config.public_key)
            .json(&json!({
                "number": card.number,
                "cvc": card.cvc,
                "exp_month": card.exp_month,
                "exp_year": card.exp_year,
                "card_holder": card.card_holder,
            }));

        let body = self.send(request).await?;
        let token: Envelope<IdData> = decode(body)?;
        Ok(token.data.id)
    }

    /// Submits a signed transaction and returns the response body as
    /// received. A 2xx body that is not JSON comes back as a JSON string.
    pub async fn create_transaction(
        &self,
        submission: &TransactionSubmission,
    ) -> Result<Value, TransportFailure> {
        debug!(reference = %submission.reference, "Submitting gateway transaction");
        let request = self
            .client
            .post(self.config.transactions_url())
            .bearer_auth(&self.config.public_key)
            .json(submission);

        let text = self.send_text(request).await?;
        match serde_json::from_str(&text) {
            Ok(body) => Ok(body),
            Err(_) => {
                debug!(reference = %submission.reference, "Gateway answered with a non-JSON body");
                Ok(Value::String(text))
            }
        }
    }

    /// Queries a transaction's status with the private key.
    pub async fn transaction(&self, id: &str) -> Result<GatewayTransaction, TransportFailure> {
        let url = self
            .config
            .transaction_url(id)
            .ok_or_else(|| TransportFailure::Setup(format!("invalid transaction id {:?}", id)))?;
        let raw = self
            .get_with_retry(url.as_str(), Some(self.config.private_key.as_str()))
            .await?;
        let envelope: Envelope<GatewayTransactionData> = decode(raw.clone())?;
        Ok(GatewayTransaction {
            raw,
            data: envelope.data,
        })
    }

    async fn get_with_retry(
        &self,
        url: &str,
        bearer: Option<&str>,
    ) -> Result<Value, TransportFailure> {
        let mut attempt = 0u32;
        loop {
            let mut request = self.client.get(url);
            if let Some(key) = bearer {
                request = request.bearer_auth(key);
            }

            match self.send(request).await {
                Err(TransportFailure::NoResponse(reason)) if attempt < self.config.max_retries => {
                    let delay = self.retry_delay(attempt);
                    attempt += 1;
                    warn!(
                        "Gateway did not respond ({}), retry {}/{} in {:?}",
                        reason, attempt, self.config.max_retries, delay
                    );
                    tokio::time::sleep(delay).await;
                }
                other => return other,
            }
        }
    }

    /// Exponential backoff, capped at `max_retry_delay`.
    fn retry_delay(&self, attempt: u32) -> Duration {
        2u32.checked_pow(attempt)
            .and_then(|factor| self.config.retry_backoff.checked_mul(factor))
            .map_or(self.config.max_retry_delay, |delay| {
                delay.min(self.config.max_retry_delay)
            })
    }

    async fn send(&self, request: RequestBuilder) -> Result<Value, TransportFailure> {
        let text = self.send_text(request).await?;
        serde_json::from_str(&text).map_err(|e| TransportFailure::MalformedBody(e.to_string()))
    }

    async fn send_text(&self, request: RequestBuilder) -> Result<String, TransportFailure> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.json::<Value>().await.ok();
            return Err(TransportFailure::Response {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.text().await?)
    }
}

fn decode<T: DeserializeOwned>(body: Value) -> Result<T, TransportFailure> {
    serde_json::from_value(body).map_err(|e| TransportFailure::MalformedBody(e.to_string()))
}
