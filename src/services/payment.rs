//! Payment transaction lifecycle.
//!
//! Turns an order into a gateway payment: mints a pending transaction,
//! obtains the acceptance and card tokens, submits a signed transaction, and
//! reconciles the local record against the gateway's reported status.

use bigdecimal::{BigDecimal, ToPrimitive};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use crate::domain::{CardDetails, NewTransaction};
use crate::error::PaymentError;
use crate::gateway::error::REQUEST_SETUP_MESSAGE;
use crate::gateway::{
    classify, classify_transport, generate_signature, AcceptanceToken, GatewayClient,
    GatewayError, PaymentMethodSubmission, TransactionSubmission,
};
use crate::ports::{OrderLookup, TransactionLogStore, TransactionStore, UserLookup};
use crate::services::transaction_log::TransactionLogRecorder;
use crate::validation::validate_card;

pub const CURRENCY: &str = "COP";
pub const PAYMENT_METHOD_CARD: &str = "CARD";
pub const APPROVED: &str = "APPROVED";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatedTransaction {
    pub id: i64,
    pub reference: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardToken {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayTransactionRequest {
    pub reference: String,
    pub installments: u32,
    pub acceptance_token: String,
    #[serde(rename = "id_tokenizacion", alias = "card_token")]
    pub card_token: String,
}

/// Result of a transaction submission: the gateway id when one was
/// assigned, otherwise the response body exactly as received.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GatewaySubmissionOutcome {
    Created { id: String },
    Raw(Value),
}

/// Settled payment details, as reported by the gateway and as applied to
/// the local transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionSettlement {
    pub reference: String,
    #[serde(rename = "type")]
    pub payment_type: String,
    pub finalized_at: String,
    pub brand: String,
    pub id: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TransactionDetails {
    Approved(TransactionSettlement),
    Unsettled { status: String },
}

pub struct PaymentService {
    orders: Arc<dyn OrderLookup>,
    users: Arc<dyn UserLookup>,
    transactions: Arc<dyn TransactionStore>,
    log: TransactionLogRecorder,
    gateway: GatewayClient,
}

impl PaymentService {
    pub fn new(
        orders: Arc<dyn OrderLookup>,
        users: Arc<dyn UserLookup>,
        transactions: Arc<dyn TransactionStore>,
        logs: Arc<dyn TransactionLogStore>,
        gateway: GatewayClient,
    ) -> Self {
        Self {
            orders,
            users,
            transactions,
            log: TransactionLogRecorder::new(logs),
            gateway,
        }
    }

    /// Creates a pending transaction for an order. Every call mints a new
    /// reference, so an order may accumulate several transactions.
    #[instrument(skip(self))]
    pub async fn create_transaction(
        &self,
        order_id: i64,
    ) -> Result<CreatedTransaction, PaymentError> {
        let order = match self.orders.find_by_id(order_id).await {
            Ok(Some(order)) => order,
            Ok(None) => {
                warn!("Order {} not found", order_id);
                return Err(PaymentError::OrderNotFound);
            }
            Err(e) => {
                error!("Failed to load order {}: {}", order_id, e);
                return Err(PaymentError::TransactionCreationFailed);
            }
        };

        let saved = self
            .transactions
            .insert(NewTransaction::pending(order.id, order.total_cost))
            .await
            .map_err(|e| {
                error!("Failed to persist transaction for order {}: {}", order_id, e);
                PaymentError::TransactionCreationFailed
            })?;

        info!(
            "Created pending transaction {} ({}) for order {}",
            saved.id, saved.reference, order_id
        );

        Ok(CreatedTransaction {
            id: saved.id,
            reference: saved.reference,
        })
    }

    #[instrument(skip(self))]
    pub async fn acceptance_token(&self) -> Result<AcceptanceToken, PaymentError> {
        self.gateway.acceptance_token().await.map_err(|failure| {
            warn!("Acceptance token request failed: {:?}", failure);
            PaymentError::RequestAcceptanceTokenFailed
        })
    }

    /// Validates card input locally, then exchanges it for a gateway token.
    #[instrument(skip_all)]
    pub async fn tokenize_card(&self, card: &CardDetails) -> Result<CardToken, PaymentError> {
        if let Err(e) = validate_card(card) {
            warn!("Rejected card input: {}", e.code());
            return Err(e.into());
        }

        let id = self.gateway.tokenize_card(card).await.map_err(|failure| {
            error!("Card tokenization failed: {:?}", failure);
            classify_transport(failure)
        })?;

        Ok(CardToken { id })
    }

    /// Submits a signed card transaction for a previously created reference.
    #[instrument(skip(self, request), fields(reference = %request.reference))]
    pub async fn create_gateway_transaction(
        &self,
        request: GatewayTransactionRequest,
    ) -> Result<GatewaySubmissionOutcome, PaymentError> {
        let (transaction, order) = match self.transactions.find_with_order(&request.reference).await
        {
            Ok(Some((transaction, Some(order)))) => (transaction, order),
            Ok(_) => {
                warn!("No transaction with an order for {}", request.reference);
                return Err(PaymentError::OrderNotFound);
            }
            Err(e) => {
                error!("Failed to load transaction {}: {}", request.reference, e);
                return Err(GatewayError::request_setup(e).into());
            }
        };

        let Some(user_id) = order.user_id else {
            warn!("Order {} has no user", order.id);
            return Err(PaymentError::OrderNotFound);
        };
        let customer = match self.users.find_by_id(user_id).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                warn!("User {} for order {} not found", user_id, order.id);
                return Err(PaymentError::OrderNotFound);
            }
            Err(e) => {
                error!("Failed to load user {}: {}", user_id, e);
                return Err(GatewayError::request_setup(e).into());
            }
        };

        let config = self.gateway.config();
        let amount_in_cents = amount_in_cents(&transaction.total_cost)?;
        let signature = generate_signature(
            &transaction.reference,
            amount_in_cents,
            CURRENCY,
            &config.integrity_key,
        );

        let submission = TransactionSubmission {
            acceptance_token: request.acceptance_token,
            amount_in_cents,
            currency: CURRENCY.to_string(),
            signature,
            customer_email: customer.email,
            reference: transaction.reference,
            payment_method: PaymentMethodSubmission {
                kind: PAYMENT_METHOD_CARD.to_string(),
                installments: request.installments,
                token: request.card_token,
                sandbox_status: config.sandbox_status.clone(),
            },
        };

        let body = self
            .gateway
            .create_transaction(&submission)
            .await
            .map_err(|failure| {
                error!("Gateway transaction submission failed: {:?}", failure);
                classify(failure)
            })?;

        let assigned_id = match body.pointer("/data/id") {
            Some(Value::String(id)) if !id.is_empty() => Some(id.clone()),
            Some(Value::Number(id)) => Some(id.to_string()),
            _ => None,
        };

        match assigned_id {
            Some(id) => {
                info!("Gateway accepted {} as {}", submission.reference, id);
                Ok(GatewaySubmissionOutcome::Created { id })
            }
            None => {
                warn!("Gateway response for {} carries no id", submission.reference);
                Ok(GatewaySubmissionOutcome::Raw(body))
            }
        }
    }

    /// Queries the gateway for a transaction and records the raw answer.
    #[instrument(skip(self))]
    pub async fn transaction_details(
        &self,
        gateway_id: &str,
    ) -> Result<TransactionDetails, PaymentError> {
        let tx = self.gateway.transaction(gateway_id).await.map_err(|failure| {
            error!("Status query for {} failed: {:?}", gateway_id, failure);
            classify(failure)
        })?;

        self.log
            .append(&tx.data.reference, &tx.data.status, tx.raw.to_string())
            .await
            .map_err(|e| {
                error!("Failed to log status of {}: {}", tx.data.reference, e);
                GatewayError::request_setup(e)
            })?;

        if tx.data.status != APPROVED {
            return Ok(TransactionDetails::Unsettled {
                status: tx.data.status,
            });
        }

        let data = tx.data;
        let (payment_method, finalized_at) = match (data.payment_method, data.finalized_at) {
            (Some(payment_method), Some(finalized_at)) => (payment_method, finalized_at),
            _ => {
                error!("Approved transaction {} lacks settlement data", data.id);
                return Err(GatewayError::GatewayTransactionFailed.into());
            }
        };
        let Some(brand) = payment_method.extra.and_then(|extra| extra.brand) else {
            error!("Approved transaction {} lacks a card brand", data.id);
            return Err(GatewayError::GatewayTransactionFailed.into());
        };

        Ok(TransactionDetails::Approved(TransactionSettlement {
            reference: data.reference,
            payment_type: payment_method.kind,
            finalized_at,
            brand,
            id: data.id,
            status: data.status,
        }))
    }

    /// Applies settlement details to the local transaction. Only an
    /// `APPROVED` report changes the status.
    #[instrument(skip(self, settlement), fields(reference = %settlement.reference))]
    pub async fn update_transaction(
        &self,
        settlement: TransactionSettlement,
    ) -> Result<(), PaymentError> {
        let mut transaction = match self
            .transactions
            .find_by_reference(&settlement.reference)
            .await
        {
            Ok(Some(transaction)) => transaction,
            Ok(None) => {
                warn!("Transaction {} not found", settlement.reference);
                return Err(PaymentError::TransactionNotFound);
            }
            Err(e) => return Err(update_failed(e)),
        };

        let payment_date = DateTime::parse_from_rfc3339(&settlement.finalized_at)
            .map_err(update_failed)?
            .with_timezone(&Utc);

        transaction.payment_method = Some(settlement.payment_type);
        transaction.payment_date = Some(payment_date);
        transaction.franchise = Some(settlement.brand);
        transaction.cus = Some(settlement.id);
        transaction.status = transaction.status.observe(&settlement.status);

        self.transactions
            .save(&transaction)
            .await
            .map_err(update_failed)?;

        info!(
            "Transaction {} updated, status {}",
            transaction.reference, transaction.status
        );
        Ok(())
    }

    /// Status query followed by a local update when the gateway reports an
    /// approval.
    #[instrument(skip(self))]
    pub async fn reconcile(&self, gateway_id: &str) -> Result<TransactionDetails, PaymentError> {
        let details = self.transaction_details(gateway_id).await?;
        if let TransactionDetails::Approved(settlement) = &details {
            self.update_transaction(settlement.clone()).await?;
        }
        Ok(details)
    }
}

/// Whole cents, rounded, as the gateway expects.
fn amount_in_cents(total_cost: &BigDecimal) -> Result<i64, GatewayError> {
    (total_cost.clone() * BigDecimal::from(100))
        .round(0)
        .to_i64()
        .ok_or_else(|| GatewayError::request_setup(format!("amount {} out of range", total_cost)))
}

fn update_failed(cause: impl std::fmt::Display) -> PaymentError {
    error!("Transaction update failed: {}", cause);
    PaymentError::TransactionUpdateFailed {
        message: format!("{}: {}", REQUEST_SETUP_MESSAGE, cause),
    }
}
