//! Transaction domain entity.
//! A local payment record correlated with the gateway through its reference.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Prefix of every locally minted reference.
pub const REFERENCE_PREFIX: &str = "eve";

/// Local lifecycle of a transaction. Only reconciliation moves it forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Pending,
    Approved,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "PENDING",
            TransactionStatus::Approved => "APPROVED",
        }
    }

    /// Applies a status reported by the gateway. Anything but `APPROVED`
    /// leaves the current status untouched, so approval is never undone.
    pub fn observe(self, gateway_status: &str) -> Self {
        if gateway_status == TransactionStatus::Approved.as_str() {
            TransactionStatus::Approved
        } else {
            self
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(TransactionStatus::Pending),
            "APPROVED" => Ok(TransactionStatus::Approved),
            other => Err(format!("unknown transaction status: {}", other)),
        }
    }
}

/// A transaction that has not been persisted yet.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub order_id: i64,
    pub reference: String,
    pub total_cost: BigDecimal,
    pub status: TransactionStatus,
}

impl NewTransaction {
    /// Builds a pending transaction for an order, snapshotting its cost and
    /// minting a fresh reference.
    pub fn pending(order_id: i64, total_cost: BigDecimal) -> Self {
        Self {
            order_id,
            reference: format!("{}{}", REFERENCE_PREFIX, Uuid::new_v4()),
            total_cost,
            status: TransactionStatus::Pending,
        }
    }
}

/// Domain entity representing a persisted transaction.
#[derive(Debug, Clone, Serialize)]
pub struct Transaction {
    pub id: i64,
    pub order_id: i64,
    pub reference: String,
    pub total_cost: BigDecimal,
    pub status: TransactionStatus,
    pub payment_method: Option<String>,
    pub payment_date: Option<DateTime<Utc>>,
    pub franchise: Option<String>,
    pub cus: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    pub fn from_new(id: i64, new: NewTransaction) -> Self {
        let now = Utc::now();
        Self {
            id,
            order_id: new.order_id,
            reference: new.reference,
            total_cost: new.total_cost,
            status: new.status,
            payment_method: None,
            payment_date: None,
            franchise: None,
            cus: None,
            created_at: now,
            updated_at: now,
        }
    }
}
