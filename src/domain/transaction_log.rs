//! Audit entries for gateway status queries. Append-only.

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone)]
pub struct NewTransactionLogEntry {
    pub reference: String,
    pub status: String,
    pub data_out: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransactionLogEntry {
    pub id: i64,
    pub reference: String,
    pub status: String,
    pub data_out: String,
    pub created_at: DateTime<Utc>,
}
