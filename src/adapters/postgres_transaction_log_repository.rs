//! Postgres implementation of TransactionLogStore.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::NewTransactionLogEntry;
use crate::ports::{RepositoryResult, TransactionLogStore};

#[derive(Clone)]
pub struct PostgresTransactionLogRepository {
    pool: PgPool,
}

impl PostgresTransactionLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionLogStore for PostgresTransactionLogRepository {
    async fn append(&self, entry: NewTransactionLogEntry) -> RepositoryResult<()> {
        sqlx::query(
            "INSERT INTO pay_logs (reference, status, data_out, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(&entry.reference)
        .bind(&entry.status)
        .bind(&entry.data_out)
        .bind(entry.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
