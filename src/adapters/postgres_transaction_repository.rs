//! Postgres implementation of TransactionStore.

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{NewTransaction, Order, Transaction};
use crate::ports::{RepositoryError, RepositoryResult, TransactionStore};

/// Postgres-backed transaction repository over the `pays` table.
#[derive(Clone)]
pub struct PostgresTransactionRepository {
    pool: PgPool,
}

impl PostgresTransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionStore for PostgresTransactionRepository {
    async fn insert(&self, tx: NewTransaction) -> RepositoryResult<Transaction> {
        let row = sqlx::query_as::<_, TransactionRow>(
            r#"
            INSERT INTO pays (order_id, reference, total_cost, status)
            VALUES ($1, $2, $3, $4)
            RETURNING id, order_id, reference, total_cost, status, payment_method,
                payment_date, franchise, cus, created_at, updated_at
            "#,
        )
        .bind(tx.order_id)
        .bind(&tx.reference)
        .bind(&tx.total_cost)
        .bind(tx.status.as_str())
        .fetch_one(&self.pool)
        .await?;

        row.into_domain()
    }

    async fn find_by_reference(&self, reference: &str) -> RepositoryResult<Option<Transaction>> {
        let row = sqlx::query_as::<_, TransactionRow>("SELECT * FROM pays WHERE reference = $1")
            .bind(reference)
            .fetch_optional(&self.pool)
            .await?;

        row.map(TransactionRow::into_domain).transpose()
    }

    async fn find_with_order(
        &self,
        reference: &str,
    ) -> RepositoryResult<Option<(Transaction, Option<Order>)>> {
        let row = sqlx::query_as::<_, TransactionOrderRow>(
            r#"
            SELECT p.id, p.order_id, p.reference, p.total_cost, p.status, p.payment_method,
                p.payment_date, p.franchise, p.cus, p.created_at, p.updated_at,
                o.id AS o_id, o.user_id AS o_user_id, o.total_cost AS o_total_cost
            FROM pays p
            LEFT JOIN orders o ON o.id = p.order_id
            WHERE p.reference = $1
            "#,
        )
        .bind(reference)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TransactionOrderRow::into_domain).transpose()
    }

    async fn save(&self, tx: &Transaction) -> RepositoryResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE pays
            SET status = $1, payment_method = $2, payment_date = $3, franchise = $4,
                cus = $5, updated_at = NOW()
            WHERE id = $6
            "#,
        )
        .bind(tx.status.as_str())
        .bind(&tx.payment_method)
        .bind(tx.payment_date)
        .bind(&tx.franchise)
        .bind(&tx.cus)
        .bind(tx.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::Database(sqlx::Error::RowNotFound));
        }

        Ok(())
    }
}

/// Internal row type for SQLx. Not exposed outside the adapter.
#[derive(Debug, sqlx::FromRow)]
struct TransactionRow {
    id: i64,
    order_id: i64,
    reference: String,
    total_cost: BigDecimal,
    status: String,
    payment_method: Option<String>,
    payment_date: Option<DateTime<Utc>>,
    franchise: Option<String>,
    cus: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TransactionRow {
    fn into_domain(self) -> RepositoryResult<Transaction> {
        let status = self.status.parse().map_err(RepositoryError::Corrupt)?;
        Ok(Transaction {
            id: self.id,
            order_id: self.order_id,
            reference: self.reference,
            total_cost: self.total_cost,
            status,
            payment_method: self.payment_method,
            payment_date: self.payment_date,
            franchise: self.franchise,
            cus: self.cus,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TransactionOrderRow {
    #[sqlx(flatten)]
    transaction: TransactionRow,
    o_id: Option<i64>,
    o_user_id: Option<i64>,
    o_total_cost: Option<BigDecimal>,
}

impl TransactionOrderRow {
    fn into_domain(self) -> RepositoryResult<(Transaction, Option<Order>)> {
        let order = match (self.o_id, self.o_total_cost) {
            (Some(id), Some(total_cost)) => Some(Order {
                id,
                user_id: self.o_user_id,
                total_cost,
            }),
            _ => None,
        };
        Ok((self.transaction.into_domain()?, order))
    }
}
