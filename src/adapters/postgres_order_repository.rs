//! Read-only Postgres lookups for orders and their owners.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::{Order, User};
use crate::ports::{OrderLookup, RepositoryResult, UserLookup};

#[derive(Clone)]
pub struct PostgresOrderRepository {
    pool: PgPool,
}

impl PostgresOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderLookup for PostgresOrderRepository {
    async fn find_by_id(&self, order_id: i64) -> RepositoryResult<Option<Order>> {
        let row = sqlx::query_as::<_, (i64, Option<i64>, bigdecimal::BigDecimal)>(
            "SELECT id, user_id, total_cost FROM orders WHERE id = $1",
        )
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(id, user_id, total_cost)| Order {
            id,
            user_id,
            total_cost,
        }))
    }
}

#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserLookup for PostgresUserRepository {
    async fn find_by_id(&self, user_id: i64) -> RepositoryResult<Option<User>> {
        let row = sqlx::query_as::<_, (i64, String)>("SELECT id, email FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|(id, email)| User { id, email }))
    }
}
