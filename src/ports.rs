//! Storage ports used by the payment services.
//! Each port is a narrow key-based interface so the core never depends on a
//! concrete database.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{NewTransaction, NewTransactionLogEntry, Order, Transaction, User};

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Corrupt record: {0}")]
    Corrupt(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[async_trait]
pub trait OrderLookup: Send + Sync {
    async fn find_by_id(&self, order_id: i64) -> RepositoryResult<Option<Order>>;
}

#[async_trait]
pub trait UserLookup: Send + Sync {
    async fn find_by_id(&self, user_id: i64) -> RepositoryResult<Option<User>>;
}

#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Persists a new transaction and returns it with its assigned id.
    async fn insert(&self, tx: NewTransaction) -> RepositoryResult<Transaction>;

    async fn find_by_reference(&self, reference: &str) -> RepositoryResult<Option<Transaction>>;

    /// Fetches a transaction joined with its order. The order is `None` when
    /// the referenced row no longer exists.
    async fn find_with_order(
        &self,
        reference: &str,
    ) -> RepositoryResult<Option<(Transaction, Option<Order>)>>;

    /// Overwrites the mutable columns of an existing transaction.
    async fn save(&self, tx: &Transaction) -> RepositoryResult<()>;
}

#[async_trait]
pub trait TransactionLogStore: Send + Sync {
    async fn append(&self, entry: NewTransactionLogEntry) -> RepositoryResult<()>;
}
