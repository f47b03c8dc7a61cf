use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::{
    NewTransaction, NewTransactionLogEntry, Order, Transaction, TransactionLogEntry, User,
};
use crate::ports::{
    OrderLookup, RepositoryError, RepositoryResult, TransactionLogStore, TransactionStore,
    UserLookup,
};

/// A thread-safe in-memory order table.
///
/// Cloning shares the underlying map, so a clone handed to
/// [`InMemoryTransactionStore`] sees orders added later.
#[derive(Default, Clone)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<HashMap<i64, Order>>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn put(&self, order: Order) {
        self.orders.write().await.insert(order.id, order);
    }
}

#[async_trait]
impl OrderLookup for InMemoryOrderStore {
    async fn find_by_id(&self, order_id: i64) -> RepositoryResult<Option<Order>> {
        Ok(self.orders.read().await.get(&order_id).cloned())
    }
}

#[derive(Default, Clone)]
pub struct InMemoryUserStore {
    users: Arc<RwLock<HashMap<i64, User>>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn put(&self, user: User) {
        self.users.write().await.insert(user.id, user);
    }
}

#[async_trait]
impl UserLookup for InMemoryUserStore {
    async fn find_by_id(&self, user_id: i64) -> RepositoryResult<Option<User>> {
        Ok(self.users.read().await.get(&user_id).cloned())
    }
}

/// In-memory transaction table keyed by id, joined against an
/// [`InMemoryOrderStore`] for order lookups.
#[derive(Clone)]
pub struct InMemoryTransactionStore {
    orders: InMemoryOrderStore,
    transactions: Arc<RwLock<HashMap<i64, Transaction>>>,
    next_id: Arc<AtomicI64>,
}

impl InMemoryTransactionStore {
    pub fn new(orders: InMemoryOrderStore) -> Self {
        Self {
            orders,
            transactions: Arc::default(),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }

    pub async fn all(&self) -> Vec<Transaction> {
        let mut all: Vec<_> = self.transactions.read().await.values().cloned().collect();
        all.sort_by_key(|tx| tx.id);
        all
    }
}

#[async_trait]
impl TransactionStore for InMemoryTransactionStore {
    async fn insert(&self, tx: NewTransaction) -> RepositoryResult<Transaction> {
        let mut transactions = self.transactions.write().await;
        if transactions.values().any(|t| t.reference == tx.reference) {
            return Err(RepositoryError::Unavailable(format!(
                "duplicate reference {}",
                tx.reference
            )));
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let transaction = Transaction::from_new(id, tx);
        transactions.insert(id, transaction.clone());
        Ok(transaction)
    }

    async fn find_by_reference(&self, reference: &str) -> RepositoryResult<Option<Transaction>> {
        let transactions = self.transactions.read().await;
        Ok(transactions
            .values()
            .find(|t| t.reference == reference)
            .cloned())
    }

    async fn find_with_order(
        &self,
        reference: &str,
    ) -> RepositoryResult<Option<(Transaction, Option<Order>)>> {
        let Some(tx) = self.find_by_reference(reference).await? else {
            return Ok(None);
        };
        let order = self.orders.find_by_id(tx.order_id).await?;
        Ok(Some((tx, order)))
    }

    async fn save(&self, tx: &Transaction) -> RepositoryResult<()> {
        let mut transactions = self.transactions.write().await;
        match transactions.get_mut(&tx.id) {
            Some(existing) => {
                *existing = Transaction {
                    updated_at: Utc::now(),
                    ..tx.clone()
                };
                Ok(())
            }
            None => Err(RepositoryError::Unavailable(format!(
                "transaction {} does not exist",
                tx.id
            ))),
        }
    }
}

/// Append-only in-memory audit log.
#[derive(Default, Clone)]
pub struct InMemoryTransactionLogStore {
    entries: Arc<RwLock<Vec<TransactionLogEntry>>>,
}

impl InMemoryTransactionLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn entries(&self) -> Vec<TransactionLogEntry> {
        self.entries.read().await.clone()
    }
}

#[async_trait]
impl TransactionLogStore for InMemoryTransactionLogStore {
    async fn append(&self, entry: NewTransactionLogEntry) -> RepositoryResult<()> {
        let mut entries = self.entries.write().await;
        let id = entries.len() as i64 + 1;
        entries.push(TransactionLogEntry {
            id,
            reference: entry.reference,
            status: entry.status,
            data_out: entry.data_out,
            created_at: entry.created_at,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TransactionStatus;
    use bigdecimal::BigDecimal;

    #[tokio::test]
    async fn test_insert_assigns_sequential_ids() {
        let store = InMemoryTransactionStore::new(InMemoryOrderStore::new());
        let a = store
            .insert(NewTransaction::pending(1, BigDecimal::from(10)))
            .await
            .unwrap();
        let b = store
            .insert(NewTransaction::pending(1, BigDecimal::from(10)))
            .await
            .unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(store.all().await.len(), 2);
    }

    #[tokio::test]
    async fn test_find_with_order_joins_missing_order_as_none() {
        let orders = InMemoryOrderStore::new();
        let store = InMemoryTransactionStore::new(orders.clone());
        let tx = store
            .insert(NewTransaction::pending(7, BigDecimal::from(10)))
            .await
            .unwrap();

        let (_, order) = store.find_with_order(&tx.reference).await.unwrap().unwrap();
        assert!(order.is_none());

        orders
            .put(Order {
                id: 7,
                user_id: Some(1),
                total_cost: BigDecimal::from(10),
            })
            .await;
        let (_, order) = store.find_with_order(&tx.reference).await.unwrap().unwrap();
        assert_eq!(order.unwrap().id, 7);

        assert!(store.find_with_order("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_overwrites_existing_row() {
        let store = InMemoryTransactionStore::new(InMemoryOrderStore::new());
        let mut tx = store
            .insert(NewTransaction::pending(1, BigDecimal::from(10)))
            .await
            .unwrap();
        tx.status = TransactionStatus::Approved;
        tx.franchise = Some("VISA".to_string());
        store.save(&tx).await.unwrap();

        let stored = store.find_by_reference(&tx.reference).await.unwrap().unwrap();
        assert_eq!(stored.status, TransactionStatus::Approved);
        assert_eq!(stored.franchise.as_deref(), Some("VISA"));
    }

    #[tokio::test]
    async fn test_log_store_appends_in_order() {
        let store = InMemoryTransactionLogStore::new();
        for status in ["PENDING", "APPROVED"] {
            store
                .append(NewTransactionLogEntry {
                    reference: "eve-1".to_string(),
                    status: status.to_string(),
                    data_out: "{}".to_string(),
                    created_at: Utc::now(),
                })
                .await
                .unwrap();
        }
        let entries = store.entries().await;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].status, "APPROVED");
        assert_eq!(entries[1].id, 2);
    }
}
