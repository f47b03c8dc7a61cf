#![allow(dead_code)]

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use std::sync::Arc;

use eve_payments::adapters::{
    InMemoryOrderStore, InMemoryTransactionLogStore, InMemoryTransactionStore, InMemoryUserStore,
};
use eve_payments::config::GatewayConfig;
use eve_payments::domain::{NewTransaction, NewTransactionLogEntry, Order, Transaction, User};
use eve_payments::gateway::GatewayClient;
use eve_payments::ports::{
    RepositoryError, RepositoryResult, TransactionLogStore, TransactionStore,
};
use eve_payments::services::PaymentService;

pub const PUBLIC_KEY: &str = "pub_test_eve";
pub const PRIVATE_KEY: &str = "prv_test_eve";
pub const INTEGRITY_KEY: &str = "test_integrity_eve";
pub const CUSTOMER_EMAIL: &str = "buyer@example.com";

pub struct Harness {
    pub service: PaymentService,
    pub orders: InMemoryOrderStore,
    pub users: InMemoryUserStore,
    pub transactions: InMemoryTransactionStore,
    pub logs: InMemoryTransactionLogStore,
}

pub fn gateway_config(base_url: &str) -> GatewayConfig {
    GatewayConfig::new(base_url, PUBLIC_KEY, PRIVATE_KEY, INTEGRITY_KEY)
}

/// Service over in-memory stores seeded with user 1 and order 1
/// (total cost 50000).
pub async fn harness(config: GatewayConfig) -> Harness {
    let orders = InMemoryOrderStore::new();
    let users = InMemoryUserStore::new();
    let transactions = InMemoryTransactionStore::new(orders.clone());
    let logs = InMemoryTransactionLogStore::new();

    users
        .put(User {
            id: 1,
            email: CUSTOMER_EMAIL.to_string(),
        })
        .await;
    orders
        .put(Order {
            id: 1,
            user_id: Some(1),
            total_cost: BigDecimal::from(50000),
        })
        .await;

    let service = PaymentService::new(
        Arc::new(orders.clone()),
        Arc::new(users.clone()),
        Arc::new(transactions.clone()),
        Arc::new(logs.clone()),
        GatewayClient::new(config),
    );

    Harness {
        service,
        orders,
        users,
        transactions,
        logs,
    }
}

/// Transaction store whose writes always fail.
pub struct BrokenTransactionStore;

#[async_trait]
impl TransactionStore for BrokenTransactionStore {
    async fn insert(&self, _tx: NewTransaction) -> RepositoryResult<Transaction> {
        Err(RepositoryError::Unavailable("connection reset".to_string()))
    }

    async fn find_by_reference(&self, _reference: &str) -> RepositoryResult<Option<Transaction>> {
        Err(RepositoryError::Unavailable("connection reset".to_string()))
    }

    async fn find_with_order(
        &self,
        _reference: &str,
    ) -> RepositoryResult<Option<(Transaction, Option<Order>)>> {
        Err(RepositoryError::Unavailable("connection reset".to_string()))
    }

    async fn save(&self, _tx: &Transaction) -> RepositoryResult<()> {
        Err(RepositoryError::Unavailable("connection reset".to_string()))
    }
}

pub struct BrokenLogStore;

#[async_trait]
impl TransactionLogStore for BrokenLogStore {
    async fn append(&self, _entry: NewTransactionLogEntry) -> RepositoryResult<()> {
        Err(RepositoryError::Unavailable("log table offline".to_string()))
    }
}

pub fn approved_body(gateway_id: &str, reference: &str) -> String {
    serde_json::json!({
        "data": {
            "id": gateway_id,
            "created_at": "2024-03-01T09:59:58.000Z",
            "finalized_at": "2024-03-01T10:00:00.000Z",
            "amount_in_cents": 5000000,
            "reference": reference,
            "currency": "COP",
            "payment_method_type": "CARD",
            "payment_method": {
                "type": "CARD",
                "extra": {
                    "bin": "424242",
                    "name": "VISA-4242",
                    "brand": "VISA",
                    "last_four": "4242"
                },
                "installments": 1
            },
            "status": "APPROVED",
            "status_message": null
        },
        "meta": {}
    })
    .to_string()
}

pub fn pending_body(gateway_id: &str, reference: &str) -> String {
    serde_json::json!({
        "data": {
            "id": gateway_id,
            "finalized_at": null,
            "reference": reference,
            "payment_method": { "type": "CARD", "extra": {} },
            "status": "PENDING"
        }
    })
    .to_string()
}
