pub mod in_memory;
pub mod postgres_order_repository;
pub mod postgres_transaction_log_repository;
pub mod postgres_transaction_repository;

pub use in_memory::{
    InMemoryOrderStore, InMemoryTransactionLogStore, InMemoryTransactionStore, InMemoryUserStore,
};
pub use postgres_order_repository::{PostgresOrderRepository, PostgresUserRepository};
pub use postgres_transaction_log_repository::PostgresTransactionLogRepository;
pub use postgres_transaction_repository::PostgresTransactionRepository;
