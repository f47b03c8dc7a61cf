//! Framework-agnostic payment entities.

pub mod card;
pub mod order;
pub mod transaction;
pub mod transaction_log;

pub use card::CardDetails;
pub use order::{Order, User};
pub use transaction::{NewTransaction, Transaction, TransactionStatus};
pub use transaction_log::{NewTransactionLogEntry, TransactionLogEntry};
