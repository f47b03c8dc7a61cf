pub mod payment;
pub mod transaction_log;

pub use payment::{
    CardToken, CreatedTransaction, GatewaySubmissionOutcome, GatewayTransactionRequest,
    PaymentService, TransactionDetails, TransactionSettlement,
};
pub use transaction_log::TransactionLogRecorder;
