pub mod client;
pub mod error;
pub mod signature;

pub use client::{
    AcceptanceToken, GatewayClient, GatewayTransaction, PaymentMethodSubmission,
    TransactionSubmission,
};
pub use error::{classify, classify_transport, GatewayError, TransportFailure};
pub use signature::generate_signature;
