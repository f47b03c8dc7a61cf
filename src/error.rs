use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::gateway::GatewayError;
use crate::validation::CardValidationError;

/// Every outcome a payment operation can fail with.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PaymentError {
    #[error("Order not found")]
    OrderNotFound,

    #[error("Transaction not found")]
    TransactionNotFound,

    #[error("Transaction could not be created")]
    TransactionCreationFailed,

    #[error("Transaction could not be updated: {message}")]
    TransactionUpdateFailed { message: String },

    #[error("Acceptance token request failed")]
    RequestAcceptanceTokenFailed,

    #[error(transparent)]
    Card(#[from] CardValidationError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl PaymentError {
    pub fn code(&self) -> &'static str {
        match self {
            PaymentError::OrderNotFound => "ORDER_NOT_FOUND",
            PaymentError::TransactionNotFound => "TRANSACTION_NOT_FOUND",
            PaymentError::TransactionCreationFailed => "TRANSACTION_CREATION_FAILED",
            PaymentError::TransactionUpdateFailed { .. } => "TRANSACTION_UPDATE_FAILED",
            PaymentError::RequestAcceptanceTokenFailed => "REQUEST_ACCEPTANCE_TOKEN_FAILED",
            PaymentError::Card(err) => err.code(),
            PaymentError::Gateway(err) => err.code(),
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            PaymentError::OrderNotFound | PaymentError::TransactionNotFound => {
                StatusCode::NOT_FOUND
            }
            PaymentError::TransactionCreationFailed
            | PaymentError::TransactionUpdateFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            PaymentError::RequestAcceptanceTokenFailed => StatusCode::BAD_GATEWAY,
            PaymentError::Card(_) => StatusCode::BAD_REQUEST,
            PaymentError::Gateway(err) => match err {
                GatewayError::ValidationError { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                GatewayError::ClientError { .. } => StatusCode::BAD_REQUEST,
                GatewayError::ServerError | GatewayError::GatewayTransactionFailed => {
                    StatusCode::BAD_GATEWAY
                }
                GatewayError::NoResponse => StatusCode::GATEWAY_TIMEOUT,
                GatewayError::RequestSetupError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for PaymentError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let mut body = json!({
            "error": self.to_string(),
            "code": self.code(),
            "status": status.as_u16(),
        });
        if let PaymentError::Gateway(GatewayError::ValidationError { details }) = &self {
            body["details"] = details.clone();
        }

        (status, Json(body)).into_response()
    }
}
