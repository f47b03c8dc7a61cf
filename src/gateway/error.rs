//! Gateway failure taxonomy.
//!
//! A failed HTTP call is first captured as a [`TransportFailure`], which
//! records only what was observable on the wire. The classifiers then turn
//! that into a [`GatewayError`] callers can act on.

use serde_json::Value;
use thiserror::Error;

pub const CLIENT_ERROR_MESSAGE: &str = "Client error in gateway request";
pub const REQUEST_SETUP_MESSAGE: &str = "Error setting up the gateway request";

/// What was observed when an outbound call did not succeed.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportFailure {
    /// The gateway answered with a non-2xx status.
    Response { status: u16, body: Option<Value> },
    /// The request went out but nothing came back (timeout, refused, reset).
    NoResponse(String),
    /// The request could not be built or sent.
    Setup(String),
    /// A 2xx answer whose body did not have the expected shape.
    MalformedBody(String),
}

impl From<reqwest::Error> for TransportFailure {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            TransportFailure::Setup(err.to_string())
        } else if err.is_decode() {
            TransportFailure::MalformedBody(err.to_string())
        } else {
            TransportFailure::NoResponse(err.to_string())
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    #[error("Gateway rejected the request data")]
    ValidationError { details: Value },

    #[error("{message}")]
    ClientError { message: String },

    #[error("Gateway server error")]
    ServerError,

    #[error("No response received from gateway")]
    NoResponse,

    #[error("{message}")]
    RequestSetupError { message: String },

    #[error("Gateway transaction failed")]
    GatewayTransactionFailed,
}

impl GatewayError {
    pub fn code(&self) -> &'static str {
        match self {
            GatewayError::ValidationError { .. } => "VALIDATION_ERROR",
            GatewayError::ClientError { .. } => "CLIENT_ERROR",
            GatewayError::ServerError => "SERVER_ERROR",
            GatewayError::NoResponse => "NO_RESPONSE",
            GatewayError::RequestSetupError { .. } => "REQUEST_SETUP_ERROR",
            GatewayError::GatewayTransactionFailed => "GATEWAY_TRANSACTION_FAILED",
        }
    }

    pub fn request_setup(cause: impl std::fmt::Display) -> Self {
        GatewayError::RequestSetupError {
            message: format!("{}: {}", REQUEST_SETUP_MESSAGE, cause),
        }
    }
}

/// Full classifier used by transaction submission and status queries.
pub fn classify(failure: TransportFailure) -> GatewayError {
    match failure {
        TransportFailure::Response { status, body } => {
            if status == 422 {
                if let Some(messages) = body
                    .as_ref()
                    .and_then(|b| b.get("error"))
                    .and_then(|e| e.get("messages"))
                {
                    return GatewayError::ValidationError {
                        details: messages.clone(),
                    };
                }
            }

            if (400..500).contains(&status) {
                let message = body
                    .as_ref()
                    .and_then(|b| b.get("message"))
                    .and_then(Value::as_str)
                    .unwrap_or(CLIENT_ERROR_MESSAGE)
                    .to_string();
                return GatewayError::ClientError { message };
            }

            if status >= 500 {
                return GatewayError::ServerError;
            }

            GatewayError::GatewayTransactionFailed
        }
        TransportFailure::NoResponse(_) => GatewayError::NoResponse,
        TransportFailure::Setup(cause) => GatewayError::request_setup(cause),
        TransportFailure::MalformedBody(_) => GatewayError::GatewayTransactionFailed,
    }
}

/// Three-way classifier used by card tokenization: any answer from the
/// gateway counts as a server error.
pub fn classify_transport(failure: TransportFailure) -> GatewayError {
    match failure {
        TransportFailure::Response { .. } => GatewayError::ServerError,
        TransportFailure::NoResponse(_) => GatewayError::NoResponse,
        TransportFailure::Setup(cause) | TransportFailure::MalformedBody(cause) => {
            GatewayError::request_setup(cause)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(status: u16, body: Option<Value>) -> TransportFailure {
        TransportFailure::Response { status, body }
    }

    #[test]
    fn test_422_with_messages_is_validation_error() {
        let messages = json!({"customer_email": ["Debe ser un email válido"]});
        let err = classify(response(
            422,
            Some(json!({"error": {"type": "INPUT_VALIDATION_ERROR", "messages": messages}})),
        ));
        assert_eq!(err, GatewayError::ValidationError { details: messages });
    }

    #[test]
    fn test_422_without_messages_falls_back_to_client_error() {
        let err = classify(response(422, Some(json!({"error": {"type": "X"}}))));
        assert_eq!(
            err,
            GatewayError::ClientError {
                message: CLIENT_ERROR_MESSAGE.to_string()
            }
        );
    }

    #[test]
    fn test_4xx_uses_body_message_when_present() {
        let err = classify(response(401, Some(json!({"message": "Invalid key"}))));
        assert_eq!(
            err,
            GatewayError::ClientError {
                message: "Invalid key".to_string()
            }
        );

        let err = classify(response(404, None));
        assert_eq!(err.code(), "CLIENT_ERROR");
    }

    #[test]
    fn test_5xx_hides_body() {
        let err = classify(response(503, Some(json!({"message": "maintenance"}))));
        assert_eq!(err, GatewayError::ServerError);
    }

    #[test]
    fn test_no_response_and_setup() {
        assert_eq!(
            classify(TransportFailure::NoResponse("timed out".into())),
            GatewayError::NoResponse
        );
        let err = classify(TransportFailure::Setup("bad url".into()));
        assert_eq!(
            err,
            GatewayError::RequestSetupError {
                message: format!("{}: bad url", REQUEST_SETUP_MESSAGE)
            }
        );
    }

    #[test]
    fn test_unmatched_shapes_are_transaction_failed() {
        assert_eq!(
            classify(response(302, None)),
            GatewayError::GatewayTransactionFailed
        );
        assert_eq!(
            classify(TransportFailure::MalformedBody("missing data".into())),
            GatewayError::GatewayTransactionFailed
        );
    }

    #[test]
    fn test_transport_classifier_is_three_way() {
        assert_eq!(
            classify_transport(response(422, Some(json!({"error": {"messages": {}}})))),
            GatewayError::ServerError
        );
        assert_eq!(
            classify_transport(TransportFailure::NoResponse("refused".into())),
            GatewayError::NoResponse
        );
        assert_eq!(
            classify_transport(TransportFailure::MalformedBody("no id".into())).code(),
            "REQUEST_SETUP_ERROR"
        );
    }
}
