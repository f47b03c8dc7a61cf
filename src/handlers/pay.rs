use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::domain::CardDetails;
use crate::error::PaymentError;
use crate::services::{GatewayTransactionRequest, TransactionSettlement};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateTransactionPayload {
    pub order_id: i64,
}

pub async fn create_transaction(
    State(state): State<AppState>,
    Json(payload): Json<CreateTransactionPayload>,
) -> Result<impl IntoResponse, PaymentError> {
    let created = state.payments.create_transaction(payload.order_id).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn acceptance_token(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, PaymentError> {
    let token = state.payments.acceptance_token().await?;
    Ok(Json(token))
}

pub async fn tokenize_card(
    State(state): State<AppState>,
    Json(card): Json<CardDetails>,
) -> Result<impl IntoResponse, PaymentError> {
    let token = state.payments.tokenize_card(&card).await?;
    Ok(Json(token))
}

pub async fn create_gateway_transaction(
    State(state): State<AppState>,
    Json(request): Json<GatewayTransactionRequest>,
) -> Result<impl IntoResponse, PaymentError> {
    let outcome = state.payments.create_gateway_transaction(request).await?;
    Ok(Json(outcome))
}

pub async fn transaction_details(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, PaymentError> {
    let details = state.payments.transaction_details(&id).await?;
    Ok(Json(details))
}

pub async fn update_transaction(
    State(state): State<AppState>,
    Json(settlement): Json<TransactionSettlement>,
) -> Result<impl IntoResponse, PaymentError> {
    state.payments.update_transaction(settlement).await?;
    Ok(Json(json!({ "message": "Transaction updated" })))
}

pub async fn reconcile(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, PaymentError> {
    let details = state.payments.reconcile(&id).await?;
    Ok(Json(details))
}
