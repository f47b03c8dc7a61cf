pub mod adapters;
pub mod cli;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod gateway;
pub mod handlers;
pub mod ports;
pub mod services;
pub mod validation;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::services::PaymentService;

#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub payments: Arc<PaymentService>,
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/pay/transactions",
            post(handlers::pay::create_transaction).put(handlers::pay::update_transaction),
        )
        .route("/pay/acceptance-token", get(handlers::pay::acceptance_token))
        .route("/pay/tokenize-card", post(handlers::pay::tokenize_card))
        .route(
            "/pay/gateway-transactions",
            post(handlers::pay::create_gateway_transaction),
        )
        .route(
            "/pay/transactions/:id/details",
            get(handlers::pay::transaction_details),
        )
        .route(
            "/pay/transactions/:id/reconcile",
            post(handlers::pay::reconcile),
        )
        .with_state(state)
}
