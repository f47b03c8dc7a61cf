//! Order and user records the payment flow reads but never writes.

use bigdecimal::BigDecimal;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: i64,
    pub user_id: Option<i64>,
    pub total_cost: BigDecimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub email: String,
}
