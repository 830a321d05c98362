//! Order API Handlers
//!
//! Thin wrappers over the lifecycle engine: handlers resolve identity
//! and role, the engine owns the transition rules.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Order, OrderCreate, OrderStatus};
use crate::db::repository::record_id;
use crate::utils::{AppError, AppResult};

/// POST /api/orders - place an order
pub async fn create(
    State(state): State<ServerState>,
    current: CurrentUser,
    Json(payload): Json<OrderCreate>,
) -> AppResult<(StatusCode, Json<Order>)> {
    let user = record_id("user", &current.id);
    let order = state.orders().create_order(user, payload).await?;

    tracing::info!(code = %order.order_code, user = %current.id, "Order placed");
    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /api/orders - all orders (admin)
pub async fn list_all(
    State(state): State<ServerState>,
    current: CurrentUser,
) -> AppResult<Json<Vec<Order>>> {
    current.ensure_admin()?;
    Ok(Json(state.orders().list_all().await?))
}

/// GET /api/orders/myorders - the caller's orders, newest first
pub async fn my_orders(
    State(state): State<ServerState>,
    current: CurrentUser,
) -> AppResult<Json<Vec<Order>>> {
    let user = record_id("user", &current.id);
    Ok(Json(state.orders().list_for_user(&user).await?))
}

/// GET /api/orders/user/{id} - one user's orders (admin)
pub async fn list_for_user(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<Order>>> {
    current.ensure_admin()?;
    let user = record_id("user", &id);
    Ok(Json(state.orders().list_for_user(&user).await?))
}

/// GET /api/orders/{id} - fetch one order (owner or admin)
pub async fn get_by_id(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let order = state.orders().get_by_id(&id).await?;

    let requester = record_id("user", &current.id);
    if order.user != requester && !current.is_admin() {
        return Err(AppError::not_authorized("Not authorized"));
    }
    Ok(Json(order))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusRequest {
    pub status: OrderStatus,
}

/// PUT /api/orders/{id}/status - set order status (admin)
pub async fn set_status(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<StatusRequest>,
) -> AppResult<Json<Order>> {
    current.ensure_admin()?;
    let order = state.orders().set_status(&id, payload.status).await?;
    Ok(Json(order))
}

/// PUT /api/orders/{id}/cancel - cancel own order
pub async fn cancel(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let requester = record_id("user", &current.id);
    let order = state.orders().cancel(&id, &requester).await?;
    Ok(Json(order))
}

/// PUT /api/orders/{id}/return - return own delivered order
pub async fn return_order(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let requester = record_id("user", &current.id);
    let order = state.orders().return_order(&id, &requester).await?;
    Ok(Json(order))
}
