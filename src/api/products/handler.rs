//! Product API Handlers
//!
//! Catalog reads and the analytics view are public. Product management
//! is admin-only; reviews only require a logged-in user.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use validator::Validate;

use crate::auth::CurrentUser;
use crate::catalog::{FeaturedView, compute_featured_view};
use crate::core::ServerState;
use crate::db::models::{Product, ProductCreate, ProductUpdate};
use crate::db::repository::record_id;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_TEXT_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub keyword: Option<String>,
}

/// GET /api/products - list products, optionally filtered by `?keyword=`
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Product>>> {
    let products = state.products().find_all(query.keyword.as_deref()).await?;
    Ok(Json(products))
}

/// GET /api/products/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Product>> {
    let product = state
        .products()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {} not found", id)))?;
    Ok(Json(product))
}

/// POST /api/products - create a product (admin)
pub async fn create(
    State(state): State<ServerState>,
    current: CurrentUser,
    Json(payload): Json<ProductCreate>,
) -> AppResult<(StatusCode, Json<Product>)> {
    current.ensure_admin()?;

    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_TEXT_LEN)?;
    if payload.price < 0 {
        return Err(AppError::validation("Price must not be negative"));
    }

    let user = record_id("user", &current.id);
    let product = state.products().create(user, payload).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// PUT /api/products/{id} - update a product (admin)
pub async fn update(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<Product>> {
    current.ensure_admin()?;

    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.description, "description", MAX_TEXT_LEN)?;
    if let Some(price) = payload.price
        && price < 0
    {
        return Err(AppError::validation("Price must not be negative"));
    }

    let product = state.products().update(&id, payload).await?;
    Ok(Json(product))
}

/// DELETE /api/products/{id} - remove a product (admin)
pub async fn delete(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    current.ensure_admin()?;
    state.products().delete(&id).await?;
    Ok(Json(serde_json::json!({ "message": "Product removed" })))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,
    #[validate(length(min = 1, max = 2000))]
    pub comment: String,
}

/// POST /api/products/{id}/reviews - submit a review
///
/// One review per user per product; the product's mean rating and
/// review count are updated in the same write.
pub async fn add_review(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<ReviewRequest>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    payload.validate()?;

    let user = record_id("user", &current.id);
    state
        .products()
        .add_review(&id, user, current.name.clone(), payload.rating, payload.comment)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "message": "Review added" })),
    ))
}

/// GET /api/products/analytics/featured - best sellers and recommended
///
/// Recomputed from the live catalog and full order history on every
/// call.
pub async fn featured(State(state): State<ServerState>) -> AppResult<Json<FeaturedView>> {
    let products = state.products().find_all(None).await?;
    let orders = state.order_repo().find_all().await?;
    Ok(Json(compute_featured_view(&products, &orders)))
}
