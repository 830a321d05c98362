//! Category API Handlers
//!
//! Reads are public; writes are admin-only and announce `data_updated`
//! so storefronts refresh their navigation.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Category, CategoryCreate};
use crate::utils::{AppError, AppResult};

/// GET /api/categories - all categories
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Category>>> {
    let categories = state.categories().find_all().await?;
    Ok(Json(categories))
}

/// GET /api/categories/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Category>> {
    let category = state
        .categories()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Category {} not found", id)))?;
    Ok(Json(category))
}

#[derive(Debug, serde::Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCreateRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub description: Option<String>,
}

/// POST /api/categories - create a category (admin)
pub async fn create(
    State(state): State<ServerState>,
    current: CurrentUser,
    Json(payload): Json<CategoryCreateRequest>,
) -> AppResult<(StatusCode, Json<Category>)> {
    current.ensure_admin()?;
    payload.validate()?;

    let category = state
        .categories()
        .create(CategoryCreate {
            name: payload.name,
            description: payload.description,
        })
        .await?;

    state.emit_data_updated();
    Ok((StatusCode::CREATED, Json(category)))
}

/// DELETE /api/categories/{id} - remove a category (admin)
pub async fn delete(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    current.ensure_admin()?;
    state.categories().delete(&id).await?;

    state.emit_data_updated();
    Ok(Json(serde_json::json!({ "message": "Category removed" })))
}
