//! Rutas del registro de PEVs
//!
//! Handlers delgados: extraen identidad y parámetros, delegan al controller.

use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::pev_controller::PevController;
use crate::dto::pev_dto::{
    ApiResponse, CreatePevRequest, PevFilters, PevListResponse, PevResponse, UpdatePevRequest,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_pev_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_pevs))
        .route("/", post(create_pev))
        .route("/:id", get(get_pev))
        .route("/:id", put(update_pev))
        .route("/:id", delete(delete_pev))
}

async fn list_pevs(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(filters): Query<PevFilters>,
) -> Result<Json<PevListResponse>, AppError> {
    let controller = PevController::new(state.pool.clone());
    let response = controller.list(user.user_id, filters).await?;
    Ok(Json(response))
}

async fn create_pev(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<CreatePevRequest>,
) -> Result<Json<ApiResponse<PevResponse>>, AppError> {
    let controller = PevController::new(state.pool.clone());
    let response = controller.create(user.user_id, request).await?;
    Ok(Json(response))
}

async fn get_pev(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<PevResponse>, AppError> {
    let controller = PevController::new(state.pool.clone());
    let response = controller.get(user.user_id, id).await?;
    Ok(Json(response))
}

async fn update_pev(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdatePevRequest>,
) -> Result<Json<ApiResponse<PevResponse>>, AppError> {
    let controller = PevController::new(state.pool.clone());
    let response = controller.update(user.user_id, id, request).await?;
    Ok(Json(response))
}

async fn delete_pev(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let controller = PevController::new(state.pool.clone());
    controller.delete(user.user_id, id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "PEV eliminado exitosamente"
    })))
}
