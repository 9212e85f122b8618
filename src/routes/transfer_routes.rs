//! Rutas del workflow de transferencia

use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, patch, post},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::transfer_controller::TransferController;
use crate::dto::pev_dto::ApiResponse;
use crate::dto::transfer_dto::{
    CreateTransferRequest, TransferFilters, TransferListResponse, TransferResponse,
    UpdateTransferRequest,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_transfer_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_transfers))
        .route("/", post(create_transfer))
        .route("/:id", get(get_transfer))
        .route("/:id", patch(update_transfer))
        .route("/:id", delete(delete_transfer))
}

async fn list_transfers(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(filters): Query<TransferFilters>,
) -> Result<Json<TransferListResponse>, AppError> {
    let controller = TransferController::new(state.pool.clone());
    let response = controller.list(user.user_id, filters).await?;
    Ok(Json(response))
}

async fn create_transfer(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<CreateTransferRequest>,
) -> Result<Json<ApiResponse<TransferResponse>>, AppError> {
    let controller = TransferController::new(state.pool.clone());
    let response = controller.create(user.user_id, request).await?;
    Ok(Json(response))
}

async fn get_transfer(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<TransferResponse>, AppError> {
    let controller = TransferController::new(state.pool.clone());
    let response = controller.get(user.user_id, id).await?;
    Ok(Json(response))
}

async fn update_transfer(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateTransferRequest>,
) -> Result<Json<ApiResponse<TransferResponse>>, AppError> {
    let controller = TransferController::new(state.pool.clone());
    let response = controller.update(user.user_id, id, request.action).await?;
    Ok(Json(response))
}

async fn delete_transfer(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let controller = TransferController::new(state.pool.clone());
    controller.delete(user.user_id, id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Transferencia eliminada exitosamente"
    })))
}
