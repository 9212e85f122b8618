//! Rutas de la home pública y el dashboard

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};

use crate::controllers::home_controller::HomeController;
use crate::dto::search_dto::{DashboardResponse, PublicSearchParams, PublicSearchResponse};
use crate::middleware::auth::AuthenticatedUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_home_router() -> Router<AppState> {
    Router::new()
        .route("/", get(public_search))
        .route("/dashboard", get(dashboard))
}

/// Búsqueda pública del registro: sin autenticación, solo PEVs activos
async fn public_search(
    State(state): State<AppState>,
    Query(params): Query<PublicSearchParams>,
) -> Result<Json<PublicSearchResponse>, AppError> {
    let controller = HomeController::new(state.pool.clone());
    let response = controller.public_search(params).await?;
    Ok(Json(response))
}

async fn dashboard(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<DashboardResponse>, AppError> {
    let controller = HomeController::new(state.pool.clone());
    let response = controller.dashboard(user.user_id).await?;
    Ok(Json(response))
}
