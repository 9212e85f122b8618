//! Rutas de la API
//!
//! Un router por recurso, ensamblados aquí para el binario y los tests.

use axum::Router;

use crate::state::AppState;

pub mod home_routes;
pub mod pev_routes;
pub mod transfer_routes;

/// Ensamblar el router completo de la aplicación
pub fn create_router() -> Router<AppState> {
    Router::new()
        .merge(home_routes::create_home_router())
        .nest("/pevs", pev_routes::create_pev_router())
        .nest("/pev-transfers", transfer_routes::create_transfer_router())
}
