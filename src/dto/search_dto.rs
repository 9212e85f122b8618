//! DTOs de la búsqueda pública y el dashboard
//!
//! La búsqueda pública solo expone PEVs activos e incluye los datos de
//! contacto del propietario actual.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dto::pev_dto::PevResponse;
use crate::models::pev::{PevStatus, SearchType};

/// Query params de la búsqueda pública
#[derive(Debug, Deserialize)]
pub struct PublicSearchParams {
    pub search: Option<String>,
    pub search_type: Option<String>,
}

/// Fila de resultado de la búsqueda pública, con el propietario actual
#[derive(Debug, Serialize)]
pub struct PublicPevResponse {
    pub id: Uuid,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub vin: String,
    pub license_plate: String,
    pub color: Option<String>,
    pub status: PevStatus,
    pub owner_name: String,
    pub owner_email: String,
}

/// Response de la búsqueda pública
///
/// `results` es null cuando no se envió término de búsqueda, y lista vacía
/// cuando se buscó y no hubo coincidencias.
#[derive(Debug, Serialize)]
pub struct PublicSearchResponse {
    pub results: Option<Vec<PublicPevResponse>>,
    pub filters: PublicSearchFilters,
}

/// Eco de los filtros aplicados
#[derive(Debug, Serialize)]
pub struct PublicSearchFilters {
    pub search: Option<String>,
    pub search_type: SearchType,
}

/// Response del dashboard del usuario autenticado
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub user_pevs: Vec<PevResponse>,
    pub total_pevs: i64,
    pub active_pevs: i64,
}
