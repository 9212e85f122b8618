//! Controller de la home pública y el dashboard
//!
//! La búsqueda pública no requiere autenticación y solo expone PEVs
//! activos; el dashboard resume los PEVs del usuario autenticado.

use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::pev_dto::PevResponse;
use crate::dto::search_dto::{
    DashboardResponse, PublicPevResponse, PublicSearchFilters, PublicSearchParams,
    PublicSearchResponse,
};
use crate::models::pev::SearchType;
use crate::repositories::pev_repository::{PevRepository, PublicPevRow};
use crate::utils::errors::AppError;

/// PEVs mostrados en el dashboard
const DASHBOARD_PEV_LIMIT: i64 = 5;

pub struct HomeController {
    repository: PevRepository,
}

impl HomeController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PevRepository::new(pool),
        }
    }

    /// Búsqueda pública. Sin término de búsqueda no se consulta la base:
    /// `results` queda en null.
    pub async fn public_search(
        &self,
        params: PublicSearchParams,
    ) -> Result<PublicSearchResponse, AppError> {
        let search_type = SearchType::parse(params.search_type.as_deref());

        let term = params
            .search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty());

        let results = match term {
            Some(term) => {
                let rows = self.repository.search_public(term, search_type).await?;
                Some(rows.into_iter().map(to_public_response).collect())
            }
            None => None,
        };

        Ok(PublicSearchResponse {
            results,
            filters: PublicSearchFilters {
                search: params.search,
                search_type,
            },
        })
    }

    pub async fn dashboard(&self, caller: Uuid) -> Result<DashboardResponse, AppError> {
        let user_pevs = self
            .repository
            .find_recent_active(caller, DASHBOARD_PEV_LIMIT)
            .await?;
        let total_pevs = self.repository.count_by_owner(caller).await?;
        let active_pevs = self.repository.count_active_by_owner(caller).await?;

        Ok(DashboardResponse {
            user_pevs: user_pevs.into_iter().map(PevResponse::from).collect(),
            total_pevs,
            active_pevs,
        })
    }
}

fn to_public_response(row: PublicPevRow) -> PublicPevResponse {
    PublicPevResponse {
        id: row.id,
        make: row.make,
        model: row.model,
        year: row.year,
        vin: row.vin,
        license_plate: row.license_plate,
        color: row.color,
        status: row.status,
        owner_name: row.owner_name,
        owner_email: row.owner_email,
    }
}
