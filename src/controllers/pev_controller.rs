//! Controller del registro de PEVs
//!
//! Validación, autorización por propietario y orquestación del repositorio.

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::pev_dto::{
    ApiResponse, CreatePevRequest, PevFilters, PevListResponse, PevResponse, UpdatePevRequest,
};
use crate::models::pev::Pev;
use crate::repositories::pev_repository::PevRepository;
use crate::repositories::PAGE_SIZE;
use crate::utils::errors::{field_error, not_found_error, validation_error, AppError};
use crate::utils::validation;

pub struct PevController {
    repository: PevRepository,
}

impl PevController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PevRepository::new(pool),
        }
    }

    pub async fn list(&self, caller: Uuid, filters: PevFilters) -> Result<PevListResponse, AppError> {
        let page = i64::from(filters.page.unwrap_or(1).max(1));

        let (pevs, total) = self
            .repository
            .find_by_owner(caller, filters.search.as_deref(), page)
            .await?;

        Ok(PevListResponse {
            pevs: pevs.into_iter().map(PevResponse::from).collect(),
            total,
            page: page as i32,
            per_page: PAGE_SIZE as i32,
            total_pages: total_pages(total),
        })
    }

    pub async fn create(
        &self,
        caller: Uuid,
        request: CreatePevRequest,
    ) -> Result<ApiResponse<PevResponse>, AppError> {
        request.validate()?;
        validate_pev_fields(
            &request.make,
            &request.model,
            request.year,
            request.battery_capacity_kwh,
            request.range_miles,
        )?;

        // Pre-check para un mensaje de campo amistoso; la garantía real son
        // los índices únicos (ver map_unique_violation en el repositorio)
        if self.repository.vin_exists(&request.vin, None).await? {
            return Err(validation_error(
                "vin",
                "Este VIN ya está registrado en otro vehículo.",
            ));
        }
        if self
            .repository
            .license_plate_exists(&request.license_plate, None)
            .await?
        {
            return Err(validation_error(
                "license_plate",
                "Esta matrícula ya está registrada en otro vehículo.",
            ));
        }

        let pev = self
            .repository
            .create(
                caller,
                request.make,
                request.model,
                request.year,
                request.vin,
                request.license_plate,
                request.color,
                request.battery_capacity_kwh,
                request.range_miles,
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            pev.into(),
            "PEV registrado exitosamente".to_string(),
        ))
    }

    pub async fn get(&self, caller: Uuid, id: Uuid) -> Result<PevResponse, AppError> {
        let pev = self.owned_pev(caller, id, "ver").await?;
        Ok(pev.into())
    }

    pub async fn update(
        &self,
        caller: Uuid,
        id: Uuid,
        request: UpdatePevRequest,
    ) -> Result<ApiResponse<PevResponse>, AppError> {
        let pev = self.owned_pev(caller, id, "editar").await?;

        request.validate()?;
        validate_pev_fields(
            &request.make,
            &request.model,
            request.year,
            request.battery_capacity_kwh,
            request.range_miles,
        )?;

        // Unicidad excluyendo la propia fila
        if self.repository.vin_exists(&request.vin, Some(pev.id)).await? {
            return Err(validation_error(
                "vin",
                "Este VIN ya está registrado en otro vehículo.",
            ));
        }
        if self
            .repository
            .license_plate_exists(&request.license_plate, Some(pev.id))
            .await?
        {
            return Err(validation_error(
                "license_plate",
                "Esta matrícula ya está registrada en otro vehículo.",
            ));
        }

        let updated = self
            .repository
            .update(
                pev.id,
                request.make,
                request.model,
                request.year,
                request.vin,
                request.license_plate,
                request.color,
                request.battery_capacity_kwh,
                request.range_miles,
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            updated.into(),
            "PEV actualizado exitosamente".to_string(),
        ))
    }

    pub async fn delete(&self, caller: Uuid, id: Uuid) -> Result<(), AppError> {
        let pev = self.owned_pev(caller, id, "eliminar").await?;
        self.repository.delete(pev.id).await?;
        Ok(())
    }

    /// Cargar el PEV y verificar que el caller es su propietario actual
    async fn owned_pev(&self, caller: Uuid, id: Uuid, action: &str) -> Result<Pev, AppError> {
        let pev = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("PEV"))?;

        if !pev.is_owned_by(caller) {
            return Err(AppError::Forbidden(format!(
                "No tienes permiso para {} este PEV.",
                action
            )));
        }

        Ok(pev)
    }
}

/// Reglas que el derive no cubre: strings solo-espacios, techo dinámico
/// del año y rangos numéricos
fn validate_pev_fields(
    make: &str,
    model: &str,
    year: i32,
    battery_capacity_kwh: Option<rust_decimal::Decimal>,
    range_miles: Option<i32>,
) -> Result<(), AppError> {
    validation::validate_not_empty(make).map_err(|e| field_error("make", e))?;
    validation::validate_not_empty(model).map_err(|e| field_error("model", e))?;
    validation::validate_model_year(year).map_err(|e| field_error("year", e))?;

    if let Some(capacity) = battery_capacity_kwh {
        validation::validate_battery_capacity(capacity)
            .map_err(|e| field_error("battery_capacity_kwh", e))?;
    }

    if let Some(range) = range_miles {
        validation::validate_range_miles(range).map_err(|e| field_error("range_miles", e))?;
    }

    Ok(())
}

fn total_pages(total: i64) -> i32 {
    ((total + PAGE_SIZE - 1) / PAGE_SIZE) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0), 0);
        assert_eq!(total_pages(1), 1);
        assert_eq!(total_pages(10), 1);
        assert_eq!(total_pages(11), 2);
        assert_eq!(total_pages(25), 3);
    }

    #[test]
    fn test_validate_pev_fields() {
        assert!(validate_pev_fields("Tesla", "Model 3", 2023, None, None).is_ok());
        assert!(validate_pev_fields("   ", "Model 3", 2023, None, None).is_err());
        assert!(validate_pev_fields("Tesla", "Model 3", 1989, None, None).is_err());
        assert!(
            validate_pev_fields("Tesla", "Model 3", 2023, Some(Decimal::new(-1, 0)), None)
                .is_err()
        );
        assert!(validate_pev_fields("Tesla", "Model 3", 2023, None, Some(10_000)).is_err());
    }
}
