//! DTOs de PEV
//!
//! Requests y responses de la API para el registro de vehículos.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::pev::{Pev, PevStatus};

/// Response genérica
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn success_with_message(data: T, message: String) -> Self {
        Self {
            success: true,
            message: Some(message),
            data: Some(data),
        }
    }
}

/// Request para registrar un PEV
///
/// year, battery_capacity_kwh y range_miles se validan en el controller
/// (el techo del año es dinámico).
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePevRequest {
    #[validate(length(min = 1, max = 255))]
    pub make: String,

    #[validate(length(min = 1, max = 255))]
    pub model: String,

    pub year: i32,

    #[validate(length(equal = 17))]
    pub vin: String,

    #[validate(length(min = 1, max = 20))]
    pub license_plate: String,

    #[validate(length(max = 255))]
    pub color: Option<String>,

    pub battery_capacity_kwh: Option<Decimal>,

    pub range_miles: Option<i32>,
}

/// Request para actualizar un PEV existente
///
/// Reemplazo completo de los campos editables, no hay updates parciales.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePevRequest {
    #[validate(length(min = 1, max = 255))]
    pub make: String,

    #[validate(length(min = 1, max = 255))]
    pub model: String,

    pub year: i32,

    #[validate(length(equal = 17))]
    pub vin: String,

    #[validate(length(min = 1, max = 20))]
    pub license_plate: String,

    #[validate(length(max = 255))]
    pub color: Option<String>,

    pub battery_capacity_kwh: Option<Decimal>,

    pub range_miles: Option<i32>,
}

/// Response de PEV para la API
#[derive(Debug, Serialize)]
pub struct PevResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub vin: String,
    pub license_plate: String,
    pub color: Option<String>,
    pub battery_capacity_kwh: Option<Decimal>,
    pub range_miles: Option<i32>,
    pub status: PevStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Pev> for PevResponse {
    fn from(pev: Pev) -> Self {
        Self {
            id: pev.id,
            user_id: pev.user_id,
            make: pev.make,
            model: pev.model,
            year: pev.year,
            vin: pev.vin,
            license_plate: pev.license_plate,
            color: pev.color,
            battery_capacity_kwh: pev.battery_capacity_kwh,
            range_miles: pev.range_miles,
            status: pev.status,
            created_at: pev.created_at,
            updated_at: pev.updated_at,
        }
    }
}

/// Response para listados paginados de PEVs
#[derive(Debug, Serialize)]
pub struct PevListResponse {
    pub pevs: Vec<PevResponse>,
    pub total: i64,
    pub page: i32,
    pub per_page: i32,
    pub total_pages: i32,
}

/// Filtros para el listado del propietario
#[derive(Debug, Deserialize)]
pub struct PevFilters {
    pub search: Option<String>,
    pub page: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_validates_vin_length() {
        let request = CreatePevRequest {
            make: "Tesla".to_string(),
            model: "Model 3".to_string(),
            year: 2023,
            vin: "SHORT".to_string(),
            license_plate: "TEST123".to_string(),
            color: None,
            battery_capacity_kwh: None,
            range_miles: None,
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("vin"));
    }

    #[test]
    fn test_create_request_valid() {
        let request = CreatePevRequest {
            make: "Tesla".to_string(),
            model: "Model 3".to_string(),
            year: 2023,
            vin: "5YJ3E1EA5JF012345".to_string(),
            license_plate: "TEST123".to_string(),
            color: Some("White".to_string()),
            battery_capacity_kwh: Some(Decimal::new(7550, 2)),
            range_miles: Some(300),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_create_request_deserializes() {
        let request: CreatePevRequest = serde_json::from_value(serde_json::json!({
            "make": "Tesla",
            "model": "Model 3",
            "year": 2023,
            "vin": "5YJ3E1EA5JF012345",
            "license_plate": "TEST123",
            "battery_capacity_kwh": "75.50"
        }))
        .unwrap();
        assert_eq!(request.battery_capacity_kwh, Some(Decimal::new(7550, 2)));
        assert_eq!(request.color, None);
    }
}
