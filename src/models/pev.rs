//! Modelo de PEV
//!
//! Este módulo contiene el struct Pev y su enum de estado.
//! Mapea exactamente al schema PostgreSQL con primary key 'id'.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Estado del PEV - mapea al ENUM pev_status
///
/// `Transferred` solo se alcanza como efecto de completar una transferencia
/// cuyo destinatario aún no es un usuario registrado.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "pev_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PevStatus {
    Active,
    Inactive,
    Transferred,
}

/// Campo(s) sobre los que aplica el substring match de la búsqueda pública
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SearchType {
    LicensePlate,
    Vin,
    MakeModel,
}

impl SearchType {
    /// Parsear el query param; valores desconocidos o ausentes caen al
    /// default license_plate.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("vin") => SearchType::Vin,
            Some("make_model") => SearchType::MakeModel,
            _ => SearchType::LicensePlate,
        }
    }
}

/// PEV principal - mapea exactamente a la tabla pevs
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Pev {
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

impl Pev {
    /// Nombre completo del vehículo (año marca modelo)
    pub fn full_name(&self) -> String {
        format!("{} {} {}", self.year, self.make, self.model)
    }

    /// Verificar si el caller es el propietario actual
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_pev() -> Pev {
        Pev {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            make: "Tesla".to_string(),
            model: "Model 3".to_string(),
            year: 2023,
            vin: "5YJ3E1EA5JF012345".to_string(),
            license_plate: "TEST123".to_string(),
            color: Some("White".to_string()),
            battery_capacity_kwh: Some(Decimal::new(7550, 2)),
            range_miles: Some(300),
            status: PevStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_full_name() {
        assert_eq!(sample_pev().full_name(), "2023 Tesla Model 3");
    }

    #[test]
    fn test_is_owned_by() {
        let pev = sample_pev();
        assert!(pev.is_owned_by(pev.user_id));
        assert!(!pev.is_owned_by(Uuid::new_v4()));
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&PevStatus::Transferred).unwrap();
        assert_eq!(json, "\"transferred\"");
    }

    #[test]
    fn test_search_type_parse() {
        assert_eq!(SearchType::parse(Some("vin")), SearchType::Vin);
        assert_eq!(SearchType::parse(Some("make_model")), SearchType::MakeModel);
        assert_eq!(
            SearchType::parse(Some("license_plate")),
            SearchType::LicensePlate
        );
        assert_eq!(SearchType::parse(None), SearchType::LicensePlate);
        // valores desconocidos caen al default, igual que el param ausente
        assert_eq!(SearchType::parse(Some("bogus")), SearchType::LicensePlate);
    }
}
