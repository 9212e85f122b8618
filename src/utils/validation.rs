//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! que las reglas derive de `validator` no pueden expresar.

use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use validator::ValidationError;

/// Año mínimo de modelo aceptado por el registro
pub const MIN_MODEL_YEAR: i32 = 1990;

/// Validar que un string no esté vacío ni sea solo espacios
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar el año de modelo: 1990 <= year <= año actual + 2
/// El techo es dinámico, por eso no puede ser un range del derive.
pub fn validate_model_year(year: i32) -> Result<(), ValidationError> {
    let max_year = Utc::now().year() + 2;
    if year < MIN_MODEL_YEAR || year > max_year {
        let mut error = ValidationError::new("year");
        error.add_param("min".into(), &MIN_MODEL_YEAR);
        error.add_param("max".into(), &max_year);
        error.add_param("actual".into(), &year);
        return Err(error);
    }
    Ok(())
}

/// Validar capacidad de batería en kWh: 0 <= x <= 999.99
pub fn validate_battery_capacity(value: Decimal) -> Result<(), ValidationError> {
    let max = Decimal::new(99_999, 2);
    if value < Decimal::ZERO || value > max {
        let mut error = ValidationError::new("battery_capacity_kwh");
        error.add_param("min".into(), &"0");
        error.add_param("max".into(), &"999.99");
        return Err(error);
    }
    Ok(())
}

/// Validar autonomía en millas: 0 <= x <= 9999
pub fn validate_range_miles(value: i32) -> Result<(), ValidationError> {
    if !(0..=9999).contains(&value) {
        let mut error = ValidationError::new("range_miles");
        error.add_param("min".into(), &0);
        error.add_param("max".into(), &9999);
        error.add_param("actual".into(), &value);
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_not_empty() {
        assert!(validate_not_empty("Tesla").is_ok());
        assert!(validate_not_empty("").is_err());
        assert!(validate_not_empty("   ").is_err());
    }

    #[test]
    fn test_validate_model_year() {
        let current = Utc::now().year();
        assert!(validate_model_year(1990).is_ok());
        assert!(validate_model_year(current).is_ok());
        assert!(validate_model_year(current + 2).is_ok());
        assert!(validate_model_year(1989).is_err());
        assert!(validate_model_year(current + 3).is_err());
    }

    #[test]
    fn test_validate_battery_capacity() {
        assert!(validate_battery_capacity(Decimal::new(7550, 2)).is_ok());
        assert!(validate_battery_capacity(Decimal::ZERO).is_ok());
        assert!(validate_battery_capacity(Decimal::new(99_999, 2)).is_ok());
        assert!(validate_battery_capacity(Decimal::new(-1, 0)).is_err());
        assert!(validate_battery_capacity(Decimal::new(1000, 0)).is_err());
    }

    #[test]
    fn test_validate_range_miles() {
        assert!(validate_range_miles(300).is_ok());
        assert!(validate_range_miles(0).is_ok());
        assert!(validate_range_miles(9999).is_ok());
        assert!(validate_range_miles(-1).is_err());
        assert!(validate_range_miles(10000).is_err());
    }
}
