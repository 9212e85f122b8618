//! DTOs de transferencias
//!
//! Requests y responses de la API para el workflow de transferencia.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::transfer::TransferStatus;

/// Request para iniciar una transferencia
///
/// El destinatario llega en campos planos y se convierte a RecipientRef
/// durante la validación: o to_user_id, o el grupo to_email + to_name.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTransferRequest {
    pub pev_id: Uuid,

    pub to_user_id: Option<Uuid>,

    #[validate(email, length(max = 255))]
    pub to_email: Option<String>,

    #[validate(length(min = 1, max = 255))]
    pub to_name: Option<String>,

    #[validate(length(max = 20))]
    pub to_phone: Option<String>,

    #[validate(length(max = 1000))]
    pub notes: Option<String>,
}

/// Acción sobre una transferencia pendiente
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferAction {
    Complete,
    Cancel,
}

/// Request para completar o cancelar una transferencia
#[derive(Debug, Deserialize)]
pub struct UpdateTransferRequest {
    pub action: TransferAction,
}

/// Resumen del PEV embebido en las responses de transferencia
#[derive(Debug, Serialize)]
pub struct TransferPevSummary {
    pub id: Uuid,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub license_plate: String,
}

/// Response de transferencia para la API
#[derive(Debug, Serialize)]
pub struct TransferResponse {
    pub id: Uuid,
    pub pev: TransferPevSummary,
    pub from_user_id: Uuid,
    pub to_user_id: Option<Uuid>,
    pub to_email: Option<String>,
    pub to_name: Option<String>,
    pub to_phone: Option<String>,
    pub notes: Option<String>,
    pub status: TransferStatus,
    pub initiated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Response para listados paginados de transferencias
#[derive(Debug, Serialize)]
pub struct TransferListResponse {
    pub transfers: Vec<TransferResponse>,
    pub total: i64,
    pub page: i32,
    pub per_page: i32,
    pub total_pages: i32,
}

/// Filtros para el listado de transferencias
#[derive(Debug, Deserialize)]
pub struct TransferFilters {
    pub page: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_deserializes_lowercase() {
        let request: UpdateTransferRequest =
            serde_json::from_value(serde_json::json!({ "action": "complete" })).unwrap();
        assert_eq!(request.action, TransferAction::Complete);

        let request: UpdateTransferRequest =
            serde_json::from_value(serde_json::json!({ "action": "cancel" })).unwrap();
        assert_eq!(request.action, TransferAction::Cancel);
    }

    #[test]
    fn test_unknown_action_rejected() {
        let result: Result<UpdateTransferRequest, _> =
            serde_json::from_value(serde_json::json!({ "action": "reopen" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_create_request_validates_notes_length() {
        let request = CreateTransferRequest {
            pev_id: Uuid::new_v4(),
            to_user_id: Some(Uuid::new_v4()),
            to_email: None,
            to_name: None,
            to_phone: None,
            notes: Some("x".repeat(1001)),
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("notes"));
    }

    #[test]
    fn test_create_request_validates_email_format() {
        let request = CreateTransferRequest {
            pev_id: Uuid::new_v4(),
            to_user_id: None,
            to_email: Some("not-an-email".to_string()),
            to_name: Some("Nuevo Propietario".to_string()),
            to_phone: None,
            notes: None,
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("to_email"));
    }
}
