//! Modelo de transferencia de propiedad
//!
//! Este módulo contiene el struct PevTransfer, su enum de estado y la
//! referencia al destinatario como unión etiquetada.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

use crate::utils::errors::{validation_error, AppError};

/// Estado de la transferencia - mapea al ENUM transfer_status
///
/// Transiciones válidas: pending -> completed, pending -> cancelled.
/// Los estados terminales nunca cambian.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "transfer_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TransferStatus {
    Pending,
    Completed,
    Cancelled,
}

impl TransferStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TransferStatus::Pending)
    }
}

/// PevTransfer principal - mapea exactamente a la tabla pev_transfers
///
/// Las columnas to_user_id / to_email / to_name / to_phone son la proyección
/// en storage de [`RecipientRef`].
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PevTransfer {
    pub id: Uuid,
    pub pev_id: Uuid,
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

impl PevTransfer {
    /// Una transferencia es visible para quien la inició y para el
    /// destinatario registrado, nadie más.
    pub fn involves(&self, user_id: Uuid) -> bool {
        self.from_user_id == user_id || self.to_user_id == Some(user_id)
    }
}

/// Destinatario de una transferencia: usuario registrado o datos de contacto
/// de alguien que todavía no tiene cuenta. Exactamente una de las dos formas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipientRef {
    Registered(Uuid),
    Unregistered {
        email: String,
        name: String,
        phone: Option<String>,
    },
}

impl RecipientRef {
    /// Construir la unión a partir de los campos planos del request.
    ///
    /// Reglas: `to_user_id` presente excluye `to_email`/`to_name`; sin
    /// `to_user_id` el grupo email+name es obligatorio.
    pub fn from_parts(
        to_user_id: Option<Uuid>,
        to_email: Option<String>,
        to_name: Option<String>,
        to_phone: Option<String>,
    ) -> Result<Self, AppError> {
        match to_user_id {
            Some(user_id) => {
                if to_email.is_some() || to_name.is_some() {
                    return Err(validation_error(
                        "to_user_id",
                        "Indique un usuario registrado o los datos del nuevo propietario, no ambos.",
                    ));
                }
                Ok(RecipientRef::Registered(user_id))
            }
            None => {
                let email = to_email.ok_or_else(|| {
                    validation_error(
                        "to_email",
                        "El email es obligatorio cuando no se selecciona un usuario existente.",
                    )
                })?;
                let name = to_name.ok_or_else(|| {
                    validation_error(
                        "to_name",
                        "El nombre es obligatorio cuando no se selecciona un usuario existente.",
                    )
                })?;
                Ok(RecipientRef::Unregistered {
                    email,
                    name,
                    phone: to_phone,
                })
            }
        }
    }

    /// Id del destinatario si es un usuario registrado
    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            RecipientRef::Registered(id) => Some(*id),
            RecipientRef::Unregistered { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipient_registered() {
        let id = Uuid::new_v4();
        let recipient = RecipientRef::from_parts(Some(id), None, None, None).unwrap();
        assert_eq!(recipient, RecipientRef::Registered(id));
        assert_eq!(recipient.user_id(), Some(id));
    }

    #[test]
    fn test_recipient_unregistered() {
        let recipient = RecipientRef::from_parts(
            None,
            Some("nuevo@example.com".to_string()),
            Some("Nuevo Propietario".to_string()),
            Some("+34600123456".to_string()),
        )
        .unwrap();
        assert!(matches!(recipient, RecipientRef::Unregistered { .. }));
        assert_eq!(recipient.user_id(), None);
    }

    #[test]
    fn test_recipient_both_forms_rejected() {
        let result = RecipientRef::from_parts(
            Some(Uuid::new_v4()),
            Some("nuevo@example.com".to_string()),
            None,
            None,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_recipient_missing_email_rejected() {
        let result =
            RecipientRef::from_parts(None, None, Some("Nuevo Propietario".to_string()), None);
        assert!(result.is_err());
    }

    #[test]
    fn test_recipient_missing_name_rejected() {
        let result =
            RecipientRef::from_parts(None, Some("nuevo@example.com".to_string()), None, None);
        assert!(result.is_err());
    }

    #[test]
    fn test_terminal_states() {
        assert!(!TransferStatus::Pending.is_terminal());
        assert!(TransferStatus::Completed.is_terminal());
        assert!(TransferStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_involves() {
        let from = Uuid::new_v4();
        let to = Uuid::new_v4();
        let transfer = PevTransfer {
            id: Uuid::new_v4(),
            pev_id: Uuid::new_v4(),
            from_user_id: from,
            to_user_id: Some(to),
            to_email: None,
            to_name: None,
            to_phone: None,
            notes: None,
            status: TransferStatus::Pending,
            initiated_at: Utc::now(),
            completed_at: None,
        };
        assert!(transfer.involves(from));
        assert!(transfer.involves(to));
        assert!(!transfer.involves(Uuid::new_v4()));
    }
}
