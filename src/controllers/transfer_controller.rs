//! Controller del workflow de transferencia
//!
//! La máquina de estados: pending -> completed | cancelled. Solo el
//! propietario que inició la transferencia puede sacarla de pending;
//! la visibilidad alcanza a ambos lados.

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::pev_dto::ApiResponse;
use crate::dto::transfer_dto::{
    CreateTransferRequest, TransferAction, TransferFilters, TransferListResponse,
    TransferPevSummary, TransferResponse,
};
use crate::models::pev::Pev;
use crate::models::transfer::{PevTransfer, RecipientRef};
use crate::repositories::pev_repository::PevRepository;
use crate::repositories::transfer_repository::{TransferRepository, TransferWithPev};
use crate::repositories::PAGE_SIZE;
use crate::utils::errors::{not_found_error, validation_error, AppError};

pub struct TransferController {
    transfers: TransferRepository,
    pevs: PevRepository,
}

impl TransferController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            transfers: TransferRepository::new(pool.clone()),
            pevs: PevRepository::new(pool),
        }
    }

    pub async fn list(
        &self,
        caller: Uuid,
        filters: TransferFilters,
    ) -> Result<TransferListResponse, AppError> {
        let page = i64::from(filters.page.unwrap_or(1).max(1));

        let (transfers, total) = self.transfers.find_for_user(caller, page).await?;

        Ok(TransferListResponse {
            transfers: transfers.into_iter().map(to_response).collect(),
            total,
            page: page as i32,
            per_page: PAGE_SIZE as i32,
            total_pages: ((total + PAGE_SIZE - 1) / PAGE_SIZE) as i32,
        })
    }

    pub async fn create(
        &self,
        caller: Uuid,
        request: CreateTransferRequest,
    ) -> Result<ApiResponse<TransferResponse>, AppError> {
        request.validate()?;

        let pev = self
            .pevs
            .find_by_id(request.pev_id)
            .await?
            .ok_or_else(|| not_found_error("PEV"))?;

        if !pev.is_owned_by(caller) {
            return Err(AppError::Forbidden(
                "No tienes permiso para transferir este PEV.".to_string(),
            ));
        }

        let recipient = RecipientRef::from_parts(
            request.to_user_id,
            request.to_email,
            request.to_name,
            request.to_phone,
        )?;

        if let Some(recipient_id) = recipient.user_id() {
            if self.transfers.find_user(recipient_id).await?.is_none() {
                return Err(validation_error(
                    "to_user_id",
                    "El usuario destinatario seleccionado no existe.",
                ));
            }
        }

        let transfer = self
            .transfers
            .create(pev.id, caller, &recipient, request.notes)
            .await?;

        Ok(ApiResponse::success_with_message(
            response_from_parts(transfer, &pev),
            "Transferencia iniciada exitosamente".to_string(),
        ))
    }

    pub async fn get(&self, caller: Uuid, id: Uuid) -> Result<TransferResponse, AppError> {
        let transfer = self
            .transfers
            .find_with_pev(id)
            .await?
            .ok_or_else(|| not_found_error("Transferencia"))?;

        if transfer.from_user_id != caller && transfer.to_user_id != Some(caller) {
            return Err(AppError::Forbidden(
                "No tienes permiso para ver esta transferencia.".to_string(),
            ));
        }

        Ok(to_response(transfer))
    }

    /// Completar o cancelar una transferencia pendiente.
    ///
    /// El repositorio re-verifica el estado pending dentro del propio
    /// UPDATE: repetir la acción sobre una transferencia terminal devuelve
    /// Conflict, nunca re-aplica la reasignación de propietario.
    pub async fn update(
        &self,
        caller: Uuid,
        id: Uuid,
        action: TransferAction,
    ) -> Result<ApiResponse<TransferResponse>, AppError> {
        let transfer = self
            .transfers
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Transferencia"))?;

        if transfer.from_user_id != caller {
            return Err(AppError::Forbidden(
                "Solo el propietario que inició la transferencia puede actualizarla.".to_string(),
            ));
        }

        let message = match action {
            TransferAction::Complete => {
                self.transfers.complete(transfer.id).await?;
                "Transferencia completada exitosamente"
            }
            TransferAction::Cancel => {
                self.transfers.cancel(transfer.id).await?;
                "Transferencia cancelada exitosamente"
            }
        };

        let updated = self
            .transfers
            .find_with_pev(id)
            .await?
            .ok_or_else(|| not_found_error("Transferencia"))?;

        Ok(ApiResponse::success_with_message(
            to_response(updated),
            message.to_string(),
        ))
    }

    pub async fn delete(&self, caller: Uuid, id: Uuid) -> Result<(), AppError> {
        let transfer = self
            .transfers
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Transferencia"))?;

        if transfer.from_user_id != caller {
            return Err(AppError::Forbidden(
                "No tienes permiso para eliminar esta transferencia.".to_string(),
            ));
        }

        self.transfers.delete(transfer.id).await?;
        Ok(())
    }
}

fn to_response(row: TransferWithPev) -> TransferResponse {
    TransferResponse {
        id: row.id,
        pev: TransferPevSummary {
            id: row.pev_id,
            make: row.pev_make,
            model: row.pev_model,
            year: row.pev_year,
            license_plate: row.pev_license_plate,
        },
        from_user_id: row.from_user_id,
        to_user_id: row.to_user_id,
        to_email: row.to_email,
        to_name: row.to_name,
        to_phone: row.to_phone,
        notes: row.notes,
        status: row.status,
        initiated_at: row.initiated_at,
        completed_at: row.completed_at,
    }
}

fn response_from_parts(transfer: PevTransfer, pev: &Pev) -> TransferResponse {
    TransferResponse {
        id: transfer.id,
        pev: TransferPevSummary {
            id: pev.id,
            make: pev.make.clone(),
            model: pev.model.clone(),
            year: pev.year,
            license_plate: pev.license_plate.clone(),
        },
        from_user_id: transfer.from_user_id,
        to_user_id: transfer.to_user_id,
        to_email: transfer.to_email,
        to_name: transfer.to_name,
        to_phone: transfer.to_phone,
        notes: transfer.notes,
        status: transfer.status,
        initiated_at: transfer.initiated_at,
        completed_at: transfer.completed_at,
    }
}
