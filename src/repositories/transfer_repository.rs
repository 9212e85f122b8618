//! Repositorio de transferencias
//!
//! CRUD del workflow de transferencia. Completar una transferencia muta dos
//! filas (pev_transfers + pevs) dentro de una única transacción: o se
//! escriben ambas o ninguna.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::pev::PevStatus;
use crate::models::transfer::{PevTransfer, RecipientRef, TransferStatus};
use crate::models::user::User;
use crate::repositories::PAGE_SIZE;
use crate::utils::errors::AppError;

/// Fila de transferencia con el resumen del PEV (join para los listados)
#[derive(Debug, sqlx::FromRow)]
pub struct TransferWithPev {
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
    pub pev_make: String,
    pub pev_model: String,
    pub pev_year: i32,
    pub pev_license_plate: String,
}

const TRANSFER_WITH_PEV: &str = r#"
    SELECT t.id, t.pev_id, t.from_user_id, t.to_user_id, t.to_email, t.to_name,
           t.to_phone, t.notes, t.status, t.initiated_at, t.completed_at,
           p.make AS pev_make, p.model AS pev_model, p.year AS pev_year,
           p.license_plate AS pev_license_plate
    FROM pev_transfers t
    JOIN pevs p ON p.id = t.pev_id
"#;

pub struct TransferRepository {
    pool: PgPool,
}

impl TransferRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        pev_id: Uuid,
        from_user_id: Uuid,
        recipient: &RecipientRef,
        notes: Option<String>,
    ) -> Result<PevTransfer, AppError> {
        let (to_user_id, to_email, to_name, to_phone) = match recipient {
            RecipientRef::Registered(user_id) => (Some(*user_id), None, None, None),
            RecipientRef::Unregistered { email, name, phone } => (
                None,
                Some(email.clone()),
                Some(name.clone()),
                phone.clone(),
            ),
        };

        let transfer = sqlx::query_as::<_, PevTransfer>(
            r#"
            INSERT INTO pev_transfers (id, pev_id, from_user_id, to_user_id, to_email,
                                       to_name, to_phone, notes, status, initiated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(pev_id)
        .bind(from_user_id)
        .bind(to_user_id)
        .bind(to_email)
        .bind(to_name)
        .bind(to_phone)
        .bind(notes)
        .bind(TransferStatus::Pending)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(transfer)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<PevTransfer>, AppError> {
        let transfer = sqlx::query_as::<_, PevTransfer>("SELECT * FROM pev_transfers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(transfer)
    }

    pub async fn find_with_pev(&self, id: Uuid) -> Result<Option<TransferWithPev>, AppError> {
        let query = format!("{} WHERE t.id = $1", TRANSFER_WITH_PEV);

        let transfer = sqlx::query_as::<_, TransferWithPev>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(transfer)
    }

    /// Transferencias donde el usuario participa en cualquiera de los dos
    /// lados, más recientes primero, paginadas.
    pub async fn find_for_user(
        &self,
        user_id: Uuid,
        page: i64,
    ) -> Result<(Vec<TransferWithPev>, i64), AppError> {
        let offset = (page - 1) * PAGE_SIZE;
        let query = format!(
            r#"{}
            WHERE t.from_user_id = $1 OR t.to_user_id = $1
            ORDER BY t.initiated_at DESC
            LIMIT $2 OFFSET $3
            "#,
            TRANSFER_WITH_PEV
        );

        let transfers = sqlx::query_as::<_, TransferWithPev>(&query)
            .bind(user_id)
            .bind(PAGE_SIZE)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM pev_transfers WHERE from_user_id = $1 OR to_user_id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok((transfers, total))
    }

    /// Buscar un usuario registrado (tabla del proveedor de identidad)
    pub async fn find_user(&self, user_id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Completar la transferencia y reasignar el PEV en una transacción.
    ///
    /// El UPDATE exige status = pending: una transferencia ya terminal no
    /// se vuelve a aplicar, aunque dos requests lleguen a la vez.
    pub async fn complete(&self, id: Uuid) -> Result<PevTransfer, AppError> {
        let mut tx = self.pool.begin().await?;
        let now = Utc::now();

        let transfer = sqlx::query_as::<_, PevTransfer>(
            r#"
            UPDATE pev_transfers
            SET status = $2, completed_at = $3
            WHERE id = $1 AND status = $4
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(TransferStatus::Completed)
        .bind(now)
        .bind(TransferStatus::Pending)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| {
            AppError::Conflict("La transferencia ya fue completada o cancelada.".to_string())
        })?;

        match transfer.to_user_id {
            // Destinatario registrado: el PEV cambia de propietario y sigue activo
            Some(new_owner) => {
                sqlx::query("UPDATE pevs SET user_id = $2, status = $3, updated_at = $4 WHERE id = $1")
                    .bind(transfer.pev_id)
                    .bind(new_owner)
                    .bind(PevStatus::Active)
                    .bind(now)
                    .execute(&mut *tx)
                    .await?;
            }
            // Destinatario sin cuenta: el PEV queda marcado como transferido
            // hasta que el nuevo propietario se registre
            None => {
                sqlx::query("UPDATE pevs SET status = $2, updated_at = $3 WHERE id = $1")
                    .bind(transfer.pev_id)
                    .bind(PevStatus::Transferred)
                    .bind(now)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        tx.commit().await?;

        Ok(transfer)
    }

    /// Cancelar la transferencia. El PEV no se toca.
    pub async fn cancel(&self, id: Uuid) -> Result<PevTransfer, AppError> {
        let transfer = sqlx::query_as::<_, PevTransfer>(
            r#"
            UPDATE pev_transfers
            SET status = $2, completed_at = $3
            WHERE id = $1 AND status = $4
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(TransferStatus::Cancelled)
        .bind(Utc::now())
        .bind(TransferStatus::Pending)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| {
            AppError::Conflict("La transferencia ya fue completada o cancelada.".to_string())
        })?;

        Ok(transfer)
    }

    /// Borrar el registro de transferencia. No afecta al PEV en ningún
    /// estado, ni siquiera si la transferencia se había completado.
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM pev_transfers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
