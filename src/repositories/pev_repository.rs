//! Repositorio de PEVs
//!
//! CRUD, listado paginado del propietario y búsqueda pública. La unicidad
//! de VIN y matrícula la garantizan los índices únicos; el mapeo de la
//! violación devuelve el mismo error de campo que el pre-check.

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::pev::{Pev, PevStatus, SearchType};
use crate::repositories::PAGE_SIZE;
use crate::utils::errors::{validation_error, AppError};

/// Fila de la búsqueda pública: PEV + propietario actual
#[derive(Debug, sqlx::FromRow)]
pub struct PublicPevRow {
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

pub struct PevRepository {
    pool: PgPool,
}

impl PevRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        owner_id: Uuid,
        make: String,
        model: String,
        year: i32,
        vin: String,
        license_plate: String,
        color: Option<String>,
        battery_capacity_kwh: Option<Decimal>,
        range_miles: Option<i32>,
    ) -> Result<Pev, AppError> {
        let now = Utc::now();

        let pev = sqlx::query_as::<_, Pev>(
            r#"
            INSERT INTO pevs (id, user_id, make, model, year, vin, license_plate, color,
                              battery_capacity_kwh, range_miles, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $12)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(owner_id)
        .bind(make)
        .bind(model)
        .bind(year)
        .bind(vin)
        .bind(license_plate)
        .bind(color)
        .bind(battery_capacity_kwh)
        .bind(range_miles)
        .bind(PevStatus::Active)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(pev)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Pev>, AppError> {
        let pev = sqlx::query_as::<_, Pev>("SELECT * FROM pevs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(pev)
    }

    /// Listado del propietario: substring match case-insensitive sobre
    /// make/model/vin/matrícula (OR), más recientes primero, paginado.
    pub async fn find_by_owner(
        &self,
        owner_id: Uuid,
        search: Option<&str>,
        page: i64,
    ) -> Result<(Vec<Pev>, i64), AppError> {
        // ILIKE '%%' empareja todas las filas cuando no hay término
        let pattern = format!("%{}%", search.unwrap_or(""));
        let offset = (page - 1) * PAGE_SIZE;

        let pevs = sqlx::query_as::<_, Pev>(
            r#"
            SELECT * FROM pevs
            WHERE user_id = $1
              AND (make ILIKE $2 OR model ILIKE $2 OR vin ILIKE $2 OR license_plate ILIKE $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(owner_id)
        .bind(&pattern)
        .bind(PAGE_SIZE)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM pevs
            WHERE user_id = $1
              AND (make ILIKE $2 OR model ILIKE $2 OR vin ILIKE $2 OR license_plate ILIKE $2)
            "#,
        )
        .bind(owner_id)
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await?;

        Ok((pevs, total))
    }

    pub async fn vin_exists(&self, vin: &str, exclude: Option<Uuid>) -> Result<bool, AppError> {
        let result: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM pevs WHERE vin = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(vin)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await?;

        Ok(result)
    }

    pub async fn license_plate_exists(
        &self,
        license_plate: &str,
        exclude: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let result: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM pevs WHERE license_plate = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(license_plate)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await?;

        Ok(result)
    }

    /// Reemplazo completo de los campos editables
    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        &self,
        id: Uuid,
        make: String,
        model: String,
        year: i32,
        vin: String,
        license_plate: String,
        color: Option<String>,
        battery_capacity_kwh: Option<Decimal>,
        range_miles: Option<i32>,
    ) -> Result<Pev, AppError> {
        let pev = sqlx::query_as::<_, Pev>(
            r#"
            UPDATE pevs
            SET make = $2, model = $3, year = $4, vin = $5, license_plate = $6,
                color = $7, battery_capacity_kwh = $8, range_miles = $9, updated_at = $10
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(make)
        .bind(model)
        .bind(year)
        .bind(vin)
        .bind(license_plate)
        .bind(color)
        .bind(battery_capacity_kwh)
        .bind(range_miles)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(pev)
    }

    /// Borrar un PEV. El cascade de la FK elimina sus transferencias.
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM pevs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Búsqueda pública: solo PEVs activos, máximo 10 filas, sin paginación.
    pub async fn search_public(
        &self,
        term: &str,
        search_type: SearchType,
    ) -> Result<Vec<PublicPevRow>, AppError> {
        let pattern = format!("%{}%", term);

        let filter = match search_type {
            SearchType::LicensePlate => "p.license_plate ILIKE $2",
            SearchType::Vin => "p.vin ILIKE $2",
            SearchType::MakeModel => "(p.make ILIKE $2 OR p.model ILIKE $2)",
        };

        let query = format!(
            r#"
            SELECT p.id, p.make, p.model, p.year, p.vin, p.license_plate, p.color, p.status,
                   u.full_name AS owner_name, u.email AS owner_email
            FROM pevs p
            JOIN users u ON u.id = p.user_id
            WHERE p.status = $1 AND {}
            ORDER BY p.created_at DESC
            LIMIT 10
            "#,
            filter
        );

        let rows = sqlx::query_as::<_, PublicPevRow>(&query)
            .bind(PevStatus::Active)
            .bind(&pattern)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    /// Los PEVs activos más recientes del propietario, para el dashboard
    pub async fn find_recent_active(
        &self,
        owner_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Pev>, AppError> {
        let pevs = sqlx::query_as::<_, Pev>(
            r#"
            SELECT * FROM pevs
            WHERE user_id = $1 AND status = $2
            ORDER BY created_at DESC
            LIMIT $3
            "#,
        )
        .bind(owner_id)
        .bind(PevStatus::Active)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(pevs)
    }

    pub async fn count_by_owner(&self, owner_id: Uuid) -> Result<i64, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM pevs WHERE user_id = $1")
            .bind(owner_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(total)
    }

    pub async fn count_active_by_owner(&self, owner_id: Uuid) -> Result<i64, AppError> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM pevs WHERE user_id = $1 AND status = $2")
                .bind(owner_id)
                .bind(PevStatus::Active)
                .fetch_one(&self.pool)
                .await?;

        Ok(total)
    }
}

/// Mapear violaciones de los índices únicos al error de campo que habría
/// devuelto el pre-check. Cierra la carrera entre check e insert/update.
fn map_unique_violation(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(ref db_err) = err {
        if let Some(constraint) = db_err.constraint() {
            if constraint.contains("vin") {
                return validation_error("vin", "Este VIN ya está registrado en otro vehículo.");
            }
            if constraint.contains("license_plate") {
                return validation_error(
                    "license_plate",
                    "Esta matrícula ya está registrada en otro vehículo.",
                );
            }
        }
    }
    AppError::Database(err)
}
