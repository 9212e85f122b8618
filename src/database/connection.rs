//! Conexión a PostgreSQL
//!
//! Este módulo maneja la conexión a la base de datos y ejecuta las
//! migraciones embebidas al arrancar.

use anyhow::Result;
use sqlx::PgPool;

use crate::config::database::DatabaseConfig;

/// Conexión a la base de datos con su pool
pub struct DatabaseConnection {
    pool: PgPool,
}

impl DatabaseConnection {
    /// Crear la conexión desde DATABASE_URL y aplicar migraciones pendientes
    pub async fn new_default() -> Result<Self> {
        let config = DatabaseConfig::default();
        let pool = config.create_pool().await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
