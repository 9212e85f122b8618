use anyhow::Result;
use axum::Router;
use dotenvy::dotenv;
use std::net::SocketAddr;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use pev_registry::config::environment::EnvironmentConfig;
use pev_registry::database::DatabaseConnection;
use pev_registry::middleware::cors::{cors_middleware, cors_middleware_with_origins};
use pev_registry::routes;
use pev_registry::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🛵 PEV Registry - Registro y transferencia de vehículos eléctricos");
    info!("==================================================================");

    // Inicializar base de datos (aplica migraciones pendientes)
    let db_connection = match DatabaseConnection::new_default().await {
        Ok(conn) => conn,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    let pool = db_connection.pool().clone();
    let config = EnvironmentConfig::default();

    // En desarrollo CORS es permisivo; en producción solo los orígenes configurados
    let cors = if config.is_development() {
        cors_middleware()
    } else {
        cors_middleware_with_origins(config.cors_origins.clone())
    };

    let app_state = AppState::new(pool, config.clone());

    let app: Router = routes::create_router()
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET    / - Búsqueda pública (search, search_type)");
    info!("   GET    /dashboard - Resumen del usuario autenticado");
    info!("🛵 Endpoints - PEVs:");
    info!("   GET    /pevs - Listar mis PEVs");
    info!("   POST   /pevs - Registrar PEV");
    info!("   GET    /pevs/:id - Obtener PEV");
    info!("   PUT    /pevs/:id - Actualizar PEV");
    info!("   DELETE /pevs/:id - Eliminar PEV");
    info!("🔁 Endpoints - Transferencias:");
    info!("   GET    /pev-transfers - Listar mis transferencias");
    info!("   POST   /pev-transfers - Iniciar transferencia");
    info!("   GET    /pev-transfers/:id - Obtener transferencia");
    info!("   PATCH  /pev-transfers/:id - Completar o cancelar");
    info!("   DELETE /pev-transfers/:id - Eliminar transferencia");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
