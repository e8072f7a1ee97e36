use anyhow::Result;
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info, warn};

use car_rental_storefront::config::environment::EnvironmentConfig;
use car_rental_storefront::create_app;
use car_rental_storefront::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let config = EnvironmentConfig::from_env();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(config.tracing_level())
        .init();

    info!("🚗 Car Rental Storefront - API");
    info!("================================================");
    info!("🌍 Entorno: {}", config.environment);
    if config.is_development() && !config.cors_origins.is_empty() {
        warn!("⚠️ CORS_ORIGINS definido en desarrollo: {:?}", config.cors_origins);
    }
    info!("📁 Catálogo: {}", config.storage.cars_path().display());
    info!("📁 Pedidos: {}", config.storage.orders_path().display());

    let server_url = config.server_url();
    let app = create_app(AppState::new(config));

    info!("🌐 Servidor iniciando en http://{}", server_url);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🚙 Catálogo:");
    info!("   GET  /api/cars - Listar coches (?type=&brand=&search=)");
    info!("   GET  /api/cars/filters - Tipos y marcas");
    info!("   GET  /api/cars/suggestions?term= - Sugerencias de búsqueda");
    info!("   GET  /api/cars/:vin - Obtener coche");
    info!("   POST /api/cars/availability - Cambiar disponibilidad");
    info!("🧾 Pedidos:");
    info!("   GET  /api/orders - Listar pedidos");
    info!("   GET  /api/orders/:orderId - Obtener pedido");
    info!("   POST /api/orders - Crear reserva");

    let listener = tokio::net::TcpListener::bind(&server_url).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Error del servidor: {}", e);
        return Err(e.into());
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el handler de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
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
