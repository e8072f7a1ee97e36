//! Middleware de CORS
//!
//! El storefront se sirve desde otro origen; en desarrollo se acepta
//! cualquiera, en el resto de entornos solo los de `CORS_ORIGINS`.

use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::environment::EnvironmentConfig;

/// Crear middleware de CORS configurado para desarrollo
/// NOTA: Permite cualquier origen - solo para desarrollo
pub fn cors_middleware() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Crear middleware de CORS con orígenes específicos
pub fn cors_middleware_with_origins(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                log::warn!("⚠️ Origen CORS inválido ignorado: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            HeaderName::from_static("content-type"),
            HeaderName::from_static("accept"),
            HeaderName::from_static("origin"),
            HeaderName::from_static("x-requested-with"),
        ])
        .max_age(std::time::Duration::from_secs(3600))
}

/// Elegir la política según la configuración
pub fn cors_layer(config: &EnvironmentConfig) -> CorsLayer {
    // "*" equivale a no restringir
    if config.cors_origins.is_empty() || config.cors_origins.iter().any(|o| o == "*") {
        if config.is_production() {
            log::warn!("⚠️ CORS_ORIGINS vacío en producción, se permite cualquier origen");
        }
        cors_middleware()
    } else {
        cors_middleware_with_origins(&config.cors_origins)
    }
}
