use crate::config::CorsConfig;
use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};

/// CORS for browser clients. `"*"` allows any origin; an empty list disables the layer.
pub fn build_cors_layer(cors: &CorsConfig) -> Option<CorsLayer> {
    let mut any_origin = false;
    let mut origins = Vec::new();
    for raw in &cors.allowed_origins {
        let value = raw.trim();
        if value == "*" {
            any_origin = true;
            continue;
        }
        match HeaderValue::from_str(value) {
            Ok(origin) if !value.is_empty() => origins.push(origin),
            Ok(_) => {}
            Err(e) => tracing::warn!("Ignoring invalid CORS origin {:?}: {}", value, e),
        }
    }

    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if any_origin {
        Some(layer.allow_origin(Any))
    } else if !origins.is_empty() {
        Some(layer.allow_origin(origins))
    } else {
        None
    }
}
