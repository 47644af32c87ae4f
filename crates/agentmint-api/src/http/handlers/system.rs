//! Service configuration and health endpoints.

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::http::response::{ApiResponse, RequestContext};
use crate::state::AppState;

/// Which reply path chat uses. Never includes the key itself.
#[derive(Debug, Serialize)]
pub struct ConfigView {
    pub has_completion_key: bool,
    pub real_ai: bool,
    pub fallback_mode: bool,
}

#[derive(Debug, Serialize)]
pub struct HealthView {
    pub status: &'static str,
    pub version: &'static str,
    pub services: ServiceHealth,
}

#[derive(Debug, Serialize)]
pub struct ServiceHealth {
    pub storage: &'static str,
    pub completion: &'static str,
}

/// GET /api/v1/config
pub async fn get_config(State(state): State<AppState>) -> Json<ApiResponse<ConfigView>> {
    let ctx = RequestContext::start();
    let live = state.has_completion_key();

    Json(ctx.respond(ConfigView {
        has_completion_key: live,
        real_ai: live,
        fallback_mode: !live,
    }))
}

/// GET /api/v1/health
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthView>> {
    let ctx = RequestContext::start();
    let storage_ok = state.catalog.is_healthy().await;

    Json(ctx.respond(HealthView {
        status: if storage_ok { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        services: ServiceHealth {
            storage: if storage_ok { "healthy" } else { "unavailable" },
            completion: if state.has_completion_key() {
                "configured"
            } else {
                "not_configured"
            },
        },
    }))
}
