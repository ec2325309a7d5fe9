//! Health and identity endpoints

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::sync::Arc;
use storedesk_core::domain::identity::{AdminCapabilities, Identity};
use uuid::Uuid;

use crate::error::ServerError;
use crate::extract::MaybeIdentity;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Handle GET /health
pub async fn health(State(state): State<Arc<AppState>>) -> Response {
    let version = env!("CARGO_PKG_VERSION");

    if let Some(db) = &state.database {
        if let Err(e) = db.health_check().await {
            tracing::warn!(error = %e, "Health check failed");
            let body = HealthResponse {
                status: "error",
                version,
            };
            return (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response();
        }
    }

    Json(HealthResponse {
        status: "ok",
        version,
    })
    .into_response()
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub email: String,
    pub is_root: bool,
    pub permissions: Vec<String>,
    pub can_manage_users: bool,
    pub can_manage_tenants: bool,
    pub is_admin: bool,
}

/// Handle GET /me
pub async fn me(MaybeIdentity(user): MaybeIdentity) -> Result<Json<MeResponse>, ServerError> {
    let user = user.ok_or_else(|| ServerError::unauthorized("Authentication required"))?;

    Ok(Json(MeResponse {
        id: user.id,
        tenant_id: user.tenant_id(),
        permissions: user.permission_codes().iter().map(str::to_string).collect(),
        is_root: user.is_root(),
        can_manage_users: user.can_manage_users(),
        can_manage_tenants: user.can_manage_tenants(),
        is_admin: user.is_admin(),
        name: user.name,
        email: user.email,
    }))
}
