//! # API Handlers
//!
//! This module contains all the HTTP endpoint handlers for the Platform API.

pub mod auth;
pub mod screens;

use axum::response::Json;

use crate::models::ServiceInfo;

/// Root handler that returns basic service information
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service information", body = ServiceInfo)
    ),
    tag = "root"
)]
pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo::default())
}

/// Liveness probe. On the resolution bypass list: never touches the tenant
/// context.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is alive")
    ),
    tag = "health"
)]
pub async fn health() -> &'static str {
    "OK"
}
