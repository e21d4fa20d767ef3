//! Tenant resolution pipeline stage.
//!
//! Runs before any business handler: canonicalizes the Host header, resolves
//! the owning tenant, binds it into the request-scoped context and attaches
//! the per-request storage scope. Cleanup is unconditional: the scope-guard
//! plus the task-local scope drop clear the binding and the correlation
//! attribute on every exit path, including panics and cancellation, because
//! the worker task may be reused by an unrelated request.

use axum::{
    extract::{Request, State},
    http::header::HOST,
    middleware::Next,
    response::Response,
};

use crate::error::{ApiError, host_required, invalid_host, tenant_not_found};
use crate::normalize::normalize_host;
use crate::server::AppState;
use crate::telemetry;
use crate::tenant::{TenantContext, TenantResolver, TenantScope};

/// Correlation attribute under which the resolved tenant is exposed to logs.
pub const TENANT_CORRELATION_ATTRIBUTE: &str = "tenant_id";

/// Infrastructure endpoints that never touch the tenant context.
pub fn is_bypassed_path(path: &str) -> bool {
    path == "/health" || path == "/openapi.json" || path == "/docs" || path.starts_with("/docs/")
}

/// Resolution middleware; rejects any request it cannot bind to exactly one
/// tenant before downstream handling runs.
pub async fn tenant_resolution_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if is_bypassed_path(request.uri().path()) {
        return Ok(next.run(request).await);
    }

    let raw_host = request
        .headers()
        .get(HOST)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty());

    let Some(raw_host) = raw_host else {
        tracing::warn!("request received with no Host header");
        return Err(host_required());
    };

    let Some(domain) = normalize_host(raw_host) else {
        tracing::warn!(host = raw_host, "request Host header failed canonicalization");
        return Err(invalid_host());
    };

    let resolver = TenantResolver::new(&state.db, &state.config);
    let Some(tenant_id) = resolver.resolve(&domain).await? else {
        tracing::warn!(%domain, "unknown tenant for domain");
        return Err(tenant_not_found());
    };

    TenantContext::scope(async move {
        // Finally-equivalent: runs on normal return, early error, panic and
        // cancellation, before the worker task can serve another request.
        let _cleanup = scopeguard::guard((), |_| {
            TenantContext::clear();
            telemetry::clear_correlation_attribute(TENANT_CORRELATION_ATTRIBUTE);
        });

        TenantContext::bind(tenant_id)?;
        telemetry::set_correlation_attribute(TENANT_CORRELATION_ATTRIBUTE, tenant_id.to_string());

        let scope = TenantScope::attach()?;
        let mut request = request;
        request.extensions_mut().insert(scope);

        Ok(next.run(request).await)
    })
    .await
}
