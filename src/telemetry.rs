//! Telemetry utilities for request-scoped correlation metadata and global
//! subscriber management.

use std::any::type_name_of_val;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use axum::{
    extract::Request,
    http::{HeaderValue, header::HeaderName},
    middleware::Next,
    response::Response,
};
use log::LevelFilter;
use thiserror::Error;
use tokio::task_local;
use tracing_log::LogTracer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::Layer,
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
};
use uuid::Uuid;

use crate::config::AppConfig;

/// Header used to propagate the request correlation ID.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Trace context containing the request correlation ID.
#[derive(Debug, Clone)]
pub struct TraceContext {
    pub trace_id: String,
}

task_local! {
    static ACTIVE_TRACE_CONTEXT: TraceContext;
    static CORRELATION_ATTRIBUTES: RefCell<BTreeMap<&'static str, String>>;
}

/// Errors that can occur while initializing global telemetry.
#[derive(Debug, Error)]
pub enum TelemetryInitError {
    #[error("failed to install log tracer bridge: {0}")]
    LogTracer(#[from] log::SetLoggerError),
    #[error("failed to install tracing subscriber: {0}")]
    Subscriber(#[from] TryInitError),
}

static TELEMETRY_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Initialize global tracing/logging exactly once, wiring `log::` macros into
/// the tracing pipeline.
pub fn init_tracing(config: &AppConfig) -> Result<(), TelemetryInitError> {
    if TELEMETRY_INITIALIZED
        .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
        .is_err()
    {
        return Ok(());
    }

    // Install log bridge first so legacy `log::` macros route through tracing.
    if let Err(err) = LogTracer::builder()
        .with_max_level(LevelFilter::Trace)
        .init()
    {
        // If a LogTracer is already registered (e.g., by tests or another
        // component), treat this as success; otherwise surface the error.
        let logger_type = type_name_of_val(log::logger());
        if !logger_type.contains("LogTracer") {
            eprintln!(
                "Warning: Failed to install log tracer bridge: {}. legacy `log::` macros will not emit structured tracing events.",
                err
            );
        }
    }

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let fmt_layer = match config.log_format.as_str() {
        "pretty" => fmt::layer().pretty().boxed(),
        _ => fmt::layer().json().boxed(),
    };

    if let Err(err) = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
    {
        TELEMETRY_INITIALIZED.store(false, Ordering::SeqCst);
        eprintln!(
            "Warning: Failed to set global tracing subscriber: {}. Default subscriber remains in effect.",
            err
        );
    }

    Ok(())
}

/// Execute `future` within the provided trace context, making the trace ID and
/// a fresh correlation-attribute map available through task-local storage for
/// the duration of the request.
pub async fn with_trace_context<Fut, R>(context: TraceContext, future: Fut) -> R
where
    Fut: std::future::Future<Output = R>,
{
    ACTIVE_TRACE_CONTEXT
        .scope(
            context,
            CORRELATION_ATTRIBUTES.scope(RefCell::new(BTreeMap::new()), future),
        )
        .await
}

/// Get the currently active trace ID, if one has been set for the running task.
pub fn current_trace_id() -> Option<String> {
    ACTIVE_TRACE_CONTEXT
        .try_with(|ctx| ctx.trace_id.clone())
        .ok()
}

/// Attach a correlation attribute to the running task. Best-effort: outside a
/// request scope this is a no-op.
pub fn set_correlation_attribute(key: &'static str, value: String) {
    let _ = CORRELATION_ATTRIBUTES.try_with(|attrs| {
        attrs.borrow_mut().insert(key, value);
    });
}

/// Remove a correlation attribute from the running task. Idempotent and
/// best-effort, like [`set_correlation_attribute`].
pub fn clear_correlation_attribute(key: &'static str) {
    let _ = CORRELATION_ATTRIBUTES.try_with(|attrs| {
        attrs.borrow_mut().remove(key);
    });
}

/// Read back a correlation attribute, if present in the running task.
pub fn correlation_attribute(key: &'static str) -> Option<String> {
    CORRELATION_ATTRIBUTES
        .try_with(|attrs| attrs.borrow().get(key).cloned())
        .ok()
        .flatten()
}

/// Correlation-ID pipeline stage: adopts the caller-supplied `X-Request-ID`
/// or generates one, echoes it on the response, and scopes the trace context
/// to the request task. The task-local map is dropped with the request, so no
/// attribute can leak into a reused worker.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let trace_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let context = TraceContext {
        trace_id: trace_id.clone(),
    };

    let mut response = with_trace_context(context, next.run(request)).await;

    if let Ok(header_value) = HeaderValue::from_str(&trace_id) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), header_value);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn trace_id_visible_inside_scope_only() {
        assert_eq!(current_trace_id(), None);

        let context = TraceContext {
            trace_id: "trace-123".to_string(),
        };
        with_trace_context(context, async {
            assert_eq!(current_trace_id(), Some("trace-123".to_string()));
        })
        .await;

        assert_eq!(current_trace_id(), None);
    }

    #[tokio::test]
    async fn correlation_attributes_scoped_to_task() {
        set_correlation_attribute("tenant_id", "outside".to_string());
        assert_eq!(correlation_attribute("tenant_id"), None);

        let context = TraceContext {
            trace_id: "trace-456".to_string(),
        };
        with_trace_context(context, async {
            set_correlation_attribute("tenant_id", "abc".to_string());
            assert_eq!(correlation_attribute("tenant_id"), Some("abc".to_string()));

            clear_correlation_attribute("tenant_id");
            assert_eq!(correlation_attribute("tenant_id"), None);

            // Clearing twice is fine.
            clear_correlation_attribute("tenant_id");
        })
        .await;
    }
}
