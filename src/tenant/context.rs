//! Request-scoped tenant binding.
//!
//! One slot per request task holds the tenant the request was resolved to.
//! The slot is installed by [`TenantContext::scope`] and destroyed when the
//! scoped future completes, so a binding can never outlive its request or
//! leak into a reused worker task. Binding twice without clearing is a
//! programming error and fails loudly.

use std::cell::RefCell;
use std::fmt;
use std::future::Future;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::task_local;
use uuid::Uuid;

/// Tenant ID wrapper for type safety
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TenantId(pub Uuid);

impl TenantId {
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Invariant violations of the request tenant binding. None of these are
/// recoverable at the point of occurrence; callers surface them and fail the
/// request rather than proceeding without a tenant.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TenantContextError {
    #[error("tenant already bound for this request; refusing to override the tenant context")]
    AlreadyBound,
    #[error("tenant identity must not be nil")]
    InvalidIdentity,
    #[error("no tenant context available; ensure the tenant resolution stage has executed")]
    Unbound,
    #[error("tenant context accessed outside of a request scope")]
    NoScope,
    #[error("storage session tenant {session} no longer matches the bound tenant context")]
    ScopeDrift { session: TenantId },
}

task_local! {
    static REQUEST_TENANT: RefCell<Option<TenantId>>;
}

/// Access to the tenant bound to the current request task.
pub struct TenantContext;

impl TenantContext {
    /// Run `future` with a fresh, unbound tenant slot. The slot is dropped
    /// when the future completes or is cancelled, which is the unconditional
    /// cleanup guarantee for every exit path.
    pub async fn scope<F>(future: F) -> F::Output
    where
        F: Future,
    {
        REQUEST_TENANT.scope(RefCell::new(None), future).await
    }

    /// Bind the resolved tenant for this request. Fails if a tenant is
    /// already bound (never silently overwrites), if the identity is nil, or
    /// if no request scope is active.
    pub fn bind(tenant_id: TenantId) -> Result<(), TenantContextError> {
        if tenant_id.0.is_nil() {
            return Err(TenantContextError::InvalidIdentity);
        }

        REQUEST_TENANT
            .try_with(|slot| {
                let mut slot = slot.borrow_mut();
                if slot.is_some() {
                    return Err(TenantContextError::AlreadyBound);
                }
                *slot = Some(tenant_id);
                Ok(())
            })
            .map_err(|_| TenantContextError::NoScope)?
    }

    /// The tenant bound to this request. Fails when unbound so that no code
    /// path can silently run as "tenant: none".
    pub fn current() -> Result<TenantId, TenantContextError> {
        Self::current_or_none().ok_or(TenantContextError::Unbound)
    }

    /// Non-failing variant of [`current`](Self::current) for code that must
    /// tolerate absence (e.g. diagnostics, the credential binding check).
    pub fn current_or_none() -> Option<TenantId> {
        REQUEST_TENANT
            .try_with(|slot| *slot.borrow())
            .ok()
            .flatten()
    }

    /// Remove any binding. Idempotent; safe when unbound or out of scope.
    pub fn clear() {
        let _ = REQUEST_TENANT.try_with(|slot| slot.borrow_mut().take());
    }
}
