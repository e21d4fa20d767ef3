//! Storage-session scoping enforcement.
//!
//! A [`TenantScope`] is attached once per request, capturing the tenant bound
//! to the request at that moment. Repositories for tenant-owned entities are
//! only constructed from a scope, and every select they issue goes through
//! [`TenantScope::select`], which injects the tenant predicate. The guarantee
//! therefore holds at the session level; call sites cannot forget the filter.
//!
//! Creation stamping lives in each entity's `ActiveModelBehavior`, so even
//! code that bypasses the repositories cannot persist a tenant-owned row
//! without an active tenant context.

use axum::{extract::FromRequestParts, http::request::Parts};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, Select};

use crate::error::ApiError;
use crate::tenant::{TenantContext, TenantContextError, TenantId};

/// Implemented by every tenant-owned entity; names the column carrying the
/// owning tenant.
pub trait TenantOwned: EntityTrait {
    fn tenant_column() -> Self::Column;
}

/// Per-request storage session handle, pinned to the tenant that was bound
/// when it was attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TenantScope {
    tenant_id: TenantId,
}

impl TenantScope {
    /// Attach a scope to the current request's storage session. Fails when
    /// no tenant is bound: a session without a tenant never falls back to
    /// unrestricted access.
    pub fn attach() -> Result<Self, TenantContextError> {
        Ok(Self {
            tenant_id: TenantContext::current()?,
        })
    }

    /// The tenant this session is pinned to.
    pub fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    /// Verify the ambient tenant context still matches this session. A scope
    /// that outlives its request, or is used after the context was cleared
    /// or rebound, refuses to serve tenant-owned rows.
    pub fn guard(&self) -> Result<(), TenantContextError> {
        match TenantContext::current_or_none() {
            Some(current) if current == self.tenant_id => Ok(()),
            _ => Err(TenantContextError::ScopeDrift {
                session: self.tenant_id,
            }),
        }
    }

    /// Start a select over a tenant-owned entity, restricted to rows of this
    /// session's tenant.
    pub fn select<E: TenantOwned>(&self) -> Result<Select<E>, TenantContextError> {
        self.guard()?;
        Ok(E::find().filter(E::tenant_column().eq(self.tenant_id.as_uuid())))
    }
}

impl<S> FromRequestParts<S> for TenantScope
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<TenantScope>()
            .copied()
            .ok_or_else(|| TenantContextError::Unbound.into())
    }
}
