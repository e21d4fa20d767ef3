//! Startup validation of the tenant isolation wiring.
//!
//! The service must never accept traffic with isolation partially wired: the
//! scoping predicate has to constrain every tenant-owned entity, and both
//! mandatory pipeline stages have to be registered. Any failure here aborts
//! startup.

use std::any::type_name;

use sea_orm::{ColumnTrait, DbBackend, EntityTrait, IdenStatic, QueryFilter, QueryTrait};
use thiserror::Error;
use uuid::Uuid;

use crate::models;
use crate::tenant::TenantOwned;

/// Registry name of the tenant resolution stage.
pub const TENANT_RESOLUTION_STAGE: &str = "tenant_resolution";

/// Registry name of the correlation-id stage.
pub const REQUEST_ID_STAGE: &str = "request_id";

/// Fatal wiring errors detected at startup.
#[derive(Debug, Error)]
pub enum GuardrailError {
    #[error(
        "scoping predicate for `{entity}` does not constrain its tenant column `{column}`; \
         tenant-owned queries would run unrestricted"
    )]
    PredicateNotDeclared {
        entity: &'static str,
        column: String,
    },
    #[error("mandatory pipeline stage `{stage}` is not registered; refusing to serve traffic")]
    StageNotRegistered { stage: &'static str },
}

/// Records which pipeline stages were actually layered onto the router.
#[derive(Debug, Default, Clone)]
pub struct PipelineRegistry {
    stages: Vec<&'static str>,
}

impl PipelineRegistry {
    pub fn register(&mut self, stage: &'static str) {
        self.stages.push(stage);
    }

    pub fn is_registered(&self, stage: &str) -> bool {
        self.stages.iter().any(|registered| *registered == stage)
    }
}

/// One-time startup check; call before binding the listener.
pub fn validate_isolation_wiring(registry: &PipelineRegistry) -> Result<(), GuardrailError> {
    tracing::info!("validating tenant isolation wiring");

    validate_scoping_predicate::<models::User>()?;
    validate_scoping_predicate::<models::Screen>()?;

    for stage in [TENANT_RESOLUTION_STAGE, REQUEST_ID_STAGE] {
        if !registry.is_registered(stage) {
            return Err(GuardrailError::StageNotRegistered { stage });
        }
    }

    tracing::info!("tenant isolation wiring validated");
    Ok(())
}

/// Render the scoping predicate for an entity and verify it actually
/// constrains the declared tenant column.
fn validate_scoping_predicate<E: TenantOwned>() -> Result<(), GuardrailError> {
    let column = E::tenant_column();
    let probe = E::find()
        .filter(column.eq(Uuid::nil()))
        .build(DbBackend::Postgres)
        .to_string();

    if !probe.contains(&format!("\"{}\"", column.as_str())) {
        return Err(GuardrailError::PredicateNotDeclared {
            entity: type_name::<E>(),
            column: column.as_str().to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_registry() -> PipelineRegistry {
        let mut registry = PipelineRegistry::default();
        registry.register(TENANT_RESOLUTION_STAGE);
        registry.register(REQUEST_ID_STAGE);
        registry
    }

    #[test]
    fn complete_wiring_passes() {
        assert!(validate_isolation_wiring(&complete_registry()).is_ok());
    }

    #[test]
    fn missing_resolution_stage_fails() {
        let mut registry = PipelineRegistry::default();
        registry.register(REQUEST_ID_STAGE);

        let err = validate_isolation_wiring(&registry).unwrap_err();
        assert!(matches!(
            err,
            GuardrailError::StageNotRegistered {
                stage: TENANT_RESOLUTION_STAGE
            }
        ));
    }

    #[test]
    fn missing_request_id_stage_fails() {
        let mut registry = PipelineRegistry::default();
        registry.register(TENANT_RESOLUTION_STAGE);

        let err = validate_isolation_wiring(&registry).unwrap_err();
        assert!(matches!(
            err,
            GuardrailError::StageNotRegistered {
                stage: REQUEST_ID_STAGE
            }
        ));
    }

    #[test]
    fn scoping_predicate_declared_for_tenant_owned_entities() {
        assert!(validate_scoping_predicate::<models::User>().is_ok());
        assert!(validate_scoping_predicate::<models::Screen>().is_ok());
    }
}
