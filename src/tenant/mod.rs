//! # Tenant Isolation
//!
//! Everything that binds a request to exactly one tenant: the request-scoped
//! tenant context, host-based resolution, the resolution pipeline stage,
//! storage scoping enforcement, and the startup wiring guardrail.

pub mod context;
pub mod guardrail;
pub mod middleware;
pub mod resolver;
pub mod scope;

pub use context::{TenantContext, TenantContextError, TenantId};
pub use guardrail::{GuardrailError, PipelineRegistry};
pub use resolver::TenantResolver;
pub use scope::{TenantOwned, TenantScope};
