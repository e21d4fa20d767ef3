//! # Repository Layer
//!
//! This module contains repository implementations that encapsulate SeaORM
//! operations for database entities. The tenant repository is read-only;
//! repositories for tenant-owned entities are constructed from a
//! [`TenantScope`](crate::tenant::TenantScope) and are therefore scoped to
//! the request's tenant on every operation.

pub mod screen;
pub mod tenant;
pub mod user;

pub use screen::ScreenRepository;
pub use tenant::TenantRepository;
pub use user::UserRepository;
