//! # Data Models
//!
//! This module contains all the data models used throughout the Platform API.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod screen;
pub mod tenant;
pub mod tenant_domain;
pub mod user;

pub use screen::Entity as Screen;
pub use tenant::Entity as Tenant;
pub use tenant_domain::Entity as TenantDomain;
pub use user::Entity as User;

/// Basic service information response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceInfo {
    /// The name of the service
    pub service: String,
    /// The version of the service
    pub version: String,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            service: "platform-api".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
