//! # Auth Handlers
//!
//! Login endpoint issuing tenant-bound bearer tokens. Credentials are checked
//! against the users of the resolved tenant only, and the issued token
//! carries that tenant's claim.

use axum::{extract::State, response::Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{ApiError, unauthorized, validation_error};
use crate::repositories::UserRepository;
use crate::server::AppState;
use crate::tenant::TenantScope;

/// Login request payload
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "admin")]
    pub username: String,
    pub password: String,
}

/// Successful login response
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    /// Bearer JWT bound to the resolved tenant
    pub token: String,
    #[schema(example = "Bearer")]
    pub token_type: String,
    pub issued_at: DateTime<Utc>,
}

/// Authenticate within the resolved tenant and issue a bearer JWT
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 401, description = "Invalid credentials", body = ApiError)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    scope: TenantScope,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    if request.username.trim().is_empty() || request.password.is_empty() {
        return Err(validation_error(
            "Username and password are required",
            serde_json::json!({ "username": "required", "password": "required" }),
        ));
    }

    let users = UserRepository::new(&state.db, &scope);
    let Some(user) = users.find_by_username(&request.username).await? else {
        // Same response as a wrong password: no user-existence oracle.
        return Err(unauthorized(Some("Invalid credentials")));
    };

    let password_ok = bcrypt::verify(&request.password, &user.password_hash).unwrap_or(false);
    if !password_ok {
        return Err(unauthorized(Some("Invalid credentials")));
    }

    let roles: Vec<String> = user
        .roles
        .split(',')
        .map(|role| role.trim().to_string())
        .filter(|role| !role.is_empty())
        .collect();

    let token = state
        .jwt
        .issue_token(scope.tenant_id(), &user.username, &roles)?;

    tracing::info!(username = %user.username, "login successful");

    Ok(Json(LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        issued_at: Utc::now(),
    }))
}
