//! # Authentication and Credential Tenant Binding
//!
//! Bearer JWT verification for protected endpoints. A credential only
//! authenticates a request when its embedded tenant claim exactly matches
//! the tenant the request was resolved to; a token issued for tenant A
//! presented on tenant B's domain is treated as absent. Verification
//! failures behave the same way and never fail the request by themselves —
//! downstream handlers decide whether an unauthenticated request is
//! acceptable.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::error::{ApiError, unauthorized};
use crate::server::AppState;
use crate::tenant::{TenantContext, TenantId};

/// Claims carried by a platform-issued bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Username the token was issued to
    pub sub: String,
    /// Tenant the token was issued for
    pub tenant_id: Uuid,
    /// Role names granted to the subject
    pub roles: Vec<String>,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies HS256 bearer tokens.
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    expiration_seconds: u64,
}

impl JwtService {
    pub fn new(config: &AppConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.jwt_issuer]);

        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
            issuer: config.jwt_issuer.clone(),
            expiration_seconds: config.jwt_expiration_seconds,
        }
    }

    /// Issue a token bound to the given tenant.
    pub fn issue_token(
        &self,
        tenant_id: TenantId,
        username: &str,
        roles: &[String],
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: username.to_string(),
            tenant_id: tenant_id.as_uuid(),
            roles: roles.to_vec(),
            iss: self.issuer.clone(),
            iat: now,
            exp: now + self.expiration_seconds as i64,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
    }

    /// Verify signature, expiry and issuer, returning the decoded claims.
    pub fn decode_and_verify(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        decode::<Claims>(token, &self.decoding_key, &self.validation).map(|data| data.claims)
    }
}

/// The authenticated identity for the remainder of a request.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub username: String,
    pub roles: Vec<String>,
}

/// Authentication middleware. Never rejects by itself: it either inserts an
/// [`AuthenticatedUser`] into the request extensions or leaves the request
/// unauthenticated.
pub async fn authenticate_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(user) = authenticate(&state.jwt, request.headers()) {
        request.extensions_mut().insert(user);
    }

    next.run(request).await
}

fn authenticate(jwt: &JwtService, headers: &HeaderMap) -> Option<AuthenticatedUser> {
    let header = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?;

    let claims = match jwt.decode_and_verify(token) {
        Ok(claims) => claims,
        Err(err) => {
            tracing::warn!(error = %err, "bearer credential verification failed");
            return None;
        }
    };

    let token_tenant = TenantId(claims.tenant_id);
    match TenantContext::current_or_none() {
        Some(bound) if bound == token_tenant => Some(AuthenticatedUser {
            username: claims.sub,
            roles: claims.roles,
        }),
        bound => {
            // Mismatch or no resolved tenant: withhold authentication. This
            // blocks replay of a token issued for one tenant against another
            // tenant's domain.
            tracing::warn!(
                token_tenant = %token_tenant,
                context_tenant = ?bound,
                "bearer credential tenant does not match the resolved tenant"
            );
            None
        }
    }
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| unauthorized(None))
    }
}
