//! # Screen Handlers
//!
//! Public read access to published screens and authenticated admin CRUD.
//! Every storage access goes through the request's tenant scope; handlers
//! never add tenant filters themselves.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::auth::AuthenticatedUser;
use crate::error::{ApiError, ErrorType, validation_error};
use crate::models::screen::{Model as ScreenModel, ScreenStatus, ScreenType};
use crate::normalize::{is_reserved_path, normalize_path};
use crate::repositories::screen::{CreateScreenRequest, UpdateScreenRequest};
use crate::repositories::ScreenRepository;
use crate::server::AppState;
use crate::tenant::TenantScope;

const ALLOWED_REDIRECT_STATUSES: [i32; 4] = [301, 302, 307, 308];

/// Screen representation returned by the API
#[derive(Debug, Serialize, ToSchema)]
pub struct ScreenDto {
    pub id: Uuid,
    #[schema(example = "/about")]
    pub path: String,
    #[serde(rename = "type")]
    pub screen_type: ScreenType,
    pub status: ScreenStatus,
    pub content: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_target_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_status: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ScreenModel> for ScreenDto {
    fn from(model: ScreenModel) -> Self {
        Self {
            id: model.id,
            path: model.path,
            screen_type: model.screen_type,
            status: model.status,
            content: model.content,
            redirect_target_url: model.redirect_target_url,
            redirect_status: model.redirect_status,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

/// Query parameters for the public screen lookup
#[derive(Debug, Deserialize, IntoParams)]
pub struct ScreenQuery {
    /// Path of the screen (e.g. `/` or `/about`)
    pub path: String,
}

/// Request payload for creating a screen
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateScreenDto {
    #[schema(example = "/about")]
    pub path: String,
    #[serde(rename = "type")]
    pub screen_type: ScreenType,
    pub status: ScreenStatus,
    pub content: Option<serde_json::Value>,
    pub redirect_target_url: Option<String>,
    pub redirect_status: Option<i32>,
}

/// Request payload for updating a screen; omitted fields stay unchanged
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateScreenDto {
    pub path: Option<String>,
    #[serde(rename = "type")]
    pub screen_type: Option<ScreenType>,
    pub status: Option<ScreenStatus>,
    pub content: Option<serde_json::Value>,
    pub redirect_target_url: Option<String>,
    pub redirect_status: Option<i32>,
}

/// Get the published screen at a path for the resolved tenant
#[utoipa::path(
    get,
    path = "/api/v1/screens",
    params(ScreenQuery),
    responses(
        (status = 200, description = "Published screen found", body = ScreenDto),
        (status = 404, description = "Screen not found or not published"),
        (status = 400, description = "Missing or invalid Host header", body = ApiError)
    ),
    tag = "public"
)]
pub async fn get_published_screen(
    State(state): State<AppState>,
    scope: TenantScope,
    Query(query): Query<ScreenQuery>,
) -> Result<Json<ScreenDto>, ApiError> {
    let path = normalize_path(&query.path);

    let screens = ScreenRepository::new(&state.db, &scope);
    let screen = screens
        .find_by_path_and_status(&path, ScreenStatus::Published)
        .await?
        .ok_or_else(|| ApiError::from(ErrorType::NotFound))?;

    Ok(Json(screen.into()))
}

/// List all screens of the resolved tenant
#[utoipa::path(
    get,
    path = "/api/v1/admin/screens",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Screens of the resolved tenant", body = [ScreenDto]),
        (status = 401, description = "Unauthenticated", body = ApiError)
    ),
    tag = "admin"
)]
pub async fn list_screens(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    scope: TenantScope,
) -> Result<Json<Vec<ScreenDto>>, ApiError> {
    let screens = ScreenRepository::new(&state.db, &scope);
    let models = screens.list().await?;

    Ok(Json(models.into_iter().map(ScreenDto::from).collect()))
}

/// Create a screen for the resolved tenant
#[utoipa::path(
    post,
    path = "/api/v1/admin/screens",
    security(("bearer_auth" = [])),
    request_body = CreateScreenDto,
    responses(
        (status = 201, description = "Screen created", body = ScreenDto),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 401, description = "Unauthenticated", body = ApiError),
        (status = 409, description = "Path already in use for this tenant", body = ApiError)
    ),
    tag = "admin"
)]
pub async fn create_screen(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    scope: TenantScope,
    Json(request): Json<CreateScreenDto>,
) -> Result<(StatusCode, Json<ScreenDto>), ApiError> {
    let path = validate_screen_path(&request.path)?;
    validate_type_specific(
        request.screen_type,
        request.content.as_ref(),
        request.redirect_target_url.as_deref(),
        request.redirect_status,
    )?;

    let screens = ScreenRepository::new(&state.db, &scope);
    let created = screens
        .create(CreateScreenRequest {
            path,
            screen_type: request.screen_type,
            status: request.status,
            content: request.content.unwrap_or_else(|| serde_json::json!({})),
            redirect_target_url: request.redirect_target_url,
            redirect_status: request.redirect_status,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Get a screen of the resolved tenant by id
#[utoipa::path(
    get,
    path = "/api/v1/admin/screens/{id}",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Screen id")),
    responses(
        (status = 200, description = "Screen found", body = ScreenDto),
        (status = 401, description = "Unauthenticated", body = ApiError),
        (status = 404, description = "Screen not found")
    ),
    tag = "admin"
)]
pub async fn get_screen(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    scope: TenantScope,
    Path(id): Path<Uuid>,
) -> Result<Json<ScreenDto>, ApiError> {
    let screens = ScreenRepository::new(&state.db, &scope);
    let screen = screens
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::from(ErrorType::NotFound))?;

    Ok(Json(screen.into()))
}

/// Update a screen of the resolved tenant
#[utoipa::path(
    put,
    path = "/api/v1/admin/screens/{id}",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Screen id")),
    request_body = UpdateScreenDto,
    responses(
        (status = 200, description = "Screen updated", body = ScreenDto),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 401, description = "Unauthenticated", body = ApiError),
        (status = 404, description = "Screen not found")
    ),
    tag = "admin"
)]
pub async fn update_screen(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    scope: TenantScope,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateScreenDto>,
) -> Result<Json<ScreenDto>, ApiError> {
    let screens = ScreenRepository::new(&state.db, &scope);
    let existing = screens
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::from(ErrorType::NotFound))?;

    let path = request.path.as_deref().map(validate_screen_path).transpose()?;

    // Re-validate the type-specific invariants against the merged state.
    let merged_type = request.screen_type.unwrap_or(existing.screen_type);
    let merged_content = request.content.as_ref().or(Some(&existing.content));
    let merged_redirect_url = request
        .redirect_target_url
        .as_deref()
        .or(existing.redirect_target_url.as_deref());
    let merged_redirect_status = request.redirect_status.or(existing.redirect_status);
    validate_type_specific(
        merged_type,
        merged_content,
        merged_redirect_url,
        merged_redirect_status,
    )?;

    let updated = screens
        .update(
            id,
            UpdateScreenRequest {
                path,
                screen_type: request.screen_type,
                status: request.status,
                content: request.content,
                redirect_target_url: request.redirect_target_url,
                redirect_status: request.redirect_status,
            },
        )
        .await?;

    Ok(Json(updated.into()))
}

/// Delete a screen of the resolved tenant
#[utoipa::path(
    delete,
    path = "/api/v1/admin/screens/{id}",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Screen id")),
    responses(
        (status = 204, description = "Screen deleted"),
        (status = 401, description = "Unauthenticated", body = ApiError),
        (status = 404, description = "Screen not found")
    ),
    tag = "admin"
)]
pub async fn delete_screen(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    scope: TenantScope,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let screens = ScreenRepository::new(&state.db, &scope);
    match screens.find_by_id(id).await? {
        Some(_) => {
            screens.delete(id).await?;
            Ok(StatusCode::NO_CONTENT)
        }
        None => Err(ErrorType::NotFound.into()),
    }
}

fn validate_screen_path(raw: &str) -> Result<String, ApiError> {
    let path = normalize_path(raw);
    if is_reserved_path(&path) {
        return Err(validation_error(
            "Path is reserved",
            serde_json::json!({ "path": format!("'{}' is reserved for platform use", path) }),
        ));
    }
    Ok(path)
}

fn validate_type_specific(
    screen_type: ScreenType,
    content: Option<&serde_json::Value>,
    redirect_url: Option<&str>,
    redirect_status: Option<i32>,
) -> Result<(), ApiError> {
    if screen_type == ScreenType::Redirect {
        if redirect_url.is_none_or(|url| url.trim().is_empty()) {
            return Err(validation_error(
                "redirectTargetUrl is required for REDIRECT type",
                serde_json::json!({ "redirect_target_url": "required" }),
            ));
        }
        if !redirect_status.is_some_and(|status| ALLOWED_REDIRECT_STATUSES.contains(&status)) {
            return Err(validation_error(
                "redirectStatus must be one of 301,302,307,308 for REDIRECT type",
                serde_json::json!({ "redirect_status": "must be 301, 302, 307 or 308" }),
            ));
        }
    } else if content.is_none_or(|value| value.is_null()) {
        return Err(validation_error(
            "content is required for non-REDIRECT screen types",
            serde_json::json!({ "content": "required" }),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reserved_paths_are_rejected() {
        assert!(validate_screen_path("/admin/secrets").is_err());
        assert!(validate_screen_path("/_api").is_err());
        assert_eq!(validate_screen_path("Blog/").unwrap(), "/blog");
    }

    #[test]
    fn redirect_requires_target_and_status() {
        assert!(validate_type_specific(ScreenType::Redirect, None, None, None).is_err());
        assert!(
            validate_type_specific(ScreenType::Redirect, None, Some("https://x.com"), Some(418))
                .is_err()
        );
        assert!(
            validate_type_specific(ScreenType::Redirect, None, Some("https://x.com"), Some(301))
                .is_ok()
        );
    }

    #[test]
    fn non_redirect_requires_content() {
        assert!(validate_type_specific(ScreenType::Markdown, None, None, None).is_err());
        let content = json!({"markdown": "# Hello"});
        assert!(validate_type_specific(ScreenType::Markdown, Some(&content), None, None).is_ok());
    }
}
