//! User directory handlers

use crate::app_state::AppState;
use crate::error::{AppError, Result};
use crate::middleware::{AuthenticatedUser, Capability};
use crate::models::{Role, User};
use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub uid: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub membership: String,
    pub last_login: DateTime<Utc>,
}

impl From<User> for MeResponse {
    fn from(user: User) -> Self {
        Self {
            uid: user.uid,
            email: user.email,
            name: user.name,
            role: user.role,
            membership: user.membership,
            last_login: user.last_login,
        }
    }
}

/// The caller's own directory record. GET /api/me
pub async fn me(state: web::Data<AppState>, user: AuthenticatedUser) -> Result<HttpResponse> {
    // The extractor just synced the record, so a miss here means the
    // directory write was lost.
    let record = state
        .users()
        .find_by_uid(&user.0.uid)
        .await?
        .ok_or_else(|| AppError::Internal("directory record missing after sync".to_string()))?;

    Ok(HttpResponse::Ok().json(MeResponse::from(record)))
}

/// All users, privileged only. GET /api/users
pub async fn list_users(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse> {
    state
        .policy()
        .authorize(&user.0, Capability::ManageUsers)
        .await?;

    let users = state.users().list().await?;
    Ok(HttpResponse::Ok().json(users))
}

/// Escalate a user to admin. PATCH /api/users/make-admin/{uid}
pub async fn make_admin(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    state
        .policy()
        .authorize(&user.0, Capability::ManageUsers)
        .await?;

    if state.users().promote_to_admin(&path).await? {
        Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "user promoted to admin" })))
    } else {
        Err(AppError::NotFound(format!("user {} not found", path)))
    }
}

#[derive(Debug, Deserialize)]
pub struct MembershipRequest {
    pub membership: Option<String>,
}

/// Set a user's membership tier. PATCH /api/users/membership/{uid}
pub async fn update_membership(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    req: web::Json<MembershipRequest>,
) -> Result<HttpResponse> {
    state
        .policy()
        .authorize(&user.0, Capability::ManageUsers)
        .await?;

    let membership = match req.membership.as_deref().map(str::trim) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => return Err(AppError::BadRequest("membership is required".to_string())),
    };

    if state.users().set_membership(&path, &membership).await? {
        Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "membership updated" })))
    } else {
        Err(AppError::NotFound(format!("user {} not found", path)))
    }
}
