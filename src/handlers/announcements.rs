//! Announcement handlers

use crate::app_state::AppState;
use crate::error::{AppError, Result};
use crate::middleware::{AuthenticatedUser, Capability};
use crate::models::Announcement;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use mongodb::bson::oid::ObjectId;
use serde::Deserialize;

/// All announcements, newest first. GET /api/announcements
pub async fn list_announcements(state: web::Data<AppState>) -> Result<HttpResponse> {
    let announcements = state.announcements().list().await?;
    Ok(HttpResponse::Ok().json(announcements))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAnnouncementRequest {
    pub author_name: Option<String>,
    pub author_image: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Publish an announcement, privileged only. POST /api/announcements
pub async fn create_announcement(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<CreateAnnouncementRequest>,
) -> Result<HttpResponse> {
    state
        .policy()
        .authorize(&user.0, Capability::ManageAnnouncements)
        .await?;

    let title = match req.title.as_deref().map(str::trim) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => return Err(AppError::BadRequest("title is required".to_string())),
    };
    let description = match req.description.as_deref().map(str::trim) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => return Err(AppError::BadRequest("description is required".to_string())),
    };

    let announcement = Announcement {
        id: None,
        author_name: req.author_name.clone().unwrap_or_default(),
        author_image: req.author_image.clone().unwrap_or_default(),
        title,
        description,
        created_at: Utc::now(),
    };

    let announcement_id = state.announcements().create(&announcement).await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "announcement published",
        "announcementId": announcement_id,
    })))
}

/// Remove an announcement, privileged only.
/// DELETE /api/announcements/{id}
pub async fn delete_announcement(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    state
        .policy()
        .authorize(&user.0, Capability::ManageAnnouncements)
        .await?;

    let id = ObjectId::parse_str(path.as_str())
        .map_err(|_| AppError::BadRequest(format!("invalid announcement id: {}", path)))?;

    if state.announcements().delete(id).await? {
        Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "announcement deleted" })))
    } else {
        Err(AppError::NotFound(format!(
            "announcement {} not found",
            path
        )))
    }
}
