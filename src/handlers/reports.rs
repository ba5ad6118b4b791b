//! Moderation report handlers

use crate::app_state::AppState;
use crate::error::{AppError, Result};
use crate::middleware::{AuthenticatedUser, Capability};
use crate::models::{Report, ReportAction, ReportStatus};
use actix_web::{web, HttpResponse};
use chrono::Utc;
use mongodb::bson::oid::ObjectId;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReportRequest {
    pub reported_user_uid: Option<String>,
    pub reported_user_email: Option<String>,
    pub content_id: Option<String>,
    pub content_snippet: Option<String>,
    pub reason: Option<String>,
}

fn required(value: Option<&str>, field: &str) -> Result<String> {
    match value.map(str::trim) {
        Some(trimmed) if !trimmed.is_empty() => Ok(trimmed.to_string()),
        _ => Err(AppError::BadRequest(format!("{} is required", field))),
    }
}

/// File a report. Any verified identity may call this; reporter fields
/// are taken from the verified identity, never the body.
/// POST /api/reports
pub async fn create_report(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<CreateReportRequest>,
) -> Result<HttpResponse> {
    let report = Report {
        id: None,
        reporter_uid: user.0.uid.clone(),
        reporter_email: user.0.email.clone(),
        reported_user_uid: required(req.reported_user_uid.as_deref(), "reportedUserUid")?,
        reported_user_email: required(req.reported_user_email.as_deref(), "reportedUserEmail")?,
        content_id: required(req.content_id.as_deref(), "contentId")?,
        content_snippet: req.content_snippet.clone().unwrap_or_default(),
        reason: required(req.reason.as_deref(), "reason")?,
        status: ReportStatus::Pending,
        actions: vec![],
        created_at: Utc::now(),
    };

    let report_id = state.reports().create(&report).await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "report filed",
        "reportId": report_id,
    })))
}

/// All reports, newest first, privileged only. GET /api/reports
pub async fn list_reports(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse> {
    state
        .policy()
        .authorize(&user.0, Capability::ManageReports)
        .await?;

    let reports = state.reports().list().await?;
    Ok(HttpResponse::Ok().json(reports))
}

#[derive(Debug, Deserialize)]
pub struct ReportActionRequest {
    pub action: Option<String>,
}

/// Apply one moderation action to a report, privileged only.
/// PATCH /api/reports/{id}
pub async fn apply_report_action(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    req: web::Json<ReportActionRequest>,
) -> Result<HttpResponse> {
    state
        .policy()
        .authorize(&user.0, Capability::ManageReports)
        .await?;

    let action = req
        .action
        .as_deref()
        .and_then(ReportAction::parse)
        .ok_or_else(|| {
            AppError::BadRequest("action must be one of: warn, delete, ban, resolve".to_string())
        })?;

    let id = ObjectId::parse_str(path.as_str())
        .map_err(|_| AppError::BadRequest(format!("invalid report id: {}", path)))?;

    match state.reports().apply_action(id, action).await? {
        Some(report) => Ok(HttpResponse::Ok().json(report)),
        None => Err(AppError::NotFound(format!("report {} not found", path))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_fields() {
        assert_eq!(required(Some("u-123"), "reportedUserUid").unwrap(), "u-123");
        assert!(required(Some(""), "reason").is_err());
        assert!(required(Some("   "), "reason").is_err());
        assert!(required(None, "contentId").is_err());
    }
}
