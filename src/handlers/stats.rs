//! Author dashboard statistics

use crate::app_state::AppState;
use crate::error::{AppError, Result};
use actix_web::{web, HttpResponse};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub email: Option<String>,
}

/// Post counts for one author, split by publication status.
/// GET /api/dashboard/stats
pub async fn dashboard_stats(
    state: web::Data<AppState>,
    query: web::Query<StatsQuery>,
) -> Result<HttpResponse> {
    let email = match query.email.as_deref().map(str::trim) {
        Some(value) if !value.is_empty() => value,
        _ => return Err(AppError::BadRequest("email is required".to_string())),
    };

    let (total, published, draft) = state.posts().author_stats(email).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "totalPosts": total,
        "publishedPosts": published,
        "draftPosts": draft,
    })))
}
