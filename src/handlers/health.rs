//! Service banner and health reporting

use crate::app_state::AppState;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use mongodb::bson::doc;

/// Service banner. GET /
pub async fn banner() -> HttpResponse {
    HttpResponse::Ok().body("Hello from ForumFlow!")
}

/// Health summary with a live database ping. GET /api/health
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    match state.db.run_command(doc! { "ping": 1 }).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "database": "connected",
            "timestamp": Utc::now(),
        })),
        Err(e) => {
            tracing::warn!(error = %e, "health check ping failed");
            HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "status": "degraded",
                "database": "disconnected",
                "timestamp": Utc::now(),
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[tokio::test]
    async fn test_banner() {
        let response = banner().await;
        let body = to_bytes(response.into_body()).await.unwrap();
        assert_eq!(&body[..], b"Hello from ForumFlow!");
    }
}
