//! Route configuration
//!
//! Centralized route setup; each resource keeps its handlers in its own
//! module under `handlers/`.

use crate::handlers;
use actix_web::{web, HttpRequest, HttpResponse};

/// Configure all routes for the application
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(handlers::health::banner))
        .service(
            web::scope("/api")
                .route("/health", web::get().to(handlers::health::health))
                .route("/me", web::get().to(handlers::users::me))
                .service(
                    web::scope("/posts")
                        .route("", web::get().to(handlers::posts::list_posts))
                        .route("", web::post().to(handlers::posts::create_post))
                        // Static segments before the `{id}` catch-all.
                        .route("/count", web::get().to(handlers::posts::count_posts))
                        .route("/vote/{id}", web::put().to(handlers::posts::vote_post))
                        .route(
                            "/comment/{id}",
                            web::post().to(handlers::posts::comment_post),
                        )
                        .route("/{id}", web::get().to(handlers::posts::get_post))
                        .route("/{id}", web::put().to(handlers::posts::update_post))
                        .route("/{id}", web::delete().to(handlers::posts::delete_post)),
                )
                .route(
                    "/dashboard/stats",
                    web::get().to(handlers::stats::dashboard_stats),
                )
                .service(
                    web::scope("/tags")
                        .route("", web::get().to(handlers::tags::list_tags))
                        .route("/{tag}", web::get().to(handlers::tags::posts_by_tag)),
                )
                .service(
                    web::scope("/users")
                        .route("", web::get().to(handlers::users::list_users))
                        .route(
                            "/make-admin/{uid}",
                            web::patch().to(handlers::users::make_admin),
                        )
                        .route(
                            "/membership/{uid}",
                            web::patch().to(handlers::users::update_membership),
                        ),
                )
                .service(
                    web::scope("/announcements")
                        .route("", web::get().to(handlers::announcements::list_announcements))
                        .route(
                            "",
                            web::post().to(handlers::announcements::create_announcement),
                        )
                        .route(
                            "/{id}",
                            web::delete().to(handlers::announcements::delete_announcement),
                        ),
                )
                .service(
                    web::scope("/reports")
                        .route("", web::post().to(handlers::reports::create_report))
                        .route("", web::get().to(handlers::reports::list_reports))
                        .route(
                            "/{id}",
                            web::patch().to(handlers::reports::apply_report_action),
                        ),
                ),
        )
        .default_service(web::route().to(not_found));
}

/// Fallback for unmatched routes
async fn not_found(req: HttpRequest) -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "error": "route not found",
        "path": req.path(),
        "method": req.method().as_str(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};

    #[actix_web::test]
    async fn test_banner_route() {
        let app = test::init_service(App::new().configure(configure_routes)).await;

        let req = test::TestRequest::get().uri("/").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let body = test::read_body(resp).await;
        assert_eq!(&body[..], b"Hello from ForumFlow!");
    }

    #[actix_web::test]
    async fn test_unmatched_route_returns_structured_404() {
        let app = test::init_service(App::new().configure(configure_routes)).await;

        let req = test::TestRequest::get().uri("/api/nope").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);

        let json: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(json["path"], "/api/nope");
        assert_eq!(json["method"], "GET");
        assert_eq!(json["error"], "route not found");
    }
}
