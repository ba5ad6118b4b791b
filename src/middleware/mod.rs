//! Request authentication for the API
//!
//! `AuthenticatedUser` is an extractor rather than wrapped middleware so
//! that public and protected routes can live in the same scope: a
//! handler opts into authentication by taking the extractor as an
//! argument. Extraction verifies the bearer credential and syncs the
//! identity into the user directory before the handler runs.

pub mod permissions;

pub use permissions::{AuthPolicy, Capability};

use crate::app_state::AppState;
use crate::error::AppError;
use crate::identity::VerifiedIdentity;
use actix_web::http::header;
use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;

/// A caller whose bearer credential was verified and whose directory
/// record was refreshed for this request.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub VerifiedIdentity);

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let state = req
                .app_data::<web::Data<AppState>>()
                .cloned()
                .ok_or_else(|| AppError::Internal("application state missing".to_string()))?;

            let header_value = req
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|value| value.to_str().ok());
            let token = parse_bearer(header_value)?;

            let identity = state.verifier.verify(token).await?;
            state.users().sync(&identity).await?;

            Ok(AuthenticatedUser(identity))
        })
    }
}

/// Pull the token out of an `Authorization: Bearer <token>` header.
pub fn parse_bearer(header: Option<&str>) -> Result<&str, AppError> {
    let header =
        header.ok_or_else(|| AppError::Unauthorized("missing authorization header".to_string()))?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("invalid authorization scheme".to_string()))?;

    if token.trim().is_empty() {
        return Err(AppError::Unauthorized("empty bearer token".to_string()));
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::MockIdentityVerifier;
    use crate::routes::configure_routes;
    use actix_web::{test as aw_test, App};
    use std::sync::Arc;

    async fn test_state(verifier: MockIdentityVerifier) -> web::Data<AppState> {
        // A lazily-connecting client; these tests never issue a query.
        let client = mongodb::Client::with_uri_str("mongodb://localhost:27017")
            .await
            .unwrap();
        web::Data::new(AppState::new(
            client.database("forumflow_test"),
            Arc::new(verifier),
        ))
    }

    #[actix_web::test]
    async fn test_protected_route_without_header_is_unauthorized() {
        let mut verifier = MockIdentityVerifier::new();
        verifier.expect_verify().never();
        let state = test_state(verifier).await;

        let app =
            aw_test::init_service(App::new().app_data(state).configure(configure_routes)).await;
        let req = aw_test::TestRequest::get().uri("/api/me").to_request();
        let resp = aw_test::call_service(&app, req).await;

        assert_eq!(resp.status(), actix_web::http::StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_rejected_credential_is_forbidden() {
        let mut verifier = MockIdentityVerifier::new();
        verifier.expect_verify().returning(|_| {
            Err(AppError::Forbidden(
                "credential rejected by identity provider".to_string(),
            ))
        });
        let state = test_state(verifier).await;

        let app =
            aw_test::init_service(App::new().app_data(state).configure(configure_routes)).await;
        let req = aw_test::TestRequest::get()
            .uri("/api/me")
            .insert_header(("Authorization", "Bearer expired-token"))
            .to_request();
        let resp = aw_test::call_service(&app, req).await;

        assert_eq!(resp.status(), actix_web::http::StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_parse_bearer_accepts_well_formed_header() {
        assert_eq!(parse_bearer(Some("Bearer abc.def.ghi")).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_parse_bearer_rejects_missing_header() {
        assert!(matches!(
            parse_bearer(None),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_parse_bearer_rejects_wrong_scheme() {
        assert!(matches!(
            parse_bearer(Some("Basic dXNlcjpwYXNz")),
            Err(AppError::Unauthorized(_))
        ));
        assert!(matches!(
            parse_bearer(Some("bearer lowercase-scheme")),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_parse_bearer_rejects_empty_token() {
        assert!(matches!(
            parse_bearer(Some("Bearer ")),
            Err(AppError::Unauthorized(_))
        ));
    }
}
