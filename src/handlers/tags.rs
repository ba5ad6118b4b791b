//! Tag directory handlers

use crate::app_state::AppState;
use crate::db::PostFilter;
use crate::error::Result;
use crate::handlers::posts::{resolve_sort, total_pages, Pagination, PostListResponse};
use actix_web::{web, HttpResponse};
use serde::Deserialize;

/// Distinct non-empty tags across all posts. GET /api/tags
pub async fn list_tags(state: web::Data<AppState>) -> Result<HttpResponse> {
    let tags = state.posts().distinct_tags().await?;
    Ok(HttpResponse::Ok().json(tags))
}

#[derive(Debug, Deserialize)]
pub struct TagPostsQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub sort: Option<String>,
}

/// Posts carrying one exact tag, using the listing pagination contract.
/// GET /api/tags/{tag}
pub async fn posts_by_tag(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<TagPostsQuery>,
) -> Result<HttpResponse> {
    let pagination = Pagination::resolve(query.page, query.limit)?;
    let sort = resolve_sort(query.sort.as_deref())?;
    let filter = PostFilter {
        author_email: None,
        tag: Some(path.into_inner()),
    };

    let (posts, total) = state
        .posts()
        .list(&filter, pagination.page, pagination.limit, sort)
        .await?;

    Ok(HttpResponse::Ok().json(PostListResponse {
        posts,
        total,
        page: pagination.page,
        pages: total_pages(total, pagination.limit),
    }))
}
