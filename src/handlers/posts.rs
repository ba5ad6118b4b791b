//! Post handlers - HTTP endpoints for post operations

use crate::app_state::AppState;
use crate::db::PostFilter;
use crate::error::{AppError, Result};
use crate::models::{Comment, Post, PostStatus, SortMode, VoteType};
use actix_web::{web, HttpResponse};
use chrono::Utc;
use mongodb::bson::{oid::ObjectId, Document};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 5;

#[derive(Debug, Deserialize)]
pub struct ListPostsQuery {
    pub email: Option<String>,
    pub tag: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub sort: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PostListResponse {
    pub posts: Vec<Post>,
    pub total: u64,
    pub page: i64,
    pub pages: u64,
}

/// Resolved page/limit pair after validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Pagination {
    pub page: i64,
    pub limit: i64,
}

impl Pagination {
    pub(crate) fn resolve(page: Option<i64>, limit: Option<i64>) -> Result<Self> {
        let page = page.unwrap_or(DEFAULT_PAGE);
        let limit = limit.unwrap_or(DEFAULT_LIMIT);

        if page < 1 {
            return Err(AppError::BadRequest(
                "page must be a positive integer".to_string(),
            ));
        }
        if limit < 1 {
            return Err(AppError::BadRequest(
                "limit must be a positive integer".to_string(),
            ));
        }
        Ok(Self { page, limit })
    }
}

pub(crate) fn total_pages(total: u64, limit: i64) -> u64 {
    let limit = limit as u64;
    (total + limit - 1) / limit
}

pub(crate) fn resolve_sort(sort: Option<&str>) -> Result<SortMode> {
    match sort {
        None => Ok(SortMode::Recent),
        Some(value) => SortMode::parse(value).ok_or_else(|| {
            AppError::BadRequest("sort must be one of: recent, popularity".to_string())
        }),
    }
}

pub(crate) fn parse_post_id(raw: &str) -> Result<ObjectId> {
    ObjectId::parse_str(raw)
        .map_err(|_| AppError::BadRequest(format!("invalid post id: {}", raw)))
}

/// List posts with optional author/tag filters, pagination, and sort
/// mode. GET /api/posts
pub async fn list_posts(
    state: web::Data<AppState>,
    query: web::Query<ListPostsQuery>,
) -> Result<HttpResponse> {
    let pagination = Pagination::resolve(query.page, query.limit)?;
    let sort = resolve_sort(query.sort.as_deref())?;
    let filter = PostFilter {
        author_email: query.email.clone(),
        tag: query.tag.clone(),
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

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub author_image: Option<String>,
    pub author_name: Option<String>,
    pub author_email: Option<String>,
    pub post_title: Option<String>,
    pub post_description: Option<String>,
    pub tag: Option<String>,
}

fn required_trimmed(value: Option<&str>, field: &str) -> Result<String> {
    match value.map(str::trim) {
        Some(trimmed) if !trimmed.is_empty() => Ok(trimmed.to_string()),
        _ => Err(AppError::BadRequest(format!("{} is required", field))),
    }
}

/// Create a post. POST /api/posts
pub async fn create_post(
    state: web::Data<AppState>,
    req: web::Json<CreatePostRequest>,
) -> Result<HttpResponse> {
    let post_title = required_trimmed(req.post_title.as_deref(), "postTitle")?;
    let post_description = required_trimmed(req.post_description.as_deref(), "postDescription")?;

    let post = Post {
        id: None,
        author_image: req.author_image.clone().unwrap_or_default(),
        author_name: req.author_name.clone().unwrap_or_default(),
        author_email: req.author_email.clone().unwrap_or_default(),
        post_title,
        post_description,
        tag: req.tag.clone().unwrap_or_default(),
        up_vote: 0,
        down_vote: 0,
        comments: vec![],
        created_at: Utc::now(),
        updated_at: None,
        status: Some(PostStatus::Published),
    };

    let post_id = state.posts().create(&post).await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "post created",
        "postId": post_id,
    })))
}

/// Fetch a single post. GET /api/posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let id = parse_post_id(&path)?;

    match state.posts().find_by_id(id).await? {
        Some(post) => Ok(HttpResponse::Ok().json(post)),
        None => Err(AppError::NotFound(format!("post {} not found", path))),
    }
}

#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    #[serde(rename = "type")]
    pub kind: String,
}

/// Increment one vote counter. PUT /api/posts/vote/{id}
///
/// Repeat votes from the same identity are counted again; there is no
/// per-identity de-duplication.
pub async fn vote_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<VoteRequest>,
) -> Result<HttpResponse> {
    let id = parse_post_id(&path)?;
    let vote = VoteType::parse(&req.kind).ok_or_else(|| {
        AppError::BadRequest("type must be one of: upvote, downvote".to_string())
    })?;

    match state.posts().vote(id, vote).await? {
        Some(post) => Ok(HttpResponse::Ok().json(post)),
        None => Err(AppError::NotFound(format!("post {} not found", path))),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRequest {
    pub comment: Option<String>,
    pub user_id: Option<String>,
    pub user_name: Option<String>,
}

/// Append a comment to a post's thread. POST /api/posts/comment/{id}
pub async fn comment_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<CommentRequest>,
) -> Result<HttpResponse> {
    let id = parse_post_id(&path)?;
    let text = required_trimmed(req.comment.as_deref(), "comment")?;

    let comment = Comment {
        text,
        author_name: req.user_name.clone().unwrap_or_default(),
        author_id: req.user_id.clone().unwrap_or_default(),
        created_at: Utc::now(),
    };

    match state.posts().append_comment(id, &comment).await? {
        Some(post) => Ok(HttpResponse::Ok().json(post)),
        None => Err(AppError::NotFound(format!("post {} not found", path))),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    pub post_title: Option<String>,
    pub post_description: Option<String>,
    pub tag: Option<String>,
    pub author_image: Option<String>,
}

/// Update a post's editable fields. PUT /api/posts/{id}
pub async fn update_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<UpdatePostRequest>,
) -> Result<HttpResponse> {
    let id = parse_post_id(&path)?;

    let mut fields = Document::new();
    if let Some(title) = req.post_title.as_deref() {
        fields.insert("postTitle", required_trimmed(Some(title), "postTitle")?);
    }
    if let Some(description) = req.post_description.as_deref() {
        fields.insert(
            "postDescription",
            required_trimmed(Some(description), "postDescription")?,
        );
    }
    if let Some(tag) = &req.tag {
        fields.insert("tag", tag);
    }
    if let Some(image) = &req.author_image {
        fields.insert("authorImage", image);
    }

    if fields.is_empty() {
        return Err(AppError::BadRequest("no fields to update".to_string()));
    }
    fields.insert("updatedAt", mongodb::bson::to_bson(&Utc::now())?);

    if state.posts().update_fields(id, fields).await? {
        Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "post updated" })))
    } else {
        Err(AppError::NotFound(format!("post {} not found", path)))
    }
}

/// Delete a post. DELETE /api/posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let id = parse_post_id(&path)?;

    if state.posts().delete(id).await? {
        Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "post deleted" })))
    } else {
        Err(AppError::NotFound(format!("post {} not found", path)))
    }
}

#[derive(Debug, Deserialize)]
pub struct CountQuery {
    pub email: Option<String>,
}

/// Count posts, optionally for one author. GET /api/posts/count
pub async fn count_posts(
    state: web::Data<AppState>,
    query: web::Query<CountQuery>,
) -> Result<HttpResponse> {
    let count = state
        .posts()
        .count_by_author(query.email.as_deref())
        .await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "count": count })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults() {
        let pagination = Pagination::resolve(None, None).unwrap();
        assert_eq!(pagination.page, 1);
        assert_eq!(pagination.limit, 5);
    }

    #[test]
    fn test_pagination_rejects_non_positive_values() {
        assert!(Pagination::resolve(Some(0), None).is_err());
        assert!(Pagination::resolve(Some(-3), None).is_err());
        assert!(Pagination::resolve(None, Some(0)).is_err());
    }

    #[test]
    fn test_total_pages_is_exact_ceiling() {
        assert_eq!(total_pages(0, 5), 0);
        assert_eq!(total_pages(1, 5), 1);
        assert_eq!(total_pages(5, 5), 1);
        assert_eq!(total_pages(6, 5), 2);
        assert_eq!(total_pages(11, 5), 3);
        assert_eq!(total_pages(10, 3), 4);
    }

    #[test]
    fn test_resolve_sort() {
        assert_eq!(resolve_sort(None).unwrap(), SortMode::Recent);
        assert_eq!(resolve_sort(Some("recent")).unwrap(), SortMode::Recent);
        assert_eq!(
            resolve_sort(Some("popularity")).unwrap(),
            SortMode::Popularity
        );
        assert!(resolve_sort(Some("hot")).is_err());
    }

    #[test]
    fn test_required_trimmed() {
        assert_eq!(
            required_trimmed(Some("  Hello  "), "postTitle").unwrap(),
            "Hello"
        );
        assert!(required_trimmed(Some("   "), "postTitle").is_err());
        assert!(required_trimmed(None, "postTitle").is_err());
    }

    #[test]
    fn test_parse_post_id() {
        assert!(parse_post_id("507f1f77bcf86cd799439011").is_ok());
        assert!(parse_post_id("not-an-id").is_err());
    }
}
