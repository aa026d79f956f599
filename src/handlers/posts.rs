use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{like_repo, post_repo};
use crate::error::AppError;
use crate::middleware::AuthenticatedUser;
use crate::models::{LikeStatusResponse, PostResponse};

// ============================================
// Request/Response Structs
// ============================================

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListPostsQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// ============================================
// Validation Constants
// ============================================

const MAX_TITLE_LENGTH: usize = 200;
const MAX_CONTENT_LENGTH: usize = 50_000;
const DEFAULT_PAGE_SIZE: i64 = 10;
const MAX_PAGE_SIZE: i64 = 100;

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

fn parse_id(raw: &str, what: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::BadRequest(format!("Invalid {} ID format", what)))
}

/// Normalize pagination params to (limit, offset).
/// page is 1-based; out-of-range values fall back to sane bounds.
/// The offset saturates, so an absurd page yields an empty page
/// instead of an arithmetic overflow or a negative OFFSET.
fn pagination(query: &ListPostsQuery) -> (i64, i64) {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    (limit, (page - 1).saturating_mul(limit))
}

// ============================================
// Handler Functions
// ============================================

/// Create a new post
/// POST /api/posts
pub async fn create_post(
    user: AuthenticatedUser,
    pool: web::Data<PgPool>,
    req: web::Json<CreatePostRequest>,
) -> Result<HttpResponse, AppError> {
    if is_blank(&req.title) || is_blank(&req.content) {
        return Err(AppError::Validation(
            "Title and content are required".to_string(),
        ));
    }
    if req.title.len() > MAX_TITLE_LENGTH {
        return Err(AppError::Validation(format!(
            "Title exceeds maximum allowed length ({} characters)",
            MAX_TITLE_LENGTH
        )));
    }
    if req.content.len() > MAX_CONTENT_LENGTH {
        return Err(AppError::Validation(format!(
            "Content exceeds maximum allowed length ({} characters)",
            MAX_CONTENT_LENGTH
        )));
    }

    let post = post_repo::create_post(pool.get_ref(), user.0, &req.title, &req.content).await?;

    tracing::debug!(post_id = %post.id, author_id = %user.0, "post created");

    // A fresh post has no likes; skip the liker fetch
    let row = post_repo::find_post_with_author(pool.get_ref(), post.id)
        .await?
        .ok_or_else(|| AppError::Internal("Post vanished after insert".to_string()))?;

    Ok(HttpResponse::Created().json(row.into_response(Vec::new())))
}

/// List posts with pagination, newest first
/// GET /api/posts?page=1&limit=10
pub async fn list_posts(
    pool: web::Data<PgPool>,
    query: web::Query<ListPostsQuery>,
) -> Result<HttpResponse, AppError> {
    let (limit, offset) = pagination(&query);

    let rows = post_repo::list_posts(pool.get_ref(), limit, offset).await?;

    // One batched liker fetch for the whole page
    let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
    let mut likers = like_repo::get_liker_ids_for_posts(pool.get_ref(), &ids).await?;

    let posts: Vec<PostResponse> = rows
        .into_iter()
        .map(|row| {
            let likes = likers.remove(&row.id).unwrap_or_default();
            row.into_response(likes)
        })
        .collect();

    Ok(HttpResponse::Ok().json(posts))
}

/// Get a single post by ID
/// GET /api/posts/{id}
pub async fn get_post(
    pool: web::Data<PgPool>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let post_id = parse_id(&path.into_inner(), "post")?;

    let row = post_repo::find_post_with_author(pool.get_ref(), post_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    let likes = like_repo::get_liker_ids(pool.get_ref(), post_id).await?;

    Ok(HttpResponse::Ok().json(row.into_response(likes)))
}

/// Update a post (owner only)
/// PUT /api/posts/{id}
pub async fn update_post(
    user: AuthenticatedUser,
    pool: web::Data<PgPool>,
    path: web::Path<String>,
    req: web::Json<UpdatePostRequest>,
) -> Result<HttpResponse, AppError> {
    let post_id = parse_id(&path.into_inner(), "post")?;

    if let Some(title) = &req.title {
        if is_blank(title) || title.len() > MAX_TITLE_LENGTH {
            return Err(AppError::Validation("Invalid title".to_string()));
        }
    }
    if let Some(content) = &req.content {
        if is_blank(content) || content.len() > MAX_CONTENT_LENGTH {
            return Err(AppError::Validation("Invalid content".to_string()));
        }
    }

    let post = post_repo::find_post_by_id(pool.get_ref(), post_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    if post.author_id != user.0 {
        return Err(AppError::Authorization(
            "You can only edit your own posts".to_string(),
        ));
    }

    post_repo::update_post(
        pool.get_ref(),
        post_id,
        req.title.as_deref(),
        req.content.as_deref(),
    )
    .await?
    .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    let row = post_repo::find_post_with_author(pool.get_ref(), post_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;
    let likes = like_repo::get_liker_ids(pool.get_ref(), post_id).await?;

    Ok(HttpResponse::Ok().json(row.into_response(likes)))
}

/// Delete a post (owner only)
/// DELETE /api/posts/{id}
pub async fn delete_post(
    user: AuthenticatedUser,
    pool: web::Data<PgPool>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let post_id = parse_id(&path.into_inner(), "post")?;

    let post = post_repo::find_post_by_id(pool.get_ref(), post_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    if post.author_id != user.0 {
        return Err(AppError::Authorization(
            "You can only delete your own posts".to_string(),
        ));
    }

    post_repo::delete_post(pool.get_ref(), post_id).await?;

    tracing::debug!(post_id = %post_id, "post deleted");

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Post deleted successfully".to_string(),
    }))
}

/// Toggle the caller's like on a post
/// PUT /api/posts/{id}/like
pub async fn toggle_like(
    user: AuthenticatedUser,
    pool: web::Data<PgPool>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let post_id = parse_id(&path.into_inner(), "post")?;

    post_repo::find_post_by_id(pool.get_ref(), post_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    let (liked_by_user, likes_count) = like_repo::toggle_like(pool.get_ref(), post_id, user.0).await?;

    Ok(HttpResponse::Ok().json(LikeStatusResponse {
        likes_count,
        liked_by_user,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults() {
        let q = ListPostsQuery {
            page: None,
            limit: None,
        };
        assert_eq!(pagination(&q), (DEFAULT_PAGE_SIZE, 0));
    }

    #[test]
    fn test_pagination_second_page() {
        let q = ListPostsQuery {
            page: Some(2),
            limit: Some(5),
        };
        assert_eq!(pagination(&q), (5, 5));
    }

    #[test]
    fn test_pagination_clamps_bad_input() {
        let q = ListPostsQuery {
            page: Some(0),
            limit: Some(0),
        };
        assert_eq!(pagination(&q), (1, 0));

        let q = ListPostsQuery {
            page: Some(-3),
            limit: Some(10_000),
        };
        assert_eq!(pagination(&q), (MAX_PAGE_SIZE, 0));
    }

    #[test]
    fn test_pagination_huge_page_saturates() {
        let q = ListPostsQuery {
            page: Some(i64::MAX),
            limit: Some(100),
        };
        let (limit, offset) = pagination(&q);
        assert_eq!(limit, 100);
        assert_eq!(offset, i64::MAX);
    }

    #[test]
    fn test_blank_detection() {
        assert!(is_blank(""));
        assert!(is_blank("   \t\n"));
        assert!(!is_blank("Hello"));
    }

    #[test]
    fn test_parse_id_rejects_garbage() {
        assert!(parse_id("not-a-uuid", "post").is_err());
        assert!(parse_id("550e8400-e29b-41d4-a716-446655440000", "post").is_ok());
    }
}
