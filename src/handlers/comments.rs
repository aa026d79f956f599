use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;

use crate::db::{comment_repo, post_repo, user_repo};
use crate::error::AppError;
use crate::handlers::posts::MessageResponse;
use crate::middleware::AuthenticatedUser;
use crate::models::{AuthorInfo, CommentResponse};

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub text: String,
}

const MAX_COMMENT_LENGTH: usize = 5000;

fn parse_id(raw: &str, what: &str) -> Result<uuid::Uuid, AppError> {
    uuid::Uuid::parse_str(raw)
        .map_err(|_| AppError::BadRequest(format!("Invalid {} ID format", what)))
}

/// Add a comment to a post
/// POST /api/comments/{post_id}
pub async fn add_comment(
    user: AuthenticatedUser,
    pool: web::Data<PgPool>,
    path: web::Path<String>,
    req: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse, AppError> {
    let post_id = parse_id(&path.into_inner(), "post")?;

    if req.text.trim().is_empty() {
        return Err(AppError::Validation("Text is required".to_string()));
    }
    if req.text.len() > MAX_COMMENT_LENGTH {
        return Err(AppError::Validation(format!(
            "Comment exceeds maximum length of {}",
            MAX_COMMENT_LENGTH
        )));
    }

    // Comments only attach to posts that exist
    post_repo::find_post_by_id(pool.get_ref(), post_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    let comment = comment_repo::create_comment(pool.get_ref(), post_id, user.0, &req.text).await?;

    let commenter = user_repo::find_by_id(pool.get_ref(), user.0)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(HttpResponse::Created().json(CommentResponse {
        id: comment.id,
        post_id: comment.post_id,
        user: AuthorInfo {
            id: commenter.id,
            username: commenter.username,
            avatar_url: commenter.avatar_url,
        },
        text: comment.text,
        created_at: comment.created_at,
    }))
}

/// List comments for a post, oldest first
/// GET /api/comments/{post_id}
pub async fn list_comments(
    pool: web::Data<PgPool>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let post_id = parse_id(&path.into_inner(), "post")?;

    post_repo::find_post_by_id(pool.get_ref(), post_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    let comments = comment_repo::list_comments_by_post(pool.get_ref(), post_id).await?;

    let response: Vec<CommentResponse> = comments.into_iter().map(CommentResponse::from).collect();

    Ok(HttpResponse::Ok().json(response))
}

/// Delete a comment (author only)
/// DELETE /api/comments/{comment_id}
pub async fn delete_comment(
    user: AuthenticatedUser,
    pool: web::Data<PgPool>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let comment_id = parse_id(&path.into_inner(), "comment")?;

    let comment = comment_repo::find_comment_by_id(pool.get_ref(), comment_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;

    if comment.user_id != user.0 {
        return Err(AppError::Authorization(
            "You can only delete your own comments".to_string(),
        ));
    }

    comment_repo::delete_comment(pool.get_ref(), comment_id).await?;

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Comment deleted successfully".to_string(),
    }))
}
