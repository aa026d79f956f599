use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use validator::Validate;

use crate::config::Config;
use crate::db::user_repo;
use crate::error::AppError;
use crate::models::UserResponse;
use crate::security::{jwt, password};

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 3, max = 50))]
    pub username: String,

    #[validate(length(min = 8))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

/// Register a new account
/// POST /api/auth/register
pub async fn register(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    payload: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    // Pre-checks give readable 409s; the UNIQUE constraints stay authoritative
    if user_repo::find_by_email(pool.get_ref(), &payload.email)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }
    if user_repo::find_by_username(pool.get_ref(), &payload.username)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("Username already taken".to_string()));
    }

    let password_hash = password::hash_password(&payload.password)?;

    let user =
        user_repo::create_user(pool.get_ref(), &payload.email, &payload.username, &password_hash)
            .await?;

    let token = jwt::generate_token(
        user.id,
        &user.email,
        &user.username,
        config.jwt.access_token_ttl,
    )
    .map_err(|e| AppError::Internal(e.to_string()))?;

    tracing::info!(user_id = %user.id, "user registered");

    Ok(HttpResponse::Created().json(AuthResponse {
        token,
        user: UserResponse::from(&user),
    }))
}

/// Log in with email and password
/// POST /api/auth/login
pub async fn login(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    // Same error for unknown email and bad password
    let user = user_repo::find_by_email(pool.get_ref(), &payload.email)
        .await?
        .ok_or_else(|| AppError::Authentication("Invalid email or password".to_string()))?;

    password::verify_password(&payload.password, &user.password_hash)?;

    let token = jwt::generate_token(
        user.id,
        &user.email,
        &user.username,
        config.jwt.access_token_ttl,
    )
    .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        token,
        user: UserResponse::from(&user),
    }))
}
