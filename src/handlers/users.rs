use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use futures_util::StreamExt;
use sqlx::PgPool;
use validator::ValidateEmail;

use crate::db::user_repo;
use crate::error::AppError;
use crate::middleware::AuthenticatedUser;
use crate::models::UserResponse;
use crate::services::AvatarStore;

const MAX_AVATAR_SIZE: usize = 5 * 1024 * 1024; // 5 MB
const MAX_USERNAME_LENGTH: usize = 50;
const MIN_USERNAME_LENGTH: usize = 3;

/// Parsed fields of the profile-update form
#[derive(Default)]
struct ProfileForm {
    username: Option<String>,
    email: Option<String>,
    avatar: Option<(Vec<u8>, String)>,
}

async fn read_form(mut payload: Multipart) -> Result<ProfileForm, AppError> {
    let mut form = ProfileForm::default();

    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| AppError::BadRequest(format!("Multipart error: {}", e)))?;

        let field_name = field.name().to_string();
        let content_type = field.content_type().to_string();

        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            let bytes =
                chunk.map_err(|e| AppError::BadRequest(format!("Multipart read error: {}", e)))?;
            data.extend_from_slice(&bytes);
            if field_name == "profilePic" && data.len() > MAX_AVATAR_SIZE {
                return Err(AppError::Validation(format!(
                    "Profile picture exceeds maximum size ({} bytes)",
                    MAX_AVATAR_SIZE
                )));
            }
        }

        match field_name.as_str() {
            "username" => {
                let value = String::from_utf8_lossy(&data).trim().to_string();
                if !value.is_empty() {
                    form.username = Some(value);
                }
            }
            "email" => {
                let value = String::from_utf8_lossy(&data).trim().to_string();
                if !value.is_empty() {
                    form.email = Some(value);
                }
            }
            "profilePic" => {
                if !data.is_empty() {
                    form.avatar = Some((data, content_type));
                }
            }
            _ => {
                // Ignore unknown fields
            }
        }
    }

    Ok(form)
}

/// Update the caller's profile; binary avatar data goes to the asset host
/// PUT /api/users/profile  (multipart: username, email, profilePic)
pub async fn update_profile(
    user: AuthenticatedUser,
    pool: web::Data<PgPool>,
    store: web::Data<AvatarStore>,
    payload: Multipart,
) -> Result<HttpResponse, AppError> {
    let form = read_form(payload).await?;

    if let Some(username) = &form.username {
        if username.len() < MIN_USERNAME_LENGTH || username.len() > MAX_USERNAME_LENGTH {
            return Err(AppError::Validation(format!(
                "Username must be between {} and {} characters",
                MIN_USERNAME_LENGTH, MAX_USERNAME_LENGTH
            )));
        }
        if let Some(existing) = user_repo::find_by_username(pool.get_ref(), username).await? {
            if existing.id != user.0 {
                return Err(AppError::Conflict("Username already taken".to_string()));
            }
        }
    }

    if let Some(email) = &form.email {
        if !email.validate_email() {
            return Err(AppError::Validation("Invalid email address".to_string()));
        }
        if let Some(existing) = user_repo::find_by_email(pool.get_ref(), email).await? {
            if existing.id != user.0 {
                return Err(AppError::Conflict("Email already registered".to_string()));
            }
        }
    }

    // Upload before the row update so a storage failure leaves the profile untouched
    let avatar_url = match form.avatar {
        Some((bytes, content_type)) => {
            let url = store.upload_avatar(user.0, bytes, &content_type).await?;
            tracing::debug!(user_id = %user.0, "avatar uploaded");
            Some(url)
        }
        None => None,
    };

    let updated = user_repo::update_profile(
        pool.get_ref(),
        user.0,
        form.username.as_deref(),
        form.email.as_deref(),
        avatar_url.as_deref(),
    )
    .await?
    .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(HttpResponse::Ok().json(UserResponse::from(&updated)))
}
