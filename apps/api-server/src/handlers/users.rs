//! User account handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use nutrivision_core::DomainError;
use nutrivision_core::domain::User;
use nutrivision_core::validation::{
    mask_email, validate_email, validate_password, validate_username,
};
use nutrivision_shared::dto::{RegisterUserRequest, UpdateUserRequest, UserResponse};

use crate::middleware::auth::CurrentUser;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Public view of a user.
pub(crate) fn user_response(user: &User) -> UserResponse {
    UserResponse {
        id: user.id.to_string(),
        username: user.username.clone(),
        email: user.email.clone(),
        diet: user.profile.diet.clone(),
        health_conditions: user.profile.health_conditions.clone(),
        allergies: user.profile.allergies.clone(),
        favorite_dishes: user.profile.favorite_dishes.clone(),
        disliked_dishes: user.profile.disliked_dishes.clone(),
        created_at: user.created_at.to_rfc3339(),
        updated_at: user.updated_at.to_rfc3339(),
    }
}

fn parse_user_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::BadRequest("malformatted id".to_string()))
}

/// Current stored state of a user.
pub(crate) async fn load_user(state: &AppState, id: Uuid) -> AppResult<User> {
    state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::UserNotFound { id }.into())
}

/// Only the account owner may modify or delete it.
fn ensure_self(current: &CurrentUser, id: Uuid) -> AppResult<()> {
    if current.user.id != id {
        return Err(DomainError::Forbidden("You can only modify your own account".to_string()).into());
    }
    Ok(())
}

/// Reject a username or email already used by someone other than `owner`.
async fn ensure_available(
    state: &AppState,
    username: &str,
    email: &str,
    owner: Option<Uuid>,
) -> AppResult<()> {
    let by_name = state.users.find_by_username(username).await?;
    let by_email = state.users.find_by_email(email).await?;

    let clash = [by_name, by_email]
        .into_iter()
        .flatten()
        .any(|existing| Some(existing.id) != owner);

    if clash {
        return Err(DomainError::DuplicateUser.into());
    }
    Ok(())
}

/// POST /api/users, POST /api/register
pub async fn create_user(
    state: web::Data<AppState>,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    validate_username(&req.username)?;
    validate_email(&req.email)?;
    validate_password(&req.password)?;

    let username = req.username.trim();
    let email = req.email.trim();
    ensure_available(&state, username, email, None).await?;

    let password_hash = state.passwords.hash(&req.password)?;
    let saved = state
        .users
        .save(User::new(username, email, password_hash))
        .await?;

    tracing::info!(user_id = %saved.id, email = %mask_email(&saved.email), "User registered");

    Ok(HttpResponse::Created().json(user_response(&saved)))
}

/// GET /api/users - the authenticated user's own document
pub async fn get_current_user(current: CurrentUser) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(user_response(&current.user)))
}

/// PUT /api/users/{id}
pub async fn update_user(
    state: web::Data<AppState>,
    current: CurrentUser,
    path: web::Path<String>,
    body: web::Json<UpdateUserRequest>,
) -> AppResult<HttpResponse> {
    let id = parse_user_id(&path.into_inner())?;
    ensure_self(&current, id)?;

    let req = body.into_inner();
    if let Some(username) = &req.username {
        validate_username(username)?;
    }
    if let Some(email) = &req.email {
        validate_email(email)?;
    }
    let password_hash = match &req.password {
        Some(password) => {
            validate_password(password)?;
            Some(state.passwords.hash(password)?)
        }
        None => None,
    };

    // Apply onto the stored record, not the copy loaded by the token gate.
    let mut user = load_user(&state, id).await?;
    if let Some(username) = req.username {
        user.username = username.trim().to_string();
    }
    if let Some(email) = req.email {
        user.email = email.trim().to_string();
    }
    ensure_available(&state, &user.username, &user.email, Some(user.id)).await?;
    if let Some(hash) = password_hash {
        user.password_hash = hash;
    }

    user.touch();
    let saved = state.users.save(user).await?;
    tracing::info!(user_id = %saved.id, "User updated");

    Ok(HttpResponse::Ok().json(user_response(&saved)))
}

/// DELETE /api/users/{id}
pub async fn delete_user(
    state: web::Data<AppState>,
    current: CurrentUser,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_user_id(&path.into_inner())?;
    ensure_self(&current, id)?;

    state.users.delete(id).await?;
    state
        .blacklist
        .revoke(&current.token, current.token_expires_at)
        .await?;

    tracing::info!(user_id = %id, "User deleted");
    Ok(HttpResponse::NoContent().finish())
}

/// DELETE /api/users - maintenance route, disabled unless configured
pub async fn delete_all_users(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    if !state.settings.allow_bulk_delete {
        return Err(AppError::Forbidden(
            "Bulk deletion is disabled".to_string(),
        ));
    }

    let removed = state.users.delete_all().await?;
    tracing::warn!(removed, "Bulk user deletion performed");

    Ok(HttpResponse::NoContent().finish())
}
