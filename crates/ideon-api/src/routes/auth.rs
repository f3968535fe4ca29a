use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::{
    error::{ApiError, ApiResult},
    middleware::auth::{create_access_token, create_reset_token, verify_reset_token, Claims},
    state::AppState,
};
use ideon_persist::User;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub user: UserProfile,
}

impl AuthResponse {
    fn bearer(access_token: String, user: UserProfile) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
            user,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_hex(),
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
}

/// Register a new account
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let email = req.email.trim().to_ascii_lowercase();
    if !email.contains('@') {
        return Err(ApiError::Validation("Invalid email address".to_string()));
    }
    if req.password.len() < 8 {
        return Err(ApiError::Validation(
            "Password must be at least 8 characters".to_string(),
        ));
    }

    if state.persist.users().find_by_email(&email).await?.is_some() {
        return Err(ApiError::EmailTaken);
    }

    let password_hash = hash_password(&req.password)?;
    let user = state
        .persist
        .users()
        .create(User::new(
            email,
            req.first_name.trim(),
            req.last_name.trim(),
            password_hash,
        ))
        .await?;

    let token = issue_token(&state, &user)?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse::bearer(token, user.into())),
    ))
}

/// Exchange credentials for an access token
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let email = req.email.trim().to_ascii_lowercase();

    let user = state
        .persist
        .users()
        .find_by_email(&email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    verify_password(&req.password, &user.password_hash)
        .map_err(|_| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    let token = issue_token(&state, &user)?;

    Ok(Json(AuthResponse::bearer(token, user.into())))
}

/// Profile of the authenticated user
pub async fn me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<Json<UserProfile>> {
    let user_id = ObjectId::parse_str(&claims.sub)
        .map_err(|_| ApiError::Unauthorized("Invalid token subject".to_string()))?;

    let user = state
        .persist
        .users()
        .find_by_id(user_id)
        .await?
        .ok_or(ApiError::UserNotFound)?;

    Ok(Json(user.into()))
}

/// Start a password reset
///
/// The response does not reveal whether the email is registered.
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let email = req.email.trim().to_ascii_lowercase();

    if let Some(user) = state.persist.users().find_by_email(&email).await? {
        let token = create_reset_token(
            &state.config.jwt_secret,
            &user.id.to_hex(),
            state.config.auth.reset_token_ttl_secs,
        )
        .map_err(|_| ApiError::Internal)?;

        let reset_link = format!(
            "{}/reset-password?token={}",
            state.config.auth.frontend_base_url, token
        );

        // No mail transport is wired up; the link goes to the log sink
        // where a delivery worker can pick it up.
        tracing::info!(user_id = %user.id, reset_link, "Password reset requested");
    }

    Ok(Json(serde_json::json!({
        "message": "If that email is registered, a reset link has been sent"
    })))
}

/// Complete a password reset with a token from the reset link
pub async fn reset_password(
    State(state): State<AppState>,
    Json(req): Json<ResetPasswordRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    if req.new_password.len() < 8 {
        return Err(ApiError::Validation(
            "Password must be at least 8 characters".to_string(),
        ));
    }

    let user_id_hex = verify_reset_token(&state.config.jwt_secret, &req.token)
        .ok_or_else(|| ApiError::BadRequest("Invalid or expired reset token".to_string()))?;

    let user_id = ObjectId::parse_str(&user_id_hex)
        .map_err(|_| ApiError::BadRequest("Invalid reset token".to_string()))?;

    if state.persist.users().find_by_id(user_id).await?.is_none() {
        return Err(ApiError::UserNotFound);
    }

    let password_hash = hash_password(&req.new_password)?;
    state
        .persist
        .users()
        .set_password_hash(user_id, &password_hash)
        .await?;

    tracing::info!(user_id = %user_id, "Password reset completed");

    Ok(Json(serde_json::json!({
        "message": "Password updated"
    })))
}

fn issue_token(state: &AppState, user: &User) -> ApiResult<String> {
    create_access_token(
        &state.config.jwt_secret,
        &user.id.to_hex(),
        &user.email,
        state.config.auth.token_ttl_secs,
    )
    .map_err(|_| ApiError::Internal)
}

fn hash_password(password: &str) -> ApiResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| ApiError::Internal)?
        .to_string())
}

fn verify_password(password: &str, hash: &str) -> Result<(), argon2::password_hash::Error> {
    let parsed = PasswordHash::new(hash)?;
    Argon2::default().verify_password(password.as_bytes(), &parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("hunter22!").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("hunter22!", &hash).is_ok());
        assert!(verify_password("wrong", &hash).is_err());
    }
}
