use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// JWT claims for access tokens. `sub` is the user's ObjectId hex string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub exp: usize,
}

/// Claims for short-lived password reset tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetClaims {
    pub sub: String,
    pub purpose: String,
    pub exp: usize,
}

const RESET_PURPOSE: &str = "password_reset";

pub fn create_access_token(
    secret: &str,
    user_id: &str,
    email: &str,
    ttl_secs: i64,
) -> anyhow::Result<String> {
    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        exp: (chrono::Utc::now() + chrono::Duration::seconds(ttl_secs)).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

pub fn create_reset_token(secret: &str, user_id: &str, ttl_secs: i64) -> anyhow::Result<String> {
    let claims = ResetClaims {
        sub: user_id.to_string(),
        purpose: RESET_PURPOSE.to_string(),
        exp: (chrono::Utc::now() + chrono::Duration::seconds(ttl_secs)).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

/// Validate a reset token and return the user id it was issued for
pub fn verify_reset_token(secret: &str, token: &str) -> Option<String> {
    let token_data = decode::<ResetClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .ok()?;

    if token_data.claims.purpose != RESET_PURPOSE {
        return None;
    }

    Some(token_data.claims.sub)
}

/// Extract and validate JWT from Authorization header.
///
/// Rejections reuse `ApiError` so the error body matches the handlers'.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthorized("Expected a bearer token".to_string()))?;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(state.config.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| ApiError::Unauthorized("Invalid or expired token".to_string()))?;

    req.extensions_mut().insert(token_data.claims);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_token_roundtrip() {
        let token = create_access_token("secret", "507f1f77bcf86cd799439011", "a@b.com", 60)
            .unwrap();

        let data = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"secret"),
            &Validation::default(),
        )
        .unwrap();

        assert_eq!(data.claims.sub, "507f1f77bcf86cd799439011");
        assert_eq!(data.claims.email, "a@b.com");
    }

    #[test]
    fn test_reset_token_roundtrip() {
        let token = create_reset_token("secret", "507f1f77bcf86cd799439011", 60).unwrap();
        let sub = verify_reset_token("secret", &token).unwrap();
        assert_eq!(sub, "507f1f77bcf86cd799439011");
    }

    #[test]
    fn test_reset_token_rejects_access_token() {
        let token = create_access_token("secret", "u1", "a@b.com", 60).unwrap();
        assert!(verify_reset_token("secret", &token).is_none());
    }

    #[test]
    fn test_reset_token_wrong_secret() {
        let token = create_reset_token("secret", "u1", 60).unwrap();
        assert!(verify_reset_token("other", &token).is_none());
    }
}
