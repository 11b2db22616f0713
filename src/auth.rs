//! Stateless bearer-token auth. Tokens are HS256 JWTs carrying the user
//! name and a one-hour expiry; there is no server-side revocation list.

use axum::http::HeaderMap;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::errors::ApiError;

const TOKEN_TTL_HOURS: i64 = 1;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user: String,
    pub exp: i64,
}

pub fn issue_token(user: &str, secret: &str) -> Result<String, ApiError> {
    let claims = Claims {
        user: user.to_string(),
        exp: (Utc::now() + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(ApiError::internal)
}

pub fn verify_token(token: &str, secret: &str) -> Result<String, ApiError> {
    let decoded = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|err| match err.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => ApiError::TokenExpired,
        _ => ApiError::InvalidToken,
    })?;
    Ok(decoded.claims.user)
}

/// Extracts and verifies the `Authorization: Bearer <token>` header,
/// returning the authenticated user name.
pub fn require_bearer(headers: &HeaderMap, secret: &str) -> Result<String, ApiError> {
    let token = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split_whitespace().nth(1))
        .unwrap_or("");

    if token.is_empty() {
        return Err(ApiError::MissingToken);
    }

    verify_token(token, secret)
}
