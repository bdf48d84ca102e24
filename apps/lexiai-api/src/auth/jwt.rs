//! Bearer token generation and validation
//!
//! HS256 tokens signed with the configured secret. Claims carry the user's
//! id and email.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Access token expiry in seconds (7 days)
pub const ACCESS_TOKEN_EXPIRY: u64 = 7 * 24 * 60 * 60;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Invalid token format")]
    Malformed,

    #[error("Invalid signature")]
    BadSignature,

    #[error("Unsupported algorithm")]
    UnsupportedAlgorithm,

    #[error("Token expired")]
    Expired,

    #[error("Token encoding failed: {0}")]
    Encoding(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(error: jsonwebtoken::errors::Error) -> Self {
        match error.kind() {
            ErrorKind::InvalidSignature => TokenError::BadSignature,
            ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => TokenError::UnsupportedAlgorithm,
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Malformed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// User ID
    pub id: String,
    pub email: String,
    /// Issued at (Unix timestamp)
    pub iat: u64,
    /// Expiration (Unix timestamp)
    pub exp: u64,
}

fn sign(claims: &AccessTokenClaims, secret: &str) -> Result<String, TokenError> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| TokenError::Encoding(e.to_string()))
}

/// Issue a 7-day access token for a user
pub fn generate_access_token(user_id: &str, email: &str, secret: &str) -> Result<String, TokenError> {
    let now = chrono::Utc::now().timestamp() as u64;

    let claims = AccessTokenClaims {
        id: user_id.to_string(),
        email: email.to_string(),
        iat: now,
        exp: now + ACCESS_TOKEN_EXPIRY,
    };

    sign(&claims, secret)
}

/// Verify signature and expiry, returning the claims
pub fn validate_access_token(token: &str, secret: &str) -> Result<AccessTokenClaims, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    let data = decode::<AccessTokenClaims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)?;
    Ok(data.claims)
}

/// Extract Bearer token from an Authorization header value
pub fn extract_bearer_token(auth_header: Option<&str>) -> Option<&str> {
    auth_header
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
