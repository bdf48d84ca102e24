//! Authentication
//!
//! Two independent credentials are accepted, checked in order:
//! 1. `Authorization: Bearer <token>` signed with the JWT secret
//! 2. the signed `lexiai.sid` session cookie
//!
//! Handlers opt in through the [`AuthUser`] and [`OptionalUser`] extractors.

pub mod jwt;
pub mod password;
pub mod session;

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::RequestPartsExt;
use tower_cookies::Cookies;

use crate::db;
use crate::error::ApiError;
use crate::models::DbUser;
use crate::state::AppState;

/// A signed-in user whose account still exists; rejects with 401 otherwise
#[derive(Debug, Clone)]
pub struct AuthUser(pub DbUser);

/// The user id behind a valid credential, if the request carries one
///
/// The account itself is not loaded, so the id may refer to a deleted user.
#[derive(Debug, Clone)]
pub struct OptionalUser(pub Option<String>);

fn bearer_user_id(parts: &Parts, state: &AppState) -> Option<String> {
    let header = parts.headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
    let token = jwt::extract_bearer_token(header)?;

    match jwt::validate_access_token(token, &state.config.jwt_secret) {
        Ok(claims) => Some(claims.id),
        Err(e) => {
            tracing::debug!(error = %e, "rejected bearer token");
            None
        }
    }
}

async fn session_user_id(parts: &mut Parts, state: &AppState) -> Result<Option<String>, ApiError> {
    match parts.extract::<Cookies>().await {
        Ok(cookies) => session::current_user_id(state, &cookies).await,
        Err(_) => Ok(None),
    }
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        if let Some(id) = bearer_user_id(parts, state) {
            if let Some(user) = db::users::find_by_id(&state.db, &id).await? {
                return Ok(AuthUser(user));
            }
        }

        if let Some(id) = session_user_id(parts, state).await? {
            if let Some(user) = db::users::find_by_id(&state.db, &id).await? {
                return Ok(AuthUser(user));
            }
        }

        Err(ApiError::Unauthorized("Authentication required".to_string()))
    }
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for OptionalUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        if let Some(id) = bearer_user_id(parts, state) {
            return Ok(OptionalUser(Some(id)));
        }
        Ok(OptionalUser(session_user_id(parts, state).await?))
    }
}
