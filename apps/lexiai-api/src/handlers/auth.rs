//! Signup, login, logout and the current-user profile

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use tower_cookies::Cookies;

use super::{required, ApiJson};
use crate::auth::{jwt, password, session, OptionalUser};
use crate::db;
use crate::error::ApiError;
use crate::models::{AuthResponse, DbUser, LoginRequest, MessageResponse, SignupRequest, UserProfile, UserSummary};
use crate::state::AppState;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

fn issue_token(state: &AppState, user: &DbUser) -> Result<String, ApiError> {
    jwt::generate_access_token(&user.id, &user.email, &state.config.jwt_secret)
        .map_err(|e| ApiError::Internal(e.into()))
}

/// Create an account, start a session and return a bearer token
pub async fn signup(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    ApiJson(req): ApiJson<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let (Some(email), Some(plain), Some(first_name), Some(last_name)) = (
        required(&req.email),
        req.password.as_deref().filter(|p| !p.is_empty()),
        required(&req.first_name),
        required(&req.last_name),
    ) else {
        return Err(ApiError::bad_request("All fields are required"));
    };

    password::validate_password_strength(plain).map_err(ApiError::bad_request)?;

    let email = password::normalize_email(email);
    if db::users::find_by_email(&state.db, &email).await?.is_some() {
        return Err(ApiError::bad_request("User with this email already exists"));
    }

    let cost = state.config.bcrypt_cost;
    let plain = plain.to_string();
    let password_hash = tokio::task::spawn_blocking(move || password::hash_password(&plain, cost))
        .await
        .map_err(|e| ApiError::Internal(e.into()))?
        .map_err(|e| ApiError::Internal(e.into()))?;

    let user = db::users::create(
        &state.db,
        db::users::NewUser {
            email: &email,
            password_hash: &password_hash,
            first_name,
            last_name,
        },
    )
    .await
    .map_err(|e| {
        let duplicate = e
            .as_database_error()
            .is_some_and(|db_err| db_err.is_unique_violation());
        if duplicate {
            ApiError::bad_request("User with this email already exists")
        } else {
            ApiError::Database(e)
        }
    })?;

    let token = issue_token(&state, &user)?;
    session::start(&state, &cookies, &user.id).await?;

    tracing::info!(user_id = %user.id, "user signed up");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User created successfully".to_string(),
            user: UserSummary::from(&user),
            token,
        }),
    ))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let (Some(email), Some(plain)) = (
        required(&req.email),
        req.password.as_deref().filter(|p| !p.is_empty()),
    ) else {
        return Err(ApiError::bad_request("Email and password are required"));
    };

    let Some(user) = db::users::find_by_email(&state.db, &password::normalize_email(email)).await? else {
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    };

    let plain = plain.to_string();
    let hash = user.password.clone();
    let valid = tokio::task::spawn_blocking(move || password::verify_password(&plain, &hash))
        .await
        .map_err(|e| ApiError::Internal(e.into()))?;
    if !valid {
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    let token = issue_token(&state, &user)?;
    session::start(&state, &cookies, &user.id).await?;

    tracing::info!(user_id = %user.id, "user logged in");

    Ok(Json(AuthResponse {
        message: "Login successful".to_string(),
        user: UserSummary::from(&user),
        token,
    }))
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
) -> Result<Json<MessageResponse>, ApiError> {
    session::destroy(&state, &cookies).await?;
    Ok(Json(MessageResponse::new("Logout successful")))
}

pub async fn current_user(
    State(state): State<Arc<AppState>>,
    OptionalUser(user_id): OptionalUser,
) -> Result<Json<UserProfile>, ApiError> {
    let user_id = user_id.ok_or_else(|| ApiError::Unauthorized("Not authenticated".to_string()))?;

    let user = db::users::find_by_id(&state.db, &user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(UserProfile::from(user)))
}
