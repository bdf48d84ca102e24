use std::sync::Arc;

use axum::{extract::State, Json};

use crate::auth::AuthUser;
use crate::db;
use crate::error::ApiError;
use crate::models::DashboardStats;
use crate::state::AppState;

/// Document and analysis counts for the caller
pub async fn stats(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<Json<DashboardStats>, ApiError> {
    Ok(Json(db::documents::dashboard_stats(&state.db, &user.id).await?))
}
