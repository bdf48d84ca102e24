use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::db;
use crate::error::ApiError;
use crate::models::GlossaryTermResponse;
use crate::state::AppState;

pub async fn list_terms(State(state): State<Arc<AppState>>) -> Result<Json<Vec<GlossaryTermResponse>>, ApiError> {
    let terms = db::glossary::list(&state.db).await?;
    Ok(Json(terms.into_iter().map(GlossaryTermResponse::from).collect()))
}

/// Look up one term, ignoring case
pub async fn get_term(
    State(state): State<Arc<AppState>>,
    Path(term): Path<String>,
) -> Result<Json<GlossaryTermResponse>, ApiError> {
    db::glossary::find(&state.db, &term)
        .await?
        .map(|term| Json(GlossaryTermResponse::from(term)))
        .ok_or_else(|| ApiError::not_found("Term not found"))
}
