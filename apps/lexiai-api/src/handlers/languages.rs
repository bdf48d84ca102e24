//! Supported languages and ad-hoc UI string translation

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{extract::State, Json};
use shared_types::Language;

use super::{requested_language, ApiJson};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::models::{TranslateUiRequest, TranslateUiResponse};
use crate::state::AppState;

pub async fn list_languages() -> Json<BTreeMap<&'static str, &'static str>> {
    Json(Language::supported())
}

/// Translate a UI string; missing input or English returns it unchanged
pub async fn translate_ui(
    State(state): State<Arc<AppState>>,
    AuthUser(_user): AuthUser,
    ApiJson(req): ApiJson<TranslateUiRequest>,
) -> Result<Json<TranslateUiResponse>, ApiError> {
    let Some(content) = req.content else {
        return Ok(Json(TranslateUiResponse { translated_content: None }));
    };
    let Some(target) = req.target_language else {
        return Ok(Json(TranslateUiResponse {
            translated_content: Some(content),
        }));
    };

    let language = requested_language(Some(&target))?;
    let translated = state.translator.translate_text(&content, language).await;

    Ok(Json(TranslateUiResponse {
        translated_content: Some(translated),
    }))
}
