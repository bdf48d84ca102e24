//! HTTP handlers for the LexiAI API

pub mod auth;
pub mod chat;
pub mod dashboard;
pub mod documents;
pub mod glossary;
pub mod languages;

use axum::extract::FromRequest;
use shared_types::Language;

use crate::error::ApiError;

/// JSON body extractor whose rejections use the API error envelope
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Health check endpoint
pub async fn health() -> &'static str {
    "OK"
}

/// Resolve a `?lang=` value, defaulting to English
pub(crate) fn requested_language(lang: Option<&str>) -> Result<Language, ApiError> {
    match lang.map(str::trim).filter(|l| !l.is_empty()) {
        None => Ok(Language::English),
        Some(code) => Language::from_code(code).map_err(|e| ApiError::bad_request(e.to_string())),
    }
}

/// Required text field: present and not blank
pub(crate) fn required<'a>(value: &'a Option<String>) -> Option<&'a str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
