//! Document upload, listing, detail, download and report

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use shared_types::DocumentStatus;

use super::requested_language;
use crate::auth::AuthUser;
use crate::db;
use crate::error::ApiError;
use crate::models::{
    AnalysisResponse, ClauseResponse, DbDocument, DocumentDetail, DocumentResponse, LangQuery, UploadResponse,
};
use crate::pipeline::{self, UploadedFile};
use crate::report;
use crate::state::AppState;

const DOCUMENT_NOT_FOUND: &str = "Document not found";
const ANALYSIS_NOT_READY: &str = "The analysis for this document is not available yet";

async fn owned_document(state: &AppState, id: &str, user_id: &str) -> Result<DbDocument, ApiError> {
    db::documents::find_owned(&state.db, id, user_id)
        .await?
        .ok_or_else(|| ApiError::not_found(DOCUMENT_NOT_FOUND))
}

/// Accept a multipart upload (`document` file + `title`) and analyze it
pub async fn upload_document(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut title = None;
    let mut file = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "title" => title = Some(field.text().await?),
            "document" => {
                let file_name = field.file_name().unwrap_or("document").to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?;
                file = Some(UploadedFile {
                    file_name,
                    content_type,
                    bytes,
                });
            }
            _ => {}
        }
    }

    let file = file.ok_or_else(|| ApiError::bad_request("No file uploaded"))?;
    let title = super::required(&title)
        .ok_or_else(|| ApiError::bad_request("Document title is required"))?
        .to_string();

    let document_id = pipeline::process_upload(state, user.id, title, file).await?;

    Ok(Json(UploadResponse {
        message: "Document uploaded and analysis started".to_string(),
        document_id,
    }))
}

pub async fn list_documents(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<DocumentResponse>>, ApiError> {
    let documents = db::documents::list_for_user(&state.db, &user.id).await?;
    Ok(Json(documents.into_iter().map(DocumentResponse::from).collect()))
}

/// Document with its analysis and clauses, optionally translated
pub async fn get_document(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    Query(query): Query<LangQuery>,
) -> Result<Json<DocumentDetail>, ApiError> {
    let language = requested_language(query.lang.as_deref())?;
    let document = owned_document(&state, &id, &user.id).await?;

    let analysis = match db::documents::find_analysis(&state.db, &id).await? {
        Some(row) => {
            let content = row.to_analysis().map_err(|e| ApiError::Internal(e.into()))?;
            let content = state.translator.translate_analysis(content, language).await;
            Some(AnalysisResponse::new(&row, content))
        }
        None => None,
    };

    let rows = db::documents::list_clauses(&state.db, &id).await?;
    let translated = state
        .translator
        .translate_clauses(rows.iter().map(|row| row.to_clause()).collect(), language)
        .await;
    let clauses = rows
        .iter()
        .zip(translated)
        .map(|(row, clause)| ClauseResponse::new(row, clause))
        .collect();

    Ok(Json(DocumentDetail {
        document: DocumentResponse::from(document),
        analysis,
        clauses,
    }))
}

/// Stream back the originally uploaded file
pub async fn download_document(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let document = owned_document(&state, &id, &user.id).await?;

    let bytes = match tokio::fs::read(&document.file_path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ApiError::not_found("File not found on server"));
        }
        Err(e) => return Err(ApiError::Internal(e.into())),
    };

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, document.file_type.clone()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{}\"", report::attachment_name(&document.file_name, "")),
            ),
        ],
        bytes,
    )
        .into_response())
}

/// Render the analysis as a PDF report
pub async fn download_report(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let document = owned_document(&state, &id, &user.id).await?;
    let analysis = match document.status() {
        DocumentStatus::Analyzed => db::documents::find_analysis(&state.db, &id).await?,
        _ => None,
    };
    let analysis = analysis
        .ok_or_else(|| ApiError::Conflict(ANALYSIS_NOT_READY.to_string()))?
        .to_analysis()
        .map_err(|e| ApiError::Internal(e.into()))?;

    let pdf = report::render(&document, &analysis, state.config.render_timeout_ms).await?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!(
                    "attachment; filename=\"{}\"",
                    report::attachment_name(&document.title, "-analysis.pdf")
                ),
            ),
        ],
        pdf.bytes,
    )
        .into_response())
}
