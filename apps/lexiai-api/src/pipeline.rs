//! Upload processing
//!
//! Validate → record (`processing`) → store file → extract text → analyze →
//! commit analysis, clauses and `analyzed` status in one transaction.
//! Validation failures happen before anything is written. Any failure after
//! the document row exists leaves it in `error`.

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Bytes;
use extract_core::{SupportedMime, MAX_UPLOAD_BYTES};
use shared_types::DocumentStatus;

use crate::db;
use crate::error::{ApiError, FILE_TOO_LARGE};
use crate::state::AppState;

/// A file received in the `document` multipart field
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// Reasons an accepted upload could not be analyzed
#[derive(Debug, thiserror::Error)]
enum ProcessingError {
    #[error(transparent)]
    Extraction(#[from] extract_core::ExtractError),

    #[error(transparent)]
    Analysis(#[from] analysis_engine::AnalysisError),

    #[error("Could not save the uploaded file")]
    Storage(#[source] std::io::Error),

    #[error("Text extraction did not complete")]
    Task(#[from] tokio::task::JoinError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl From<ProcessingError> for ApiError {
    fn from(error: ProcessingError) -> Self {
        match error {
            ProcessingError::Extraction(e) => ApiError::Extraction(e),
            ProcessingError::Analysis(e) => ApiError::BadRequest(e.to_string()),
            ProcessingError::Database(e) => ApiError::Database(e),
            other => ApiError::Internal(anyhow::Error::new(other)),
        }
    }
}

/// Run the whole pipeline for one upload, returning the new document id
///
/// The work runs on its own task so that a client disconnecting mid-analysis
/// cannot leave the document stuck in `processing`.
pub async fn process_upload(
    state: Arc<AppState>,
    user_id: String,
    title: String,
    file: UploadedFile,
) -> Result<String, ApiError> {
    let format = SupportedMime::detect(file.content_type.as_deref(), &file.file_name)?;
    if file.bytes.len() > MAX_UPLOAD_BYTES {
        return Err(ApiError::bad_request(FILE_TOO_LARGE));
    }

    tokio::spawn(async move { run(&state, &user_id, &title, file, format).await })
        .await
        .map_err(|e| ApiError::Internal(anyhow::Error::new(e)))?
}

async fn run(
    state: &AppState,
    user_id: &str,
    title: &str,
    file: UploadedFile,
    format: SupportedMime,
) -> Result<String, ApiError> {
    let document_id = db::new_id();
    let file_path = state.config.upload_dir.join(&document_id);

    db::documents::create(
        &state.db,
        db::documents::NewDocument {
            id: &document_id,
            user_id,
            title,
            file_name: &file.file_name,
            file_size: file.bytes.len() as i64,
            file_type: format.mime_type(),
            file_path: &file_path.to_string_lossy(),
        },
    )
    .await?;

    tracing::info!(
        document_id = %document_id,
        format = %format,
        size = file.bytes.len(),
        "document received"
    );

    match analyze(state, &document_id, title, file.bytes, format, file_path).await {
        Ok(()) => {
            db::users::increment_documents_uploaded(&state.db, user_id).await?;
            tracing::info!(document_id = %document_id, "document analyzed");
            Ok(document_id)
        }
        Err(error) => {
            tracing::warn!(document_id = %document_id, error = %error, "document processing failed");
            if let Err(e) = db::documents::set_status(&state.db, &document_id, DocumentStatus::Error).await {
                tracing::error!(document_id = %document_id, error = %e, "could not mark document as failed");
            }
            Err(error.into())
        }
    }
}

async fn analyze(
    state: &AppState,
    document_id: &str,
    title: &str,
    bytes: Bytes,
    format: SupportedMime,
    file_path: PathBuf,
) -> Result<(), ProcessingError> {
    tokio::fs::write(&file_path, &bytes)
        .await
        .map_err(ProcessingError::Storage)?;

    let text = tokio::task::spawn_blocking(move || extract_core::extract_text(&bytes, format)).await??;

    let analysis = state.analyzer.analyze_document(&text, title).await?;
    let clauses = state.analyzer.analyze_clauses(&text).await?;

    db::documents::complete_analysis(&state.db, document_id, &analysis, &clauses).await?;
    tracing::debug!(
        document_id,
        clauses = clauses.len(),
        risks = analysis.risk_count(),
        deadlines = analysis.deadline_count(),
        "analysis stored"
    );
    Ok(())
}
