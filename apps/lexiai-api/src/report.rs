//! Downloadable PDF analysis report

use chrono::{DateTime, Utc};
use serde_json::json;
use shared_types::LegalAnalysis;
use typst_engine::templates::ANALYSIS_REPORT;
use typst_engine::{compile_document, RenderError, RenderRequest, RenderedPdf};

use crate::models::DbDocument;

/// Build the render request for a document's analysis
pub fn report_request(document: &DbDocument, analysis: &LegalAnalysis, generated: DateTime<Utc>) -> RenderRequest {
    RenderRequest::template(ANALYSIS_REPORT)
        .input("title", json!(document.title))
        .input("file_name", json!(document.file_name))
        .input("file_type", json!(document.file_type))
        .input("file_size", json!(format_file_size(document.file_size)))
        .input("uploaded", json!(document.created_at.format("%B %-d, %Y").to_string()))
        .input("generated", json!(generated.format("%B %-d, %Y %H:%M UTC").to_string()))
        .input("summary", json!(analysis.summary))
        .input("risk_level", json!(analysis.risk_level.as_str()))
        .input("obligations", json!(analysis.obligations))
        .input("risks", json!(analysis.risks))
        .input("deadlines", json!(analysis.deadlines))
}

pub async fn render(
    document: &DbDocument,
    analysis: &LegalAnalysis,
    timeout_ms: u64,
) -> Result<RenderedPdf, RenderError> {
    let pdf = compile_document(report_request(document, analysis, Utc::now()), timeout_ms).await?;
    tracing::info!(
        document_id = %document.id,
        pages = pdf.page_count,
        bytes = pdf.bytes.len(),
        "analysis report rendered"
    );
    Ok(pdf)
}

/// Human-readable size, e.g. `24.0 KB`
pub fn format_file_size(bytes: i64) -> String {
    const UNITS: [&str; 4] = ["bytes", "KB", "MB", "GB"];
    if bytes < 1024 {
        return format!("{bytes} bytes");
    }

    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{size:.1} {}", UNITS[unit])
}

/// File name safe to place inside a quoted `Content-Disposition` value
pub fn attachment_name(title: &str, suffix: &str) -> String {
    let stem: String = title
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, ' ' | '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let stem = if stem.is_empty() { "document".to_string() } else { stem };
    format!("{stem}{suffix}")
}
