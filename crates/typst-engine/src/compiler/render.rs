//! Core rendering logic
//!
//! This module handles the actual Typst compilation with timeout handling
//! and error extraction.

#[cfg(feature = "server")]
use std::time::Duration;

use typst::diag::{Severity, SourceDiagnostic};
use typst::model::Document;

use super::errors::{CompileError, RenderError};
use super::{RenderRequest, RenderSource, RenderedPdf};
use crate::templates;
use crate::world::VirtualWorld;

/// Compile a document to PDF on the blocking pool, giving up after `timeout_ms`
#[cfg(feature = "server")]
pub async fn compile_document(
    request: RenderRequest,
    timeout_ms: u64,
) -> Result<RenderedPdf, RenderError> {
    let world = build_world(request)?;

    let result = tokio::time::timeout(
        Duration::from_millis(timeout_ms),
        tokio::task::spawn_blocking(move || compile_world(&world)),
    )
    .await;

    match result {
        Ok(Ok(rendered)) => rendered,
        Ok(Err(join_error)) => Err(RenderError::Task(join_error.to_string())),
        Err(_elapsed) => {
            tracing::warn!(timeout_ms, "typst compilation timed out");
            Err(RenderError::Timeout(timeout_ms))
        }
    }
}

/// Compile a document to PDF on the calling thread
pub fn compile_document_sync(request: RenderRequest) -> Result<RenderedPdf, RenderError> {
    let world = build_world(request)?;
    compile_world(&world)
}

/// Validate Typst syntax without full compilation
pub fn validate_syntax(source: &str) -> Vec<CompileError> {
    typst::syntax::parse(source)
        .errors()
        .into_iter()
        .map(|error| CompileError::new(error.message.to_string()))
        .collect()
}

fn build_world(request: RenderRequest) -> Result<VirtualWorld, RenderError> {
    let source = match request.source {
        RenderSource::Template(name) => templates::get_template_source(&name)?.to_string(),
        RenderSource::Raw(source) => source,
    };
    VirtualWorld::new(source, request.inputs, templates::shared_assets())
}

fn compile_world(world: &VirtualWorld) -> Result<RenderedPdf, RenderError> {
    let started = std::time::Instant::now();
    let warned = typst::compile(world);
    let (_, warnings) = categorize_diagnostics(&warned.warnings);

    let document: Document = match warned.output {
        Ok(document) => document,
        Err(diagnostics) => {
            let (errors, _) = categorize_diagnostics(&diagnostics);
            tracing::warn!(errors = errors.len(), "typst compilation failed");
            return Err(RenderError::CompileError(if errors.is_empty() {
                vec![CompileError::new("Compilation failed with unknown error")]
            } else {
                errors
            }));
        }
    };

    let bytes = typst_pdf::pdf(&document, &typst_pdf::PdfOptions::default()).map_err(|diagnostics| {
        let (errors, _) = categorize_diagnostics(&diagnostics);
        RenderError::Export(
            errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join("; "),
        )
    })?;

    tracing::debug!(
        pages = document.pages.len(),
        bytes = bytes.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "typst document compiled"
    );

    Ok(RenderedPdf {
        bytes,
        page_count: document.pages.len(),
        warnings,
    })
}

/// Categorize diagnostics into errors and warnings
fn categorize_diagnostics(diagnostics: &[SourceDiagnostic]) -> (Vec<CompileError>, Vec<CompileError>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    for diag in diagnostics {
        let mut compile_error = CompileError::new(diag.message.to_string());

        if !diag.hints.is_empty() {
            let hint = diag
                .hints
                .iter()
                .map(|h| h.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            compile_error = compile_error.with_hint(hint);
        }

        match diag.severity {
            Severity::Error => errors.push(compile_error),
            Severity::Warning => warnings.push(compile_error.as_warning()),
        }
    }

    (errors, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_raw_markup_to_pdf() {
        let pdf = compile_document_sync(RenderRequest::raw("Hello, *World*!")).unwrap();
        assert!(pdf.bytes.starts_with(b"%PDF"));
        assert_eq!(pdf.page_count, 1);
    }

    #[test]
    fn inputs_reach_sys_inputs() {
        let request = RenderRequest::raw(r#"#let name = sys.inputs.at("name", default: "World")
Hello, #name!"#)
        .input("name", serde_json::json!("Alice"));

        assert!(compile_document_sync(request).is_ok());
    }

    #[test]
    fn syntax_errors_are_reported() {
        let err = compile_document_sync(RenderRequest::raw("#invalid{{{{")).unwrap_err();
        match err {
            RenderError::CompileError(errors) => assert!(!errors.is_empty()),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn analysis_report_renders_with_full_inputs() {
        let request = RenderRequest::template(templates::ANALYSIS_REPORT)
            .input("title", serde_json::json!("Apartment Lease"))
            .input("file_name", serde_json::json!("lease.pdf"))
            .input("file_type", serde_json::json!("application/pdf"))
            .input("file_size", serde_json::json!("24.0 KB"))
            .input("summary", serde_json::json!("A 12-month residential lease."))
            .input("risk_level", serde_json::json!("high"))
            .input(
                "obligations",
                serde_json::json!([{"text": "Pay rent", "simplified": "Pay by the 5th", "importance": "high"}]),
            )
            .input(
                "risks",
                serde_json::json!([{"text": "Deposit", "simplified": "Lose deposit", "riskLevel": "high", "potential_impact": "$1,200"}]),
            )
            .input(
                "deadlines",
                serde_json::json!([{"text": "Notice", "simplified": "60 days", "deadline_type": "renewal", "urgency": "low"}]),
            );

        let pdf = compile_document_sync(request).unwrap();
        assert!(pdf.bytes.starts_with(b"%PDF"));
        assert!(pdf.page_count >= 1);
    }

    #[test]
    fn analysis_report_renders_with_empty_sections() {
        let request = RenderRequest::template(templates::ANALYSIS_REPORT)
            .input("title", serde_json::json!("Blank"))
            .input("summary", serde_json::json!(""))
            .input("risk_level", serde_json::json!("low"));

        assert!(compile_document_sync(request).is_ok());
    }

    #[test]
    fn unknown_template_is_rejected() {
        let err = compile_document_sync(RenderRequest::template("invoice")).unwrap_err();
        assert!(matches!(err, RenderError::TemplateNotFound(name) if name == "invoice"));
    }

    #[test]
    fn validate_syntax_flags_incomplete_let() {
        assert!(validate_syntax("Hello, World!").is_empty());
        assert!(!validate_syntax("#let x = ").is_empty());
    }

    #[cfg(feature = "server")]
    #[tokio::test]
    async fn async_compile_produces_pdf() {
        let pdf = compile_document(RenderRequest::raw("= Report"), 30_000).await.unwrap();
        assert!(pdf.bytes.starts_with(b"%PDF"));
    }

    #[cfg(feature = "server")]
    #[tokio::test]
    async fn zero_timeout_gives_up() {
        let err = compile_document(RenderRequest::raw("= Report"), 0).await.unwrap_err();
        assert!(matches!(err, RenderError::Timeout(0)));
    }
}
