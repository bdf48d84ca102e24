//! Whole-document analysis and clause breakdown

use std::sync::Arc;

use shared_types::{ClauseAnalysis, ClauseBreakdown, LegalAnalysis};
use thiserror::Error;

use crate::llm::{ChatMessage, ChatModel, ChatRequest, LlmError};
use crate::prompts;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("Failed to analyze legal document: the AI response was not valid analysis JSON ({0})")]
    MalformedAnalysis(serde_json::Error),

    #[error("Failed to analyze document clauses: the AI response was not valid clause JSON ({0})")]
    MalformedClauses(serde_json::Error),
}

/// Runs the two analysis prompts against a [`ChatModel`]
#[derive(Clone)]
pub struct LegalAnalyzer {
    model: Arc<dyn ChatModel>,
}

impl LegalAnalyzer {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    /// Summary, overall risk, obligations, risks and deadlines
    pub async fn analyze_document(
        &self,
        text: &str,
        title: &str,
    ) -> Result<LegalAnalysis, AnalysisError> {
        let request = ChatRequest::new(
            vec![ChatMessage::user(prompts::document_analysis(title, text))],
            prompts::ANALYSIS_TEMPERATURE,
        )
        .json();

        let reply = self.model.complete(request).await?;
        let analysis: LegalAnalysis =
            serde_json::from_str(strip_code_fence(&reply)).map_err(AnalysisError::MalformedAnalysis)?;

        tracing::info!(
            risk_level = %analysis.risk_level,
            obligations = analysis.obligations.len(),
            risks = analysis.risks.len(),
            deadlines = analysis.deadlines.len(),
            "document analyzed"
        );
        Ok(analysis)
    }

    /// Clause-by-clause breakdown, in document order
    pub async fn analyze_clauses(&self, text: &str) -> Result<Vec<ClauseAnalysis>, AnalysisError> {
        let request = ChatRequest::new(
            vec![ChatMessage::user(prompts::clause_breakdown(text))],
            prompts::ANALYSIS_TEMPERATURE,
        )
        .json();

        let reply = self.model.complete(request).await?;
        let breakdown: ClauseBreakdown =
            serde_json::from_str(strip_code_fence(&reply)).map_err(AnalysisError::MalformedClauses)?;

        tracing::info!(clauses = breakdown.clauses.len(), "clauses extracted");
        Ok(breakdown.clauses)
    }
}

/// Remove a Markdown code fence some models wrap JSON in
fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = rest.strip_prefix("json").unwrap_or(rest);
    body.strip_suffix("```").unwrap_or(body).trim()
}
