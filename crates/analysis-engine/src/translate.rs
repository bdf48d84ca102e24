//! Per-string translation through the chat model
//!
//! Translation never fails outward: any model error leaves the original text
//! in place. English targets and empty strings never reach the model.

use std::sync::Arc;

use shared_types::{ClauseAnalysis, Language, LegalAnalysis};

use crate::llm::{ChatMessage, ChatModel, ChatRequest};
use crate::prompts;

#[derive(Clone)]
pub struct Translator {
    model: Arc<dyn ChatModel>,
}

impl Translator {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    pub async fn translate_text(&self, text: &str, language: Language) -> String {
        if language.is_english() || text.trim().is_empty() {
            return text.to_string();
        }

        let request = ChatRequest::new(
            vec![
                ChatMessage::system(prompts::translator_system(language)),
                ChatMessage::user(text),
            ],
            prompts::ANALYSIS_TEMPERATURE,
        );

        match self.model.complete(request).await {
            Ok(translated) => translated,
            Err(e) => {
                tracing::warn!(language = %language, error = %e, "translation failed, keeping original");
                text.to_string()
            }
        }
    }

    /// Translate the reader-facing fields of an analysis
    ///
    /// Original clause excerpts (`text`) stay in the document's language.
    pub async fn translate_analysis(&self, mut analysis: LegalAnalysis, language: Language) -> LegalAnalysis {
        if language.is_english() {
            return analysis;
        }

        analysis.summary = self.translate_text(&analysis.summary, language).await;
        for obligation in &mut analysis.obligations {
            obligation.simplified = self.translate_text(&obligation.simplified, language).await;
        }
        for risk in &mut analysis.risks {
            risk.simplified = self.translate_text(&risk.simplified, language).await;
            risk.potential_impact = self.translate_text(&risk.potential_impact, language).await;
        }
        for deadline in &mut analysis.deadlines {
            deadline.simplified = self.translate_text(&deadline.simplified, language).await;
        }
        analysis
    }

    pub async fn translate_clause(&self, mut clause: ClauseAnalysis, language: Language) -> ClauseAnalysis {
        if language.is_english() {
            return clause;
        }

        clause.simplified_text = self.translate_text(&clause.simplified_text, language).await;
        clause.explanation = self.translate_text(&clause.explanation, language).await;
        if let Some(advice) = clause.actionable_advice.take() {
            clause.actionable_advice = Some(self.translate_text(&advice, language).await);
        }
        clause
    }

    pub async fn translate_clauses(&self, clauses: Vec<ClauseAnalysis>, language: Language) -> Vec<ClauseAnalysis> {
        let mut translated = Vec::with_capacity(clauses.len());
        for clause in clauses {
            translated.push(self.translate_clause(clause, language).await);
        }
        translated
    }
}
