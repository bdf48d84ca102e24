//! Document-grounded chat answers

use std::sync::Arc;

use crate::llm::{ChatMessage, ChatModel, ChatRequest, LlmError};
use crate::prompts;

const MISSING_KEY_REPLY: &str = "I'm sorry, but the AI features are currently unavailable because the OpenAI API key is not configured. Please contact support to enable AI-powered document analysis and chat features.";
const QUOTA_REPLY: &str = "I'm currently experiencing high demand and my AI processing quota has been exceeded. Please try again in a few minutes, or contact support for assistance.";
const CONFIG_REPLY: &str = "There's an issue with the AI service configuration. Please contact support to resolve this.";
const FORMAT_REPLY: &str = "I'm sorry, but I couldn't process your question due to a formatting issue. Could you try rephrasing your question?";
const GENERIC_REPLY: &str = "I'm experiencing technical difficulties right now. Please try again later, or contact support if the problem persists.";

#[derive(Clone)]
pub struct LegalAssistant {
    model: Arc<dyn ChatModel>,
}

impl LegalAssistant {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    /// Answer `question` given the document context and prior turns
    ///
    /// Always returns a reply; model failures become a fallback message.
    pub async fn answer(&self, question: &str, context: &str, history: &[ChatMessage]) -> String {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage::system(prompts::assistant_system(context)));
        messages.extend_from_slice(history);
        messages.push(ChatMessage::user(question));

        let request = ChatRequest::new(messages, prompts::CHAT_TEMPERATURE).max_tokens(prompts::CHAT_MAX_TOKENS);

        match self.model.complete(request).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(error = %e, "chat completion failed, using fallback reply");
                fallback_reply(&e).to_string()
            }
        }
    }
}

fn fallback_reply(error: &LlmError) -> &'static str {
    match error {
        LlmError::MissingApiKey => MISSING_KEY_REPLY,
        LlmError::QuotaExceeded => QUOTA_REPLY,
        LlmError::InvalidApiKey => CONFIG_REPLY,
        LlmError::BadRequest => FORMAT_REPLY,
        _ => GENERIC_REPLY,
    }
}

/// Context block describing a document for the assistant
pub fn document_context<'a>(
    title: &str,
    summary: Option<&str>,
    clauses: impl IntoIterator<Item = &'a str>,
) -> String {
    let mut context = format!("Document: {title}\nSummary: {}\n", summary.unwrap_or_default());
    let clauses: Vec<&str> = clauses.into_iter().collect();
    if !clauses.is_empty() {
        context.push_str("Key Clauses:\n");
        context.push_str(&clauses.join("\n\n"));
    }
    context
}
