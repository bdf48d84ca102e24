//! Legal document analysis backed by a chat-completion model
//!
//! Everything in this crate talks to the model through the [`ChatModel`]
//! trait. [`OpenAiClient`] is the production implementation; tests swap in
//! a scripted model.
//!
//! - [`LegalAnalyzer`] produces the whole-document analysis and the
//!   clause-by-clause breakdown
//! - [`Translator`] translates user-facing strings into Hindi or Kannada
//! - [`LegalAssistant`] answers questions about an uploaded document

pub mod analyzer;
pub mod assistant;
pub mod llm;
pub mod prompts;
pub mod translate;

#[cfg(test)]
pub(crate) mod test_support;

pub use analyzer::{AnalysisError, LegalAnalyzer};
pub use assistant::{document_context, LegalAssistant};
pub use llm::{ChatMessage, ChatModel, ChatRequest, LlmError, OpenAiClient, OpenAiConfig, Role};
pub use translate::Translator;
