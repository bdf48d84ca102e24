//! Shared domain types for LexiAI
//!
//! Everything the extraction, analysis and API crates need to agree on:
//! - graded levels (risk, importance, urgency)
//! - document lifecycle status
//! - the structured result shapes the language model is asked to produce
//! - the set of languages results can be translated into

pub mod analysis;
pub mod language;
pub mod types;

pub use analysis::{ClauseAnalysis, ClauseBreakdown, Deadline, LegalAnalysis, Obligation, Risk};
pub use language::{Language, UnsupportedLanguage};
pub use types::{ClauseType, DeadlineType, DocumentStatus, Level, UnknownStatus};
