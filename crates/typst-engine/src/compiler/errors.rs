//! Error types for compilation

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A compilation diagnostic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompileError {
    pub message: String,
    /// Helpful hint for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    pub severity: ErrorSeverity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorSeverity {
    Error,
    Warning,
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("Compilation failed: {}", summarize(.0))]
    CompileError(Vec<CompileError>),

    #[error("Compilation timeout after {0}ms")]
    Timeout(u64),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("PDF export failed: {0}")]
    Export(String),

    #[error("Compilation task failed: {0}")]
    Task(String),

    #[error("Path security violation: {0}")]
    PathSecurityViolation(String),
}

fn summarize(errors: &[CompileError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

impl CompileError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            hint: None,
            severity: ErrorSeverity::Error,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn as_warning(mut self) -> Self {
        self.severity = ErrorSeverity::Warning;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_error_display_lists_messages() {
        let err = RenderError::CompileError(vec![
            CompileError::new("unknown variable: foo"),
            CompileError::new("expected expression"),
        ]);
        assert_eq!(
            err.to_string(),
            "Compilation failed: unknown variable: foo; expected expression"
        );
    }
}
