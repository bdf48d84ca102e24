//! Typst compilation wrapper with timeout and error handling

pub mod errors;
pub mod render;

pub use errors::{CompileError, ErrorSeverity, RenderError};
#[cfg(feature = "server")]
pub use render::compile_document;
pub use render::{compile_document_sync, validate_syntax};

use std::collections::HashMap;

/// Request to render a document
#[derive(Debug, Clone)]
pub struct RenderRequest {
    /// Template name or raw Typst source
    pub source: RenderSource,
    /// Variables injected into sys.inputs
    pub inputs: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone)]
pub enum RenderSource {
    /// One of the embedded templates, see [`crate::templates`]
    Template(String),
    /// Raw Typst markup
    Raw(String),
}

impl RenderRequest {
    pub fn template(name: impl Into<String>) -> Self {
        Self {
            source: RenderSource::Template(name.into()),
            inputs: HashMap::new(),
        }
    }

    pub fn raw(source: impl Into<String>) -> Self {
        Self {
            source: RenderSource::Raw(source.into()),
            inputs: HashMap::new(),
        }
    }

    pub fn input(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.inputs.insert(key.into(), value);
        self
    }
}

/// A compiled PDF
#[derive(Debug, Clone)]
pub struct RenderedPdf {
    pub bytes: Vec<u8>,
    pub page_count: usize,
    pub warnings: Vec<CompileError>,
}
