//! Typst document rendering engine
//!
//! Compiles embedded Typst templates entirely in memory and exports them as
//! PDF. Template data is passed through `sys.inputs`.
//!
//! # Feature Flags
//!
//! - `server` (default): Enables async `compile_document` with timeout (requires tokio)

pub mod compiler;
pub mod templates;
pub mod world;

pub use compiler::{
    compile_document_sync, CompileError, RenderError, RenderRequest, RenderSource, RenderedPdf,
};

#[cfg(feature = "server")]
pub use compiler::compile_document;
