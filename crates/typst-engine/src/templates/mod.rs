//! Template management and embedded templates

pub mod embedded;
pub mod registry;

pub use registry::{get_template_source, shared_assets, ANALYSIS_REPORT};
