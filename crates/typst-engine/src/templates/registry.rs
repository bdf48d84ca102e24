//! Template lookup and shared modules

use std::collections::HashMap;

use typst::foundations::Bytes;

use super::embedded;
use crate::compiler::errors::RenderError;

/// Name of the downloadable document analysis report
pub const ANALYSIS_REPORT: &str = "analysis_report";

pub fn get_template_source(name: &str) -> Result<&'static str, RenderError> {
    embedded::get_embedded_template(name).ok_or_else(|| RenderError::TemplateNotFound(name.to_string()))
}

/// Modules every template may import
pub fn shared_assets() -> HashMap<String, Bytes> {
    HashMap::from([(
        embedded::THEME_PATH.to_string(),
        Bytes::from_static(embedded::THEME_MODULE.as_bytes()),
    )])
}
