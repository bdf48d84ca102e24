//! Embedded template loader
//!
//! Typst sources are embedded at compile time from the crate's
//! `templates/` directory.

/// Analysis report - loaded from templates/analysis_report.typ
pub(crate) const ANALYSIS_REPORT_TEMPLATE: &str = include_str!("../../templates/analysis_report.typ");

/// Shared colours and layout helpers - loaded from templates/lexiai_theme.typ
pub(crate) const THEME_MODULE: &str = include_str!("../../templates/lexiai_theme.typ");

/// Virtual path the theme is mounted at, matching the templates' `#import`
pub(crate) const THEME_PATH: &str = "/lexiai_theme.typ";

/// Get an embedded template by name
pub fn get_embedded_template(name: &str) -> Option<&'static str> {
    match name {
        "analysis_report" => Some(ANALYSIS_REPORT_TEMPLATE),
        _ => None,
    }
}
