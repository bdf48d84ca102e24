//! Text extraction for uploaded legal documents
//!
//! Uploads are routed by MIME type to a format-specific extractor:
//! - PDF via `pdf-extract` (with `lopdf` used to spot encryption)
//! - DOCX by reading `word/document.xml` out of the OOXML package
//! - legacy DOC and plain text as a lossy UTF-8 read
//!
//! Every failure carries guidance that can be shown to the uploader as-is.

pub mod docx;
pub mod error;
pub mod mime;
pub mod pdf;
pub mod plain;

pub use error::ExtractError;
pub use mime::SupportedMime;

/// Upper bound on accepted uploads (10 MiB)
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Extract readable text from `bytes` of the given format
pub fn extract_text(bytes: &[u8], format: SupportedMime) -> Result<String, ExtractError> {
    if bytes.is_empty() {
        return Err(ExtractError::Empty);
    }

    tracing::debug!(format = %format, size = bytes.len(), "extracting text");

    let text = match format {
        SupportedMime::Pdf => pdf::extract(bytes)?,
        SupportedMime::Docx => docx::extract(bytes)?,
        SupportedMime::Doc => plain::extract_doc(bytes)?,
        SupportedMime::Text => plain::extract_text(bytes)?,
    };

    tracing::info!(format = %format, chars = text.chars().count(), "text extracted");
    Ok(text)
}

/// Collapse whitespace-only lines and trim each remaining line
pub(crate) fn clean_lines(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_upload_is_rejected_for_every_format() {
        for format in [
            SupportedMime::Pdf,
            SupportedMime::Docx,
            SupportedMime::Doc,
            SupportedMime::Text,
        ] {
            assert!(matches!(extract_text(&[], format), Err(ExtractError::Empty)));
        }
    }

    #[test]
    fn plain_text_is_routed_to_text_extractor() {
        let text = extract_text(b"  RENT PAYMENT\n\n  Due on the 5th  ", SupportedMime::Text).unwrap();
        assert_eq!(text, "RENT PAYMENT\n\n  Due on the 5th");
    }

    #[test]
    fn clean_lines_drops_blank_lines() {
        assert_eq!(clean_lines("  a \n\n   \n b"), "a\nb");
    }
}
