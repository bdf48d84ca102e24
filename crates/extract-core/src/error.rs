use thiserror::Error;

/// Extraction failures
///
/// The `Display` text of every variant is written for the person who
/// uploaded the file and is returned to them unchanged.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("The uploaded file is empty. Please choose a file that contains your document.")]
    Empty,

    #[error("Invalid file type. Only PDF, Word documents, and text files are allowed.")]
    Unsupported(String),

    #[error("This PDF is password-protected. Please remove the password and upload it again.")]
    PasswordProtected,

    #[error("No readable text was found in this {} file. {}", .0, guidance_for(.0))]
    NoText(&'static str),

    #[error("The {} file appears to be corrupted or invalid. {}", .format, repair_hint(.format))]
    Corrupted { format: &'static str, detail: String },
}

impl ExtractError {
    pub(crate) fn corrupted(format: &'static str, detail: impl ToString) -> Self {
        ExtractError::Corrupted {
            format,
            detail: detail.to_string(),
        }
    }
}

fn guidance_for(format: &str) -> &'static str {
    match format {
        "PDF" => {
            "It may be a scanned or image-only document. Please upload a PDF with selectable text, \
             or convert it with OCR first."
        }
        _ => "Please check that the document is not empty and try again.",
    }
}

fn repair_hint(format: &str) -> &'static str {
    match format {
        "PDF" => "Try opening it in a PDF viewer and saving a fresh copy before uploading.",
        "DOCX" => "Try re-saving it from Word (File > Save As > .docx) before uploading.",
        _ => "Please upload a different copy of the document.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_text_guidance_mentions_scans_for_pdf() {
        let msg = ExtractError::NoText("PDF").to_string();
        assert!(msg.contains("PDF"));
        assert!(msg.contains("scanned"));
    }

    #[test]
    fn corrupted_message_hides_parser_detail() {
        let msg = ExtractError::corrupted("DOCX", "invalid Zip archive: EOCD not found").to_string();
        assert!(msg.contains("DOCX file appears to be corrupted"));
        assert!(!msg.contains("EOCD"));
    }
}
