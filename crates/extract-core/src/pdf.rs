//! PDF text extraction

use std::panic::{catch_unwind, AssertUnwindSafe};

use lopdf::Document;

use crate::{clean_lines, ExtractError, SupportedMime};

const FORMAT: &str = SupportedMime::Pdf.label();

/// Extract page text from a PDF
///
/// `lopdf` parses the file first so encryption and structural damage can be
/// reported precisely; `pdf-extract` then pulls the text. The latter is known
/// to panic on some malformed font programs, so it runs under `catch_unwind`.
pub fn extract(bytes: &[u8]) -> Result<String, ExtractError> {
    if bytes.len() < 5 || &bytes[0..5] != b"%PDF-" {
        return Err(ExtractError::corrupted(FORMAT, "missing %PDF- header"));
    }

    let doc = Document::load_mem(bytes).map_err(|e| {
        let detail = e.to_string();
        if looks_encrypted(&detail) {
            ExtractError::PasswordProtected
        } else {
            ExtractError::corrupted(FORMAT, detail)
        }
    })?;

    if doc.is_encrypted() {
        tracing::warn!("rejecting encrypted PDF");
        return Err(ExtractError::PasswordProtected);
    }

    let pages = doc.get_pages().len();
    tracing::debug!(pages, "PDF parsed");

    let raw = match catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(bytes))) {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            let detail = e.to_string();
            tracing::warn!(error = %detail, "pdf-extract failed");
            return Err(if looks_encrypted(&detail) {
                ExtractError::PasswordProtected
            } else {
                ExtractError::corrupted(FORMAT, detail)
            });
        }
        Err(_) => {
            tracing::warn!("pdf-extract panicked");
            return Err(ExtractError::corrupted(FORMAT, "text extraction panicked"));
        }
    };

    let text = clean_lines(&raw);
    if text.is_empty() {
        return Err(ExtractError::NoText(FORMAT));
    }

    Ok(text)
}

fn looks_encrypted(detail: &str) -> bool {
    let lower = detail.to_ascii_lowercase();
    ["encrypt", "decrypt", "password"]
        .iter()
        .any(|needle| lower.contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    fn single_page_pdf(text: Option<&str>) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let operations = match text {
            Some(text) => vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![100.into(), 600.into()]),
                Operation::new("Tj", vec![Object::string_literal(text)]),
                Operation::new("ET", vec![]),
            ],
            None => vec![],
        };
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().unwrap(),
        ));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).unwrap();
        buffer
    }

    #[test]
    fn extracts_text_from_simple_pdf() {
        let bytes = single_page_pdf(Some("Tenant shall pay rent"));
        let text = extract(&bytes).unwrap();
        assert!(text.contains("Tenant"), "got {text:?}");
    }

    #[test]
    fn page_without_text_is_reported_as_image_only() {
        let bytes = single_page_pdf(None);
        assert!(matches!(extract(&bytes), Err(ExtractError::NoText("PDF"))));
    }

    #[test]
    fn garbage_is_corrupted() {
        let err = extract(b"%PDF-1.4 this is not really a pdf").unwrap_err();
        assert!(matches!(err, ExtractError::Corrupted { format: "PDF", .. }));
    }

    #[test]
    fn missing_header_is_corrupted() {
        let err = extract(b"hello world").unwrap_err();
        assert!(matches!(err, ExtractError::Corrupted { .. }));
    }

    #[test]
    fn encryption_errors_are_recognised() {
        assert!(looks_encrypted("Decryption error: wrong password"));
        assert!(!looks_encrypted("invalid xref table"));
    }
}
