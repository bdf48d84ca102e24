//! DOCX (Office Open XML) text extraction

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::{clean_lines, ExtractError, SupportedMime, MAX_UPLOAD_BYTES};

const DOCUMENT_PART: &str = "word/document.xml";
const FORMAT: &str = SupportedMime::Docx.label();

/// Largest inflated `word/document.xml` accepted from one upload
pub const MAX_DOCUMENT_XML_BYTES: u64 = 10 * MAX_UPLOAD_BYTES as u64;

/// Extract body text from a DOCX package
///
/// Only the main document part is read. Headers, footers and comments are
/// not part of the analysed text.
pub fn extract(bytes: &[u8]) -> Result<String, ExtractError> {
    extract_within(bytes, MAX_DOCUMENT_XML_BYTES)
}

/// Like [`extract`], refusing a document part that inflates past `limit`
///
/// The size declared in the zip directory is checked first; the read itself
/// is also bounded since that header can lie.
fn extract_within(bytes: &[u8], limit: u64) -> Result<String, ExtractError> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| ExtractError::corrupted(FORMAT, e))?;

    let part = archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| ExtractError::corrupted(FORMAT, e))?;
    if part.size() > limit {
        return Err(too_large(part.size()));
    }

    let mut xml = String::new();
    part.take(limit + 1)
        .read_to_string(&mut xml)
        .map_err(|e| ExtractError::corrupted(FORMAT, e))?;
    if xml.len() as u64 > limit {
        return Err(too_large(xml.len() as u64));
    }

    let text = clean_lines(&document_text(&xml)?);
    if text.is_empty() {
        return Err(ExtractError::NoText(FORMAT));
    }
    Ok(text)
}

fn too_large(inflated: u64) -> ExtractError {
    tracing::warn!(inflated, "rejecting DOCX with oversized document part");
    ExtractError::corrupted(FORMAT, format!("{DOCUMENT_PART} inflates to at least {inflated} bytes"))
}

/// Walk `word/document.xml` collecting `w:t` runs
fn document_text(xml: &str) -> Result<String, ExtractError> {
    let mut reader = Reader::from_str(xml);
    let mut out = String::with_capacity(xml.len() / 4);
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"w:t" => in_text = true,
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => out.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:tab" => out.push('\t'),
                b"w:br" | b"w:cr" => out.push('\n'),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text => {
                let text = t.unescape().map_err(|e| ExtractError::corrupted(FORMAT, e))?;
                out.push_str(&text);
            }
            Ok(Event::CData(t)) if in_text => {
                out.push_str(&String::from_utf8_lossy(&t));
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(ExtractError::corrupted(
                    FORMAT,
                    format!("XML error at byte {}: {e}", reader.buffer_position()),
                ))
            }
        }
    }

    Ok(out)
}
