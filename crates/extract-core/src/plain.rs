//! Plain text and legacy Word (.doc) handling

use crate::{ExtractError, SupportedMime};

/// Read a text upload as lossy UTF-8
pub fn extract_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let text = String::from_utf8_lossy(bytes);
    let text = text.trim_start_matches('\u{feff}').trim();
    if text.is_empty() {
        return Err(ExtractError::NoText(SupportedMime::Text.label()));
    }
    Ok(text.to_string())
}

/// Best-effort read of a binary `.doc` file
///
/// The legacy format is not parsed; printable characters are kept and the
/// binary noise between them is dropped.
pub fn extract_doc(bytes: &[u8]) -> Result<String, ExtractError> {
    let lossy = String::from_utf8_lossy(bytes);
    let text: String = lossy
        .chars()
        .filter(|c| *c == '\n' || *c == '\t' || (!c.is_control() && *c != '\u{fffd}'))
        .collect();

    let text = text.trim();
    if text.is_empty() {
        return Err(ExtractError::NoText(SupportedMime::Doc.label()));
    }
    Ok(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn whitespace_only_text_is_rejected() {
        assert!(matches!(extract_text(b" \n\t "), Err(ExtractError::NoText("text"))));
    }

    #[test]
    fn byte_order_mark_is_stripped() {
        assert_eq!(extract_text("\u{feff}Clause 1".as_bytes()).unwrap(), "Clause 1");
    }

    #[test]
    fn doc_drops_binary_noise() {
        let mut bytes = vec![0xd0, 0xcf, 0x11, 0xe0, 0x00, 0x01];
        bytes.extend_from_slice(b"Termination requires 30 days notice.");
        bytes.extend_from_slice(&[0x00, 0x00, 0xff]);

        assert_eq!(
            extract_doc(&bytes).unwrap(),
            "Termination requires 30 days notice."
        );
    }

    #[test]
    fn doc_with_only_noise_has_no_text() {
        assert!(matches!(
            extract_doc(&[0x00, 0x01, 0xff, 0xfe]),
            Err(ExtractError::NoText("DOC"))
        ));
    }

    proptest! {
        #[test]
        fn arbitrary_bytes_never_panic(bytes in proptest::collection::vec(any::<u8>(), 0..512)) {
            let _ = extract_text(&bytes);
            let _ = extract_doc(&bytes);
        }

        #[test]
        fn extracted_text_is_trimmed(s in "[ \n]{0,3}[a-zA-Z][a-zA-Z ]{0,40}[ \n]{0,3}") {
            let text = extract_text(s.as_bytes()).unwrap();
            prop_assert_eq!(text.as_str(), s.trim());
        }
    }
}
