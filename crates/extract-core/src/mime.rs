//! Upload MIME allow-list

use crate::error::ExtractError;

/// Formats an upload may declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SupportedMime {
    Pdf,
    Docx,
    Doc,
    Text,
}

impl SupportedMime {
    pub const ALL: [SupportedMime; 4] = [
        SupportedMime::Pdf,
        SupportedMime::Docx,
        SupportedMime::Doc,
        SupportedMime::Text,
    ];

    /// Match a declared content type against the allow-list
    ///
    /// Parameters such as `; charset=utf-8` are ignored.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|m| m.mime_type() == essence)
    }

    /// Resolve the format of an upload
    ///
    /// The declared type wins when it is specific. Browsers frequently send
    /// `application/octet-stream` (or nothing) for Word files, in which case
    /// the file extension is consulted instead.
    pub fn detect(declared: Option<&str>, file_name: &str) -> Result<Self, ExtractError> {
        let declared = declared.map(str::trim).filter(|m| !m.is_empty());

        match declared {
            Some(mime) if !is_generic(mime) => {
                Self::from_mime(mime).ok_or_else(|| ExtractError::Unsupported(mime.to_string()))
            }
            _ => mime_guess::from_path(file_name)
                .iter()
                .find_map(|guess| Self::from_mime(guess.essence_str()))
                .ok_or_else(|| {
                    ExtractError::Unsupported(
                        declared.unwrap_or("application/octet-stream").to_string(),
                    )
                }),
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            SupportedMime::Pdf => "application/pdf",
            SupportedMime::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            SupportedMime::Doc => "application/msword",
            SupportedMime::Text => "text/plain",
        }
    }

    /// Short label used in messages
    pub const fn label(&self) -> &'static str {
        match self {
            SupportedMime::Pdf => "PDF",
            SupportedMime::Docx => "DOCX",
            SupportedMime::Doc => "DOC",
            SupportedMime::Text => "text",
        }
    }
}

impl std::fmt::Display for SupportedMime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mime_type())
    }
}

fn is_generic(mime: &str) -> bool {
    mime.eq_ignore_ascii_case("application/octet-stream")
}
