//! Languages analysis results and UI strings can be translated into

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Language {
    #[default]
    English,
    Hindi,
    Kannada,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unsupported language: {0}")]
pub struct UnsupportedLanguage(pub String);

impl Language {
    pub const ALL: [Language; 3] = [Language::English, Language::Hindi, Language::Kannada];

    /// ISO 639-1 code used on the wire
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Hindi => "hi",
            Language::Kannada => "kn",
        }
    }

    /// Name shown to users and given to the translator prompt
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "Hindi (हिंदी)",
            Language::Kannada => "Kannada (ಕನ್ನಡ)",
        }
    }

    pub fn from_code(code: &str) -> Result<Self, UnsupportedLanguage> {
        match code.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Language::English),
            "hi" => Ok(Language::Hindi),
            "kn" => Ok(Language::Kannada),
            other => Err(UnsupportedLanguage(other.to_string())),
        }
    }

    pub fn is_english(&self) -> bool {
        matches!(self, Language::English)
    }

    /// `code -> display name` map served by the languages endpoint
    pub fn supported() -> BTreeMap<&'static str, &'static str> {
        Self::ALL
            .iter()
            .map(|lang| (lang.code(), lang.display_name()))
            .collect()
    }
}

impl std::str::FromStr for Language {
    type Err = UnsupportedLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s)
    }
}

impl TryFrom<String> for Language {
    type Error = UnsupportedLanguage;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_code(&value)
    }
}

impl From<Language> for String {
    fn from(value: Language) -> Self {
        value.code().to_string()
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
