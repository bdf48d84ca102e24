use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Three-step grade used for risk, importance and urgency
///
/// Deserialization is lenient: model output such as `"High"` or `" medium "`
/// is accepted, and anything unrecognised (or `null`) grades as `Medium`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "Option<String>")]
pub enum Level {
    Low,
    #[default]
    Medium,
    High,
}

impl Level {
    /// Strict parse of a level name, case-insensitive
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Level::Low),
            "medium" | "moderate" => Some(Level::Medium),
            "high" => Some(Level::High),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Low => "low",
            Level::Medium => "medium",
            Level::High => "high",
        }
    }
}

impl From<Option<String>> for Level {
    fn from(value: Option<String>) -> Self {
        value.as_deref().and_then(Level::parse).unwrap_or_default()
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deserialize an optional level, treating empty or unrecognised values as absent
pub fn optional_level<'de, D>(deserializer: D) -> Result<Option<Level>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(Level::parse))
}

/// Classification the model assigns to a clause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "Option<String>")]
pub enum ClauseType {
    Obligation,
    Risk,
    Deadline,
    #[default]
    Neutral,
}

impl ClauseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClauseType::Obligation => "obligation",
            ClauseType::Risk => "risk",
            ClauseType::Deadline => "deadline",
            ClauseType::Neutral => "neutral",
        }
    }
}

impl From<Option<String>> for ClauseType {
    fn from(value: Option<String>) -> Self {
        match value
            .as_deref()
            .map(|v| v.trim().to_ascii_lowercase())
            .as_deref()
        {
            Some("obligation") => ClauseType::Obligation,
            Some("risk") => ClauseType::Risk,
            Some("deadline") => ClauseType::Deadline,
            _ => ClauseType::Neutral,
        }
    }
}

impl std::fmt::Display for ClauseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of time-sensitive requirement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "Option<String>")]
pub enum DeadlineType {
    Payment,
    Renewal,
    Termination,
    Notice,
    #[default]
    Other,
}

impl DeadlineType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeadlineType::Payment => "payment",
            DeadlineType::Renewal => "renewal",
            DeadlineType::Termination => "termination",
            DeadlineType::Notice => "notice",
            DeadlineType::Other => "other",
        }
    }
}

impl From<Option<String>> for DeadlineType {
    fn from(value: Option<String>) -> Self {
        match value
            .as_deref()
            .map(|v| v.trim().to_ascii_lowercase())
            .as_deref()
        {
            Some("payment") => DeadlineType::Payment,
            Some("renewal") => DeadlineType::Renewal,
            Some("termination") => DeadlineType::Termination,
            Some("notice") => DeadlineType::Notice,
            _ => DeadlineType::Other,
        }
    }
}

/// Processing status of an uploaded document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Processing,
    Analyzed,
    Error,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Processing => "processing",
            DocumentStatus::Analyzed => "analyzed",
            DocumentStatus::Error => "error",
        }
    }
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("Unknown document status: {0}")]
pub struct UnknownStatus(pub String);

impl std::str::FromStr for DocumentStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "processing" => Ok(DocumentStatus::Processing),
            "analyzed" => Ok(DocumentStatus::Analyzed),
            "error" => Ok(DocumentStatus::Error),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}
