//! Structured results requested from the language model
//!
//! Field names follow the JSON contract in the analysis prompts, which mixes
//! camelCase (`riskLevel`) with snake_case (`potential_impact`,
//! `deadline_type`). Stored analyses and API responses use the same shapes.

use serde::{Deserialize, Serialize};

use crate::types::{optional_level, ClauseType, DeadlineType, Level};

/// Whole-document analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegalAnalysis {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub risk_level: Level,
    #[serde(default)]
    pub obligations: Vec<Obligation>,
    #[serde(default)]
    pub risks: Vec<Risk>,
    #[serde(default)]
    pub deadlines: Vec<Deadline>,
}

/// Something the reader must do
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obligation {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub simplified: String,
    #[serde(default)]
    pub importance: Level,
}

/// A penalty or unfavourable term
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Risk {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub simplified: String,
    #[serde(default, rename = "riskLevel")]
    pub risk_level: Level,
    #[serde(default)]
    pub potential_impact: String,
}

/// A time-sensitive requirement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deadline {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub simplified: String,
    #[serde(default)]
    pub deadline_type: DeadlineType,
    #[serde(default)]
    pub urgency: Level,
}

/// One clause from the clause-by-clause breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClauseAnalysis {
    #[serde(default)]
    pub original_text: String,
    #[serde(default)]
    pub simplified_text: String,
    #[serde(default)]
    pub clause_type: ClauseType,
    #[serde(default, deserialize_with = "optional_level")]
    pub risk_level: Option<Level>,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub actionable_advice: Option<String>,
}

/// Envelope the clause prompt asks for: `{"clauses": [...]}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClauseBreakdown {
    #[serde(default)]
    pub clauses: Vec<ClauseAnalysis>,
}

impl LegalAnalysis {
    /// Number of risks the analysis flagged
    pub fn risk_count(&self) -> usize {
        self.risks.len()
    }

    /// Number of deadlines the analysis flagged
    pub fn deadline_count(&self) -> usize {
        self.deadlines.len()
    }
}
