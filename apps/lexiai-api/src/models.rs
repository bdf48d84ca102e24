//! Data models for the LexiAI API
//!
//! `Db*` structs mirror table rows; the remaining types are the camelCase
//! JSON bodies the API accepts and returns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::{
    ClauseAnalysis, ClauseType, Deadline, DocumentStatus, LegalAnalysis, Level, Obligation, Risk,
};
use sqlx::FromRow;

// ============================================================
// Database rows
// ============================================================

#[derive(Debug, Clone, FromRow)]
pub struct DbUser {
    pub id: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub profile_image_url: Option<String>,
    pub documents_uploaded: i64,
    pub is_paid_user: bool,
    pub subscription_tier: String,
    pub is_email_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct DbDocument {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub file_name: String,
    pub file_size: i64,
    pub file_type: String,
    pub file_path: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DbDocument {
    pub fn status(&self) -> DocumentStatus {
        self.status.parse().unwrap_or(DocumentStatus::Error)
    }
}

/// Analysis row; the three lists are stored as JSON text
#[derive(Debug, Clone, FromRow)]
pub struct DbAnalysis {
    pub id: String,
    pub document_id: String,
    pub summary: String,
    pub risk_level: String,
    pub obligations: String,
    pub risks: String,
    pub deadlines: String,
    pub created_at: DateTime<Utc>,
}

impl DbAnalysis {
    pub fn to_analysis(&self) -> Result<LegalAnalysis, serde_json::Error> {
        Ok(LegalAnalysis {
            summary: self.summary.clone(),
            risk_level: Level::parse(&self.risk_level).unwrap_or_default(),
            obligations: serde_json::from_str(&self.obligations)?,
            risks: serde_json::from_str(&self.risks)?,
            deadlines: serde_json::from_str(&self.deadlines)?,
        })
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct DbClause {
    pub id: String,
    pub document_id: String,
    pub original_text: String,
    pub simplified_text: String,
    pub clause_type: String,
    pub risk_level: Option<String>,
    pub explanation: String,
    pub actionable_advice: Option<String>,
    pub position: i64,
    pub created_at: DateTime<Utc>,
}

impl DbClause {
    pub fn to_clause(&self) -> ClauseAnalysis {
        ClauseAnalysis {
            original_text: self.original_text.clone(),
            simplified_text: self.simplified_text.clone(),
            clause_type: ClauseType::from(Some(self.clause_type.clone())),
            risk_level: self.risk_level.as_deref().and_then(Level::parse),
            explanation: self.explanation.clone(),
            actionable_advice: self.actionable_advice.clone(),
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct DbConversation {
    pub id: String,
    pub user_id: String,
    pub document_id: Option<String>,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct DbMessage {
    pub id: String,
    pub conversation_id: String,
    pub role: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct DbGlossaryTerm {
    pub id: String,
    pub term: String,
    pub definition: String,
    pub simplified_definition: String,
    pub category: Option<String>,
    pub examples: String,
    pub created_at: DateTime<Utc>,
}

// ============================================================
// Requests
// ============================================================

/// Signup body; fields are optional so missing ones get a 400, not a 422
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateConversationRequest {
    pub title: Option<String>,
    pub document_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SendMessageRequest {
    pub content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateUiRequest {
    pub content: Option<String>,
    pub target_language: Option<String>,
}

/// `?lang=` query parameter
#[derive(Debug, Default, Deserialize)]
pub struct LangQuery {
    pub lang: Option<String>,
}

/// Glossary entry as loaded from a glossary file
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlossaryTermInput {
    pub term: String,
    pub definition: String,
    pub simplified_definition: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub examples: Vec<String>,
}

// ============================================================
// Responses
// ============================================================

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<&DbUser> for UserSummary {
    fn from(user: &DbUser) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub user: UserSummary,
    pub token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub profile_image_url: Option<String>,
    pub documents_uploaded: i64,
    pub is_paid_user: bool,
    pub subscription_tier: String,
}

impl From<DbUser> for UserProfile {
    fn from(user: DbUser) -> Self {
        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            profile_image_url: user.profile_image_url,
            documents_uploaded: user.documents_uploaded,
            is_paid_user: user.is_paid_user,
            subscription_tier: user.subscription_tier,
        }
    }
}

/// Document metadata; the on-disk path stays server-side
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentResponse {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub file_name: String,
    pub file_size: i64,
    pub file_type: String,
    pub status: DocumentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DbDocument> for DocumentResponse {
    fn from(doc: DbDocument) -> Self {
        Self {
            status: doc.status(),
            id: doc.id,
            user_id: doc.user_id,
            title: doc.title,
            file_name: doc.file_name,
            file_size: doc.file_size,
            file_type: doc.file_type,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    pub id: String,
    pub document_id: String,
    pub summary: String,
    pub risk_level: Level,
    pub obligations: Vec<Obligation>,
    pub risks: Vec<Risk>,
    pub deadlines: Vec<Deadline>,
    pub created_at: DateTime<Utc>,
}

impl AnalysisResponse {
    /// Combine row identity with (possibly translated) analysis content
    pub fn new(row: &DbAnalysis, analysis: LegalAnalysis) -> Self {
        Self {
            id: row.id.clone(),
            document_id: row.document_id.clone(),
            summary: analysis.summary,
            risk_level: analysis.risk_level,
            obligations: analysis.obligations,
            risks: analysis.risks,
            deadlines: analysis.deadlines,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClauseResponse {
    pub id: String,
    pub document_id: String,
    pub original_text: String,
    pub simplified_text: String,
    pub clause_type: ClauseType,
    pub risk_level: Option<Level>,
    pub explanation: String,
    pub actionable_advice: Option<String>,
    pub position: i64,
    pub created_at: DateTime<Utc>,
}

impl ClauseResponse {
    pub fn new(row: &DbClause, clause: ClauseAnalysis) -> Self {
        Self {
            id: row.id.clone(),
            document_id: row.document_id.clone(),
            original_text: clause.original_text,
            simplified_text: clause.simplified_text,
            clause_type: clause.clause_type,
            risk_level: clause.risk_level,
            explanation: clause.explanation,
            actionable_advice: clause.actionable_advice,
            position: row.position,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DocumentDetail {
    pub document: DocumentResponse,
    pub analysis: Option<AnalysisResponse>,
    pub clauses: Vec<ClauseResponse>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub message: String,
    pub document_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationResponse {
    pub id: String,
    pub user_id: String,
    pub document_id: Option<String>,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DbConversation> for ConversationResponse {
    fn from(conv: DbConversation) -> Self {
        Self {
            id: conv.id,
            user_id: conv.user_id,
            document_id: conv.document_id,
            title: conv.title,
            created_at: conv.created_at,
            updated_at: conv.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageResponse {
    pub id: String,
    pub conversation_id: String,
    pub role: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<DbMessage> for ChatMessageResponse {
    fn from(msg: DbMessage) -> Self {
        Self {
            id: msg.id,
            conversation_id: msg.conversation_id,
            role: msg.role,
            content: msg.content,
            created_at: msg.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeResponse {
    pub user_message: ChatMessageResponse,
    pub ai_message: ChatMessageResponse,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlossaryTermResponse {
    pub id: String,
    pub term: String,
    pub definition: String,
    pub simplified_definition: String,
    pub category: Option<String>,
    pub examples: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<DbGlossaryTerm> for GlossaryTermResponse {
    fn from(term: DbGlossaryTerm) -> Self {
        Self {
            examples: serde_json::from_str(&term.examples).unwrap_or_default(),
            id: term.id,
            term: term.term,
            definition: term.definition,
            simplified_definition: term.simplified_definition,
            category: term.category,
            created_at: term.created_at,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub documents_analyzed: i64,
    pub total_documents: i64,
    pub risks_identified: i64,
    pub pending_deadlines: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateUiResponse {
    pub translated_content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn analysis_row() -> DbAnalysis {
        DbAnalysis {
            id: "a1".into(),
            document_id: "d1".into(),
            summary: "Lease".into(),
            risk_level: "HIGH".into(),
            obligations: r#"[{"text":"Pay","simplified":"Pay rent","importance":"high"}]"#.into(),
            risks: "[]".into(),
            deadlines: r#"[{"text":"Notice","simplified":"60 days","deadline_type":"renewal","urgency":"low"}]"#.into(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn analysis_row_decodes_stored_lists() {
        let analysis = analysis_row().to_analysis().unwrap();
        assert_eq!(analysis.risk_level, Level::High);
        assert_eq!(analysis.obligations.len(), 1);
        assert_eq!(analysis.deadline_count(), 1);
    }

    #[test]
    fn analysis_response_uses_camel_case_envelope() {
        let row = analysis_row();
        let json = serde_json::to_value(AnalysisResponse::new(&row, row.to_analysis().unwrap())).unwrap();
        assert_eq!(json["documentId"], "d1");
        assert_eq!(json["riskLevel"], "high");
        assert_eq!(json["deadlines"][0]["deadline_type"], "renewal");
    }

    #[test]
    fn unknown_status_reads_as_error() {
        let doc = DbDocument {
            id: "d".into(),
            user_id: "u".into(),
            title: "t".into(),
            file_name: "f.txt".into(),
            file_size: 1,
            file_type: "text/plain".into(),
            file_path: "/tmp/f".into(),
            status: "exploded".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(doc.status(), DocumentStatus::Error);
    }

    #[test]
    fn glossary_examples_tolerate_bad_json() {
        let term = DbGlossaryTerm {
            id: "g".into(),
            term: "Indemnify".into(),
            definition: "d".into(),
            simplified_definition: "s".into(),
            category: None,
            examples: "not json".into(),
            created_at: Utc::now(),
        };
        let response = GlossaryTermResponse::from(term);
        assert!(response.examples.is_empty());
    }
}
