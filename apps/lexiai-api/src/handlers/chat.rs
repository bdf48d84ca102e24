//! Conversations with the legal assistant

use std::sync::Arc;

use analysis_engine::{document_context, ChatMessage, Role};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::{required, requested_language, ApiJson};
use crate::auth::AuthUser;
use crate::db;
use crate::error::ApiError;
use crate::models::{
    ChatMessageResponse, ConversationResponse, CreateConversationRequest, DbConversation, DbMessage,
    ExchangeResponse, LangQuery, SendMessageRequest,
};
use crate::state::AppState;

const DEFAULT_TITLE: &str = "New Conversation";

async fn owned_conversation(state: &AppState, id: &str, user_id: &str) -> Result<DbConversation, ApiError> {
    db::chat::find_owned(&state.db, id, user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Conversation not found"))
}

pub async fn list_conversations(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<ConversationResponse>>, ApiError> {
    let conversations = db::chat::list_for_user(&state.db, &user.id).await?;
    Ok(Json(conversations.into_iter().map(ConversationResponse::from).collect()))
}

/// Start a conversation, optionally about one of the caller's documents
pub async fn create_conversation(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    ApiJson(req): ApiJson<CreateConversationRequest>,
) -> Result<(StatusCode, Json<ConversationResponse>), ApiError> {
    let document_id = required(&req.document_id);
    if let Some(document_id) = document_id {
        if db::documents::find_owned(&state.db, document_id, &user.id).await?.is_none() {
            return Err(ApiError::not_found("Document not found"));
        }
    }

    let title = required(&req.title).unwrap_or(DEFAULT_TITLE);
    let conversation = db::chat::create_conversation(&state.db, &user.id, document_id, title).await?;

    Ok((StatusCode::CREATED, Json(ConversationResponse::from(conversation))))
}

pub async fn list_messages(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<ChatMessageResponse>>, ApiError> {
    let conversation = owned_conversation(&state, &id, &user.id).await?;
    let messages = db::chat::list_messages(&state.db, &conversation.id).await?;
    Ok(Json(messages.into_iter().map(ChatMessageResponse::from).collect()))
}

/// Store the question, ask the assistant and store its reply
///
/// The assistant never fails the request; model errors come back as a
/// fallback reply which is stored like any other.
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    Query(query): Query<LangQuery>,
    ApiJson(req): ApiJson<SendMessageRequest>,
) -> Result<Json<ExchangeResponse>, ApiError> {
    let content = required(&req.content).ok_or_else(|| ApiError::bad_request("Message content is required"))?;
    let language = requested_language(query.lang.as_deref())?;
    let conversation = owned_conversation(&state, &id, &user.id).await?;

    let history = to_history(&db::chat::list_messages(&state.db, &conversation.id).await?);
    let user_message = db::chat::add_message(&state.db, &conversation.id, Role::User.as_str(), content).await?;

    let context = conversation_context(&state, &conversation, &user.id).await?;
    let reply = state.assistant.answer(content, &context, &history).await;
    let reply = state.translator.translate_text(&reply, language).await;

    let ai_message = db::chat::add_message(&state.db, &conversation.id, Role::Assistant.as_str(), &reply).await?;

    tracing::debug!(
        conversation_id = %conversation.id,
        turns = history.len() + 2,
        "assistant replied"
    );

    Ok(Json(ExchangeResponse {
        user_message: ChatMessageResponse::from(user_message),
        ai_message: ChatMessageResponse::from(ai_message),
    }))
}

fn to_history(messages: &[DbMessage]) -> Vec<ChatMessage> {
    messages
        .iter()
        .filter_map(|msg| match Role::parse(&msg.role)? {
            Role::User => Some(ChatMessage::user(&msg.content)),
            Role::Assistant => Some(ChatMessage::assistant(&msg.content)),
            Role::System => None,
        })
        .collect()
}

/// Title, summary and clause excerpts of the linked document, if any
async fn conversation_context(
    state: &AppState,
    conversation: &DbConversation,
    user_id: &str,
) -> Result<String, ApiError> {
    let Some(document_id) = conversation.document_id.as_deref() else {
        return Ok(String::new());
    };
    let Some(document) = db::documents::find_owned(&state.db, document_id, user_id).await? else {
        return Ok(String::new());
    };

    let summary = db::documents::find_analysis(&state.db, document_id)
        .await?
        .map(|row| row.summary);
    let clauses = db::documents::list_clauses(&state.db, document_id).await?;

    Ok(document_context(
        &document.title,
        summary.as_deref(),
        clauses.iter().map(|clause| clause.original_text.as_str()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn message(role: &str, content: &str) -> DbMessage {
        DbMessage {
            id: db::new_id(),
            conversation_id: "conv".into(),
            role: role.into(),
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn history_keeps_order_and_roles() {
        let history = to_history(&[
            message("user", "Can I sublet?"),
            message("assistant", "Only with written consent."),
            message("system", "ignored"),
        ]);
        assert_eq!(
            history,
            vec![
                ChatMessage::user("Can I sublet?"),
                ChatMessage::assistant("Only with written consent."),
            ]
        );
    }
}
