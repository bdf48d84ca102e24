use chrono::Utc;
use sqlx::SqlitePool;

use super::{new_id, timestamp};
use crate::models::{DbConversation, DbMessage};

const CONVERSATION_COLUMNS: &str = "id, user_id, document_id, title, created_at, updated_at";

pub async fn create_conversation(
    pool: &SqlitePool,
    user_id: &str,
    document_id: Option<&str>,
    title: &str,
) -> Result<DbConversation, sqlx::Error> {
    let id = new_id();
    let now = timestamp(Utc::now());

    sqlx::query(
        r#"
        INSERT INTO chat_conversations (id, user_id, document_id, title, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(user_id)
    .bind(document_id)
    .bind(title)
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await?;

    find_owned(pool, &id, user_id).await?.ok_or(sqlx::Error::RowNotFound)
}

/// The user's conversations, most recently active first
pub async fn list_for_user(pool: &SqlitePool, user_id: &str) -> Result<Vec<DbConversation>, sqlx::Error> {
    sqlx::query_as(&format!(
        "SELECT {CONVERSATION_COLUMNS} FROM chat_conversations WHERE user_id = ? ORDER BY updated_at DESC, rowid DESC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn find_owned(
    pool: &SqlitePool,
    id: &str,
    user_id: &str,
) -> Result<Option<DbConversation>, sqlx::Error> {
    sqlx::query_as(&format!(
        "SELECT {CONVERSATION_COLUMNS} FROM chat_conversations WHERE id = ? AND user_id = ?"
    ))
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// Messages of a conversation in the order they were written
pub async fn list_messages(pool: &SqlitePool, conversation_id: &str) -> Result<Vec<DbMessage>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT id, conversation_id, role, content, created_at
        FROM chat_messages
        WHERE conversation_id = ?
        ORDER BY created_at, rowid
        "#,
    )
    .bind(conversation_id)
    .fetch_all(pool)
    .await
}

/// Append a message and bump the conversation's activity time
pub async fn add_message(
    pool: &SqlitePool,
    conversation_id: &str,
    role: &str,
    content: &str,
) -> Result<DbMessage, sqlx::Error> {
    let id = new_id();
    let now = Utc::now();
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO chat_messages (id, conversation_id, role, content, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(conversation_id)
    .bind(role)
    .bind(content)
    .bind(timestamp(now))
    .execute(&mut *tx)
    .await?;

    sqlx::query("UPDATE chat_conversations SET updated_at = ? WHERE id = ?")
        .bind(timestamp(now))
        .bind(conversation_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(DbMessage {
        id,
        conversation_id: conversation_id.to_string(),
        role: role.to_string(),
        content: content.to_string(),
        created_at: now,
    })
}
