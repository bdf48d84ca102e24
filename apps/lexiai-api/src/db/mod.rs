//! SQLite persistence
//!
//! Schema is created idempotently at startup. Timestamps are stored as
//! fixed-width RFC 3339 text (microsecond precision, `Z` suffix) so that
//! lexical order matches chronological order.

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::SqlitePool;

pub mod chat;
pub mod documents;
pub mod glossary;
pub mod sessions;
pub mod users;

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY,
        email TEXT NOT NULL UNIQUE,
        password TEXT NOT NULL,
        first_name TEXT NOT NULL,
        last_name TEXT NOT NULL,
        profile_image_url TEXT,
        documents_uploaded INTEGER NOT NULL DEFAULT 0,
        is_paid_user INTEGER NOT NULL DEFAULT 0,
        subscription_tier TEXT NOT NULL DEFAULT 'free',
        is_email_verified INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS documents (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL REFERENCES users(id),
        title TEXT NOT NULL,
        file_name TEXT NOT NULL,
        file_size INTEGER NOT NULL,
        file_type TEXT NOT NULL,
        file_path TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'processing',
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_documents_user ON documents(user_id)",
    r#"
    CREATE TABLE IF NOT EXISTS document_analysis (
        id TEXT PRIMARY KEY,
        document_id TEXT NOT NULL UNIQUE REFERENCES documents(id) ON DELETE CASCADE,
        summary TEXT NOT NULL,
        risk_level TEXT NOT NULL,
        obligations TEXT NOT NULL DEFAULT '[]',
        risks TEXT NOT NULL DEFAULT '[]',
        deadlines TEXT NOT NULL DEFAULT '[]',
        created_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS clauses (
        id TEXT PRIMARY KEY,
        document_id TEXT NOT NULL REFERENCES documents(id) ON DELETE CASCADE,
        original_text TEXT NOT NULL,
        simplified_text TEXT NOT NULL,
        clause_type TEXT NOT NULL,
        risk_level TEXT,
        explanation TEXT NOT NULL,
        actionable_advice TEXT,
        position INTEGER NOT NULL,
        created_at TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_clauses_document ON clauses(document_id, position)",
    r#"
    CREATE TABLE IF NOT EXISTS chat_conversations (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL REFERENCES users(id),
        document_id TEXT REFERENCES documents(id) ON DELETE SET NULL,
        title TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_conversations_user ON chat_conversations(user_id)",
    r#"
    CREATE TABLE IF NOT EXISTS chat_messages (
        id TEXT PRIMARY KEY,
        conversation_id TEXT NOT NULL REFERENCES chat_conversations(id) ON DELETE CASCADE,
        role TEXT NOT NULL CHECK (role IN ('user', 'assistant')),
        content TEXT NOT NULL,
        created_at TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_messages_conversation ON chat_messages(conversation_id, created_at)",
    r#"
    CREATE TABLE IF NOT EXISTS glossary_terms (
        id TEXT PRIMARY KEY,
        term TEXT NOT NULL UNIQUE COLLATE NOCASE,
        definition TEXT NOT NULL,
        simplified_definition TEXT NOT NULL,
        category TEXT,
        examples TEXT NOT NULL DEFAULT '[]',
        created_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS sessions (
        sid TEXT PRIMARY KEY,
        sess TEXT NOT NULL,
        expire TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_session_expire ON sessions(expire)",
];

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    tracing::info!("Running database migrations...");

    for statement in MIGRATIONS {
        sqlx::query(statement).execute(pool).await?;
    }

    tracing::info!("Migrations complete");
    Ok(())
}

/// Storage form of a timestamp
pub fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
pub(crate) mod test_pool {
    use sqlx::sqlite::SqlitePoolOptions;
    use sqlx::SqlitePool;

    /// Single-connection in-memory database with the schema applied
    pub async fn memory() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await.unwrap();
        super::run_migrations(&pool).await.unwrap();
        pool
    }

    pub async fn user(pool: &SqlitePool, email: &str) -> crate::models::DbUser {
        super::users::create(
            pool,
            super::users::NewUser {
                email,
                password_hash: "$2b$04$not-a-real-hash",
                first_name: "Test",
                last_name: "User",
            },
        )
        .await
        .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn timestamps_are_fixed_width() {
        let whole = Utc.with_ymd_and_hms(2024, 1, 5, 9, 0, 0).unwrap();
        assert_eq!(timestamp(whole), "2024-01-05T09:00:00.000000Z");
        assert_eq!(timestamp(whole).len(), timestamp(Utc::now()).len());
    }

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let pool = test_pool::memory().await;
        run_migrations(&pool).await.unwrap();

        let tables: Vec<(String,)> =
            sqlx::query_as("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
                .fetch_all(&pool)
                .await
                .unwrap();
        let names: Vec<&str> = tables.iter().map(|(n,)| n.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "chat_conversations",
                "chat_messages",
                "clauses",
                "document_analysis",
                "documents",
                "glossary_terms",
                "sessions",
                "users",
            ]
        );
    }
}
