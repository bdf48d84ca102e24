use std::path::Path;

use anyhow::Context;
use chrono::Utc;
use sqlx::SqlitePool;

use super::{new_id, timestamp};
use crate::models::{DbGlossaryTerm, GlossaryTermInput};

const TERM_COLUMNS: &str = "id, term, definition, simplified_definition, category, examples, created_at";

pub async fn list(pool: &SqlitePool) -> Result<Vec<DbGlossaryTerm>, sqlx::Error> {
    sqlx::query_as(&format!("SELECT {TERM_COLUMNS} FROM glossary_terms ORDER BY term"))
        .fetch_all(pool)
        .await
}

/// Case-insensitive lookup by term
pub async fn find(pool: &SqlitePool, term: &str) -> Result<Option<DbGlossaryTerm>, sqlx::Error> {
    sqlx::query_as(&format!("SELECT {TERM_COLUMNS} FROM glossary_terms WHERE term = ?"))
        .bind(term.trim())
        .fetch_optional(pool)
        .await
}

/// Insert a term, replacing the definition of an existing one
pub async fn upsert(pool: &SqlitePool, input: &GlossaryTermInput) -> Result<(), sqlx::Error> {
    let examples =
        serde_json::to_string(&input.examples).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;

    sqlx::query(
        r#"
        INSERT INTO glossary_terms (id, term, definition, simplified_definition, category, examples, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(term) DO UPDATE SET
            definition = excluded.definition,
            simplified_definition = excluded.simplified_definition,
            category = excluded.category,
            examples = excluded.examples
        "#,
    )
    .bind(new_id())
    .bind(input.term.trim())
    .bind(&input.definition)
    .bind(&input.simplified_definition)
    .bind(input.category.as_deref())
    .bind(examples)
    .bind(timestamp(Utc::now()))
    .execute(pool)
    .await?;

    Ok(())
}

/// Load a JSON array of terms, returning how many were written
pub async fn load_file(pool: &SqlitePool, path: &Path) -> anyhow::Result<usize> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading glossary file {}", path.display()))?;
    let terms: Vec<GlossaryTermInput> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing glossary file {}", path.display()))?;

    for term in &terms {
        upsert(pool, term).await?;
    }

    Ok(terms.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GlossaryTermResponse;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    use crate::db::test_pool;

    fn indemnify() -> GlossaryTermInput {
        GlossaryTermInput {
            term: "Indemnify".into(),
            definition: "To compensate for harm or loss.".into(),
            simplified_definition: "To pay someone back if something goes wrong.".into(),
            category: Some("contract".into()),
            examples: vec!["The tenant shall indemnify the landlord.".into()],
        }
    }

    #[tokio::test]
    async fn empty_glossary_lists_nothing() {
        let pool = test_pool::memory().await;
        assert!(list(&pool).await.unwrap().is_empty());
        assert!(find(&pool, "Escrow").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn lookup_ignores_case() {
        let pool = test_pool::memory().await;
        upsert(&pool, &indemnify()).await.unwrap();

        let term = find(&pool, "indemnify").await.unwrap().unwrap();
        let response = GlossaryTermResponse::from(term);
        assert_eq!(response.term, "Indemnify");
        assert_eq!(response.examples.len(), 1);
    }

    #[tokio::test]
    async fn upsert_replaces_definition() {
        let pool = test_pool::memory().await;
        upsert(&pool, &indemnify()).await.unwrap();

        let mut updated = indemnify();
        updated.simplified_definition = "To cover someone's losses.".into();
        upsert(&pool, &updated).await.unwrap();

        let terms = list(&pool).await.unwrap();
        assert_eq!(terms.len(), 1);
        assert_eq!(terms[0].simplified_definition, "To cover someone's losses.");
    }

    #[tokio::test]
    async fn glossary_file_is_loaded() {
        let pool = test_pool::memory().await;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"term": "Lessee", "definition": "The party leasing property.", "simplifiedDefinition": "The tenant."}},
                {{"term": "Escrow", "definition": "Funds held by a third party.", "simplifiedDefinition": "Money held safely until a deal closes.", "category": "property"}}
            ]"#
        )
        .unwrap();

        assert_eq!(load_file(&pool, file.path()).await.unwrap(), 2);
        assert_eq!(list(&pool).await.unwrap()[0].term, "Escrow");
    }
}
