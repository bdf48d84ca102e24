use chrono::Utc;
use shared_types::{ClauseAnalysis, DocumentStatus, LegalAnalysis};
use sqlx::SqlitePool;

use super::{new_id, timestamp};
use crate::models::{DashboardStats, DbAnalysis, DbClause, DbDocument};

const DOCUMENT_COLUMNS: &str = "id, user_id, title, file_name, file_size, file_type, file_path, \
     status, created_at, updated_at";

pub struct NewDocument<'a> {
    pub id: &'a str,
    pub user_id: &'a str,
    pub title: &'a str,
    pub file_name: &'a str,
    pub file_size: i64,
    pub file_type: &'a str,
    pub file_path: &'a str,
}

/// Insert a document in the `processing` state
pub async fn create(pool: &SqlitePool, doc: NewDocument<'_>) -> Result<(), sqlx::Error> {
    let now = timestamp(Utc::now());

    sqlx::query(
        r#"
        INSERT INTO documents (id, user_id, title, file_name, file_size, file_type, file_path, status, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(doc.id)
    .bind(doc.user_id)
    .bind(doc.title)
    .bind(doc.file_name)
    .bind(doc.file_size)
    .bind(doc.file_type)
    .bind(doc.file_path)
    .bind(DocumentStatus::Processing.as_str())
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await?;

    Ok(())
}

/// Fetch a document only if `user_id` owns it
pub async fn find_owned(
    pool: &SqlitePool,
    id: &str,
    user_id: &str,
) -> Result<Option<DbDocument>, sqlx::Error> {
    sqlx::query_as(&format!(
        "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = ? AND user_id = ?"
    ))
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// The user's documents, newest first
pub async fn list_for_user(pool: &SqlitePool, user_id: &str) -> Result<Vec<DbDocument>, sqlx::Error> {
    sqlx::query_as(&format!(
        "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE user_id = ? ORDER BY created_at DESC, rowid DESC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn set_status(pool: &SqlitePool, id: &str, status: DocumentStatus) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE documents SET status = ?, updated_at = ? WHERE id = ?")
        .bind(status.as_str())
        .bind(timestamp(Utc::now()))
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Persist analysis and clauses and mark the document analyzed, atomically
///
/// Clauses are numbered from 1 in the order given.
pub async fn complete_analysis(
    pool: &SqlitePool,
    document_id: &str,
    analysis: &LegalAnalysis,
    clauses: &[ClauseAnalysis],
) -> Result<(), sqlx::Error> {
    let now = timestamp(Utc::now());
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO document_analysis (id, document_id, summary, risk_level, obligations, risks, deadlines, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(new_id())
    .bind(document_id)
    .bind(&analysis.summary)
    .bind(analysis.risk_level.as_str())
    .bind(to_json(&analysis.obligations)?)
    .bind(to_json(&analysis.risks)?)
    .bind(to_json(&analysis.deadlines)?)
    .bind(&now)
    .execute(&mut *tx)
    .await?;

    for (index, clause) in clauses.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO clauses (id, document_id, original_text, simplified_text, clause_type, risk_level, explanation, actionable_advice, position, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(new_id())
        .bind(document_id)
        .bind(&clause.original_text)
        .bind(&clause.simplified_text)
        .bind(clause.clause_type.as_str())
        .bind(clause.risk_level.map(|level| level.as_str()))
        .bind(&clause.explanation)
        .bind(clause.actionable_advice.as_deref())
        .bind(index as i64 + 1)
        .bind(&now)
        .execute(&mut *tx)
        .await?;
    }

    sqlx::query("UPDATE documents SET status = ?, updated_at = ? WHERE id = ?")
        .bind(DocumentStatus::Analyzed.as_str())
        .bind(&now)
        .bind(document_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await
}

pub async fn find_analysis(pool: &SqlitePool, document_id: &str) -> Result<Option<DbAnalysis>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT id, document_id, summary, risk_level, obligations, risks, deadlines, created_at
        FROM document_analysis
        WHERE document_id = ?
        "#,
    )
    .bind(document_id)
    .fetch_optional(pool)
    .await
}

pub async fn list_clauses(pool: &SqlitePool, document_id: &str) -> Result<Vec<DbClause>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT id, document_id, original_text, simplified_text, clause_type, risk_level,
               explanation, actionable_advice, position, created_at
        FROM clauses
        WHERE document_id = ?
        ORDER BY position
        "#,
    )
    .bind(document_id)
    .fetch_all(pool)
    .await
}

/// Document counts plus risks and deadlines summed over analyzed documents
pub async fn dashboard_stats(pool: &SqlitePool, user_id: &str) -> Result<DashboardStats, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT
            COUNT(d.id) AS total_documents,
            COALESCE(SUM(CASE WHEN d.status = 'analyzed' THEN 1 ELSE 0 END), 0) AS documents_analyzed,
            COALESCE(SUM(CASE WHEN d.status = 'analyzed' THEN json_array_length(a.risks) ELSE 0 END), 0) AS risks_identified,
            COALESCE(SUM(CASE WHEN d.status = 'analyzed' THEN json_array_length(a.deadlines) ELSE 0 END), 0) AS pending_deadlines
        FROM documents d
        LEFT JOIN document_analysis a ON a.document_id = d.id
        WHERE d.user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, sqlx::Error> {
    serde_json::to_string(value).map_err(|e| sqlx::Error::Encode(Box::new(e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use pretty_assertions::assert_eq;
    use shared_types::{ClauseType, Deadline, DeadlineType, Level, Risk};

    fn analysis() -> LegalAnalysis {
        LegalAnalysis {
            summary: "Twelve month lease".into(),
            risk_level: Level::High,
            obligations: vec![],
            risks: vec![Risk {
                text: "forfeit the security deposit".into(),
                simplified: "You lose your deposit if you leave early".into(),
                risk_level: Level::High,
                potential_impact: "$1,200".into(),
            }],
            deadlines: vec![deadline(), deadline()],
        }
    }

    fn clause(text: &str) -> ClauseAnalysis {
        ClauseAnalysis {
            original_text: text.into(),
            simplified_text: format!("plain {text}"),
            clause_type: ClauseType::Obligation,
            risk_level: None,
            explanation: "why".into(),
            actionable_advice: Some("do it".into()),
        }
    }

    fn deadline() -> Deadline {
        Deadline {
            text: "sixty (60) days prior to expiration".into(),
            simplified: "Give notice 60 days before the lease ends".into(),
            deadline_type: DeadlineType::Notice,
            urgency: Level::Low,
        }
    }

    async fn seeded_document(pool: &SqlitePool) -> (String, String) {
        let user = test_pool::user(pool, "owner@example.com").await;
        let id = new_id();
        create(
            pool,
            NewDocument {
                id: &id,
                user_id: &user.id,
                title: "Lease",
                file_name: "lease.txt",
                file_size: 42,
                file_type: "text/plain",
                file_path: "/tmp/lease",
            },
        )
        .await
        .unwrap();
        (user.id, id)
    }

    #[tokio::test]
    async fn new_documents_start_processing() {
        let pool = test_pool::memory().await;
        let (user_id, id) = seeded_document(&pool).await;

        let doc = find_owned(&pool, &id, &user_id).await.unwrap().unwrap();
        assert_eq!(doc.status(), DocumentStatus::Processing);
    }

    #[tokio::test]
    async fn other_users_cannot_find_document() {
        let pool = test_pool::memory().await;
        let (_, id) = seeded_document(&pool).await;
        let stranger = test_pool::user(&pool, "stranger@example.com").await;

        assert!(find_owned(&pool, &id, &stranger.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn completing_analysis_writes_everything_and_flips_status() {
        let pool = test_pool::memory().await;
        let (user_id, id) = seeded_document(&pool).await;

        complete_analysis(&pool, &id, &analysis(), &[clause("first"), clause("second")])
            .await
            .unwrap();

        let doc = find_owned(&pool, &id, &user_id).await.unwrap().unwrap();
        assert_eq!(doc.status(), DocumentStatus::Analyzed);

        let stored = find_analysis(&pool, &id).await.unwrap().unwrap();
        assert_eq!(stored.to_analysis().unwrap(), analysis());

        let clauses = list_clauses(&pool, &id).await.unwrap();
        let order: Vec<(i64, &str)> = clauses
            .iter()
            .map(|c| (c.position, c.original_text.as_str()))
            .collect();
        assert_eq!(order, vec![(1, "first"), (2, "second")]);
    }

    #[tokio::test]
    async fn failed_transaction_leaves_no_partial_rows() {
        let pool = test_pool::memory().await;
        let (user_id, id) = seeded_document(&pool).await;

        complete_analysis(&pool, &id, &analysis(), &[]).await.unwrap();
        // The analysis row is unique per document, so a second run must roll back
        let err = complete_analysis(&pool, &id, &analysis(), &[clause("late")]).await;
        assert!(err.is_err());

        assert!(list_clauses(&pool, &id).await.unwrap().is_empty());
        let doc = find_owned(&pool, &id, &user_id).await.unwrap().unwrap();
        assert_eq!(doc.status(), DocumentStatus::Analyzed);
    }

    #[tokio::test]
    async fn dashboard_counts_only_analyzed_documents() {
        let pool = test_pool::memory().await;
        let (user_id, id) = seeded_document(&pool).await;

        let stats = dashboard_stats(&pool, &user_id).await.unwrap();
        assert_eq!(stats.total_documents, 1);
        assert_eq!(stats.documents_analyzed, 0);
        assert_eq!(stats.risks_identified, 0);

        complete_analysis(&pool, &id, &analysis(), &[]).await.unwrap();

        let stats = dashboard_stats(&pool, &user_id).await.unwrap();
        assert_eq!(
            stats,
            DashboardStats {
                documents_analyzed: 1,
                total_documents: 1,
                risks_identified: 1,
                pending_deadlines: 2,
            }
        );
    }

    #[tokio::test]
    async fn dashboard_for_new_user_is_all_zero() {
        let pool = test_pool::memory().await;
        let user = test_pool::user(&pool, "new@example.com").await;

        assert_eq!(dashboard_stats(&pool, &user.id).await.unwrap(), DashboardStats::default());
    }
}
