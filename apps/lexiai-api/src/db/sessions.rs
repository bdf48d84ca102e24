use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use super::timestamp;

/// JSON stored in `sessions.sess`
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionData {
    user_id: String,
}

pub async fn create(
    pool: &SqlitePool,
    sid: &str,
    user_id: &str,
    expire: DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    let sess = serde_json::to_string(&SessionData {
        user_id: user_id.to_string(),
    })
    .map_err(|e| sqlx::Error::Encode(Box::new(e)))?;

    sqlx::query("INSERT INTO sessions (sid, sess, expire) VALUES (?, ?, ?)")
        .bind(sid)
        .bind(sess)
        .bind(timestamp(expire))
        .execute(pool)
        .await?;
    Ok(())
}

/// User bound to an unexpired session
pub async fn find_user_id(pool: &SqlitePool, sid: &str) -> Result<Option<String>, sqlx::Error> {
    let row: Option<(String,)> = sqlx::query_as("SELECT sess FROM sessions WHERE sid = ? AND expire > ?")
        .bind(sid)
        .bind(timestamp(Utc::now()))
        .fetch_optional(pool)
        .await?;

    Ok(row.and_then(|(sess,)| match serde_json::from_str::<SessionData>(&sess) {
        Ok(data) => Some(data.user_id),
        Err(e) => {
            tracing::warn!(sid, error = %e, "discarding unreadable session");
            None
        }
    }))
}

pub async fn delete(pool: &SqlitePool, sid: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM sessions WHERE sid = ?")
        .bind(sid)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn purge_expired(pool: &SqlitePool) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM sessions WHERE expire <= ?")
        .bind(timestamp(Utc::now()))
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
