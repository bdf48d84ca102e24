use chrono::Utc;
use sqlx::SqlitePool;

use super::{new_id, timestamp};
use crate::models::DbUser;

const USER_COLUMNS: &str = "id, email, password, first_name, last_name, profile_image_url, \
     documents_uploaded, is_paid_user, subscription_tier, is_email_verified, created_at, updated_at";

pub struct NewUser<'a> {
    pub email: &'a str,
    pub password_hash: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
}

pub async fn create(pool: &SqlitePool, user: NewUser<'_>) -> Result<DbUser, sqlx::Error> {
    let id = new_id();
    let now = timestamp(Utc::now());

    sqlx::query(
        r#"
        INSERT INTO users (id, email, password, first_name, last_name, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(user.email)
    .bind(user.password_hash)
    .bind(user.first_name)
    .bind(user.last_name)
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await?;

    find_by_id(pool, &id).await?.ok_or(sqlx::Error::RowNotFound)
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> Result<Option<DbUser>, sqlx::Error> {
    sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<DbUser>, sqlx::Error> {
    sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?"))
        .bind(email)
        .fetch_optional(pool)
        .await
}

/// Count one more upload against the user
pub async fn increment_documents_uploaded(pool: &SqlitePool, id: &str) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE users SET documents_uploaded = documents_uploaded + 1, updated_at = ? WHERE id = ?",
    )
    .bind(timestamp(Utc::now()))
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use pretty_assertions::assert_eq;

    fn sample(email: &str) -> NewUser<'_> {
        NewUser {
            email,
            password_hash: "$2b$04$hash",
            first_name: "Ada",
            last_name: "Lovelace",
        }
    }

    #[tokio::test]
    async fn new_users_get_free_tier_defaults() {
        let pool = test_pool::memory().await;
        let user = create(&pool, sample("ada@example.com")).await.unwrap();

        assert_eq!(user.documents_uploaded, 0);
        assert_eq!(user.subscription_tier, "free");
        assert!(!user.is_paid_user);
        assert!(!user.is_email_verified);
    }

    #[tokio::test]
    async fn duplicate_email_is_a_unique_violation() {
        let pool = test_pool::memory().await;
        create(&pool, sample("ada@example.com")).await.unwrap();

        let err = create(&pool, sample("ada@example.com")).await.unwrap_err();
        let db_err = err.as_database_error().unwrap();
        assert!(db_err.is_unique_violation());
    }

    #[tokio::test]
    async fn upload_counter_increments_in_place() {
        let pool = test_pool::memory().await;
        let user = create(&pool, sample("ada@example.com")).await.unwrap();

        increment_documents_uploaded(&pool, &user.id).await.unwrap();
        increment_documents_uploaded(&pool, &user.id).await.unwrap();

        let user = find_by_email(&pool, "ada@example.com").await.unwrap().unwrap();
        assert_eq!(user.documents_uploaded, 2);
    }
}
