//! Metadata store trait and implementations.

use crate::error::{MetadataError, MetadataResult};
use crate::repos::{OverrideRepo, UserRepo};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Combined metadata store trait.
#[async_trait]
pub trait MetadataStore: UserRepo + OverrideRepo + Send + Sync {
    /// Run database migrations.
    async fn migrate(&self) -> MetadataResult<()>;

    /// Check database connectivity and health.
    async fn health_check(&self) -> MetadataResult<()>;
}

/// SQLite-based metadata store.
pub struct SqliteStore {
    pool: Pool<Sqlite>,
}

impl SqliteStore {
    /// Create a new SQLite store and apply the schema.
    pub async fn new(
        path: impl AsRef<Path>,
        busy_timeout_secs: Option<u64>,
    ) -> MetadataResult<Self> {
        let path = path.as_ref();
        let busy_timeout = Duration::from_secs(busy_timeout_secs.unwrap_or(30));

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}?mode=rwc", path.display()))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
            .foreign_keys(true)
            .busy_timeout(busy_timeout);

        let pool = SqlitePoolOptions::new()
            // A single connection serializes writers, which makes the
            // read-then-write override transaction atomic.
            .max_connections(1)
            .connect_with(opts)
            .await?;

        let store = Self { pool };
        store.migrate().await?;

        tracing::debug!(
            path = %path.display(),
            busy_timeout_secs = busy_timeout.as_secs(),
            "SQLite metadata store opened"
        );

        Ok(store)
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }
}

#[async_trait]
impl MetadataStore for SqliteStore {
    async fn migrate(&self) -> MetadataResult<()> {
        sqlx::query(SCHEMA_SQL).execute(&self.pool).await?;
        Ok(())
    }

    async fn health_check(&self) -> MetadataResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

// Implement the repository traits for SqliteStore
mod sqlite_impl {
    use super::*;
    use crate::models::*;
    use dayoff_core::{DayKey, OverrideStatus};
    use time::OffsetDateTime;

    #[async_trait]
    impl UserRepo for SqliteStore {
        async fn create_user_if_absent(&self, user: &UserRow) -> MetadataResult<bool> {
            match sqlx::query(
                r#"
                INSERT INTO users (username, token_hash, created_at)
                VALUES (?, ?, ?)
                ON CONFLICT(username) DO NOTHING
                "#,
            )
            .bind(&user.username)
            .bind(&user.token_hash)
            .bind(user.created_at)
            .execute(&self.pool)
            .await
            {
                Ok(result) => Ok(result.rows_affected() == 1),
                Err(sqlx::Error::Database(db_err)) => {
                    let msg = db_err.message();
                    // SQLite error: "UNIQUE constraint failed: users.token_hash"
                    if msg.contains("UNIQUE constraint") && msg.contains("token_hash") {
                        Err(MetadataError::Constraint(
                            "token hash already in use".to_string(),
                        ))
                    } else {
                        Err(sqlx::Error::Database(db_err).into())
                    }
                }
                Err(e) => Err(e.into()),
            }
        }

        async fn get_user(&self, username: &str) -> MetadataResult<Option<UserRow>> {
            let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE username = ?")
                .bind(username)
                .fetch_optional(&self.pool)
                .await?;
            Ok(row)
        }

        async fn find_user_with_token(
            &self,
            username: &str,
            token_hash: &str,
        ) -> MetadataResult<Option<UserRow>> {
            let row = sqlx::query_as::<_, UserRow>(
                "SELECT * FROM users WHERE username = ? AND token_hash = ?",
            )
            .bind(username)
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .await?;
            Ok(row)
        }

        async fn count_users(&self) -> MetadataResult<u64> {
            let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
                .fetch_one(&self.pool)
                .await?;
            Ok(count as u64)
        }
    }

    #[async_trait]
    impl OverrideRepo for SqliteStore {
        async fn get_override(
            &self,
            username: &str,
            day: &DayKey,
        ) -> MetadataResult<Option<OverrideRow>> {
            let row = sqlx::query_as::<_, OverrideRow>(
                "SELECT * FROM overrides WHERE username = ? AND day = ?",
            )
            .bind(username)
            .bind(day.as_str())
            .fetch_optional(&self.pool)
            .await?;
            Ok(row)
        }

        async fn upsert_override(
            &self,
            username: &str,
            day: &DayKey,
            status: OverrideStatus,
            now: OffsetDateTime,
        ) -> MetadataResult<UpsertOutcome> {
            let mut tx = self.pool.begin().await?;

            let current: Option<i64> =
                sqlx::query_scalar("SELECT status FROM overrides WHERE username = ? AND day = ?")
                    .bind(username)
                    .bind(day.as_str())
                    .fetch_optional(&mut *tx)
                    .await?;

            let outcome = match current {
                None => {
                    sqlx::query(
                        r#"
                        INSERT INTO overrides (username, day, status, created_at, updated_at)
                        VALUES (?, ?, ?, ?, ?)
                        "#,
                    )
                    .bind(username)
                    .bind(day.as_str())
                    .bind(status.code())
                    .bind(now)
                    .bind(now)
                    .execute(&mut *tx)
                    .await?;
                    UpsertOutcome::Created
                }
                Some(code) if code == status.code() => UpsertOutcome::Unchanged,
                Some(_) => {
                    sqlx::query(
                        "UPDATE overrides SET status = ?, updated_at = ? WHERE username = ? AND day = ?",
                    )
                    .bind(status.code())
                    .bind(now)
                    .bind(username)
                    .bind(day.as_str())
                    .execute(&mut *tx)
                    .await?;
                    UpsertOutcome::Updated
                }
            };

            tx.commit().await?;
            Ok(outcome)
        }

        async fn list_overrides(&self, username: &str) -> MetadataResult<Vec<OverrideRow>> {
            let rows = sqlx::query_as::<_, OverrideRow>(
                "SELECT * FROM overrides WHERE username = ? ORDER BY day",
            )
            .bind(username)
            .fetch_all(&self.pool)
            .await?;
            Ok(rows)
        }
    }
}

/// SQL schema for SQLite.
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    username TEXT PRIMARY KEY,
    token_hash TEXT NOT NULL UNIQUE,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS overrides (
    username TEXT NOT NULL REFERENCES users(username),
    day TEXT NOT NULL CHECK (length(day) = 8 AND day GLOB '20[0-9][0-9][0-9][0-9][0-9][0-9]'),
    status INTEGER NOT NULL CHECK (status IN (-1, 0, 1)),
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    PRIMARY KEY (username, day)
);
"#;
