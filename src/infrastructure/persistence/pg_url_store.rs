//! PostgreSQL implementation of the URL store.

use std::future::Future;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

use crate::domain::entities::UrlRecord;
use crate::domain::errors::StoreError;
use crate::domain::repositories::UrlStore;

/// Upper bound for establishing the first pool connection.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Upper bound for the liveness ping issued right after connecting.
const PING_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection settings for [`PgUrlStore::connect`].
#[derive(Debug, Clone)]
pub struct PgStoreSettings {
    /// `postgres://` or `postgresql://` connection string.
    pub uri: String,
    /// Database to use; overrides any database named in `uri`.
    pub database: String,
    /// Table holding the records.
    pub table: String,
    pub max_connections: u32,
    /// Deadline applied to every store operation.
    pub operation_timeout: Duration,
}

/// Row shape of the records table.
#[derive(sqlx::FromRow)]
struct UrlRecordRow {
    #[sqlx(rename = "_id")]
    id: String,
    original_url: String,
    short_url: String,
    creation_date: DateTime<Utc>,
}

impl From<UrlRecordRow> for UrlRecord {
    fn from(row: UrlRecordRow) -> Self {
        Self {
            id: row.id,
            original_url: row.original_url,
            short_url: row.short_url,
            creation_date: row.creation_date,
        }
    }
}

/// PostgreSQL store for URL records.
///
/// Records live in one table whose `_id` primary key is the uniqueness
/// authority: a unique violation on insert is reported as
/// [`StoreError::Duplicate`]. Every operation runs under the configured
/// deadline and reports its expiry as [`StoreError::Cancelled`].
pub struct PgUrlStore {
    pool: PgPool,
    operation_timeout: Duration,
    create_table_sql: String,
    insert_sql: String,
    select_sql: String,
}

impl PgUrlStore {
    /// Connects a pool and verifies it with a ping.
    ///
    /// The pool is closed again if the ping fails, so no connection outlives
    /// a failed startup.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the URI is malformed or the database is
    /// unreachable, [`StoreError::Cancelled`] if the ping times out.
    pub async fn connect(settings: &PgStoreSettings) -> Result<Self, StoreError> {
        let options = PgConnectOptions::from_str(&settings.uri)
            .map_err(|e| StoreError::io("connect", e))?
            .database(&settings.database);

        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(CONNECT_TIMEOUT)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::io("connect", e))?;

        let store = Self::from_pool(pool, &settings.table, settings.operation_timeout);

        if let Err(e) = store.ping().await {
            store.close().await;
            return Err(e);
        }

        Ok(store)
    }

    /// Wraps an existing pool.
    pub fn from_pool(pool: PgPool, table: &str, operation_timeout: Duration) -> Self {
        let table = quote_ident(table);

        Self {
            pool,
            operation_timeout,
            create_table_sql: format!(
                "CREATE TABLE IF NOT EXISTS {table} (
                    _id TEXT PRIMARY KEY,
                    original_url TEXT NOT NULL CHECK (original_url <> ''),
                    short_url TEXT NOT NULL,
                    creation_date TIMESTAMPTZ NOT NULL
                )"
            ),
            insert_sql: format!(
                "INSERT INTO {table} (_id, original_url, short_url, creation_date)
                 VALUES ($1, $2, $3, $4)"
            ),
            select_sql: format!(
                "SELECT _id, original_url, short_url, creation_date FROM {table} WHERE _id = $1"
            ),
        }
    }

    /// Checks that the database answers within the ping deadline.
    pub async fn ping(&self) -> Result<(), StoreError> {
        let result = tokio::time::timeout(PING_TIMEOUT, sqlx::query("SELECT 1").execute(&self.pool))
            .await
            .map_err(|_| StoreError::Cancelled {
                operation: "ping",
                timeout: PING_TIMEOUT,
            })?;

        result
            .map(|_| ())
            .map_err(|e| StoreError::io("ping", e))
    }

    /// Closes every pooled connection. Pending operations fail afterwards.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Runs `future` under the per-operation deadline.
    async fn with_deadline<T, F>(&self, operation: &'static str, future: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        tokio::time::timeout(self.operation_timeout, future)
            .await
            .unwrap_or(Err(StoreError::Cancelled {
                operation,
                timeout: self.operation_timeout,
            }))
    }
}

#[async_trait]
impl UrlStore for PgUrlStore {
    async fn save(&self, record: &UrlRecord) -> Result<(), StoreError> {
        self.with_deadline("save", async {
            sqlx::query(&self.insert_sql)
                .bind(&record.id)
                .bind(&record.original_url)
                .bind(&record.short_url)
                .bind(record.creation_date)
                .execute(&self.pool)
                .await
                .map(|_| ())
                .map_err(|e| {
                    if is_unique_violation(&e) {
                        StoreError::Duplicate {
                            id: record.id.clone(),
                        }
                    } else {
                        StoreError::io("save", e)
                    }
                })
        })
        .await
    }

    async fn get_by_id(&self, id: &str) -> Result<UrlRecord, StoreError> {
        self.with_deadline("get_by_id", async {
            sqlx::query_as::<_, UrlRecordRow>(&self.select_sql)
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| StoreError::io("get_by_id", e))?
                .map(UrlRecord::from)
                .ok_or_else(|| StoreError::NotFound { id: id.to_string() })
        })
        .await
    }

    async fn ensure_indexes(&self) -> Result<(), StoreError> {
        self.with_deadline("ensure_indexes", async {
            sqlx::query(&self.create_table_sql)
                .execute(&self.pool)
                .await
                .map(|_| ())
                .map_err(|e| StoreError::io("ensure_indexes", e))
        })
        .await
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .is_some_and(|db_err| db_err.is_unique_violation())
}

/// Quotes a table name as a PostgreSQL identifier.
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
