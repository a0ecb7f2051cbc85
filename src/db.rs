use async_trait::async_trait;
use serde::Serialize;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, info};

pub type DbPool = SqlitePool;

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),

  #[error("Migration failed: {0}")]
  Migration(#[from] sqlx::migrate::MigrateError),

  #[error("Serialization failed: {0}")]
  Serialization(#[from] serde_json::Error),

  #[error("Stored value under {key} is unreadable: {reason}")]
  Corrupt { key: String, reason: String },
}

impl Serialize for StoreError {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_str(&self.to_string())
  }
}

/// ---------------------------------------------------------------------------
/// Key-Value Store
/// ---------------------------------------------------------------------------

/// Opaque get/set-by-key storage. Values are strings the caller owns.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
  async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

  async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

  async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// SQLite-backed store, one row per key
#[derive(Debug, Clone)]
pub struct SqliteStore {
  pool: DbPool,
}

impl SqliteStore {
  pub fn new(pool: DbPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
  async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
    let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?")
      .bind(key)
      .fetch_optional(&self.pool)
      .await?;

    Ok(row.map(|r| r.get("value")))
  }

  async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
    sqlx::query(
      r#"
      INSERT INTO kv_store (key, value, updated_at)
      VALUES (?1, ?2, datetime('now'))
      ON CONFLICT(key) DO UPDATE SET
        value = excluded.value,
        updated_at = excluded.updated_at
      "#,
    )
    .bind(key)
    .bind(value)
    .execute(&self.pool)
    .await?;

    debug!(key, bytes = value.len(), "stored value");
    Ok(())
  }

  async fn remove(&self, key: &str) -> Result<(), StoreError> {
    sqlx::query("DELETE FROM kv_store WHERE key = ?")
      .bind(key)
      .execute(&self.pool)
      .await?;
    Ok(())
  }
}

/// In-process store, lost on drop
#[derive(Debug, Default)]
pub struct MemoryStore {
  values: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
  async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
    Ok(self.values.read().await.get(key).cloned())
  }

  async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
    self
      .values
      .write()
      .await
      .insert(key.to_string(), value.to_string());
    Ok(())
  }

  async fn remove(&self, key: &str) -> Result<(), StoreError> {
    self.values.write().await.remove(key);
    Ok(())
  }
}

/// ---------------------------------------------------------------------------
/// Initialization
/// ---------------------------------------------------------------------------

/// Open the connection pool and run migrations
pub async fn initialize_db(database_url: &str) -> Result<DbPool, StoreError> {
  info!(database_url, "initializing database");

  let pool = SqlitePoolOptions::new()
    .max_connections(5)
    .connect(database_url)
    .await?;

  sqlx::migrate!("./migrations").run(&pool).await?;

  info!("database initialized");
  Ok(pool)
}

/// Store ready for use by a training log
pub async fn initialize_store(database_url: &str) -> Result<SqliteStore, StoreError> {
  Ok(SqliteStore::new(initialize_db(database_url).await?))
}
