use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use thiserror::Error;

use crate::config::{AppConfig, StoreKind};
use crate::model::{Candidate, Session};

mod json;
mod memory;
mod postgres;

pub use json::JsonFileStore;
pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Adapter-level failures. Corrupt persisted state is not one of them:
/// backends log it and read it as empty/absent instead.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store io: {0}")]
    Io(#[from] std::io::Error),
    #[error("store encode: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("database: {0}")]
    Database(#[from] sqlx::Error),
}

/// The persistence boundary for candidates and the single current session.
///
/// Candidate writes replace the owner's whole collection; callers are
/// expected to read, mutate in memory and write back under the store-wide
/// write lock so the read-modify-write is atomic from their point of view.
#[async_trait]
pub trait StoreBackend: Send + Sync {
    async fn session_get(&self) -> Result<Option<Session>, StoreError>;
    async fn session_put(&self, session: &Session) -> Result<(), StoreError>;
    async fn session_clear(&self) -> Result<(), StoreError>;

    async fn candidates_list(&self, user_id: &str) -> Result<Vec<Candidate>, StoreError>;
    async fn candidates_put(
        &self,
        user_id: &str,
        candidates: Vec<Candidate>,
    ) -> Result<(), StoreError>;
}

pub async fn init_store(config: &AppConfig) -> anyhow::Result<Arc<dyn StoreBackend>> {
    match config.store {
        StoreKind::Json => Ok(Arc::new(JsonFileStore::new(config.store_path.clone()))),
        StoreKind::Memory => Ok(Arc::new(MemoryStore::new())),
        StoreKind::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL is required when STORE_BACKEND=postgres")?;
            let store = PgStore::connect(url).await?;
            Ok(Arc::new(store))
        }
    }
}
