use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{StoreBackend, StoreError};
use crate::model::{Candidate, Session};

#[derive(Debug, Default)]
struct MemoryInner {
    session: Option<Session>,
    candidates: HashMap<String, Vec<Candidate>>,
}

/// Process-local store. Backs the mock-API configuration and the tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<MemoryInner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StoreBackend for MemoryStore {
    async fn session_get(&self) -> Result<Option<Session>, StoreError> {
        Ok(self.inner.read().await.session.clone())
    }

    async fn session_put(&self, session: &Session) -> Result<(), StoreError> {
        self.inner.write().await.session = Some(session.clone());
        Ok(())
    }

    async fn session_clear(&self) -> Result<(), StoreError> {
        self.inner.write().await.session = None;
        Ok(())
    }

    async fn candidates_list(&self, user_id: &str) -> Result<Vec<Candidate>, StoreError> {
        Ok(self
            .inner
            .read()
            .await
            .candidates
            .get(user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn candidates_put(
        &self,
        user_id: &str,
        candidates: Vec<Candidate>,
    ) -> Result<(), StoreError> {
        self.inner
            .write()
            .await
            .candidates
            .insert(user_id.to_string(), candidates);
        Ok(())
    }
}
