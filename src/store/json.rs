use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{StoreBackend, StoreError};
use crate::model::{Candidate, Session};

/// Whole store as one JSON document: the current session plus a mapping of
/// user id to that user's candidate vector, newest first.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreDocument {
    #[serde(default)]
    session: Option<Session>,
    #[serde(default)]
    candidates: HashMap<String, Vec<Candidate>>,
}

/// File-backed store. Every operation reads the full document, mutates it in
/// memory and writes it back whole; writes land in a temp file first and are
/// renamed into place, so a reader never observes a partial document.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    async fn load(&self) -> Result<StoreDocument, StoreError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(StoreDocument::default()),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_str(&raw) {
            Ok(doc) => Ok(doc),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "store file corrupt, treating as empty");
                Ok(StoreDocument::default())
            }
        }
    }

    async fn save(&self, doc: &StoreDocument) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let data = serde_json::to_vec(doc)?;
        let mut tmp = self.path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        tokio::fs::write(&tmp, data).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl StoreBackend for JsonFileStore {
    async fn session_get(&self) -> Result<Option<Session>, StoreError> {
        Ok(self.load().await?.session)
    }

    async fn session_put(&self, session: &Session) -> Result<(), StoreError> {
        let mut doc = self.load().await?;
        doc.session = Some(session.clone());
        self.save(&doc).await
    }

    async fn session_clear(&self) -> Result<(), StoreError> {
        let mut doc = self.load().await?;
        doc.session = None;
        self.save(&doc).await
    }

    async fn candidates_list(&self, user_id: &str) -> Result<Vec<Candidate>, StoreError> {
        let doc = self.load().await?;
        Ok(doc.candidates.get(user_id).cloned().unwrap_or_default())
    }

    async fn candidates_put(
        &self,
        user_id: &str,
        candidates: Vec<Candidate>,
    ) -> Result<(), StoreError> {
        let mut doc = self.load().await?;
        doc.candidates.insert(user_id.to_string(), candidates);
        self.save(&doc).await
    }
}
