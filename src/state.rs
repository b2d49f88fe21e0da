use std::sync::Arc;

use tokio::sync::Mutex;

use crate::candidates::CandidateRepo;
use crate::config::AppConfig;
use crate::session::SessionService;
use crate::store::{self, StoreBackend};

#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionService,
    pub candidates: CandidateRepo,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let backend = store::init_store(&config).await?;
        Ok(Self::with_backend(backend, config))
    }

    /// Wire the services onto a concrete backend. Both share one write lock
    /// so whole-collection rewrites never interleave.
    pub fn with_backend(backend: Arc<dyn StoreBackend>, config: Arc<AppConfig>) -> Self {
        let lock = Arc::new(Mutex::new(()));
        Self {
            sessions: SessionService::new(backend.clone(), lock.clone()),
            candidates: CandidateRepo::new(backend, lock),
            config,
        }
    }
}
