use std::path::PathBuf;

use anyhow::bail;

/// Which store backend persists sessions and candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    /// Single JSON document on disk. The default.
    Json,
    /// Process-local, nothing persisted across restarts.
    Memory,
    /// Postgres via sqlx; requires `DATABASE_URL`.
    Postgres,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub store: StoreKind,
    pub store_path: PathBuf,
    pub database_url: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let host = std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = std::env::var("APP_PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(8080);

        let store = match std::env::var("STORE_BACKEND").as_deref() {
            Err(_) | Ok("json") => StoreKind::Json,
            Ok("memory") => StoreKind::Memory,
            Ok("postgres") => StoreKind::Postgres,
            Ok(other) => bail!("unknown STORE_BACKEND {other:?} (expected json, memory or postgres)"),
        };

        let store_path = std::env::var("STORE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data/store.json"));

        let database_url = std::env::var("DATABASE_URL").ok();

        Ok(Self {
            host,
            port,
            store,
            store_path,
            database_url,
        })
    }
}
