use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::AppError;
use crate::model::{Session, User};
use crate::store::StoreBackend;

/// Shortest password the store accepts, matching the original client.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Optional profile fields captured at sign-up.
#[derive(Debug, Default, Clone)]
pub struct SignUpProfile {
    pub name: Option<String>,
    pub company_name: Option<String>,
    pub job_title: Option<String>,
    pub phone_number: Option<String>,
}

/// Creates, reads and clears the single persisted current session. Candidate
/// operations never reach into this service; handlers fetch the session once
/// and pass it along explicitly.
#[derive(Clone)]
pub struct SessionService {
    backend: Arc<dyn StoreBackend>,
    lock: Arc<Mutex<()>>,
}

impl SessionService {
    pub fn new(backend: Arc<dyn StoreBackend>, lock: Arc<Mutex<()>>) -> Self {
        Self { backend, lock }
    }

    /// Sign in with an email/password pair. Any existing session is replaced.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AppError> {
        if email.trim().is_empty() || password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::InvalidCredentials);
        }

        let user = User {
            id: derive_user_id(email),
            email: email.to_string(),
            name: email.split('@').next().map(str::to_string),
            company_name: None,
            job_title: None,
            phone_number: None,
        };
        let session = Session { user };

        let _guard = self.lock.lock().await;
        self.backend.session_put(&session).await?;
        info!(user_id = %session.user.id, email = %session.user.email, "signed in");
        Ok(session)
    }

    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        profile: SignUpProfile,
    ) -> Result<Session, AppError> {
        if email.trim().is_empty() {
            return Err(AppError::InvalidInput("email is required".into()));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::InvalidInput(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        let _guard = self.lock.lock().await;
        if let Some(existing) = self.backend.session_get().await? {
            if existing.user.email == email {
                return Err(AppError::DuplicateEmail);
            }
        }

        let user = User {
            id: derive_user_id(email),
            email: email.to_string(),
            name: profile.name,
            company_name: profile.company_name,
            job_title: profile.job_title,
            phone_number: profile.phone_number,
        };
        let session = Session { user };
        self.backend.session_put(&session).await?;
        info!(user_id = %session.user.id, email = %session.user.email, "signed up");
        Ok(session)
    }

    /// The persisted current session, if any. Corrupt persisted state reads
    /// as `None` inside the backend and never fails the call.
    pub async fn current(&self) -> Result<Option<Session>, AppError> {
        Ok(self.backend.session_get().await?)
    }

    /// `current()` or `NotAuthenticated`, for handlers that gate on a session.
    pub async fn require(&self) -> Result<Session, AppError> {
        self.current().await?.ok_or(AppError::NotAuthenticated)
    }

    pub async fn sign_out(&self) -> Result<(), AppError> {
        let _guard = self.lock.lock().await;
        self.backend.session_clear().await?;
        debug!("signed out");
        Ok(())
    }
}

/// Stable, non-cryptographic id for an email: the same address maps to the
/// same id across sessions and restarts.
fn derive_user_id(email: &str) -> String {
    let mut hash: i32 = 0;
    for c in email.chars() {
        hash = hash.wrapping_mul(31).wrapping_add(c as i32);
    }
    format!("user_{}", hash.unsigned_abs())
}
