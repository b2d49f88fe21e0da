use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{FromRow, PgPool};
use tracing::warn;

use super::{StoreBackend, StoreError};
use crate::model::{Candidate, Session};

/// Postgres-backed store, used when the data lives behind a hosted database
/// instead of a local file. The session keeps the same single-current-session
/// contract as the other backends: one row, replaced on every sign-in.
pub struct PgStore {
    pool: PgPool,
}

#[derive(Debug, FromRow)]
struct CandidateRow {
    id: i64,
    user_id: String,
    name: String,
    email: String,
    phone: String,
    skills: sqlx::types::Json<Vec<String>>,
    experience: f64,
    role: Option<String>,
    status: Option<String>,
    notes: Option<String>,
    interview_date: Option<String>,
    current_ctc: Option<f64>,
    expected_ctc: Option<f64>,
    created_at: String,
}

impl From<CandidateRow> for Candidate {
    fn from(r: CandidateRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
            email: r.email,
            phone: r.phone,
            skills: r.skills.0,
            experience: r.experience,
            role: r.role,
            status: r.status,
            notes: r.notes,
            interview_date: r.interview_date,
            current_ctc: r.current_ctc,
            expected_ctc: r.expected_ctc,
            user_id: r.user_id,
            created_at: r.created_at,
        }
    }
}

impl PgStore {
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        if let Err(e) = sqlx::migrate!("./migrations").run(&pool).await {
            warn!(error = %e, "migration failed; continuing with existing schema");
        }

        Ok(Self { pool })
    }
}

#[async_trait]
impl StoreBackend for PgStore {
    async fn session_get(&self) -> Result<Option<Session>, StoreError> {
        let payload = sqlx::query_scalar::<_, serde_json::Value>(
            r#"SELECT payload FROM current_session WHERE singleton"#,
        )
        .fetch_optional(&self.pool)
        .await?;

        let Some(payload) = payload else {
            return Ok(None);
        };
        match serde_json::from_value(payload) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                warn!(error = %e, "stored session corrupt, treating as signed out");
                Ok(None)
            }
        }
    }

    async fn session_put(&self, session: &Session) -> Result<(), StoreError> {
        let payload = serde_json::to_value(session)?;
        sqlx::query(
            r#"
            INSERT INTO current_session (singleton, payload)
            VALUES (TRUE, $1)
            ON CONFLICT (singleton) DO UPDATE SET payload = EXCLUDED.payload
            "#,
        )
        .bind(payload)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn session_clear(&self) -> Result<(), StoreError> {
        sqlx::query(r#"DELETE FROM current_session"#)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn candidates_list(&self, user_id: &str) -> Result<Vec<Candidate>, StoreError> {
        let rows = sqlx::query_as::<_, CandidateRow>(
            r#"
            SELECT id, user_id, name, email, phone, skills, experience,
                   role, status, notes, interview_date, current_ctc, expected_ctc, created_at
            FROM candidates
            WHERE user_id = $1
            ORDER BY ord ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Candidate::from).collect())
    }

    async fn candidates_put(
        &self,
        user_id: &str,
        candidates: Vec<Candidate>,
    ) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(r#"DELETE FROM candidates WHERE user_id = $1"#)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        // ord preserves collection order so the newest-first prepend
        // survives the round trip, same as the file-backed store.
        for (ord, c) in candidates.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO candidates
                    (id, user_id, ord, name, email, phone, skills, experience,
                     role, status, notes, interview_date, current_ctc, expected_ctc, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
                "#,
            )
            .bind(c.id)
            .bind(user_id)
            .bind(ord as i32)
            .bind(&c.name)
            .bind(&c.email)
            .bind(&c.phone)
            .bind(sqlx::types::Json(&c.skills))
            .bind(c.experience)
            .bind(&c.role)
            .bind(&c.status)
            .bind(&c.notes)
            .bind(&c.interview_date)
            .bind(c.current_ctc)
            .bind(c.expected_ctc)
            .bind(&c.created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}
