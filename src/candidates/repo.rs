use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use time::OffsetDateTime;
use tokio::sync::Mutex;
use tracing::info;

use crate::error::AppError;
use crate::model::{now_rfc3339, sort_newest_first, Candidate, Session};
use crate::store::StoreBackend;

use super::dto::CandidateInput;
use super::query::filter_candidates;

/// Candidate CRUD over the store backend. Every operation is scoped to the
/// session passed in by the caller; mutations take the store-wide write lock
/// so the whole-collection read-modify-write is atomic for callers.
#[derive(Clone)]
pub struct CandidateRepo {
    backend: Arc<dyn StoreBackend>,
    lock: Arc<Mutex<()>>,
    last_id: Arc<AtomicI64>,
}

impl CandidateRepo {
    pub fn new(backend: Arc<dyn StoreBackend>, lock: Arc<Mutex<()>>) -> Self {
        Self {
            backend,
            lock,
            last_id: Arc::new(AtomicI64::new(0)),
        }
    }

    /// The owner's candidates, newest first, optionally filtered.
    pub async fn list(
        &self,
        session: &Session,
        search: Option<&str>,
    ) -> Result<Vec<Candidate>, AppError> {
        let mut candidates = self.backend.candidates_list(&session.user.id).await?;
        sort_newest_first(&mut candidates);
        Ok(filter_candidates(candidates, search.unwrap_or_default()))
    }

    pub async fn create(
        &self,
        session: &Session,
        input: CandidateInput,
    ) -> Result<Candidate, AppError> {
        validate(&input)?;

        let _guard = self.lock.lock().await;
        let mut candidates = self.backend.candidates_list(&session.user.id).await?;

        let candidate = Candidate {
            id: self.next_id(),
            name: input.name,
            email: input.email,
            phone: input.phone,
            skills: input.skills,
            experience: input.experience,
            role: input.role,
            status: input.status.or_else(|| Some("Pending".into())),
            notes: input.notes,
            interview_date: input.interview_date,
            current_ctc: input.current_ctc,
            expected_ctc: input.expected_ctc,
            user_id: session.user.id.clone(),
            created_at: now_rfc3339()?,
        };

        candidates.insert(0, candidate.clone());
        self.backend
            .candidates_put(&session.user.id, candidates)
            .await?;

        info!(candidate_id = candidate.id, user_id = %session.user.id, "candidate created");
        Ok(candidate)
    }

    /// Replaces every field except `id`, `user_id` and `created_at`, which
    /// are preserved from the stored record.
    pub async fn update(
        &self,
        session: &Session,
        id: i64,
        input: CandidateInput,
    ) -> Result<Candidate, AppError> {
        validate(&input)?;

        let _guard = self.lock.lock().await;
        let mut candidates = self.backend.candidates_list(&session.user.id).await?;

        let position = candidates
            .iter()
            .position(|c| c.id == id)
            .ok_or(AppError::NotFound)?;

        let existing = &candidates[position];
        let updated = Candidate {
            id: existing.id,
            user_id: existing.user_id.clone(),
            created_at: existing.created_at.clone(),
            name: input.name,
            email: input.email,
            phone: input.phone,
            skills: input.skills,
            experience: input.experience,
            role: input.role,
            status: input.status,
            notes: input.notes,
            interview_date: input.interview_date,
            current_ctc: input.current_ctc,
            expected_ctc: input.expected_ctc,
        };

        candidates[position] = updated.clone();
        self.backend
            .candidates_put(&session.user.id, candidates)
            .await?;

        info!(candidate_id = id, user_id = %session.user.id, "candidate updated");
        Ok(updated)
    }

    /// Removes the candidate if present. Deleting an unknown id succeeds.
    pub async fn delete(&self, session: &Session, id: i64) -> Result<(), AppError> {
        let _guard = self.lock.lock().await;
        let mut candidates = self.backend.candidates_list(&session.user.id).await?;
        candidates.retain(|c| c.id != id);
        self.backend
            .candidates_put(&session.user.id, candidates)
            .await?;

        info!(candidate_id = id, user_id = %session.user.id, "candidate deleted");
        Ok(())
    }

    /// Ids keep the creation-time-in-milliseconds flavor but never repeat:
    /// when the clock has not advanced past the last issued id, the next one
    /// is bumped by one. Callers hold the store write lock.
    fn next_id(&self) -> i64 {
        let now_ms = (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64;
        let id = now_ms.max(self.last_id.load(Ordering::Relaxed) + 1);
        self.last_id.store(id, Ordering::Relaxed);
        id
    }
}

fn validate(input: &CandidateInput) -> Result<(), AppError> {
    for (field, value) in [
        ("name", &input.name),
        ("email", &input.email),
        ("phone", &input.phone),
    ] {
        if value.trim().is_empty() {
            return Err(AppError::InvalidInput(format!("{field} is required")));
        }
    }
    if input.experience < 0.0 {
        return Err(AppError::InvalidInput(
            "experience must be non-negative".into(),
        ));
    }
    for (field, value) in [
        ("current_ctc", input.current_ctc),
        ("expected_ctc", input.expected_ctc),
    ] {
        if value.is_some_and(|v| v < 0.0) {
            return Err(AppError::InvalidInput(format!(
                "{field} must be non-negative"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::User;
    use crate::store::MemoryStore;

    fn repo() -> CandidateRepo {
        CandidateRepo::new(Arc::new(MemoryStore::new()), Arc::new(Mutex::new(())))
    }

    fn session(user_id: &str) -> Session {
        Session {
            user: User {
                id: user_id.into(),
                email: format!("{user_id}@example.com"),
                name: None,
                company_name: None,
                job_title: None,
                phone_number: None,
            },
        }
    }

    fn input(name: &str) -> CandidateInput {
        CandidateInput {
            name: name.into(),
            email: format!("{}@example.com", name.to_lowercase()),
            phone: "555-0001".into(),
            skills: vec!["Rust".into()],
            experience: 3.0,
            role: Some("Engineer".into()),
            status: None,
            notes: None,
            interview_date: None,
            current_ctc: Some(10.0),
            expected_ctc: Some(12.0),
        }
    }

    #[tokio::test]
    async fn create_assigns_owner_timestamp_and_default_status() {
        let repo = repo();
        let session = session("user_1");

        let created = repo.create(&session, input("Ada")).await.expect("create");
        assert_eq!(created.user_id, "user_1");
        assert_eq!(created.status.as_deref(), Some("Pending"));
        assert!(created.created_at_ts().is_some());
        assert!(created.id > 0);
    }

    #[tokio::test]
    async fn create_keeps_an_explicit_status() {
        let repo = repo();
        let session = session("user_1");

        let mut with_status = input("Ada");
        with_status.status = Some("Interviewed".into());
        let created = repo.create(&session, with_status).await.expect("create");
        assert_eq!(created.status.as_deref(), Some("Interviewed"));
    }

    #[tokio::test]
    async fn newest_candidate_lists_first() {
        let repo = repo();
        let session = session("user_1");

        let a = repo.create(&session, input("Ada")).await.expect("create a");
        let b = repo.create(&session, input("Bob")).await.expect("create b");

        let list = repo.list(&session, None).await.expect("list");
        let ids: Vec<i64> = list.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![b.id, a.id]);
    }

    #[tokio::test]
    async fn users_never_see_each_others_candidates() {
        let repo = repo();
        let u1 = session("user_1");
        let u2 = session("user_2");

        let a = repo.create(&u1, input("Ada")).await.expect("a");
        let b = repo.create(&u1, input("Bob")).await.expect("b");
        let c = repo.create(&u2, input("Cid")).await.expect("c");

        let list1 = repo.list(&u1, None).await.expect("list u1");
        assert_eq!(
            list1.iter().map(|c| c.id).collect::<Vec<_>>(),
            vec![b.id, a.id]
        );

        let list2 = repo.list(&u2, None).await.expect("list u2");
        assert_eq!(list2.iter().map(|c| c.id).collect::<Vec<_>>(), vec![c.id]);
    }

    #[tokio::test]
    async fn rapid_creation_yields_strictly_increasing_ids() {
        let repo = repo();
        let session = session("user_1");

        let mut ids = Vec::new();
        for i in 0..5 {
            let created = repo
                .create(&session, input(&format!("N{i}")))
                .await
                .expect("create");
            ids.push(created.id);
        }
        for pair in ids.windows(2) {
            assert!(pair[1] > pair[0], "ids must strictly increase: {ids:?}");
        }
    }

    #[tokio::test]
    async fn update_preserves_identity_and_replaces_the_rest() {
        let repo = repo();
        let session = session("user_1");
        let created = repo.create(&session, input("Ada")).await.expect("create");

        let replacement = CandidateInput {
            name: "Ada Lovelace".into(),
            email: "ada@engine.org".into(),
            phone: "555-0099".into(),
            skills: vec!["Mathematics".into()],
            experience: 11.0,
            role: Some("Analyst".into()),
            status: None,
            notes: Some("strong".into()),
            interview_date: Some("2024-04-01".into()),
            current_ctc: None,
            expected_ctc: None,
        };
        let updated = repo
            .update(&session, created.id, replacement)
            .await
            .expect("update");

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.user_id, created.user_id);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.name, "Ada Lovelace");
        assert_eq!(updated.email, "ada@engine.org");
        assert_eq!(updated.skills, vec!["Mathematics".to_string()]);
        // status was omitted in the replacement, so it is gone after update
        assert_eq!(updated.status, None);

        let list = repo.list(&session, None).await.expect("list");
        assert_eq!(list, vec![updated]);
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found() {
        let repo = repo();
        let session = session("user_1");

        let err = repo.update(&session, 12345, input("Ada")).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }

    #[tokio::test]
    async fn update_cannot_reach_another_users_candidate() {
        let repo = repo();
        let u1 = session("user_1");
        let u2 = session("user_2");
        let created = repo.create(&u1, input("Ada")).await.expect("create");

        let err = repo.update(&u2, created.id, input("Eve")).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound));

        let list = repo.list(&u1, None).await.expect("list");
        assert_eq!(list[0].name, "Ada");
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let repo = repo();
        let session = session("user_1");
        let keep = repo.create(&session, input("Keep")).await.expect("keep");
        let gone = repo.create(&session, input("Gone")).await.expect("gone");

        repo.delete(&session, gone.id).await.expect("first delete");
        repo.delete(&session, gone.id).await.expect("second delete");

        let list = repo.list(&session, None).await.expect("list");
        assert_eq!(list.iter().map(|c| c.id).collect::<Vec<_>>(), vec![keep.id]);
    }

    #[tokio::test]
    async fn create_rejects_blank_fields_and_negative_numbers() {
        let repo = repo();
        let session = session("user_1");

        let mut blank = input("Ada");
        blank.name = "   ".into();
        let err = repo.create(&session, blank).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));

        let mut negative = input("Ada");
        negative.experience = -1.0;
        let err = repo.create(&session, negative).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));

        let mut negative_ctc = input("Ada");
        negative_ctc.expected_ctc = Some(-5.0);
        let err = repo.create(&session, negative_ctc).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn list_applies_the_search_term() {
        let repo = repo();
        let session = session("user_1");

        let mut rust = input("Ada");
        rust.skills = vec!["Rust".into()];
        repo.create(&session, rust).await.expect("rust");

        let mut js = input("Bob");
        js.skills = vec!["JavaScript".into()];
        repo.create(&session, js).await.expect("js");

        let hits = repo.list(&session, Some("java")).await.expect("search");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Bob");
    }
}
