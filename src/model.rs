use serde::{Deserialize, Serialize};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

/// A recruitment applicant record. Owned by exactly one user; the field
/// names are the serialization contract every store backend preserves.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Candidate {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience: f64,
    pub role: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
    pub interview_date: Option<String>,
    pub current_ctc: Option<f64>,
    pub expected_ctc: Option<f64>,
    pub user_id: String,
    pub created_at: String,
}

impl Candidate {
    /// `created_at` is carried as text because other backend variants may
    /// have written formats we do not control. Anything that is not RFC 3339
    /// counts as unparseable: it sorts oldest and is never "new this week".
    pub fn created_at_ts(&self) -> Option<OffsetDateTime> {
        OffsetDateTime::parse(&self.created_at, &Rfc3339).ok()
    }
}

/// Public user identity carried inside a session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub company_name: Option<String>,
    pub job_title: Option<String>,
    pub phone_number: Option<String>,
}

/// The authenticated identity bound to the client instance. At most one
/// session is persisted at a time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub user: User,
}

/// Sort newest first by `created_at`. Unparseable timestamps sort oldest.
/// The sort is stable, so ties keep the stored order (new records are
/// prepended, which keeps them in front).
pub fn sort_newest_first(candidates: &mut [Candidate]) {
    candidates.sort_by_key(|c| {
        std::cmp::Reverse(
            c.created_at_ts()
                .map(|ts| ts.unix_timestamp_nanos())
                .unwrap_or(i128::MIN),
        )
    });
}

pub fn now_rfc3339() -> anyhow::Result<String> {
    Ok(OffsetDateTime::now_utc().format(&Rfc3339)?)
}
