use serde::{Deserialize, Serialize};

/// Everything a caller supplies for a candidate. `id`, `user_id` and
/// `created_at` are always assigned by the store, never by the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct CandidateInput {
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
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
}

/// Read-only dashboard numbers derived from the fetched candidate set.
#[derive(Debug, Serialize, PartialEq)]
pub struct DashboardStats {
    pub total: usize,
    pub new_this_week: usize,
}
