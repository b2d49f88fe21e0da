use crate::model::Candidate;

/// Keep every candidate matching `term` in name, email, phone, role, status
/// or any skill. Matching is a case-insensitive substring check, so "java"
/// matches "JavaScript". An empty term keeps the input as-is; order is
/// always preserved — sorting is the lister's job.
pub fn filter_candidates(candidates: Vec<Candidate>, term: &str) -> Vec<Candidate> {
    if term.is_empty() {
        return candidates;
    }
    let needle = term.to_lowercase();
    candidates
        .into_iter()
        .filter(|c| matches_term(c, &needle))
        .collect()
}

fn matches_term(candidate: &Candidate, needle: &str) -> bool {
    contains_ci(&candidate.name, needle)
        || contains_ci(&candidate.email, needle)
        || contains_ci(&candidate.phone, needle)
        || candidate
            .role
            .as_deref()
            .is_some_and(|role| contains_ci(role, needle))
        || candidate
            .status
            .as_deref()
            .is_some_and(|status| contains_ci(status, needle))
        || candidate.skills.iter().any(|s| contains_ci(s, needle))
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}
