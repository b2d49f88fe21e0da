use axum::{
    routing::{get, put},
    Router,
};

use crate::state::AppState;

mod dto;
pub mod handlers;
pub mod query;
pub mod repo;
pub mod stats;

pub use dto::CandidateInput;
pub use repo::CandidateRepo;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/candidates",
            get(handlers::list_candidates).post(handlers::create_candidate),
        )
        .route(
            "/candidates/:id",
            put(handlers::update_candidate).delete(handlers::delete_candidate),
        )
        .route("/dashboard/stats", get(handlers::dashboard_stats))
}
