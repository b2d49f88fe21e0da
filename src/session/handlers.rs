use axum::{extract::State, http::StatusCode, Json};
use tracing::{info, instrument, warn};

use crate::error::AppError;
use crate::model::Session;
use crate::state::AppState;

use super::dto::{ForgotPasswordRequest, SignInRequest, SignUpRequest};
use super::service::SignUpProfile;

#[instrument(skip(state, payload))]
pub async fn sign_in(
    State(state): State<AppState>,
    Json(payload): Json<SignInRequest>,
) -> Result<Json<Session>, AppError> {
    let session = state
        .sessions
        .sign_in(&payload.email, &payload.password)
        .await
        .map_err(|e| {
            warn!(email = %payload.email, error = %e, "sign in rejected");
            e
        })?;
    Ok(Json(session))
}

#[instrument(skip(state, payload))]
pub async fn sign_up(
    State(state): State<AppState>,
    Json(payload): Json<SignUpRequest>,
) -> Result<Json<Session>, AppError> {
    let profile = SignUpProfile {
        name: payload.name,
        company_name: payload.company_name,
        job_title: payload.job_title,
        phone_number: payload.phone_number,
    };
    let session = state
        .sessions
        .sign_up(&payload.email, &payload.password, profile)
        .await
        .map_err(|e| {
            warn!(email = %payload.email, error = %e, "sign up rejected");
            e
        })?;
    Ok(Json(session))
}

#[instrument(skip(state))]
pub async fn sign_out(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.sessions.sign_out().await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn get_session(State(state): State<AppState>) -> Result<Json<Session>, AppError> {
    let session = state.sessions.require().await?;
    Ok(Json(session))
}

/// Acknowledges the request without revealing whether the email is known.
/// Delivery is someone else's job; this store only records the intent.
#[instrument(skip(payload))]
pub async fn forgot_password(Json(payload): Json<ForgotPasswordRequest>) -> StatusCode {
    info!(email = %payload.email, "password reset requested");
    StatusCode::ACCEPTED
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn forgot_password_acknowledges_any_email() {
        let known = forgot_password(Json(ForgotPasswordRequest {
            email: "recruiter@acme.com".into(),
        }))
        .await;
        let unknown = forgot_password(Json(ForgotPasswordRequest {
            email: "nobody@nowhere.example".into(),
        }))
        .await;

        assert_eq!(known, StatusCode::ACCEPTED);
        assert_eq!(unknown, StatusCode::ACCEPTED);
    }
}
