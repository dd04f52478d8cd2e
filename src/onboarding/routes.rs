//! REST endpoints for the onboarding session.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use crate::error::OnboardingError;

use super::manager::OnboardingSession;
use super::model::ProfileFragment;
use super::state::OnboardingStep;

/// Shared state for onboarding routes.
#[derive(Clone)]
pub struct OnboardingRouteState {
    pub session: Arc<OnboardingSession>,
}

#[derive(Debug, Deserialize)]
struct SignInRequest {
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    phone: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoalRequest {
    goal: String,
}

impl IntoResponse for OnboardingError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        match self {
            OnboardingError::MissingContact => (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({"error": message})),
            )
                .into_response(),
            OnboardingError::UnrecognizedGoal { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(serde_json::json!({"error": message})),
            )
                .into_response(),
            OnboardingError::Incomplete { missing } => (
                StatusCode::CONFLICT,
                Json(serde_json::json!({"error": message, "missing": missing})),
            )
                .into_response(),
        }
    }
}

/// GET /api/onboarding/status
async fn get_status(State(state): State<OnboardingRouteState>) -> impl IntoResponse {
    Json(state.session.status().await)
}

/// GET /api/onboarding/profile
async fn get_profile(State(state): State<OnboardingRouteState>) -> impl IntoResponse {
    Json(state.session.profile().await)
}

/// PATCH /api/onboarding/profile
///
/// Shallow-merges the body into the profile. No validation: the response is
/// the stored profile, whatever was sent.
async fn patch_profile(
    State(state): State<OnboardingRouteState>,
    Json(fragment): Json<ProfileFragment>,
) -> impl IntoResponse {
    Json(state.session.update(fragment).await)
}

/// DELETE /api/onboarding/profile
///
/// Sign-out. Returns the default profile.
async fn delete_profile(State(state): State<OnboardingRouteState>) -> impl IntoResponse {
    Json(state.session.reset().await)
}

/// POST /api/onboarding/sign-in
async fn sign_in(
    State(state): State<OnboardingRouteState>,
    Json(req): Json<SignInRequest>,
) -> Result<impl IntoResponse, OnboardingError> {
    let profile = state
        .session
        .sign_in(req.email.as_deref(), req.phone.as_deref())
        .await?;
    Ok(Json(profile))
}

/// POST /api/onboarding/goal
async fn select_goal(
    State(state): State<OnboardingRouteState>,
    Json(req): Json<GoalRequest>,
) -> Result<impl IntoResponse, OnboardingError> {
    let goal = state.session.select_goal(&req.goal).await?;
    Ok(Json(serde_json::json!({"goal": goal})))
}

/// GET /api/onboarding/steps/{step}
///
/// 404 for a key that is not an onboarding step.
async fn get_step(
    State(state): State<OnboardingRouteState>,
    Path(key): Path<String>,
) -> Response {
    match key.parse::<OnboardingStep>() {
        Ok(step) => {
            let satisfied = state.session.is_step_valid(step).await;
            Json(serde_json::json!({"step": step, "satisfied": satisfied})).into_response()
        }
        Err(e) => (StatusCode::NOT_FOUND, Json(serde_json::json!({"error": e}))).into_response(),
    }
}

/// GET /api/onboarding/route
async fn get_route(State(state): State<OnboardingRouteState>) -> impl IntoResponse {
    Json(state.session.route().await)
}

/// POST /api/onboarding/complete
async fn complete(
    State(state): State<OnboardingRouteState>,
) -> Result<impl IntoResponse, OnboardingError> {
    Ok(Json(state.session.complete().await?))
}

/// Build the onboarding REST routes.
pub fn onboarding_routes(state: OnboardingRouteState) -> Router {
    Router::new()
        .route("/api/onboarding/status", get(get_status))
        .route(
            "/api/onboarding/profile",
            get(get_profile).patch(patch_profile).delete(delete_profile),
        )
        .route("/api/onboarding/sign-in", post(sign_in))
        .route("/api/onboarding/goal", post(select_goal))
        .route("/api/onboarding/steps/{step}", get(get_step))
        .route("/api/onboarding/route", get(get_route))
        .route("/api/onboarding/complete", post(complete))
        .with_state(state)
}
