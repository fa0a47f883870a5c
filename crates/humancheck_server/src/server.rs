//! HTTP API for verification sessions.
//!
//! Thin JSON handlers over [`SessionManager`]; all game decisions happen
//! in the games crate, all scheduling in the session layer.

use crate::error::ApiError;
use crate::session::{MoveOutcome, SessionManager, SessionView};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use humancheck_games::challenges::{self, ChallengeDescriptor, ChallengeKind, ClickOutcome, QuizOutcome};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// Request to create a verification session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    /// Challenge kind to start.
    pub kind: ChallengeKind,
    /// Board side length override (board challenge only).
    #[serde(default)]
    pub board_size: Option<usize>,
}

/// Request to submit a board move.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveRequest {
    /// Square index in row-major order.
    pub index: usize,
}

/// Quiz answer submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerRequest {
    /// Answer text; an empty string is a blank submission.
    #[serde(default)]
    pub answer: String,
    /// Explicit "this question seems impossible" skip.
    #[serde(default)]
    pub skip: bool,
}

/// Response to a quiz submission.
#[derive(Debug, Clone, Serialize)]
pub struct AnswerResponse {
    /// Grading outcome with its feedback line.
    pub outcome: QuizOutcome,
    /// Session snapshot after grading.
    pub session: SessionView,
}

/// Captcha attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptchaRequest {
    /// The characters the player typed.
    #[serde(default)]
    pub input: String,
    /// Redraw the string instead of grading.
    #[serde(default)]
    pub refresh: bool,
}

/// Response to a captcha attempt.
#[derive(Debug, Clone, Serialize)]
pub struct CaptchaResponse {
    /// Whether the input matched; absent when the string was redrawn.
    pub correct: Option<bool>,
    /// Session snapshot with the current string.
    pub session: SessionView,
}

/// Response to a reflex click.
#[derive(Debug, Clone, Serialize)]
pub struct ClickResponse {
    /// Round verdict.
    pub outcome: ClickOutcome,
    /// Session snapshot after the click.
    pub session: SessionView,
}

/// Builds the API router over a session manager.
pub fn router(sessions: SessionManager) -> Router {
    Router::new()
        .route("/challenges", get(list_challenges))
        .route("/sessions", post(create_session))
        .route("/sessions/{id}", get(get_session).delete(delete_session))
        .route("/sessions/{id}/move", post(submit_move))
        .route("/sessions/{id}/answer", post(submit_answer))
        .route("/sessions/{id}/captcha", post(submit_captcha))
        .route("/sessions/{id}/click", post(submit_click))
        .route("/sessions/{id}/reset", post(reset_session))
        .with_state(sessions)
}

/// Lists the static challenge registry.
#[instrument]
async fn list_challenges() -> Json<Vec<ChallengeDescriptor>> {
    Json(challenges::registry())
}

/// Creates a session for the requested challenge kind.
#[instrument(skip(sessions))]
async fn create_session(
    State(sessions): State<SessionManager>,
    Json(req): Json<CreateSessionRequest>,
) -> Json<SessionView> {
    info!(kind = %req.kind, "creating session");
    Json(sessions.create(req.kind, req.board_size))
}

/// Read-only session snapshot.
#[instrument(skip(sessions))]
async fn get_session(
    State(sessions): State<SessionManager>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
    Ok(Json(sessions.view(&id)?))
}

/// Tears a session down.
#[instrument(skip(sessions))]
async fn delete_session(
    State(sessions): State<SessionManager>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    sessions.remove(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Submits a human board move.
#[instrument(skip(sessions))]
async fn submit_move(
    State(sessions): State<SessionManager>,
    Path(id): Path<String>,
    Json(req): Json<MoveRequest>,
) -> Result<Json<MoveOutcome>, ApiError> {
    Ok(Json(sessions.submit_move(&id, req.index)?))
}

/// Submits a quiz answer or skip.
#[instrument(skip(sessions, req))]
async fn submit_answer(
    State(sessions): State<SessionManager>,
    Path(id): Path<String>,
    Json(req): Json<AnswerRequest>,
) -> Result<Json<AnswerResponse>, ApiError> {
    let (outcome, session) = sessions.submit_answer(&id, &req.answer, req.skip)?;
    Ok(Json(AnswerResponse { outcome, session }))
}

/// Grades or refreshes a captcha.
#[instrument(skip(sessions, req))]
async fn submit_captcha(
    State(sessions): State<SessionManager>,
    Path(id): Path<String>,
    Json(req): Json<CaptchaRequest>,
) -> Result<Json<CaptchaResponse>, ApiError> {
    let (correct, session) = sessions.submit_captcha(&id, &req.input, req.refresh)?;
    Ok(Json(CaptchaResponse { correct, session }))
}

/// Judges a reflex click at the server-side clock.
#[instrument(skip(sessions))]
async fn submit_click(
    State(sessions): State<SessionManager>,
    Path(id): Path<String>,
) -> Result<Json<ClickResponse>, ApiError> {
    let (outcome, session) = sessions.submit_click(&id)?;
    Ok(Json(ClickResponse { outcome, session }))
}

/// Resets a session's challenge.
#[instrument(skip(sessions))]
async fn reset_session(
    State(sessions): State<SessionManager>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
    Ok(Json(sessions.reset(&id)?))
}
