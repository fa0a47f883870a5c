//! API error types and their HTTP mappings.
//!
//! Game verdicts (win, draw, failed verification) are payloads, never
//! errors; this module only covers malformed or misdirected requests.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use derive_more::{Display, Error};
use humancheck_games::MoveError;
use humancheck_games::challenges::ChallengeKind;
use serde::Serialize;
use tracing::warn;

/// Error surface of the REST API.
#[derive(Debug, Clone, Display, Error)]
pub enum ApiError {
    /// No session with the requested id.
    #[display("session {} not found", id)]
    SessionNotFound {
        /// The requested id.
        id: String,
    },
    /// The session holds a different challenge than the endpoint serves.
    #[display("session holds a {} challenge, endpoint expects {}", actual, expected)]
    WrongChallenge {
        /// Kind the endpoint serves.
        expected: ChallengeKind,
        /// Kind the session holds.
        actual: ChallengeKind,
    },
    /// The judge rejected the move.
    #[display("{}", _0)]
    Move(#[error(not(source))] MoveError),
}

impl From<MoveError> for ApiError {
    fn from(err: MoveError) -> Self {
        Self::Move(err)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::SessionNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::WrongChallenge { .. } => StatusCode::CONFLICT,
            ApiError::Move(MoveError::OutOfBounds { .. } | MoveError::Occupied { .. }) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::Move(MoveError::Terminal | MoveError::OutOfTurn) => StatusCode::CONFLICT,
        }
    }
}

/// JSON body for error responses.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        warn!(error = %self, status = %status, "request rejected");
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
