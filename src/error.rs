use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::ValidationErrors;

use crate::{dao::storage::StorageError, state::state_machine::InvalidTransition};

/// Errors that can occur in service layer operations.
///
/// Rejections (`IllegalTransition`, `DuplicateSubmission`, `InvalidInput`) are raised before any
/// write, so they never leave partial state behind.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Requested room, player or baby does not exist.
    #[error("not found: {0}")]
    NotFound(String),
    /// The room flow does not allow this step from the current phase or cursor.
    #[error(transparent)]
    IllegalTransition(#[from] InvalidTransition),
    /// The player already has a recorded guess batch.
    #[error("player `{player_id}` already submitted guesses")]
    DuplicateSubmission {
        /// Player whose submission was rejected.
        player_id: Uuid,
    },
    /// Invalid input provided by the client.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Operation cannot be performed in the current state.
    #[error("invalid state: {0}")]
    InvalidState(String),
    /// The store call itself failed.
    #[error("storage failure")]
    Persistence(#[from] StorageError),
    /// Application is running in degraded mode without storage.
    #[error("storage unavailable (degraded mode)")]
    Degraded,
}

impl From<ValidationErrors> for AppError {
    fn from(err: ValidationErrors) -> Self {
        AppError::BadRequest(format!("validation failed: {}", err))
    }
}

/// Application-level errors that are converted to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad request with invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),
    /// Requested resource not found.
    #[error("not found: {0}")]
    NotFound(String),
    /// Conflict with current state.
    #[error("conflict: {0}")]
    Conflict(String),
    /// Service unavailable or degraded.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(message) => AppError::NotFound(message),
            ServiceError::IllegalTransition(invalid) => AppError::Conflict(invalid.to_string()),
            err @ ServiceError::DuplicateSubmission { .. } => AppError::Conflict(err.to_string()),
            ServiceError::InvalidInput(message) => AppError::BadRequest(message),
            ServiceError::InvalidState(message) => AppError::Conflict(message),
            ServiceError::Persistence(source) => AppError::ServiceUnavailable(source.to_string()),
            ServiceError::Degraded => AppError::ServiceUnavailable("degraded mode".into()),
        }
    }
}

/// JSON body returned with every error status.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Human readable description of the failure.
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };

        let payload = Json(ErrorBody {
            message: self.to_string(),
        });

        (status, payload).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::state_machine::{RoomEvent, RoomPhase};

    fn status(err: ServiceError) -> StatusCode {
        AppError::from(err).into_response().status()
    }

    #[test]
    fn service_errors_map_to_http_statuses() {
        let transition = InvalidTransition {
            from: RoomPhase::Lobby,
            reveal_cursor: 0,
            event: RoomEvent::ShowResults,
        };
        assert_eq!(status(ServiceError::NotFound("room".into())), StatusCode::NOT_FOUND);
        assert_eq!(status(transition.into()), StatusCode::CONFLICT);
        assert_eq!(
            status(ServiceError::DuplicateSubmission {
                player_id: Uuid::nil()
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(status(ServiceError::InvalidInput("x".into())), StatusCode::BAD_REQUEST);
        assert_eq!(status(ServiceError::InvalidState("x".into())), StatusCode::CONFLICT);
        assert_eq!(
            status(StorageError::corrupted("rooms/1").into()),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(status(ServiceError::Degraded), StatusCode::SERVICE_UNAVAILABLE);
    }
}
