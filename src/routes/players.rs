use axum::{
    Json, Router,
    extract::{Path, State},
    routing::post,
};
use axum_valid::Valid;
use uuid::Uuid;

use crate::{
    dto::guess::{SubmitGuessesRequest, SubmitGuessesResponse},
    error::AppError,
    services::guess_service,
    state::SharedState,
};

/// Routes acting on a single player.
pub fn router() -> Router<SharedState> {
    Router::new().route("/players/{id}/guesses", post(submit_guesses))
}

/// Submit the player's guesses for every baby, once.
#[utoipa::path(
    post,
    path = "/players/{id}/guesses",
    tag = "players",
    params(("id" = Uuid, Path, description = "Player identifier")),
    request_body = SubmitGuessesRequest,
    responses(
        (status = 200, description = "Guesses recorded", body = SubmitGuessesResponse),
        (status = 400, description = "Batch does not cover every baby once", body = crate::error::ErrorBody),
        (status = 404, description = "Unknown player", body = crate::error::ErrorBody),
        (status = 409, description = "Player already submitted", body = crate::error::ErrorBody)
    )
)]
pub async fn submit_guesses(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<SubmitGuessesRequest>>,
) -> Result<Json<SubmitGuessesResponse>, AppError> {
    Ok(Json(guess_service::submit_guesses(&state, id, payload).await?))
}
