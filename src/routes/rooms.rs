use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use axum_valid::Valid;
use uuid::Uuid;

use crate::{
    dto::{
        room::{JoinRoomRequest, JoinRoomResponse, RoomSnapshot, RoomSummary},
        view::{
            BabyScoreResponse, LeaderboardView, RecomputeResponse, RevealTallyView, RosterView,
        },
    },
    error::AppError,
    services::{room_service, scoring_service, view_service},
    state::SharedState,
};

/// Routes driving a room through its phases and serving its views.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/rooms", post(create_room))
        .route("/rooms/code/{code}", get(find_room_by_code))
        .route("/rooms/code/{code}/players", post(join_room))
        .route("/rooms/{id}", get(get_room))
        .route("/rooms/{id}/players", get(get_roster))
        .route("/rooms/{id}/guessing", post(start_guessing))
        .route("/rooms/{id}/reveal", post(start_reveal).get(get_reveal_tally))
        .route("/rooms/{id}/reveal/next", post(next_baby))
        .route("/rooms/{id}/results", post(show_results))
        .route("/rooms/{id}/babies/{index}/score", post(score_baby))
        .route("/rooms/{id}/scores/recompute", post(recompute_scores))
        .route("/rooms/{id}/leaderboard", get(get_leaderboard))
}

/// Open a new room in the lobby.
#[utoipa::path(
    post,
    path = "/rooms",
    tag = "rooms",
    responses(
        (status = 200, description = "Room created", body = RoomSummary),
        (status = 503, description = "Storage unavailable", body = crate::error::ErrorBody)
    )
)]
pub async fn create_room(State(state): State<SharedState>) -> Result<Json<RoomSummary>, AppError> {
    Ok(Json(room_service::create_room(&state).await?))
}

/// Resolve a join code, case-insensitively.
#[utoipa::path(
    get,
    path = "/rooms/code/{code}",
    tag = "rooms",
    params(("code" = String, Path, description = "Four-letter join code")),
    responses(
        (status = 200, description = "Room found", body = RoomSummary),
        (status = 400, description = "Malformed code", body = crate::error::ErrorBody),
        (status = 404, description = "No room with this code", body = crate::error::ErrorBody)
    )
)]
pub async fn find_room_by_code(
    State(state): State<SharedState>,
    Path(code): Path<String>,
) -> Result<Json<RoomSummary>, AppError> {
    Ok(Json(room_service::find_room_by_code(&state, &code).await?))
}

/// Join the room behind a code.
#[utoipa::path(
    post,
    path = "/rooms/code/{code}/players",
    tag = "rooms",
    params(("code" = String, Path, description = "Four-letter join code")),
    request_body = JoinRoomRequest,
    responses(
        (status = 200, description = "Player joined", body = JoinRoomResponse),
        (status = 400, description = "Blank name or malformed code", body = crate::error::ErrorBody),
        (status = 404, description = "No room with this code", body = crate::error::ErrorBody)
    )
)]
pub async fn join_room(
    State(state): State<SharedState>,
    Path(code): Path<String>,
    Valid(Json(payload)): Valid<Json<JoinRoomRequest>>,
) -> Result<Json<JoinRoomResponse>, AppError> {
    Ok(Json(room_service::join_room(&state, &code, payload).await?))
}

/// Room with its roster and scores.
#[utoipa::path(
    get,
    path = "/rooms/{id}",
    tag = "rooms",
    params(("id" = Uuid, Path, description = "Room identifier")),
    responses(
        (status = 200, description = "Room snapshot", body = RoomSnapshot),
        (status = 404, description = "Unknown room", body = crate::error::ErrorBody)
    )
)]
pub async fn get_room(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RoomSnapshot>, AppError> {
    Ok(Json(room_service::room_snapshot(&state, id).await?))
}

/// Players with their submission flag.
#[utoipa::path(
    get,
    path = "/rooms/{id}/players",
    tag = "views",
    params(("id" = Uuid, Path, description = "Room identifier")),
    responses(
        (status = 200, description = "Roster", body = RosterView),
        (status = 404, description = "Unknown room", body = crate::error::ErrorBody)
    )
)]
pub async fn get_roster(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RosterView>, AppError> {
    Ok(Json(view_service::roster(&state, id).await?))
}

/// Close the lobby and open guessing.
#[utoipa::path(
    post,
    path = "/rooms/{id}/guessing",
    tag = "rooms",
    params(("id" = Uuid, Path, description = "Room identifier")),
    responses(
        (status = 200, description = "Guessing started", body = RoomSummary),
        (status = 409, description = "Not allowed from the current phase", body = crate::error::ErrorBody)
    )
)]
pub async fn start_guessing(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RoomSummary>, AppError> {
    Ok(Json(room_service::start_guessing(&state, id).await?))
}

/// Close guessing and reveal the first baby.
#[utoipa::path(
    post,
    path = "/rooms/{id}/reveal",
    tag = "rooms",
    params(("id" = Uuid, Path, description = "Room identifier")),
    responses(
        (status = 200, description = "Reveal started", body = RoomSummary),
        (status = 409, description = "Not allowed from the current phase", body = crate::error::ErrorBody)
    )
)]
pub async fn start_reveal(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RoomSummary>, AppError> {
    Ok(Json(room_service::start_reveal(&state, id).await?))
}

/// Move the reveal cursor to the next baby.
#[utoipa::path(
    post,
    path = "/rooms/{id}/reveal/next",
    tag = "rooms",
    params(("id" = Uuid, Path, description = "Room identifier")),
    responses(
        (status = 200, description = "Cursor advanced", body = RoomSummary),
        (status = 409, description = "Last baby already shown or not revealing", body = crate::error::ErrorBody)
    )
)]
pub async fn next_baby(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RoomSummary>, AppError> {
    Ok(Json(room_service::next_baby(&state, id).await?))
}

/// Finish the reveal and show the leaderboard.
#[utoipa::path(
    post,
    path = "/rooms/{id}/results",
    tag = "rooms",
    params(("id" = Uuid, Path, description = "Room identifier")),
    responses(
        (status = 200, description = "Results shown", body = RoomSummary),
        (status = 409, description = "Babies left to reveal", body = crate::error::ErrorBody)
    )
)]
pub async fn show_results(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RoomSummary>, AppError> {
    Ok(Json(room_service::show_results(&state, id).await?))
}

/// Guesses for the baby under the reveal cursor.
#[utoipa::path(
    get,
    path = "/rooms/{id}/reveal",
    tag = "views",
    params(("id" = Uuid, Path, description = "Room identifier")),
    responses(
        (status = 200, description = "Tally for the current baby", body = RevealTallyView),
        (status = 409, description = "Room is not revealing", body = crate::error::ErrorBody)
    )
)]
pub async fn get_reveal_tally(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RevealTallyView>, AppError> {
    Ok(Json(view_service::reveal_tally(&state, id).await?))
}

/// Award points for one baby.
#[utoipa::path(
    post,
    path = "/rooms/{id}/babies/{index}/score",
    tag = "scores",
    params(
        ("id" = Uuid, Path, description = "Room identifier"),
        ("index" = usize, Path, description = "Baby index")
    ),
    responses(
        (status = 200, description = "Per-player deltas", body = BabyScoreResponse),
        (status = 400, description = "Baby index out of range", body = crate::error::ErrorBody),
        (status = 409, description = "Baby not revealed yet", body = crate::error::ErrorBody)
    )
)]
pub async fn score_baby(
    State(state): State<SharedState>,
    Path((id, index)): Path<(Uuid, usize)>,
) -> Result<Json<BabyScoreResponse>, AppError> {
    Ok(Json(scoring_service::score_for_baby(&state, id, index).await?))
}

/// Recount every score from the guess ledger.
#[utoipa::path(
    post,
    path = "/rooms/{id}/scores/recompute",
    tag = "scores",
    params(("id" = Uuid, Path, description = "Room identifier")),
    responses((status = 200, description = "Overwritten scores", body = RecomputeResponse))
)]
pub async fn recompute_scores(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RecomputeResponse>, AppError> {
    Ok(Json(scoring_service::score_all_babies(&state, id).await?))
}

/// Players ordered by score.
#[utoipa::path(
    get,
    path = "/rooms/{id}/leaderboard",
    tag = "views",
    params(("id" = Uuid, Path, description = "Room identifier")),
    responses((status = 200, description = "Leaderboard", body = LeaderboardView))
)]
pub async fn get_leaderboard(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<LeaderboardView>, AppError> {
    Ok(Json(view_service::leaderboard(&state, id).await?))
}
