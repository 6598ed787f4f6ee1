use std::time::SystemTime;

use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    dao::{
        game_store::GameStore,
        models::{PlayerEntity, RoomEntity, RoomUpdate},
    },
    dto::{
        room::{JoinRoomRequest, JoinRoomResponse, PlayerSummary, RoomSnapshot, RoomSummary},
        validation::{validate_display_name, validate_room_code},
    },
    error::ServiceError,
    services::sse_events,
    state::{
        SharedState,
        room_code::{generate_room_code, normalize_room_code},
        state_machine::{RoomEvent, RoomPhase, RoomStateMachine},
    },
};

/// Open a new room in the lobby with a fresh join code.
pub async fn create_room(state: &SharedState) -> Result<RoomSummary, ServiceError> {
    let store = state.require_game_store().await?;
    let room = RoomEntity {
        id: Uuid::new_v4(),
        code: generate_room_code(),
        phase: RoomPhase::Lobby,
        reveal_cursor: 0,
        created_at: SystemTime::now(),
    };
    store.create_room(room.clone()).await?;
    info!(room_id = %room.id, code = %room.code, "room created");

    Ok(RoomSummary::new(&room, state.catalog().len()))
}

/// Resolve a join code, case-insensitively.
pub async fn find_room_by_code(
    state: &SharedState,
    code: &str,
) -> Result<RoomSummary, ServiceError> {
    let store = state.require_game_store().await?;
    let room = resolve_code(store.as_ref(), code).await?;
    Ok(RoomSummary::new(&room, state.catalog().len()))
}

/// Add a player to the room behind `code`.
pub async fn join_room(
    state: &SharedState,
    code: &str,
    request: JoinRoomRequest,
) -> Result<JoinRoomResponse, ServiceError> {
    validate_display_name(&request.name)
        .map_err(|_| ServiceError::InvalidInput("display name must not be empty".into()))?;

    let store = state.require_game_store().await?;
    let room = resolve_code(store.as_ref(), code).await?;
    if room.phase != RoomPhase::Lobby {
        warn!(
            room_id = %room.id,
            phase = room.phase.as_str(),
            "player joining outside the lobby"
        );
    }

    let player = PlayerEntity {
        id: Uuid::new_v4(),
        room_id: room.id,
        name: request.name.trim().to_owned(),
        score: 0,
        submitted_guesses: false,
        joined_at: SystemTime::now(),
    };
    store.insert_player(player.clone()).await?;
    info!(room_id = %room.id, player_id = %player.id, name = %player.name, "player joined");

    sse_events::publish_room_snapshot(state, store.as_ref(), &room).await;

    Ok(JoinRoomResponse {
        room: RoomSummary::new(&room, state.catalog().len()),
        player: PlayerSummary::from(player),
    })
}

/// Room with its roster, as pushed over SSE.
pub async fn room_snapshot(
    state: &SharedState,
    room_id: Uuid,
) -> Result<RoomSnapshot, ServiceError> {
    let store = state.require_game_store().await?;
    let room = load_room(store.as_ref(), room_id).await?;
    Ok(sse_events::build_room_snapshot(state, store.as_ref(), &room).await?)
}

/// LOBBY → GUESSING.
pub async fn start_guessing(
    state: &SharedState,
    room_id: Uuid,
) -> Result<RoomSummary, ServiceError> {
    apply_event(state, room_id, RoomEvent::StartGuessing).await
}

/// GUESSING → REVEAL, cursor on the first baby.
pub async fn start_reveal(state: &SharedState, room_id: Uuid) -> Result<RoomSummary, ServiceError> {
    apply_event(state, room_id, RoomEvent::StartReveal).await
}

/// REVEAL → REVEAL, cursor on the next baby.
pub async fn next_baby(state: &SharedState, room_id: Uuid) -> Result<RoomSummary, ServiceError> {
    apply_event(state, room_id, RoomEvent::NextBaby).await
}

/// REVEAL → RESULTS once the last baby is shown.
pub async fn show_results(state: &SharedState, room_id: Uuid) -> Result<RoomSummary, ServiceError> {
    apply_event(state, room_id, RoomEvent::ShowResults).await
}

/// Validate `event` against the stored progress and write the outcome in one update.
///
/// The write is not conditional on the value read: two hosts racing the same step may both
/// succeed against the same starting point.
async fn apply_event(
    state: &SharedState,
    room_id: Uuid,
    event: RoomEvent,
) -> Result<RoomSummary, ServiceError> {
    let store = state.require_game_store().await?;
    let mut room = load_room(store.as_ref(), room_id).await?;
    let from = room.phase;

    let mut machine = RoomStateMachine::resume(room.progress(), state.catalog().len());
    let next = machine.apply(event)?;

    if !store.update_room(room_id, RoomUpdate::progress(next)).await? {
        return Err(room_not_found(room_id));
    }
    room.phase = next.phase;
    room.reveal_cursor = next.reveal_cursor;
    info!(
        %room_id,
        from = from.as_str(),
        to = next.phase.as_str(),
        reveal_cursor = next.reveal_cursor,
        "room transition applied"
    );

    sse_events::publish_room_snapshot(state, store.as_ref(), &room).await;

    Ok(RoomSummary::new(&room, state.catalog().len()))
}

/// Fetch a room by id or fail with [`ServiceError::NotFound`].
pub(crate) async fn load_room(
    store: &dyn GameStore,
    room_id: Uuid,
) -> Result<RoomEntity, ServiceError> {
    store
        .find_room(room_id)
        .await?
        .ok_or_else(|| room_not_found(room_id))
}

async fn resolve_code(store: &dyn GameStore, code: &str) -> Result<RoomEntity, ServiceError> {
    let code = normalize_room_code(code);
    validate_room_code(&code)
        .map_err(|_| ServiceError::InvalidInput(format!("`{code}` is not a room code")))?;

    store
        .find_room_by_code(code.clone())
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("room with code `{code}`")))
}

fn room_not_found(room_id: Uuid) -> ServiceError {
    ServiceError::NotFound(format!("room `{room_id}`"))
}
