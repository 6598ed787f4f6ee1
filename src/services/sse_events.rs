use serde::Serialize;
use tracing::{debug, warn};

use crate::{
    dao::{game_store::GameStore, models::RoomEntity, storage::StorageError},
    dto::{
        room::{PlayerSummary, RoomSnapshot, RoomSummary},
        sse::{ServerEvent, SystemStatus},
    },
    state::{SharedState, SseHub},
};

pub const EVENT_ROOM_SNAPSHOT: &str = "room.snapshot";
pub const EVENT_SYSTEM_STATUS: &str = "system.status";
pub const EVENT_HANDSHAKE: &str = "handshake";

/// Build the immutable room + roster snapshot pushed to subscribers.
pub async fn build_room_snapshot(
    state: &SharedState,
    store: &dyn GameStore,
    room: &RoomEntity,
) -> Result<RoomSnapshot, StorageError> {
    let players = store.list_players(room.id).await?;
    Ok(RoomSnapshot {
        room: RoomSummary::new(room, state.catalog().len()),
        players: players.into_iter().map(PlayerSummary::from).collect(),
    })
}

/// Push a fresh snapshot of `room` to its subscribers, if it has any.
///
/// Failures are logged and never reach the caller: the mutation already happened.
pub async fn publish_room_snapshot(state: &SharedState, store: &dyn GameStore, room: &RoomEntity) {
    let Some(hub) = state.existing_room_sse(room.id) else {
        return;
    };
    if hub.receiver_count() == 0 {
        debug!(room_id = %room.id, "no room subscribers; skipping snapshot");
        return;
    }

    match build_room_snapshot(state, store, room).await {
        Ok(snapshot) => send_event(&hub, EVENT_ROOM_SNAPSHOT, &snapshot),
        Err(err) => warn!(room_id = %room.id, error = %err, "failed to build room snapshot"),
    }
}

/// Broadcast the degraded flag on the public stream.
pub fn broadcast_system_status(state: &SharedState, degraded: bool) {
    send_event(state.public_sse(), EVENT_SYSTEM_STATUS, &SystemStatus { degraded });
}

/// Forward every degraded-mode change to public subscribers until the state is dropped.
pub fn spawn_degraded_notifier(state: SharedState) {
    let mut watcher = state.degraded_watcher();
    tokio::spawn(async move {
        while watcher.changed().await.is_ok() {
            let degraded = *watcher.borrow_and_update();
            broadcast_system_status(&state, degraded);
        }
    });
}

fn send_event(hub: &SseHub, name: &'static str, payload: &impl Serialize) {
    match ServerEvent::json(name, payload) {
        Ok(event) => hub.broadcast(event),
        Err(err) => warn!(event = name, error = %err, "failed to serialize SSE payload"),
    }
}
