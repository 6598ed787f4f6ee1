use std::{convert::Infallible, time::Duration};

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use tokio::sync::broadcast::{self, error::RecvError};
use uuid::Uuid;

use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::{
    dto::sse::{Handshake, ServerEvent},
    error::ServiceError,
    services::sse_events::{self, EVENT_HANDSHAKE, EVENT_ROOM_SNAPSHOT},
    state::SharedState,
};

/// Identifies the target SSE stream for teardown logging.
#[derive(Clone, Copy)]
pub enum StreamKind {
    Public,
    Room(Uuid),
}

/// Subscribe to the shared public SSE stream; the first event is a handshake.
pub async fn subscribe_public(
    state: &SharedState,
) -> (broadcast::Receiver<ServerEvent>, Vec<ServerEvent>) {
    let receiver = state.public_sse().subscribe();
    let handshake = handshake_event("public".into(), state.is_degraded().await);
    (receiver, handshake.into_iter().collect())
}

/// Subscribe to one room. The handshake and the current snapshot are sent first.
pub async fn subscribe_room(
    state: &SharedState,
    room_id: Uuid,
) -> Result<(broadcast::Receiver<ServerEvent>, Vec<ServerEvent>), ServiceError> {
    let store = state.require_game_store().await?;
    let room = store
        .find_room(room_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("room `{room_id}`")))?;

    // Subscribe before reading the snapshot so no later update is missed.
    let receiver = state.room_sse(room_id).subscribe();
    let snapshot = sse_events::build_room_snapshot(state, store.as_ref(), &room).await?;

    let mut initial: Vec<ServerEvent> =
        handshake_event(format!("room:{room_id}"), false).into_iter().collect();
    initial.extend(ServerEvent::json(EVENT_ROOM_SNAPSHOT, &snapshot).ok());
    Ok((receiver, initial))
}

fn handshake_event(stream: String, degraded: bool) -> Option<ServerEvent> {
    ServerEvent::json(
        EVENT_HANDSHAKE,
        &Handshake {
            message: format!("subscribed to {stream}"),
            stream,
            degraded,
        },
    )
    .ok()
}

/// Convert a broadcast receiver into an SSE response, forwarding events and
/// cleaning up once the client disconnects.
pub fn to_sse_stream(
    mut receiver: broadcast::Receiver<ServerEvent>,
    initial: Vec<ServerEvent>,
    kind: StreamKind,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    // small bounded channel between forwarder and response
    let (tx, rx) = mpsc::channel::<Result<Event, Infallible>>(8);

    tokio::spawn(async move {
        for payload in initial {
            if tx.send(Ok(to_event(payload))).await.is_err() {
                return;
            }
        }

        loop {
            tokio::select! {
                _ = tx.closed() => break,
                recv_result = receiver.recv() => {
                    match recv_result {
                        Ok(payload) => {
                            if tx.send(Ok(to_event(payload))).await.is_err() {
                                break;
                            }
                        }
                        Err(RecvError::Closed) => break,
                        Err(RecvError::Lagged(skipped)) => {
                            // Snapshots are self-contained; the next one catches the client up.
                            tracing::debug!(skipped, "SSE subscriber lagged");
                            continue;
                        }
                    }
                }
            }
        }

        match kind {
            StreamKind::Public => tracing::info!("Public SSE stream disconnected"),
            StreamKind::Room(room_id) => tracing::info!(%room_id, "Room SSE stream disconnected"),
        }
    });

    let stream = ReceiverStream::new(rx);
    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

fn to_event(payload: ServerEvent) -> Event {
    Event::default().event(payload.name).data(&*payload.data)
}
