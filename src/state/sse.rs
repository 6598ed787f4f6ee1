use dashmap::DashMap;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::dto::sse::ServerEvent;

/// SSE-specific sub-state carved out from [`super::AppState`].
pub struct SseState {
    public: SseHub,
    rooms: DashMap<Uuid, SseHub>,
    room_capacity: usize,
}

impl SseState {
    /// Build the SSE sub-tree with per-stream channel capacities.
    pub fn new(public_capacity: usize, room_capacity: usize) -> Self {
        Self {
            public: SseHub::new(public_capacity),
            rooms: DashMap::new(),
            room_capacity,
        }
    }

    /// Access the public SSE hub carrying system-wide notices.
    pub fn public(&self) -> &SseHub {
        &self.public
    }

    /// Hub for one room, created on first use.
    pub fn room(&self, room_id: Uuid) -> SseHub {
        self.rooms
            .entry(room_id)
            .or_insert_with(|| SseHub::new(self.room_capacity))
            .clone()
    }

    /// Hub for one room if somebody already asked for it.
    pub fn existing_room(&self, room_id: Uuid) -> Option<SseHub> {
        self.rooms.get(&room_id).map(|hub| hub.value().clone())
    }
}

/// Simple broadcast hub wrapper used by the SSE services.
#[derive(Clone)]
pub struct SseHub {
    sender: broadcast::Sender<ServerEvent>,
}

impl SseHub {
    /// Construct a new hub backed by a Tokio broadcast channel with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Register a new subscriber that will receive subsequent events.
    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.sender.subscribe()
    }

    /// Send an event to all current subscribers, ignoring delivery errors.
    pub fn broadcast(&self, event: ServerEvent) {
        let _ = self.sender.send(event);
    }

    /// Number of live subscribers.
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}
