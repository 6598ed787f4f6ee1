pub mod catalog;
pub mod couple;
pub mod room_code;
mod sse;
pub mod state_machine;

use std::sync::Arc;

use tokio::sync::{RwLock, watch};
use uuid::Uuid;

use crate::{dao::game_store::GameStore, error::ServiceError};

pub use self::sse::SseHub;
use self::{catalog::Catalog, sse::SseState};

pub type SharedState = Arc<AppState>;

const PUBLIC_SSE_CAPACITY: usize = 16;
const ROOM_SSE_CAPACITY: usize = 32;

/// Central application state: the persistence port, the catalog and the SSE hubs.
///
/// Rooms are not cached here; every operation reads them back from the store.
pub struct AppState {
    game_store: RwLock<Option<Arc<dyn GameStore>>>,
    catalog: Arc<Catalog>,
    sse: SseState,
    degraded: watch::Sender<bool>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The application starts in degraded mode until a storage backend is installed.
    pub fn new(catalog: Catalog) -> SharedState {
        let (degraded_tx, _rx) = watch::channel(true);
        Arc::new(Self {
            game_store: RwLock::new(None),
            catalog: Arc::new(catalog),
            sse: SseState::new(PUBLIC_SSE_CAPACITY, ROOM_SSE_CAPACITY),
            degraded: degraded_tx,
        })
    }

    /// Build a state with `store` already installed.
    pub async fn with_store(catalog: Catalog, store: Arc<dyn GameStore>) -> SharedState {
        let state = Self::new(catalog);
        state.set_game_store(store).await;
        state
    }

    /// Obtain a handle to the current game store, if one is installed.
    pub async fn game_store(&self) -> Option<Arc<dyn GameStore>> {
        let guard = self.game_store.read().await;
        guard.as_ref().cloned()
    }

    /// Current store or [`ServiceError::Degraded`].
    pub async fn require_game_store(&self) -> Result<Arc<dyn GameStore>, ServiceError> {
        self.game_store().await.ok_or(ServiceError::Degraded)
    }

    /// Install a new game store implementation and leave degraded mode.
    pub async fn set_game_store(&self, store: Arc<dyn GameStore>) {
        {
            let mut guard = self.game_store.write().await;
            *guard = Some(store);
        }
        self.update_degraded(false).await;
    }

    /// Remove the current game store and enter degraded mode.
    pub async fn clear_game_store(&self) {
        {
            let mut guard = self.game_store.write().await;
            guard.take();
        }
        self.update_degraded(true).await;
    }

    /// Current degraded flag.
    pub async fn is_degraded(&self) -> bool {
        *self.degraded.borrow()
    }

    /// Subscribe to degraded mode updates.
    pub fn degraded_watcher(&self) -> watch::Receiver<bool> {
        self.degraded.subscribe()
    }

    /// Update and broadcast the degraded flag when the value changes.
    pub async fn update_degraded(&self, value: bool) {
        self.degraded.send_if_modified(|current| {
            if *current == value {
                false
            } else {
                *current = value;
                true
            }
        });
    }

    /// Baby sequence and answer key shared by every room.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Broadcast hub used for system-wide notices.
    pub fn public_sse(&self) -> &SseHub {
        self.sse.public()
    }

    /// Broadcast hub of one room.
    pub fn room_sse(&self, room_id: Uuid) -> SseHub {
        self.sse.room(room_id)
    }

    /// Broadcast hub of one room, only if it has been opened already.
    pub fn existing_room_sse(&self, room_id: Uuid) -> Option<SseHub> {
        self.sse.existing_room(room_id)
    }
}
