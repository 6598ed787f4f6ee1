//! Process-local [`GameStore`] used when no database is configured and by tests.

use std::sync::Arc;

use dashmap::DashMap;
use futures::future::BoxFuture;
use indexmap::IndexMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::dao::{
    game_store::GameStore,
    models::{GuessEntity, GuessFilter, PlayerEntity, PlayerUpdate, RoomEntity, RoomUpdate},
    storage::StorageResult,
};

/// In-memory store keeping players and guesses in insertion order.
#[derive(Clone, Default)]
pub struct InMemoryGameStore {
    inner: Arc<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    rooms: DashMap<Uuid, RoomEntity>,
    players: RwLock<IndexMap<Uuid, PlayerEntity>>,
    guesses: RwLock<Vec<GuessEntity>>,
}

impl InMemoryGameStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of guess rows currently held, across all rooms.
    pub async fn guess_count(&self) -> usize {
        self.inner.guesses.read().await.len()
    }
}

impl GameStore for InMemoryGameStore {
    fn create_room(&self, room: RoomEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.inner.rooms.insert(room.id, room);
            Ok(())
        })
    }

    fn find_room(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<RoomEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.inner.rooms.get(&id).map(|entry| entry.value().clone())) })
    }

    fn find_room_by_code(
        &self,
        code: String,
    ) -> BoxFuture<'static, StorageResult<Option<RoomEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            // Codes are not unique; the oldest matching room wins.
            Ok(store
                .inner
                .rooms
                .iter()
                .filter(|entry| entry.code == code)
                .map(|entry| entry.value().clone())
                .min_by_key(|room| room.created_at))
        })
    }

    fn update_room(&self, id: Uuid, update: RoomUpdate) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move {
            match store.inner.rooms.get_mut(&id) {
                Some(mut room) => {
                    update.apply_to(&mut room);
                    Ok(true)
                }
                None => Ok(false),
            }
        })
    }

    fn insert_player(&self, player: PlayerEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.inner.players.write().await.insert(player.id, player);
            Ok(())
        })
    }

    fn find_player(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<PlayerEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.inner.players.read().await.get(&id).cloned()) })
    }

    fn list_players(&self, room_id: Uuid) -> BoxFuture<'static, StorageResult<Vec<PlayerEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            Ok(store
                .inner
                .players
                .read()
                .await
                .values()
                .filter(|player| player.room_id == room_id)
                .cloned()
                .collect())
        })
    }

    fn update_player(
        &self,
        id: Uuid,
        update: PlayerUpdate,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move {
            let mut players = store.inner.players.write().await;
            match players.get_mut(&id) {
                Some(player) => {
                    update.apply_to(player);
                    Ok(true)
                }
                None => Ok(false),
            }
        })
    }

    fn insert_guesses(&self, batch: Vec<GuessEntity>) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.inner.guesses.write().await.extend(batch);
            Ok(())
        })
    }

    fn list_guesses(
        &self,
        filter: GuessFilter,
    ) -> BoxFuture<'static, StorageResult<Vec<GuessEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            Ok(store
                .inner
                .guesses
                .read()
                .await
                .iter()
                .filter(|guess| filter.matches(guess))
                .cloned()
                .collect())
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, SystemTime};

    use super::*;
    use crate::state::state_machine::RoomPhase;

    fn room(code: &str, created_at: SystemTime) -> RoomEntity {
        RoomEntity {
            id: Uuid::new_v4(),
            code: code.into(),
            phase: RoomPhase::Lobby,
            reveal_cursor: 0,
            created_at,
        }
    }

    fn player(room_id: Uuid, name: &str) -> PlayerEntity {
        PlayerEntity {
            id: Uuid::new_v4(),
            room_id,
            name: name.into(),
            score: 0,
            submitted_guesses: false,
            joined_at: SystemTime::now(),
        }
    }

    #[tokio::test]
    async fn find_by_code_prefers_oldest_room() {
        let store = InMemoryGameStore::new();
        let now = SystemTime::now();
        let newer = room("ABCD", now);
        let older = room("ABCD", now - Duration::from_secs(60));
        store.create_room(newer).await.unwrap();
        store.create_room(older.clone()).await.unwrap();

        let found = store.find_room_by_code("ABCD".into()).await.unwrap();
        assert_eq!(found, Some(older));
        assert!(store.find_room_by_code("ZZZZ".into()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn players_are_listed_in_join_order_per_room() {
        let store = InMemoryGameStore::new();
        let room_a = Uuid::new_v4();
        let room_b = Uuid::new_v4();
        for (room_id, name) in [(room_a, "Alice"), (room_b, "Zed"), (room_a, "Bob"), (room_a, "Carl")] {
            store.insert_player(player(room_id, name)).await.unwrap();
        }

        let names: Vec<_> = store
            .list_players(room_a)
            .await
            .unwrap()
            .into_iter()
            .map(|player| player.name)
            .collect();
        assert_eq!(names, ["Alice", "Bob", "Carl"]);
    }

    #[tokio::test]
    async fn updates_report_missing_rows() {
        let store = InMemoryGameStore::new();
        assert!(!store.update_player(Uuid::new_v4(), PlayerUpdate::score(1)).await.unwrap());
        assert!(!store.update_room(Uuid::new_v4(), RoomUpdate::default()).await.unwrap());
    }
}
