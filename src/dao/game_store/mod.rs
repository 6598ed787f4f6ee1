pub mod memory;
#[cfg(feature = "mongo-store")]
pub mod mongodb;

use crate::dao::models::{
    GuessEntity, GuessFilter, PlayerEntity, PlayerUpdate, RoomEntity, RoomUpdate,
};
use crate::dao::storage::StorageResult;
use futures::future::BoxFuture;
use uuid::Uuid;

/// Abstraction over the persistence layer for rooms, players and guesses.
///
/// Every call is a single-row or single-batch write; no cross-row transaction is assumed.
pub trait GameStore: Send + Sync {
    fn create_room(&self, room: RoomEntity) -> BoxFuture<'static, StorageResult<()>>;
    fn find_room(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<RoomEntity>>>;
    /// `code` is expected to be normalized to uppercase already.
    fn find_room_by_code(
        &self,
        code: String,
    ) -> BoxFuture<'static, StorageResult<Option<RoomEntity>>>;
    /// Returns `false` when no room has this id.
    fn update_room(&self, id: Uuid, update: RoomUpdate) -> BoxFuture<'static, StorageResult<bool>>;
    fn insert_player(&self, player: PlayerEntity) -> BoxFuture<'static, StorageResult<()>>;
    fn find_player(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<PlayerEntity>>>;
    /// Players of a room in join order.
    fn list_players(&self, room_id: Uuid) -> BoxFuture<'static, StorageResult<Vec<PlayerEntity>>>;
    /// Returns `false` when no player has this id.
    fn update_player(
        &self,
        id: Uuid,
        update: PlayerUpdate,
    ) -> BoxFuture<'static, StorageResult<bool>>;
    fn insert_guesses(&self, batch: Vec<GuessEntity>) -> BoxFuture<'static, StorageResult<()>>;
    /// Matching guesses in insertion order.
    fn list_guesses(
        &self,
        filter: GuessFilter,
    ) -> BoxFuture<'static, StorageResult<Vec<GuessEntity>>>;
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}
