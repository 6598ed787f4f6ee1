use std::sync::Arc;

use futures::{TryStreamExt, future::BoxFuture};
use mongodb::{
    Collection, Database, IndexModel,
    bson::{DateTime, Document, doc},
    options::IndexOptions,
};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    config::MongoConfig,
    connection::establish_connection,
    error::{MongoDaoError, MongoResult},
    models::{
        GUESS_COLLECTION, MongoGuessDocument, MongoPlayerDocument, MongoRoomDocument,
        PLAYER_COLLECTION, ROOM_COLLECTION, doc_id, guess_query, player_set, room_set,
    },
};
use crate::dao::{
    game_store::GameStore,
    models::{GuessEntity, GuessFilter, PlayerEntity, PlayerUpdate, RoomEntity, RoomUpdate},
    storage::StorageResult,
};

/// [`GameStore`] backed by three MongoDB collections.
#[derive(Clone)]
pub struct MongoGameStore {
    inner: Arc<MongoInner>,
}

struct MongoInner {
    /// Swapped wholesale on reconnect.
    database: RwLock<Database>,
    config: MongoConfig,
}

impl MongoInner {
    async fn ping(&self) -> MongoResult<()> {
        let database = self.database.read().await.clone();
        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| MongoDaoError::HealthPing { source })?;
        Ok(())
    }

    async fn reconnect(&self) -> MongoResult<()> {
        let database = establish_connection(&self.config).await?;
        *self.database.write().await = database;
        Ok(())
    }
}

/// Indexes backing the code lookup and the ordered listings.
const INDEXES: [(&str, &str, &[&str]); 3] = [
    (ROOM_COLLECTION, "rooms_code_idx", &["code", "created_at"]),
    (PLAYER_COLLECTION, "players_room_idx", &["room_id", "joined_at"]),
    (GUESS_COLLECTION, "guesses_room_baby_idx", &["room_id", "baby_id"]),
];

impl MongoGameStore {
    /// Establish a connection to MongoDB and ensure indexes are present.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let database = establish_connection(&config).await?;
        let store = Self {
            inner: Arc::new(MongoInner {
                database: RwLock::new(database),
                config,
            }),
        };
        store.ensure_indexes().await?;
        Ok(store)
    }

    async fn ensure_indexes(&self) -> MongoResult<()> {
        let database = self.database().await;
        for (collection, index, fields) in INDEXES {
            let mut keys = Document::new();
            for field in fields {
                keys.insert(*field, 1);
            }
            let model = IndexModel::builder()
                .keys(keys)
                .options(IndexOptions::builder().name(Some(index.to_owned())).build())
                .build();
            database
                .collection::<Document>(collection)
                .create_index(model)
                .await
                .map_err(|source| MongoDaoError::EnsureIndex {
                    collection,
                    index,
                    source,
                })?;
        }

        Ok(())
    }

    async fn database(&self) -> Database {
        self.inner.database.read().await.clone()
    }

    async fn rooms(&self) -> Collection<MongoRoomDocument> {
        self.database().await.collection(ROOM_COLLECTION)
    }

    async fn players(&self) -> Collection<MongoPlayerDocument> {
        self.database().await.collection(PLAYER_COLLECTION)
    }

    async fn guesses(&self) -> Collection<MongoGuessDocument> {
        self.database().await.collection(GUESS_COLLECTION)
    }

    async fn create_room(&self, room: RoomEntity) -> MongoResult<()> {
        let id = room.id;
        let document = MongoRoomDocument::try_from(room)?;
        self.rooms()
            .await
            .insert_one(&document)
            .await
            .map_err(|source| MongoDaoError::SaveRoom { id, source })?;
        Ok(())
    }

    async fn find_room(&self, id: Uuid) -> MongoResult<Option<RoomEntity>> {
        let document = self
            .rooms()
            .await
            .find_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::LoadRoom {
                key: id.to_string(),
                source,
            })?;
        document.map(RoomEntity::try_from).transpose()
    }

    async fn find_room_by_code(&self, code: String) -> MongoResult<Option<RoomEntity>> {
        // Codes are not unique; the oldest matching room wins.
        let document = self
            .rooms()
            .await
            .find_one(doc! {"code": code.as_str()})
            .sort(doc! {"created_at": 1})
            .await
            .map_err(|source| MongoDaoError::LoadRoom { key: code, source })?;
        document.map(RoomEntity::try_from).transpose()
    }

    async fn update_room(&self, id: Uuid, update: RoomUpdate) -> MongoResult<bool> {
        if update.is_empty() {
            return Ok(self.find_room(id).await?.is_some());
        }
        let result = self
            .rooms()
            .await
            .update_one(doc_id(id), doc! {"$set": room_set(&update)?})
            .await
            .map_err(|source| MongoDaoError::SaveRoom { id, source })?;
        Ok(result.matched_count > 0)
    }

    async fn insert_player(&self, player: PlayerEntity) -> MongoResult<()> {
        let id = player.id;
        let document: MongoPlayerDocument = player.into();
        self.players()
            .await
            .insert_one(&document)
            .await
            .map_err(|source| MongoDaoError::SavePlayer { id, source })?;
        Ok(())
    }

    async fn find_player(&self, id: Uuid) -> MongoResult<Option<PlayerEntity>> {
        let document = self
            .players()
            .await
            .find_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::LoadPlayer { id, source })?;
        document.map(PlayerEntity::try_from).transpose()
    }

    async fn list_players(&self, room_id: Uuid) -> MongoResult<Vec<PlayerEntity>> {
        let documents: Vec<MongoPlayerDocument> = self
            .players()
            .await
            .find(doc! {"room_id": room_id.to_string()})
            .sort(doc! {"joined_at": 1})
            .await
            .map_err(|source| MongoDaoError::ListPlayers { room_id, source })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::ListPlayers { room_id, source })?;

        documents.into_iter().map(PlayerEntity::try_from).collect()
    }

    async fn update_player(&self, id: Uuid, update: PlayerUpdate) -> MongoResult<bool> {
        if update.is_empty() {
            return Ok(self.find_player(id).await?.is_some());
        }
        let result = self
            .players()
            .await
            .update_one(doc_id(id), doc! {"$set": player_set(&update)})
            .await
            .map_err(|source| MongoDaoError::SavePlayer { id, source })?;
        Ok(result.matched_count > 0)
    }

    async fn insert_guesses(&self, batch: Vec<GuessEntity>) -> MongoResult<()> {
        if batch.is_empty() {
            return Ok(());
        }
        let count = batch.len();
        let submitted_at = DateTime::now();
        let documents: Vec<MongoGuessDocument> = batch
            .into_iter()
            .map(|guess| MongoGuessDocument::from_entity(guess, submitted_at))
            .collect::<MongoResult<_>>()?;
        self.guesses()
            .await
            .insert_many(documents)
            .await
            .map_err(|source| MongoDaoError::SaveGuesses { count, source })?;
        Ok(())
    }

    async fn list_guesses(&self, filter: GuessFilter) -> MongoResult<Vec<GuessEntity>> {
        let documents: Vec<MongoGuessDocument> = self
            .guesses()
            .await
            .find(guess_query(&filter)?)
            .sort(doc! {"submitted_at": 1, "baby_id": 1})
            .await
            .map_err(|source| MongoDaoError::ListGuesses { source })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::ListGuesses { source })?;

        documents.into_iter().map(GuessEntity::try_from).collect()
    }
}

impl GameStore for MongoGameStore {
    fn create_room(&self, room: RoomEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.create_room(room).await.map_err(Into::into) })
    }

    fn find_room(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<RoomEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_room(id).await.map_err(Into::into) })
    }

    fn find_room_by_code(
        &self,
        code: String,
    ) -> BoxFuture<'static, StorageResult<Option<RoomEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_room_by_code(code).await.map_err(Into::into) })
    }

    fn update_room(&self, id: Uuid, update: RoomUpdate) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { store.update_room(id, update).await.map_err(Into::into) })
    }

    fn insert_player(&self, player: PlayerEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.insert_player(player).await.map_err(Into::into) })
    }

    fn find_player(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<PlayerEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_player(id).await.map_err(Into::into) })
    }

    fn list_players(&self, room_id: Uuid) -> BoxFuture<'static, StorageResult<Vec<PlayerEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_players(room_id).await.map_err(Into::into) })
    }

    fn update_player(
        &self,
        id: Uuid,
        update: PlayerUpdate,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { store.update_player(id, update).await.map_err(Into::into) })
    }

    fn insert_guesses(&self, batch: Vec<GuessEntity>) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.insert_guesses(batch).await.map_err(Into::into) })
    }

    fn list_guesses(
        &self,
        filter: GuessFilter,
    ) -> BoxFuture<'static, StorageResult<Vec<GuessEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_guesses(filter).await.map_err(Into::into) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.ping().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.reconnect().await.map_err(Into::into) })
    }
}
