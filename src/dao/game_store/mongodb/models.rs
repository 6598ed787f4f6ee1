use mongodb::bson::{DateTime, Document, doc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::{MongoDaoError, MongoResult};
use crate::dao::models::{
    GuessEntity, GuessFilter, PlayerEntity, PlayerUpdate, RoomEntity, RoomUpdate,
};
use crate::state::state_machine::RoomPhase;

pub const ROOM_COLLECTION: &str = "rooms";
pub const PLAYER_COLLECTION: &str = "players";
pub const GUESS_COLLECTION: &str = "guesses";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoRoomDocument {
    #[serde(rename = "_id")]
    id: String,
    code: String,
    game_state: String,
    current_reveal_index: i64,
    created_at: DateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoPlayerDocument {
    #[serde(rename = "_id")]
    id: String,
    room_id: String,
    name: String,
    score: i64,
    #[serde(default)]
    submitted_guesses: bool,
    joined_at: DateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoGuessDocument {
    #[serde(rename = "_id")]
    id: String,
    room_id: String,
    player_id: String,
    baby_id: i64,
    couple_name: String,
    submitted_at: DateTime,
}

impl TryFrom<RoomEntity> for MongoRoomDocument {
    type Error = MongoDaoError;

    fn try_from(value: RoomEntity) -> MongoResult<Self> {
        Ok(Self {
            id: value.id.to_string(),
            code: value.code,
            game_state: value.phase.as_str().to_owned(),
            current_reveal_index: count_to_i64("current_reveal_index", value.reveal_cursor)?,
            created_at: DateTime::from_system_time(value.created_at),
        })
    }
}

impl TryFrom<MongoRoomDocument> for RoomEntity {
    type Error = MongoDaoError;

    fn try_from(value: MongoRoomDocument) -> MongoResult<Self> {
        let reject = |reason: String| invalid(ROOM_COLLECTION, &value.id, reason);
        let phase = RoomPhase::parse(&value.game_state)
            .ok_or_else(|| reject(format!("unknown game_state `{}`", value.game_state)))?;
        Ok(Self {
            id: parse_id(ROOM_COLLECTION, &value.id, &value.id)?,
            reveal_cursor: usize::try_from(value.current_reveal_index).map_err(|_| {
                reject(format!(
                    "negative current_reveal_index {}",
                    value.current_reveal_index
                ))
            })?,
            phase,
            created_at: value.created_at.to_system_time(),
            code: value.code,
        })
    }
}

impl From<PlayerEntity> for MongoPlayerDocument {
    fn from(value: PlayerEntity) -> Self {
        Self {
            id: value.id.to_string(),
            room_id: value.room_id.to_string(),
            name: value.name,
            score: i64::from(value.score),
            submitted_guesses: value.submitted_guesses,
            joined_at: DateTime::from_system_time(value.joined_at),
        }
    }
}

impl TryFrom<MongoPlayerDocument> for PlayerEntity {
    type Error = MongoDaoError;

    fn try_from(value: MongoPlayerDocument) -> MongoResult<Self> {
        let score = u32::try_from(value.score).map_err(|_| {
            invalid(
                PLAYER_COLLECTION,
                &value.id,
                format!("score {} out of range", value.score),
            )
        })?;
        Ok(Self {
            id: parse_id(PLAYER_COLLECTION, &value.id, &value.id)?,
            room_id: parse_id(PLAYER_COLLECTION, &value.id, &value.room_id)?,
            name: value.name,
            score,
            submitted_guesses: value.submitted_guesses,
            joined_at: value.joined_at.to_system_time(),
        })
    }
}

impl MongoGuessDocument {
    /// Guesses of one batch share `submitted_at` so they sort together.
    pub fn from_entity(value: GuessEntity, submitted_at: DateTime) -> MongoResult<Self> {
        Ok(Self {
            id: value.id.to_string(),
            room_id: value.room_id.to_string(),
            player_id: value.player_id.to_string(),
            baby_id: count_to_i64("baby_id", value.baby_index)?,
            couple_name: value.couple,
            submitted_at,
        })
    }
}

impl TryFrom<MongoGuessDocument> for GuessEntity {
    type Error = MongoDaoError;

    fn try_from(value: MongoGuessDocument) -> MongoResult<Self> {
        let baby_index = usize::try_from(value.baby_id).map_err(|_| {
            invalid(
                GUESS_COLLECTION,
                &value.id,
                format!("negative baby_id {}", value.baby_id),
            )
        })?;
        Ok(Self {
            id: parse_id(GUESS_COLLECTION, &value.id, &value.id)?,
            room_id: parse_id(GUESS_COLLECTION, &value.id, &value.room_id)?,
            player_id: parse_id(GUESS_COLLECTION, &value.id, &value.player_id)?,
            baby_index,
            couple: value.couple_name,
        })
    }
}

pub fn doc_id(id: Uuid) -> Document {
    doc! {"_id": id.to_string()}
}

/// `$set` document for the fields present in `update`.
pub fn room_set(update: &RoomUpdate) -> MongoResult<Document> {
    let mut set = Document::new();
    if let Some(phase) = update.phase {
        set.insert("game_state", phase.as_str());
    }
    if let Some(cursor) = update.reveal_cursor {
        set.insert("current_reveal_index", count_to_i64("current_reveal_index", cursor)?);
    }
    Ok(set)
}

/// `$set` document for the fields present in `update`.
pub fn player_set(update: &PlayerUpdate) -> Document {
    let mut set = Document::new();
    if let Some(score) = update.score {
        set.insert("score", i64::from(score));
    }
    if let Some(submitted) = update.submitted_guesses {
        set.insert("submitted_guesses", submitted);
    }
    set
}

pub fn guess_query(filter: &GuessFilter) -> MongoResult<Document> {
    let mut query = Document::new();
    if let Some(room_id) = filter.room_id {
        query.insert("room_id", room_id.to_string());
    }
    if let Some(player_id) = filter.player_id {
        query.insert("player_id", player_id.to_string());
    }
    if let Some(baby_index) = filter.baby_index {
        query.insert("baby_id", count_to_i64("baby_id", baby_index)?);
    }
    Ok(query)
}

fn count_to_i64(field: &'static str, value: usize) -> MongoResult<i64> {
    i64::try_from(value).map_err(|_| MongoDaoError::IndexOverflow { field, value })
}

fn parse_id(collection: &'static str, doc_id: &str, raw: &str) -> MongoResult<Uuid> {
    Uuid::parse_str(raw).map_err(|err| invalid(collection, doc_id, format!("bad uuid `{raw}`: {err}")))
}

fn invalid(collection: &'static str, id: &str, reason: String) -> MongoDaoError {
    MongoDaoError::InvalidDocument {
        collection,
        id: id.to_owned(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use std::time::SystemTime;

    use super::*;

    #[test]
    fn room_document_maps_phase_and_cursor() {
        let room = RoomEntity {
            id: Uuid::new_v4(),
            code: "QWER".into(),
            phase: RoomPhase::Reveal,
            reveal_cursor: 4,
            created_at: SystemTime::UNIX_EPOCH,
        };
        let document = MongoRoomDocument::try_from(room.clone()).unwrap();
        assert_eq!(document.game_state, "REVEAL");
        assert_eq!(document.current_reveal_index, 4);
        assert_eq!(RoomEntity::try_from(document).unwrap(), room);
    }

    #[test]
    fn unknown_phase_is_reported_as_invalid_document() {
        let document = MongoRoomDocument {
            id: Uuid::new_v4().to_string(),
            code: "QWER".into(),
            game_state: "PAUSED".into(),
            current_reveal_index: 0,
            created_at: DateTime::now(),
        };
        let err = RoomEntity::try_from(document).unwrap_err();
        assert!(matches!(err, MongoDaoError::InvalidDocument { collection: "rooms", .. }));
    }

    #[test]
    fn negative_score_is_rejected() {
        let document = MongoPlayerDocument {
            id: Uuid::new_v4().to_string(),
            room_id: Uuid::new_v4().to_string(),
            name: "Alice".into(),
            score: -1,
            submitted_guesses: false,
            joined_at: DateTime::now(),
        };
        assert!(PlayerEntity::try_from(document).is_err());
    }

    #[test]
    fn oversized_index_is_an_error() {
        let err = count_to_i64("baby_id", usize::MAX).unwrap_err();
        assert!(matches!(err, MongoDaoError::IndexOverflow { field: "baby_id", .. }));
        assert_eq!(count_to_i64("baby_id", 8).unwrap(), 8);
    }

    #[test]
    fn update_documents_only_carry_set_fields() {
        assert!(room_set(&RoomUpdate::default()).unwrap().is_empty());
        let set = player_set(&PlayerUpdate::score(3));
        assert_eq!(set.get_i64("score").unwrap(), 3);
        assert!(!set.contains_key("submitted_guesses"));
    }

    #[test]
    fn guess_query_uses_stored_field_names() {
        let room_id = Uuid::new_v4();
        let query = guess_query(&GuessFilter::room(room_id).baby(2)).unwrap();
        assert_eq!(query.get_str("room_id").unwrap(), room_id.to_string());
        assert_eq!(query.get_i64("baby_id").unwrap(), 2);
        assert!(!query.contains_key("player_id"));
    }
}
