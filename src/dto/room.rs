use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::{
    dao::models::{PlayerEntity, RoomEntity},
    dto::{format_system_time, phase::VisiblePhase, validation::validate_display_name},
};

/// Room as seen by hosts and players.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RoomSummary {
    pub id: Uuid,
    pub code: String,
    pub phase: VisiblePhase,
    /// Only present during `REVEAL` and `RESULTS`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reveal_cursor: Option<usize>,
    pub baby_count: usize,
    pub created_at: String,
}

impl RoomSummary {
    pub fn new(room: &RoomEntity, baby_count: usize) -> Self {
        Self {
            id: room.id,
            code: room.code.clone(),
            phase: room.phase.into(),
            reveal_cursor: room
                .phase
                .has_reveal_cursor()
                .then_some(room.reveal_cursor),
            baby_count,
            created_at: format_system_time(room.created_at),
        }
    }
}

/// Player with score and submission status.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PlayerSummary {
    pub id: Uuid,
    pub room_id: Uuid,
    pub name: String,
    pub score: u32,
    pub submitted_guesses: bool,
    pub joined_at: String,
}

impl From<PlayerEntity> for PlayerSummary {
    fn from(player: PlayerEntity) -> Self {
        Self {
            id: player.id,
            room_id: player.room_id,
            name: player.name,
            score: player.score,
            submitted_guesses: player.submitted_guesses,
            joined_at: format_system_time(player.joined_at),
        }
    }
}

/// Room together with its players in join order. Also pushed over SSE.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RoomSnapshot {
    pub room: RoomSummary,
    pub players: Vec<PlayerSummary>,
}

/// Payload sent by a player joining a room.
#[derive(Debug, Deserialize, ToSchema)]
pub struct JoinRoomRequest {
    /// Display name; surrounding whitespace is trimmed.
    pub name: String,
}

impl Validate for JoinRoomRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Err(e) = validate_display_name(&self.name) {
            errors.add("name", e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Result of a successful join.
#[derive(Debug, Serialize, ToSchema)]
pub struct JoinRoomResponse {
    pub room: RoomSummary,
    pub player: PlayerSummary,
}

#[cfg(test)]
mod tests {
    use std::time::SystemTime;

    use super::*;
    use crate::state::state_machine::RoomPhase;

    fn room(phase: RoomPhase, reveal_cursor: usize) -> RoomEntity {
        RoomEntity {
            id: Uuid::new_v4(),
            code: "WXYZ".into(),
            phase,
            reveal_cursor,
            created_at: SystemTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn cursor_is_hidden_before_reveal() {
        let summary = RoomSummary::new(&room(RoomPhase::Guessing, 0), 9);
        assert_eq!(summary.reveal_cursor, None);
        assert_eq!(summary.created_at, "1970-01-01T00:00:00Z");

        let json = serde_json::to_value(RoomSummary::new(&room(RoomPhase::Reveal, 3), 9)).unwrap();
        assert_eq!(json["phase"], "REVEAL");
        assert_eq!(json["reveal_cursor"], 3);
    }

    #[test]
    fn join_request_rejects_blank_names() {
        assert!(JoinRoomRequest { name: "Alice".into() }.validate().is_ok());
        assert!(JoinRoomRequest { name: " \t".into() }.validate().is_err());
    }
}
