use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use uuid::Uuid;

use crate::state::state_machine::{RoomPhase, RoomProgress};

/// One game session as persisted by the storage layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoomEntity {
    /// Primary key of the room.
    pub id: Uuid,
    /// Four uppercase letters shared with players.
    pub code: String,
    /// Current phase of the room.
    pub phase: RoomPhase,
    /// Index of the baby being revealed.
    pub reveal_cursor: usize,
    /// Creation timestamp.
    pub created_at: SystemTime,
}

impl RoomEntity {
    /// Phase and cursor of this room.
    pub fn progress(&self) -> RoomProgress {
        RoomProgress {
            phase: self.phase,
            reveal_cursor: self.reveal_cursor,
        }
    }
}

/// Participant of a single room.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerEntity {
    /// Primary key of the player.
    pub id: Uuid,
    /// Owning room; never changes.
    pub room_id: Uuid,
    /// Display name chosen when joining.
    pub name: String,
    /// Cumulative score.
    pub score: u32,
    /// Set once the player's guess batch has been accepted.
    pub submitted_guesses: bool,
    /// Join timestamp, used to keep roster order stable.
    pub joined_at: SystemTime,
}

/// One guess row for a (player, baby) pair. Immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GuessEntity {
    /// Primary key of the guess.
    pub id: Uuid,
    /// Room of the owning player, stored to filter without a join.
    pub room_id: Uuid,
    /// Owning player.
    pub player_id: Uuid,
    /// Baby this guess targets.
    pub baby_index: usize,
    /// Couple token chosen by the player; may be empty.
    pub couple: String,
}

/// Partial update applied to a room. Unset fields are left untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoomUpdate {
    /// New phase.
    pub phase: Option<RoomPhase>,
    /// New reveal cursor.
    pub reveal_cursor: Option<usize>,
}

impl RoomUpdate {
    /// Update writing both phase and cursor.
    pub fn progress(progress: RoomProgress) -> Self {
        Self {
            phase: Some(progress.phase),
            reveal_cursor: Some(progress.reveal_cursor),
        }
    }

    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.phase.is_none() && self.reveal_cursor.is_none()
    }

    /// Apply the set fields to an in-memory entity.
    pub fn apply_to(&self, room: &mut RoomEntity) {
        if let Some(phase) = self.phase {
            room.phase = phase;
        }
        if let Some(cursor) = self.reveal_cursor {
            room.reveal_cursor = cursor;
        }
    }
}

/// Partial update applied to a player. Unset fields are left untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerUpdate {
    /// New cumulative score.
    pub score: Option<u32>,
    /// New submitted flag.
    pub submitted_guesses: Option<bool>,
}

impl PlayerUpdate {
    /// Update overwriting the score.
    pub fn score(score: u32) -> Self {
        Self {
            score: Some(score),
            ..Self::default()
        }
    }

    /// Update flipping the submitted flag on.
    pub fn submitted() -> Self {
        Self {
            submitted_guesses: Some(true),
            ..Self::default()
        }
    }

    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.score.is_none() && self.submitted_guesses.is_none()
    }

    /// Apply the set fields to an in-memory entity.
    pub fn apply_to(&self, player: &mut PlayerEntity) {
        if let Some(score) = self.score {
            player.score = score;
        }
        if let Some(submitted) = self.submitted_guesses {
            player.submitted_guesses = submitted;
        }
    }
}

/// Conjunctive filter over guess rows. An empty filter matches everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GuessFilter {
    /// Restrict to one room.
    pub room_id: Option<Uuid>,
    /// Restrict to one player.
    pub player_id: Option<Uuid>,
    /// Restrict to one baby.
    pub baby_index: Option<usize>,
}

impl GuessFilter {
    /// Every guess of a room.
    pub fn room(room_id: Uuid) -> Self {
        Self {
            room_id: Some(room_id),
            ..Self::default()
        }
    }

    /// Every guess of a player.
    pub fn player(player_id: Uuid) -> Self {
        Self {
            player_id: Some(player_id),
            ..Self::default()
        }
    }

    /// Narrow the filter to one baby.
    pub fn baby(mut self, baby_index: usize) -> Self {
        self.baby_index = Some(baby_index);
        self
    }

    /// Whether `guess` satisfies every set criterion.
    pub fn matches(&self, guess: &GuessEntity) -> bool {
        self.room_id.is_none_or(|id| guess.room_id == id)
            && self.player_id.is_none_or(|id| guess.player_id == id)
            && self.baby_index.is_none_or(|index| guess.baby_index == index)
    }
}
