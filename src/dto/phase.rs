use serde::Serialize;
use utoipa::ToSchema;

use crate::state::state_machine::RoomPhase;

/// Room phase exposed to clients (REST/SSE).
#[derive(Debug, Serialize, ToSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VisiblePhase {
    /// Players are joining.
    Lobby,
    /// Players are submitting guesses.
    Guessing,
    /// The host steps through the babies.
    Reveal,
    /// Final leaderboard.
    Results,
}

impl From<RoomPhase> for VisiblePhase {
    fn from(value: RoomPhase) -> Self {
        match value {
            RoomPhase::Lobby => VisiblePhase::Lobby,
            RoomPhase::Guessing => VisiblePhase::Guessing,
            RoomPhase::Reveal => VisiblePhase::Reveal,
            RoomPhase::Results => VisiblePhase::Results,
        }
    }
}
