use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{dto::phase::VisiblePhase, state::couple::Couple};

/// Roster line used while waiting for submissions.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RosterEntry {
    pub player_id: Uuid,
    pub name: String,
    pub submitted_guesses: bool,
}

/// Players of a room in join order, with submission status.
#[derive(Debug, Serialize, ToSchema)]
pub struct RosterView {
    pub room_id: Uuid,
    pub phase: VisiblePhase,
    pub players: Vec<RosterEntry>,
    /// Players that have not submitted yet.
    pub waiting_on: usize,
}

/// Pair of names, split out of a couple token.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct CoupleDto {
    pub mom: String,
    pub dad: String,
}

impl From<Couple> for CoupleDto {
    fn from(value: Couple) -> Self {
        Self {
            mom: value.mom,
            dad: value.dad,
        }
    }
}

/// All guesses sharing one couple token for the baby under reveal.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TallyGroup {
    /// Raw token; empty for players who skipped the baby.
    pub couple: String,
    pub names: CoupleDto,
    pub count: usize,
    /// Contributing players, in guess order.
    pub players: Vec<String>,
    pub correct: bool,
}

/// Guesses for the baby at the reveal cursor, most popular first.
#[derive(Debug, Serialize, ToSchema)]
pub struct RevealTallyView {
    pub room_id: Uuid,
    pub baby_index: usize,
    pub image_url: String,
    /// Correct couple; whether to show it is up to the host.
    pub answer: CoupleDto,
    pub groups: Vec<TallyGroup>,
    pub total_guesses: usize,
}

/// One leaderboard line.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LeaderboardEntry {
    /// 1-based position; tied players get consecutive ranks in join order.
    pub rank: usize,
    pub player_id: Uuid,
    pub name: String,
    pub score: u32,
}

/// Players by score descending, ties kept in join order.
#[derive(Debug, Serialize, ToSchema)]
pub struct LeaderboardView {
    pub room_id: Uuid,
    pub entries: Vec<LeaderboardEntry>,
}

/// Score change applied to one player.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct ScoreDelta {
    pub player_id: Uuid,
    pub name: String,
    /// Points added by this call.
    pub awarded: u32,
    /// Stored score after the call.
    pub score: u32,
}

/// Outcome of scoring a single baby.
#[derive(Debug, Serialize, ToSchema)]
pub struct BabyScoreResponse {
    pub room_id: Uuid,
    pub baby_index: usize,
    pub deltas: Vec<ScoreDelta>,
}

/// Stored score of a player after a full recompute.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct PlayerScore {
    pub player_id: Uuid,
    pub name: String,
    pub score: u32,
}

/// Outcome of recomputing every score of a room.
#[derive(Debug, Serialize, ToSchema)]
pub struct RecomputeResponse {
    pub room_id: Uuid,
    pub scores: Vec<PlayerScore>,
}
