use std::collections::{HashMap, HashSet};

use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    dao::models::{GuessEntity, GuessFilter, PlayerUpdate},
    dto::view::{BabyScoreResponse, PlayerScore, RecomputeResponse, ScoreDelta},
    error::ServiceError,
    services::{room_service::load_room, sse_events},
    state::{SharedState, catalog::AnswerKey},
};

/// Award one point to every player whose guess for `baby_index` matches the answer key.
///
/// Only babies already revealed can be scored: the room must be in REVEAL or RESULTS with the
/// cursor at or past `baby_index`. Scores are read, incremented and written back per player.
/// Calling this twice for the same baby awards the points twice.
pub async fn score_for_baby(
    state: &SharedState,
    room_id: Uuid,
    baby_index: usize,
) -> Result<BabyScoreResponse, ServiceError> {
    let key = state.catalog().answer_key();
    if baby_index >= key.len() {
        return Err(ServiceError::InvalidInput(format!(
            "baby index {baby_index} out of range 0..{}",
            key.len()
        )));
    }

    let store = state.require_game_store().await?;
    let room = load_room(store.as_ref(), room_id).await?;
    if !room.phase.has_reveal_cursor() || baby_index > room.reveal_cursor {
        return Err(ServiceError::InvalidState(format!(
            "baby {baby_index} is not revealed yet (room in {}, cursor {})",
            room.phase.as_str(),
            room.reveal_cursor
        )));
    }

    let players = store.list_players(room_id).await?;
    let guesses = store
        .list_guesses(GuessFilter::room(room_id).baby(baby_index))
        .await?;

    let mut deltas = Vec::with_capacity(players.len());
    for player in players {
        let correct = guesses
            .iter()
            .find(|guess| guess.player_id == player.id)
            .is_some_and(|guess| key.is_correct(baby_index, &guess.couple));

        let mut delta = ScoreDelta {
            player_id: player.id,
            name: player.name,
            awarded: 0,
            score: player.score,
        };
        if correct {
            let score = player.score.saturating_add(1);
            if store
                .update_player(player.id, PlayerUpdate::score(score))
                .await?
            {
                delta.score = score;
                delta.awarded = 1;
                info!(%room_id, player_id = %player.id, baby_index, score, "score awarded");
            } else {
                warn!(%room_id, player_id = %player.id, baby_index, "player vanished before scoring");
            }
        }
        deltas.push(delta);
    }

    sse_events::publish_room_snapshot(state, store.as_ref(), &room).await;

    Ok(BabyScoreResponse {
        room_id,
        baby_index,
        deltas,
    })
}

/// Recount every player's correct guesses across all babies and overwrite stored scores.
pub async fn score_all_babies(
    state: &SharedState,
    room_id: Uuid,
) -> Result<RecomputeResponse, ServiceError> {
    let store = state.require_game_store().await?;
    let room = load_room(store.as_ref(), room_id).await?;
    let players = store.list_players(room_id).await?;
    let guesses = store.list_guesses(GuessFilter::room(room_id)).await?;
    let counts = count_correct(&guesses, state.catalog().answer_key());

    let mut scores = Vec::with_capacity(players.len());
    for player in players {
        let score = counts.get(&player.id).copied().unwrap_or(0);
        store
            .update_player(player.id, PlayerUpdate::score(score))
            .await?;
        scores.push(PlayerScore {
            player_id: player.id,
            name: player.name,
            score,
        });
    }
    info!(%room_id, players = scores.len(), "scores recomputed");

    sse_events::publish_room_snapshot(state, store.as_ref(), &room).await;

    Ok(RecomputeResponse { room_id, scores })
}

/// Correct guesses per player. Only the first guess of each (player, baby) pair counts, which
/// matches what [`score_for_baby`] looks at.
pub fn count_correct(guesses: &[GuessEntity], key: &AnswerKey) -> HashMap<Uuid, u32> {
    let mut seen = HashSet::new();
    let mut counts: HashMap<Uuid, u32> = HashMap::new();
    for guess in guesses {
        if !seen.insert((guess.player_id, guess.baby_index)) {
            continue;
        }
        if key.is_correct(guess.baby_index, &guess.couple) {
            *counts.entry(guess.player_id).or_default() += 1;
        }
    }
    counts
}
